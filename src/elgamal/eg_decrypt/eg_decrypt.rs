use num_bigint::BigUint;

use crate::crypto_error::CryptoError;
use crate::elgamal::ciphertext::Ciphertext;
use crate::elgamal::eg_keygen::PrivateKey;
use crate::elgamal::params::GroupParams;

// m = c · B^(-a) mod p
//
// B^a n'est pas inversible seulement si B = 0 mod p : le chiffré n'est alors
// pas un élément du groupe et l'erreur est un invariant violé.
pub fn eg_decrypt(ct: &Ciphertext, sk: &PrivateKey, params: &GroupParams) -> Result<BigUint, CryptoError> {
    let shared = params.mod_exp(&ct.ephemeral, &sk.a);
    let shared_inv = params.mod_inv(&shared)?;

    Ok((&ct.masked * shared_inv) % params.p())
}

// Déchiffre puis cherche k dans [0, modulus_bits) tel que m = 2^k.
pub fn eg_decrypt_exponent(ct: &Ciphertext, sk: &PrivateKey, params: &GroupParams) -> Result<u64, CryptoError> {
    let m = eg_decrypt(ct, sk, params)?;
    params.decode_exponent(&m)
}
