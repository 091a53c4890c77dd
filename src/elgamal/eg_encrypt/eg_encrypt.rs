use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};

use crate::crypto_error::CryptoError;
use crate::elgamal::ciphertext::Ciphertext;
use crate::elgamal::eg_keygen::PublicKey;
use crate::elgamal::params::GroupParams;

// ---------------------------------------------------------------------------
// Chiffrement de 1 : (g^b, A^b) avec b uniforme dans [0, p-2].
// Sert de facteur de re-randomisation : multiplier un chiffré par ce
// résultat change son aléa sans changer le clair.
// ---------------------------------------------------------------------------
pub fn eg_blinding<R>(pk: &PublicKey, params: &GroupParams, rng: &mut R) -> Ciphertext
where
    R: RngCore + CryptoRng,
{
    let b = params.random_exponent(rng);
    Ciphertext::new(params.mod_exp(params.g(), &b), params.mod_exp(&pk.g_a, &b))
}

// ---------------------------------------------------------------------------
// Chiffrement ElGamal : (B, c) = (g^b, m·A^b) mod p
//
// Retourne Err(CryptoError::MessageOutOfRange) si m n'est pas dans [1, p).
// ---------------------------------------------------------------------------
pub fn eg_encrypt<R>(
    m: &BigUint,
    pk: &PublicKey,
    params: &GroupParams,
    rng: &mut R,
) -> Result<Ciphertext, CryptoError>
where
    R: RngCore + CryptoRng,
{
    if m.is_zero() || !params.contains(m) {
        return Err(CryptoError::MessageOutOfRange);
    }

    let mut ct = eg_blinding(pk, params, rng);
    ct.mul_plaintext(params, m);
    Ok(ct)
}

// ---------------------------------------------------------------------------
// Variante exponentielle : chiffre 2^x. Le produit de deux tels chiffrés
// déchiffre en 2^(x1+x2), tant que x1 + x2 < modulus_bits.
// ---------------------------------------------------------------------------
pub fn eg_encrypt_exponent<R>(
    x: u64,
    pk: &PublicKey,
    params: &GroupParams,
    rng: &mut R,
) -> Result<Ciphertext, CryptoError>
where
    R: RngCore + CryptoRng,
{
    let m = params.encode_exponent(x)?;
    eg_encrypt(&m, pk, params, rng)
}
