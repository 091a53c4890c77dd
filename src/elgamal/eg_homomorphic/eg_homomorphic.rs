use num_bigint::BigUint;

use crate::elgamal::ciphertext::Ciphertext;
use crate::elgamal::params::GroupParams;

// Opérations homomorphes sans clé privée. Versions par valeur des mutateurs
// de Ciphertext : les opérandes ne sont jamais modifiés.

/// Enc(m) -> Enc(m·k mod p)
pub fn eg_mul_plaintext(ct: &Ciphertext, k: &BigUint, params: &GroupParams) -> Ciphertext {
    let mut out = ct.clone();
    out.mul_plaintext(params, k);
    out
}

/// Enc(m1), Enc(m2) -> Enc(m1·m2 mod p)
///
/// Avec l'encodage exponentiel : Enc(2^x1)·Enc(2^x2) = Enc(2^(x1+x2)).
pub fn eg_mul(lhs: &Ciphertext, rhs: &Ciphertext, params: &GroupParams) -> Ciphertext {
    let mut out = lhs.clone();
    out.mul_ciphertext(params, rhs);
    out
}

/// Enc(m) -> Enc(m^k mod p)
pub fn eg_pow(ct: &Ciphertext, k: &BigUint, params: &GroupParams) -> Ciphertext {
    let mut out = ct.clone();
    out.pow(params, k);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elgamal::eg_decrypt::{eg_decrypt, eg_decrypt_exponent};
    use crate::elgamal::eg_encrypt::{eg_encrypt, eg_encrypt_exponent};
    use crate::elgamal::eg_keygen::eg_keygen;
    use crate::elgamal::params::Exponentiation;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const P64: u64 = 9223372036854803519;
    const Q64: u64 = 4611686018427401759;

    fn params64() -> GroupParams {
        GroupParams::with_subgroup_order(P64.into(), 4u32.into(), Q64.into()).unwrap()
    }

    #[test]
    fn test_multiplicative_homomorphism() {
        let mut rng = StdRng::seed_from_u64(11);
        let params = params64();
        let kp = eg_keygen(&params, &mut rng);

        let m1 = BigUint::from(123456u32);
        let m2 = BigUint::from(7890123u32);
        let c1 = eg_encrypt(&m1, &kp.public_key, &params, &mut rng).unwrap();
        let c2 = eg_encrypt(&m2, &kp.public_key, &params, &mut rng).unwrap();

        let product = eg_mul(&c1, &c2, &params);
        assert_eq!(
            eg_decrypt(&product, &kp.private_key, &params).unwrap(),
            (&m1 * &m2) % params.p()
        );
        // opérandes inchangés
        assert_eq!(eg_decrypt(&c1, &kp.private_key, &params).unwrap(), m1);
    }

    #[test]
    fn test_plaintext_scaling() {
        let mut rng = StdRng::seed_from_u64(12);
        let params = params64();
        let kp = eg_keygen(&params, &mut rng);

        let m = BigUint::from(1_000_003u32);
        let k = BigUint::from(P64 - 2);
        let ct = eg_encrypt(&m, &kp.public_key, &params, &mut rng).unwrap();
        let scaled = eg_mul_plaintext(&ct, &k, &params);
        assert_eq!(
            eg_decrypt(&scaled, &kp.private_key, &params).unwrap(),
            (&m * &k) % params.p()
        );
    }

    #[test]
    fn test_power_scaling() {
        let mut rng = StdRng::seed_from_u64(13);
        let params = params64();
        let kp = eg_keygen(&params, &mut rng);

        let m = BigUint::from(31337u32);
        let k = BigUint::from(5u32);
        let ct = eg_encrypt(&m, &kp.public_key, &params, &mut rng).unwrap();
        let raised = eg_pow(&ct, &k, &params);
        assert_eq!(
            eg_decrypt(&raised, &kp.private_key, &params).unwrap(),
            m.modpow(&k, params.p())
        );
    }

    #[test]
    fn test_exponent_addition() {
        let mut rng = StdRng::seed_from_u64(14);
        let params = params64();
        let kp = eg_keygen(&params, &mut rng);

        let c1 = eg_encrypt_exponent(10, &kp.public_key, &params, &mut rng).unwrap();
        let c2 = eg_encrypt_exponent(20, &kp.public_key, &params, &mut rng).unwrap();
        let sum = eg_mul(&c1, &c2, &params);
        assert_eq!(eg_decrypt_exponent(&sum, &kp.private_key, &params), Ok(30));

        // Enc(2^x)^k = Enc(2^(k·x))
        let tripled = eg_pow(&c1, &BigUint::from(3u32), &params);
        assert_eq!(eg_decrypt_exponent(&tripled, &kp.private_key, &params), Ok(30));
    }

    #[test]
    fn test_fixed_schedule_matches_variable() {
        let mut rng = StdRng::seed_from_u64(15);
        let params = params64().with_exponentiation(Exponentiation::FixedSchedule);
        let kp = eg_keygen(&params, &mut rng);

        let c1 = eg_encrypt_exponent(7, &kp.public_key, &params, &mut rng).unwrap();
        let c2 = eg_encrypt_exponent(9, &kp.public_key, &params, &mut rng).unwrap();
        let sum = eg_mul(&c1, &c2, &params);
        assert_eq!(eg_decrypt_exponent(&sum, &kp.private_key, &params), Ok(16));
    }
}
