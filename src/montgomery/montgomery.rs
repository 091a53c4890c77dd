use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Exponentiation modulaire par échelle de Montgomery.
///
/// Chaque bit de l'exposant, sur `width` positions, coûte exactement une
/// multiplication et une mise au carré, quel que soit sa valeur : la suite
/// d'opérations ne dépend que de `width`. BigUint n'étant pas à temps
/// constant au niveau des limbs, ce n'est qu'une atténuation.
pub fn ladder_modpow(base: &BigUint, exponent: &BigUint, modulus: &BigUint, width: u64) -> BigUint {
    if modulus.is_one() {
        return BigUint::zero();
    }

    let width = width.max(exponent.bits());
    let mut r0 = BigUint::one();
    let mut r1 = base % modulus;

    for i in (0..width).rev() {
        if exponent.bit(i) {
            r0 = (&r0 * &r1) % modulus;
            r1 = (&r1 * &r1) % modulus;
        } else {
            r1 = (&r0 * &r1) % modulus;
            r0 = (&r0 * &r0) % modulus;
        }
    }

    r0
}
