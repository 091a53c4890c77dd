use std::collections::HashSet;

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::One;

use crate::crypto_error::{CryptoError, ShareSetError};
use crate::elgamal::math::mod_inverse;
use crate::elgamal::params::GroupParams;

/// Vérifie que les abscisses sont non nulles et deux à deux distinctes.
pub(crate) fn check_coordinates(xs: &[u32]) -> Result<(), ShareSetError> {
    let mut seen = HashSet::with_capacity(xs.len());
    for &x in xs {
        if x == 0 {
            return Err(ShareSetError::ZeroCoordinate);
        }
        if !seen.insert(x) {
            return Err(ShareSetError::DuplicateCoordinate { x });
        }
    }
    Ok(())
}

// ============================================================================
// Coefficient de Lagrange en 0 pour l'abscisse x : ∏_{x' != x} x' / (x' - x)
//
// Calcul en rationnel exact. Un coefficient entier est rendu tel quel (il
// peut être négatif). Sinon num · den^(-1) mod exponent_order, ce qui exige
// gcd(den, exponent_order) = 1 : sans quoi NonIntegralLagrange.
// ============================================================================
pub fn lagrange_factor(x: u32, xs: &[u32], params: &GroupParams) -> Result<BigInt, CryptoError> {
    check_coordinates(xs)?;
    if !xs.contains(&x) {
        return Err(ShareSetError::UnknownCoordinate { x }.into());
    }

    let mut product = BigRational::one();
    for &other in xs.iter().filter(|&&other| other != x) {
        let num = BigInt::from(other);
        let den = BigInt::from(i64::from(other) - i64::from(x));
        product *= BigRational::new(num, den);
    }

    if product.is_integer() {
        return Ok(product.to_integer());
    }

    let order = params.exponent_order();
    // BigRational normalise : dénominateur strictement positif
    let den_inv = mod_inverse(product.denom().magnitude(), order)
        .map_err(|_| ShareSetError::NonIntegralLagrange { x })?;
    let order = BigInt::from_biguint(Sign::Plus, order.clone());
    Ok((product.numer() * BigInt::from_biguint(Sign::Plus, den_inv)).mod_floor(&order))
}

#[cfg(test)]
mod tests {
    use super::*;

    const P64: u64 = 9223372036854803519;
    const Q64: u64 = 4611686018427401759;

    fn params64() -> GroupParams {
        GroupParams::with_subgroup_order(P64.into(), 4u32.into(), Q64.into()).unwrap()
    }

    fn params_64151() -> GroupParams {
        GroupParams::new(64151u32.into(), 11u32.into()).unwrap()
    }

    #[test]
    fn test_integral_factors() {
        let params = params_64151();
        // {1, 2} : L_1 = 2/(2-1) = 2, L_2 = 1/(1-2) = -1
        assert_eq!(lagrange_factor(1, &[1, 2], &params), Ok(BigInt::from(2)));
        assert_eq!(lagrange_factor(2, &[1, 2], &params), Ok(BigInt::from(-1)));
        // {1, 2, 3} : 3, -3, 1
        assert_eq!(lagrange_factor(1, &[1, 2, 3], &params), Ok(BigInt::from(3)));
        assert_eq!(lagrange_factor(2, &[1, 2, 3], &params), Ok(BigInt::from(-3)));
        assert_eq!(lagrange_factor(3, &[1, 2, 3], &params), Ok(BigInt::from(1)));
        // singleton : produit vide
        assert_eq!(lagrange_factor(4, &[4], &params), Ok(BigInt::one()));
    }

    #[test]
    fn test_non_integral_with_invertible_denominator() {
        let params = params64();
        // {1, 3} : L_1 = 3/2, donc 2·L_1 = 3 mod q
        let l1 = lagrange_factor(1, &[1, 3], &params).unwrap();
        let q = BigInt::from(Q64);
        assert_eq!((l1 * BigInt::from(2)).mod_floor(&q), BigInt::from(3));
    }

    #[test]
    fn test_non_integral_with_even_group_order() {
        // exponent_order = 64150 est pair : 1/2 n'existe pas
        let params = params_64151();
        assert_eq!(
            lagrange_factor(1, &[1, 3], &params),
            Err(CryptoError::InvalidShareSet(ShareSetError::NonIntegralLagrange { x: 1 }))
        );
    }

    #[test]
    fn test_rejects_malformed_sets() {
        let params = params64();
        assert_eq!(
            lagrange_factor(1, &[1, 2, 2], &params),
            Err(CryptoError::InvalidShareSet(ShareSetError::DuplicateCoordinate { x: 2 }))
        );
        assert_eq!(
            lagrange_factor(5, &[1, 2], &params),
            Err(CryptoError::InvalidShareSet(ShareSetError::UnknownCoordinate { x: 5 }))
        );
        assert_eq!(
            lagrange_factor(1, &[0, 1], &params),
            Err(CryptoError::InvalidShareSet(ShareSetError::ZeroCoordinate))
        );
        assert_eq!(
            lagrange_factor(0, &[0, 1, 2], &params),
            Err(CryptoError::InvalidShareSet(ShareSetError::ZeroCoordinate))
        );
    }
}
