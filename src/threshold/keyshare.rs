use std::fmt;

use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};
use tracing::debug;
use zeroize::Zeroize;

use crate::crypto_error::CryptoError;
use crate::elgamal::ciphertext::Ciphertext;
use crate::elgamal::eg_keygen::{zeroize_biguint, PrivateKey};
use crate::elgamal::params::GroupParams;
use crate::threshold::decrypt_share::DecryptShare;

// ============================================================================
// Part de Shamir (x, y = f(x)) de la clé privée a
//
// f(X) = a + c_1·X + ... + c_{t-1}·X^(t-1) mod exponent_order.
// y est secret : zeroisé à la destruction, comme PrivateKey.
// ============================================================================
#[derive(Clone)]
pub struct Keyshare {
    /// Abscisse dans [1, n]
    pub x: u32,
    /// f(x) mod exponent_order
    pub y: BigUint,
}

impl Keyshare {
    pub fn new(x: u32, y: BigUint) -> Self {
        Keyshare { x, y }
    }

    /// Part de déchiffrement B^y mod p, publiable.
    pub fn decrypt_share(&self, params: &GroupParams, ct: &Ciphertext) -> DecryptShare {
        DecryptShare::new(self.x, params.mod_exp(&ct.ephemeral, &self.y))
    }
}

impl Zeroize for Keyshare {
    fn zeroize(&mut self) {
        zeroize_biguint(&mut self.y);
    }
}

impl Drop for Keyshare {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Debug for Keyshare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keyshare")
            .field("x", &self.x)
            .field("y", &"<secret>")
            .finish()
    }
}

// ============================================================================
// Découpage (t, n) de la clé privée
//
// Retourne Err(CryptoError::InvalidThreshold) si t = 0 ou t > n.
// Les coefficients sont tirés dans [0, exponent_order) puis effacés.
// ============================================================================
pub fn generate_shares<R>(
    sk: &PrivateKey,
    threshold: u32,
    num_shares: u32,
    params: &GroupParams,
    rng: &mut R,
) -> Result<Vec<Keyshare>, CryptoError>
where
    R: RngCore + CryptoRng,
{
    if threshold == 0 || threshold > num_shares {
        return Err(CryptoError::InvalidThreshold {
            threshold,
            shares: num_shares,
        });
    }

    let order = params.exponent_order();

    // coeffs[0] = a, coeffs[k] = c_k
    let mut coeffs = Vec::with_capacity(threshold as usize);
    coeffs.push(&sk.a % order);
    for _ in 1..threshold {
        coeffs.push(rng.gen_biguint_below(order));
    }

    let shares = (1..=num_shares)
        .map(|x| {
            // Horner, du terme de plus haut degré vers a
            let y = coeffs
                .iter()
                .rev()
                .fold(BigUint::zero(), |acc, c| (acc * x + c) % order);
            Keyshare::new(x, y)
        })
        .collect();

    for c in coeffs.iter_mut() {
        zeroize_biguint(c);
    }

    debug!(threshold, num_shares, "clé privée découpée en parts");
    Ok(shares)
}
