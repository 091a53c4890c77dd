use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::elgamal::params::GroupParams;

// ============================================================================
// Clé publique ElGamal : A = g^a mod p — pas de données secrètes
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub g_a: BigUint,
}

// ============================================================================
// Helper : remet un BigUint à zéro.
// BigUint n'expose pas son buffer : on libère la valeur sans garantie
// d'écrasement des anciens limbs.
// ============================================================================
pub(crate) fn zeroize_biguint(n: &mut BigUint) {
    n.set_zero();
}

// ============================================================================
// Clé privée ElGamal : a dans [0, p-2] — ZEROISÉE À LA DESTRUCTION
// ============================================================================
#[derive(Clone)]
pub struct PrivateKey {
    pub a: BigUint,
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        zeroize_biguint(&mut self.a);
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").field("a", &"<secret>").finish()
    }
}

// ============================================================================
// Paire de clés
// ============================================================================
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub private_key: PrivateKey,
    pub public_key:  PublicKey,
}

// ============================================================================
// Génération de clés : a uniforme dans [0, p-2], A = g^a mod p
//
// Le générateur est fourni par l'appelant : aucun état aléatoire global.
// ============================================================================
pub fn eg_keygen<R>(params: &GroupParams, rng: &mut R) -> KeyPair
where
    R: RngCore + CryptoRng,
{
    let a = params.random_exponent(rng);
    let g_a = params.mod_exp(params.g(), &a);

    KeyPair {
        private_key: PrivateKey { a },
        public_key:  PublicKey { g_a },
    }
}
