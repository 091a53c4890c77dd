use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::One;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto_error::CryptoError;
use crate::elgamal::math::{
    decode_base2_exponent, generate_safe_prime, is_prime, mod_inverse, power_of_two,
};
use crate::montgomery::ladder_modpow;

// ============================================================================
// Choix de la primitive d'exponentiation
//
// Variable      : BigUint::modpow (fenêtres glissantes, dépend des bits)
// FixedSchedule : échelle de Montgomery, suite d'opérations fixe
//
// À utiliser quand l'exposant est secret (a, b, y) et que le canal
// temporel est observable.
// ============================================================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exponentiation {
    #[default]
    Variable,
    FixedSchedule,
}

// ============================================================================
// Paramètres publics du groupe : module p, générateur g
//
// modulus_bits est calculé une seule fois à la construction.
// exponent_order est le module de l'arithmétique des exposants : l'ordre q
// du sous-groupe s'il est connu, p - 1 sinon.
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupParams {
    p:              BigUint,
    g:              BigUint,
    subgroup_order: Option<BigUint>,
    exponent_order: BigUint,
    modulus_bits:   u64,
    exponentiation: Exponentiation,
}

impl GroupParams {
    pub fn new(p: BigUint, g: BigUint) -> Result<Self, CryptoError> {
        if p <= BigUint::from(3u32) || !is_prime(&p) {
            return Err(CryptoError::InvalidParameters(
                "le module p doit être un nombre premier > 3".into(),
            ));
        }
        let p_minus_1 = &p - BigUint::one();
        if g <= BigUint::one() || g >= p_minus_1 {
            return Err(CryptoError::InvalidParameters(
                "le générateur g doit être dans [2, p-2]".into(),
            ));
        }

        Ok(GroupParams {
            modulus_bits:   p.bits(),
            exponent_order: p_minus_1,
            subgroup_order: None,
            exponentiation: Exponentiation::default(),
            p,
            g,
        })
    }

    /// Comme `new`, lorsque g engendre un sous-groupe d'ordre premier q connu
    /// (typiquement p = 2q + 1). Les exposants sont alors réduits modulo q.
    pub fn with_subgroup_order(p: BigUint, g: BigUint, q: BigUint) -> Result<Self, CryptoError> {
        let mut params = Self::new(p, g)?;

        if !is_prime(&q) || !(&params.p - BigUint::one()).is_multiple_of(&q) {
            return Err(CryptoError::InvalidParameters(
                "q doit être un premier divisant p - 1".into(),
            ));
        }
        if !params.g.modpow(&q, &params.p).is_one() {
            return Err(CryptoError::InvalidParameters(
                "g n'est pas d'ordre q".into(),
            ));
        }

        params.exponent_order = q.clone();
        params.subgroup_order = Some(q);
        Ok(params)
    }

    /// Safe prime p = 2q + 1 de `bits` bits et g = h^2 mod p, générateur du
    /// sous-groupe des résidus quadratiques (ordre q).
    ///
    /// p = 7 mod 8 : 2 est alors un résidu quadratique, et toutes les
    /// puissances de deux de l'encodage exponentiel restent dans <g>.
    pub fn generate<R>(bits: u64, rng: &mut R) -> Result<Self, CryptoError>
    where
        R: RngCore + CryptoRng,
    {
        let eight = BigUint::from(8u32);
        let seven = BigUint::from(7u32);
        let p = loop {
            let candidate = generate_safe_prime(bits, rng)?;
            if &candidate % &eight == seven {
                break candidate;
            }
        };
        let q = (&p - BigUint::one()) >> 1u32;

        // h dans [2, p-2] : h^2 != 1, donc g est d'ordre exactement q
        let h = rng.gen_biguint_range(&BigUint::from(2u32), &(&p - BigUint::one()));
        let g = h.modpow(&BigUint::from(2u32), &p);

        debug!(bits, "paramètres de groupe générés");
        Self::with_subgroup_order(p, g, q)
    }

    pub fn with_exponentiation(mut self, exponentiation: Exponentiation) -> Self {
        self.exponentiation = exponentiation;
        self
    }

    pub fn p(&self) -> &BigUint { &self.p }
    pub fn g(&self) -> &BigUint { &self.g }
    pub fn modulus_bits(&self) -> u64 { self.modulus_bits }
    pub fn exponent_order(&self) -> &BigUint { &self.exponent_order }
    pub fn subgroup_order(&self) -> Option<&BigUint> { self.subgroup_order.as_ref() }
    pub fn exponentiation(&self) -> Exponentiation { self.exponentiation }

    /// Vrai si l'ordre q du sous-groupe est connu et si 2^q = 1 mod p :
    /// 2 appartient alors à <g>, et Enc(2^k) ne se distingue pas de Enc(1)
    /// par un test d'appartenance au sous-groupe.
    pub fn powers_of_two_in_subgroup(&self) -> bool {
        match &self.subgroup_order {
            Some(q) => self.mod_exp(&BigUint::from(2u32), q).is_one(),
            None => false,
        }
    }

    /// Vrai si x est un représentant réduit, dans [0, p).
    pub fn contains(&self, x: &BigUint) -> bool {
        x < &self.p
    }

    // Secret uniforme dans [0, p-2] (clé privée, aléa de chiffrement)
    pub(crate) fn random_exponent<R>(&self, rng: &mut R) -> BigUint
    where
        R: RngCore + CryptoRng,
    {
        rng.gen_biguint_below(&(&self.p - BigUint::one()))
    }

    // -----------------------------------------------------------------------
    // base^exponent mod p, avec la primitive configurée
    // -----------------------------------------------------------------------
    pub fn mod_exp(&self, base: &BigUint, exponent: &BigUint) -> BigUint {
        match self.exponentiation {
            Exponentiation::Variable => base.modpow(exponent, &self.p),
            Exponentiation::FixedSchedule => {
                ladder_modpow(base, exponent, &self.p, self.modulus_bits)
            }
        }
    }

    /// Exposant signé : |exponent| puis inverse si négatif.
    pub fn mod_exp_signed(&self, base: &BigUint, exponent: &BigInt) -> Result<BigUint, CryptoError> {
        let power = self.mod_exp(base, exponent.magnitude());
        match exponent.sign() {
            Sign::Minus => self.mod_inv(&power),
            _ => Ok(power),
        }
    }

    pub fn mod_inv(&self, n: &BigUint) -> Result<BigUint, CryptoError> {
        mod_inverse(n, &self.p)
    }

    // -----------------------------------------------------------------------
    // Encodage exponentiel borné par la taille du module
    // -----------------------------------------------------------------------
    pub fn encode_exponent(&self, x: u64) -> Result<BigUint, CryptoError> {
        if x >= self.modulus_bits {
            return Err(CryptoError::ExponentOutOfRange {
                exponent: x,
                bound: self.modulus_bits,
            });
        }
        Ok(power_of_two(x))
    }

    pub fn decode_exponent(&self, n: &BigUint) -> Result<u64, CryptoError> {
        decode_base2_exponent(n, 0, self.modulus_bits)
    }
}
