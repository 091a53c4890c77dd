use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Num;

use crate::crypto_error::CryptoError;
use crate::elgamal::params::GroupParams;

// ============================================================================
// Protection DoS parsing : un jeton décimal plus long est rejeté AVANT la
// conversion BigUint (coût quadratique en la longueur).
// Couvre les modules jusqu'à 8192 bits (2467 chiffres décimaux) + marge.
// ============================================================================
pub const MAX_DECIMAL_TOKEN_LEN: usize = 2_600;

pub(crate) fn parse_decimal_token(token: &str) -> Result<BigUint, CryptoError> {
    if token.len() > MAX_DECIMAL_TOKEN_LEN {
        return Err(CryptoError::FieldTooLong {
            actual:  token.len(),
            maximum: MAX_DECIMAL_TOKEN_LEN,
        });
    }
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CryptoError::ParseError(format!("entier décimal attendu : {token:?}")));
    }
    BigUint::from_str_radix(token, 10)
        .map_err(|e| CryptoError::ParseError(e.to_string()))
}

pub(crate) fn next_token<'a, I>(tokens: &mut I, what: &str) -> Result<&'a str, CryptoError>
where
    I: Iterator<Item = &'a str>,
{
    tokens
        .next()
        .ok_or_else(|| CryptoError::ParseError(format!("{what} manquant")))
}

pub(crate) fn expect_end<'a, I>(tokens: &mut I) -> Result<(), CryptoError>
where
    I: Iterator<Item = &'a str>,
{
    match tokens.next() {
        None => Ok(()),
        Some(extra) => Err(CryptoError::ParseError(format!("jeton en trop : {extra:?}"))),
    }
}

// ============================================================================
// Chiffré ElGamal (B, c) avec B = g^b mod p et c = m·A^b mod p
//
// Toute paire d'entiers est un chiffré acceptable : aucune opération
// homomorphe n'a besoin de la clé privée. Les mutateurs prennent &mut self,
// l'appelant a donc l'exclusivité de l'instance pendant l'appel.
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext {
    /// B = g^b mod p
    pub ephemeral: BigUint,
    /// c = m · A^b mod p
    pub masked:    BigUint,
}

impl Ciphertext {
    pub fn new(ephemeral: BigUint, masked: BigUint) -> Self {
        Ciphertext { ephemeral, masked }
    }

    /// c <- c·k mod p : Enc(m) devient Enc(m·k) sans déchiffrer.
    pub fn mul_plaintext(&mut self, params: &GroupParams, k: &BigUint) {
        self.masked = (&self.masked * k) % params.p();
    }

    /// Produit composante par composante : Enc(m1)·Enc(m2) = Enc(m1·m2).
    /// Les deux chiffrés doivent être sous la même clé publique.
    pub fn mul_ciphertext(&mut self, params: &GroupParams, other: &Ciphertext) {
        self.ephemeral = (&self.ephemeral * &other.ephemeral) % params.p();
        self.masked = (&self.masked * &other.masked) % params.p();
    }

    /// Enc(m)^k = Enc(m^k)
    pub fn pow(&mut self, params: &GroupParams, k: &BigUint) {
        self.ephemeral = params.mod_exp(&self.ephemeral, k);
        self.masked = params.mod_exp(&self.masked, k);
    }

    /// Vrai si les deux composantes sont dans [0, p).
    pub fn is_reduced(&self, params: &GroupParams) -> bool {
        params.contains(&self.ephemeral) && params.contains(&self.masked)
    }

    pub(crate) fn from_tokens<'a, I>(tokens: &mut I) -> Result<Self, CryptoError>
    where
        I: Iterator<Item = &'a str>,
    {
        let ephemeral = parse_decimal_token(next_token(tokens, "B")?)?;
        let masked = parse_decimal_token(next_token(tokens, "c")?)?;
        Ok(Ciphertext { ephemeral, masked })
    }
}

// Encodage texte : "<B> <c>"
impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ephemeral, self.masked)
    }
}

impl FromStr for Ciphertext {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let ct = Ciphertext::from_tokens(&mut tokens)?;
        expect_end(&mut tokens)?;
        Ok(ct)
    }
}
