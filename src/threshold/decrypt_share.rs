use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;

use crate::crypto_error::CryptoError;
use crate::elgamal::ciphertext::{expect_end, next_token, parse_decimal_token};

// Part de déchiffrement (x, B^y mod p) produite par un détenteur de Keyshare
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecryptShare {
    pub x:     u32,
    pub share: BigUint,
}

impl DecryptShare {
    pub fn new(x: u32, share: BigUint) -> Self {
        DecryptShare { x, share }
    }

    pub(crate) fn from_tokens<'a, I>(tokens: &mut I) -> Result<Self, CryptoError>
    where
        I: Iterator<Item = &'a str>,
    {
        let raw_x = next_token(tokens, "x")?;
        let x = raw_x
            .parse::<u32>()
            .map_err(|_| CryptoError::ParseError(format!("abscisse invalide : {raw_x:?}")))?;
        if x == 0 {
            return Err(CryptoError::ParseError("abscisse x = 0 interdite".to_string()));
        }
        let share = parse_decimal_token(next_token(tokens, "part")?)?;
        Ok(DecryptShare { x, share })
    }
}

// Encodage texte : "<x> <share>"
impl fmt::Display for DecryptShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.share)
    }
}

impl FromStr for DecryptShare {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let share = DecryptShare::from_tokens(&mut tokens)?;
        expect_end(&mut tokens)?;
        Ok(share)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_encoding() {
        let share = DecryptShare::new(2, BigUint::from(9_876_543_210u64));
        assert_eq!(share.to_string(), "2 9876543210");
        assert_eq!("2 9876543210".parse::<DecryptShare>().unwrap(), share);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("2".parse::<DecryptShare>().is_err());
        assert!("-1 5".parse::<DecryptShare>().is_err());
        assert!("4294967296 5".parse::<DecryptShare>().is_err());
        assert!("1 5 6".parse::<DecryptShare>().is_err());
        assert!(matches!("0 5".parse::<DecryptShare>(), Err(CryptoError::ParseError(_))));
        assert!(matches!("00 5".parse::<DecryptShare>(), Err(CryptoError::ParseError(_))));
    }
}
