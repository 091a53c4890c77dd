use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::crypto_error::{CryptoError, ProtocolError};
use crate::elgamal::ciphertext::{expect_end, Ciphertext};
use crate::elgamal::params::GroupParams;
use crate::threshold::DecryptShare;

pub const SELECTION_BIT_TAG: &str = "SelectionBit";
pub const SELECTION_TAG: &str = "Selection";

// Longueur maximale d'une étiquette recopiée dans une erreur
const MAX_REPORTED_TAG_LEN: usize = 32;

// ============================================================================
// Messages du transfert inconscient 1 parmi 2
//
//   "SelectionBit <B> <c>"              receveur -> émetteur
//   "Selection <B> <c> <x> <share>"     émetteur -> receveur
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OtMessage {
    SelectionBit { selection: Ciphertext },
    Selection { combined: Ciphertext, share: DecryptShare },
}

impl OtMessage {
    pub fn tag(&self) -> &'static str {
        match self {
            OtMessage::SelectionBit { .. } => SELECTION_BIT_TAG,
            OtMessage::Selection { .. } => SELECTION_TAG,
        }
    }

    /// Parse un message en exigeant l'étiquette `expected`.
    /// Une autre étiquette donne ProtocolError::UnexpectedMessage.
    pub fn parse_expecting(raw: &str, expected: &'static str) -> Result<Self, CryptoError> {
        let found = raw.split_whitespace().next().unwrap_or_default();
        if found != expected {
            return Err(ProtocolError::UnexpectedMessage {
                expected,
                found: found.chars().take(MAX_REPORTED_TAG_LEN).collect(),
            }
            .into());
        }
        raw.parse()
    }

    /// Toutes les composantes reçues doivent être dans [1, p).
    pub fn check_elements(&self, params: &GroupParams) -> Result<(), ProtocolError> {
        let in_group = |x: &BigUint| !x.is_zero() && params.contains(x);
        let valid = match self {
            OtMessage::SelectionBit { selection } => {
                in_group(&selection.ephemeral) && in_group(&selection.masked)
            }
            OtMessage::Selection { combined, share } => {
                in_group(&combined.ephemeral) && in_group(&combined.masked) && in_group(&share.share)
            }
        };
        if valid {
            Ok(())
        } else {
            Err(ProtocolError::ElementOutOfGroup)
        }
    }
}

impl fmt::Display for OtMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtMessage::SelectionBit { selection } => write!(f, "{SELECTION_BIT_TAG} {selection}"),
            OtMessage::Selection { combined, share } => {
                write!(f, "{SELECTION_TAG} {combined} {share}")
            }
        }
    }
}

impl FromStr for OtMessage {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let message = match tokens.next() {
            Some(SELECTION_BIT_TAG) => OtMessage::SelectionBit {
                selection: Ciphertext::from_tokens(&mut tokens)?,
            },
            Some(SELECTION_TAG) => OtMessage::Selection {
                combined: Ciphertext::from_tokens(&mut tokens)?,
                share:    DecryptShare::from_tokens(&mut tokens)?,
            },
            Some(other) => {
                let other: String = other.chars().take(MAX_REPORTED_TAG_LEN).collect();
                return Err(ProtocolError::MalformedMessage(format!("étiquette inconnue {other:?}")).into());
            }
            None => return Err(ProtocolError::MalformedMessage("message vide".into()).into()),
        };
        expect_end(&mut tokens)?;
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> OtMessage {
        OtMessage::Selection {
            combined: Ciphertext::new(11u32.into(), 22u32.into()),
            share:    DecryptShare::new(1, 33u32.into()),
        }
    }

    #[test]
    fn test_wire_format() {
        let bit = OtMessage::SelectionBit { selection: Ciphertext::new(5u32.into(), 6u32.into()) };
        assert_eq!(bit.to_string(), "SelectionBit 5 6");
        assert_eq!(selection().to_string(), "Selection 11 22 1 33");
        assert_eq!("Selection 11 22 1 33".parse::<OtMessage>().unwrap(), selection());
        assert_eq!("SelectionBit 5 6".parse::<OtMessage>().unwrap(), bit);
    }

    #[test]
    fn test_tag_checked() {
        let err = OtMessage::parse_expecting("SelectionBit 5 6", SELECTION_TAG).unwrap_err();
        assert_eq!(
            err,
            CryptoError::Protocol(ProtocolError::UnexpectedMessage {
                expected: SELECTION_TAG,
                found:    SELECTION_BIT_TAG.to_string(),
            })
        );
        assert!(OtMessage::parse_expecting("Selection 11 22 1 33", SELECTION_TAG).is_ok());
    }

    #[test]
    fn test_malformed_messages() {
        assert!(matches!(
            "Hello 1 2".parse::<OtMessage>(),
            Err(CryptoError::Protocol(ProtocolError::MalformedMessage(_)))
        ));
        assert!(matches!(
            "".parse::<OtMessage>(),
            Err(CryptoError::Protocol(ProtocolError::MalformedMessage(_)))
        ));
        assert!("Selection 11 22 1".parse::<OtMessage>().is_err());
        assert!("SelectionBit 5 6 7".parse::<OtMessage>().is_err());
    }

    #[test]
    fn test_elements_checked_against_modulus() {
        let params = GroupParams::new(64151u32.into(), 11u32.into()).unwrap();
        assert!(selection().check_elements(&params).is_ok());

        let outside = OtMessage::SelectionBit {
            selection: Ciphertext::new(BigUint::from(64151u32), 6u32.into()),
        };
        assert_eq!(outside.check_elements(&params), Err(ProtocolError::ElementOutOfGroup));

        let zero_share = OtMessage::Selection {
            combined: Ciphertext::new(11u32.into(), 22u32.into()),
            share:    DecryptShare::new(1, 0u32.into()),
        };
        assert_eq!(zero_share.check_elements(&params), Err(ProtocolError::ElementOutOfGroup));
    }
}
