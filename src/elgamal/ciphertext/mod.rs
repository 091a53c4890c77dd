pub mod ciphertext;

pub use ciphertext::{Ciphertext, MAX_DECIMAL_TOKEN_LEN};
pub(crate) use ciphertext::{expect_end, next_token, parse_decimal_token};
