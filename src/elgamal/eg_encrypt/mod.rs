pub mod eg_encrypt;

pub use eg_encrypt::{eg_blinding, eg_encrypt, eg_encrypt_exponent};
