pub mod eg_keygen;

pub use eg_keygen::{eg_keygen, KeyPair, PrivateKey, PublicKey};
pub(crate) use eg_keygen::zeroize_biguint;
