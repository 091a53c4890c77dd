pub mod eg_homomorphic;

pub use eg_homomorphic::{eg_mul, eg_mul_plaintext, eg_pow};
