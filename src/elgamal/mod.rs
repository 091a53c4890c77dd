// ElGamal multiplicatif et variante exponentielle sur Z_p*
pub mod ciphertext;
pub mod eg_decrypt;
pub mod eg_encrypt;
pub mod eg_homomorphic;
pub mod eg_keygen;
pub mod math;
pub mod params;
