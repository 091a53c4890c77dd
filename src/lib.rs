// Déclaration des modules
pub mod crypto_error;
pub mod elgamal;
pub mod key_management;
pub mod montgomery;
pub mod oblivious_transfer;
pub mod threshold;

pub use crate::elgamal::math;
pub use crate::elgamal::params;
pub use crate::elgamal::eg_homomorphic;

// Paramètres et types de clés
pub use params::{Exponentiation, GroupParams};
pub use elgamal::eg_keygen::{KeyPair, PrivateKey, PublicKey};
pub use elgamal::ciphertext::Ciphertext;

// Fonctions du schéma
// Les modules eg_keygen, eg_encrypt et eg_decrypt restent sous elgamal::
// pour ne pas masquer les fonctions homonymes.
pub use elgamal::eg_keygen::eg_keygen;
pub use elgamal::eg_encrypt::{eg_blinding, eg_encrypt, eg_encrypt_exponent};
pub use elgamal::eg_decrypt::{eg_decrypt, eg_decrypt_exponent};
pub use eg_homomorphic::{eg_mul, eg_mul_plaintext, eg_pow};

// Déchiffrement à seuil
pub use threshold::{generate_shares, lagrange_factor, reconstruct_from_shares, DecryptShare, Keyshare};

// Transfert inconscient
pub use oblivious_transfer::{ObliviousTransfer, OtConfig, TransferState, Transport};

// Erreur centralisée
pub use crypto_error::{CryptoError, ProtocolError, ShareSetError};
