// Déchiffrement à seuil (t, n) : parts de Shamir de la clé privée et
// recombinaison de Lagrange dans l'exposant
pub mod decrypt_share;
pub mod keyshare;
pub mod lagrange;
pub mod reconstruct;

pub use decrypt_share::DecryptShare;
pub use keyshare::{generate_shares, Keyshare};
pub use lagrange::lagrange_factor;
pub use reconstruct::reconstruct_from_shares;
