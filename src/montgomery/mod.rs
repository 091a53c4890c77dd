pub mod montgomery;

pub use montgomery::ladder_modpow;
