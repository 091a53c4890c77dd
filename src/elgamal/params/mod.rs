pub mod params;

pub use params::{Exponentiation, GroupParams};
