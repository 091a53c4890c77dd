// Réexporte les fonctions arithmétiques du groupe

mod math;

pub use math::{
    decode_base2_exponent, generate_safe_prime, is_prime, is_probable_prime, mod_inverse,
    power_of_two, MIN_MODULUS_BITS,
};
