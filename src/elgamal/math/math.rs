use std::cmp::Ordering;

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::{CryptoRng, RngCore};

use crate::crypto_error::CryptoError;

// Taille minimale acceptée par generate_safe_prime. Suffisant pour les
// démonstrations et les tests ; un déploiement réel vise >= 2048 bits.
pub const MIN_MODULUS_BITS: u64 = 32;

// Nombre de rounds Miller-Rabin aléatoires pendant la génération
const MILLER_RABIN_ROUNDS: u32 = 5;

// ---------------------------------------------------------------------------
// Petits premiers impairs (crible préliminaire + témoins déterministes)
// ---------------------------------------------------------------------------
const SMALL_PRIMES: &[u64] = &[
      3,   5,   7,  11,  13,  17,  19,  23,  29,  31,  37,  41,
     43,  47,  53,  59,  61,  67,  71,  73,  79,  83,  89,  97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157,
    163, 167, 173, 179, 181, 191, 193, 197, 199, 211, 223, 227,
    229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283,
    293, 307, 311, 313, 317, 331, 337, 347, 349, 353, 359, 367,
    373, 379, 383, 389, 397, 401, 409, 419, 421, 431, 433, 439,
    443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503, 509,
    521, 523, 541, 547, 557, 563, 569, 571, 577, 587, 593, 599,
    601, 607, 613, 617, 619, 631, 641, 643, 647, 653, 659, 661,
    673, 677, 683, 691, 701, 709, 719, 727, 733, 739, 743, 751,
    757, 761, 769, 773, 787, 797, 809, 811, 821, 823, 827, 829,
    839, 853, 857, 859, 863, 877, 881, 883, 887, 907, 911, 919,
    929, 937, 941, 947, 953, 967, 971, 977, 983, 991, 997,
];

// Les 12 premiers nombres premiers : Miller-Rabin avec ces bases est exact
// pour n < 3.3 * 10^24, et reste un test probabiliste fort au-delà.
const DETERMINISTIC_WITNESSES: &[u64] = &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

// ---------------------------------------------------------------------------
// Encodage exponentiel : m = 2^k (entier littéral, pas g^k)
// ---------------------------------------------------------------------------
pub fn power_of_two(k: u64) -> BigUint {
    BigUint::one() << k
}

/// Retrouve k dans [low, high) tel que 2^k == n, par recherche dichotomique.
///
/// Ce n'est pas un logarithme discret général : seules les puissances de
/// deux exactes dans la borne fournie sont reconnues. 2^k est croissant en
/// k, la comparaison ordinaire suffit donc à orienter la recherche.
pub fn decode_base2_exponent(n: &BigUint, low: u64, high: u64) -> Result<u64, CryptoError> {
    let (mut lo, mut hi) = (low, high);
    while hi > lo {
        let current = lo + (hi - lo) / 2;
        match power_of_two(current).cmp(n) {
            Ordering::Less    => lo = current + 1,
            Ordering::Greater => hi = current,
            Ordering::Equal   => return Ok(current),
        }
    }
    Err(CryptoError::DecodeFailure { low, high })
}

// ---------------------------------------------------------------------------
// Inverse modulaire de a mod n par Euclide étendu.
// Retourne ArithmeticInvariantViolation si gcd(a, n) != 1.
// ---------------------------------------------------------------------------
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Result<BigUint, CryptoError> {
    let (g, x) = extended_gcd(&BigInt::from(a % n), &BigInt::from(n.clone()));
    if !g.is_one() {
        return Err(CryptoError::ArithmeticInvariantViolation(
            "inverse modulaire indéfini (gcd != 1)",
        ));
    }

    x.mod_floor(&BigInt::from(n.clone()))
        .to_biguint()
        .ok_or(CryptoError::ArithmeticInvariantViolation(
            "réduction modulaire négative",
        ))
}

// Retourne (gcd, s) avec a*s + b*t = gcd ; t n'est jamais utilisé.
fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    (old_r, old_s)
}

// ---------------------------------------------------------------------------
// Primalité
// ---------------------------------------------------------------------------

/// Test déterministe utilisé pour valider un module fourni par l'appelant.
pub fn is_prime(n: &BigUint) -> bool {
    match trial_division(n) {
        Some(verdict) => verdict,
        None => miller_rabin(n, DETERMINISTIC_WITNESSES.iter().map(|&w| BigUint::from(w))),
    }
}

/// Test probabiliste à témoins aléatoires (génération de safe primes).
pub fn is_probable_prime<R>(n: &BigUint, rounds: u32, rng: &mut R) -> bool
where
    R: RngCore + CryptoRng,
{
    if let Some(verdict) = trial_division(n) {
        return verdict;
    }
    let two = BigUint::from(2u32);
    let upper = n - &two;
    let witnesses: Vec<BigUint> = (0..rounds)
        .map(|_| rng.gen_biguint_range(&two, &upper))
        .collect();
    miller_rabin(n, witnesses)
}

// Some(verdict) si la petite table suffit à conclure, None sinon.
fn trial_division(n: &BigUint) -> Option<bool> {
    if n <= &BigUint::one() {
        return Some(false);
    }
    if n == &BigUint::from(2u32) {
        return Some(true);
    }
    if n.is_even() {
        return Some(false);
    }
    for &sp in SMALL_PRIMES {
        let bp = BigUint::from(sp);
        if n == &bp {
            return Some(true);
        }
        if (n % &bp).is_zero() {
            return Some(false);
        }
    }
    None
}

// n impair, > 997, sans petit facteur.
fn miller_rabin<I>(n: &BigUint, witnesses: I) -> bool
where
    I: IntoIterator<Item = BigUint>,
{
    let n_minus_1 = n - BigUint::one();
    let r = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> r;

    'witness: for a in witnesses {
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue 'witness;
        }
        for _ in 0..r.saturating_sub(1) {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

// ---------------------------------------------------------------------------
// Génération d'un safe prime p = 2q + 1 de exactement nbits bits
// ---------------------------------------------------------------------------
pub fn generate_safe_prime<R>(nbits: u64, rng: &mut R) -> Result<BigUint, CryptoError>
where
    R: RngCore + CryptoRng,
{
    if nbits < MIN_MODULUS_BITS {
        return Err(CryptoError::KeySizeTooSmall {
            requested: nbits,
            minimum: MIN_MODULUS_BITS,
        });
    }

    loop {
        // q a exactement nbits-1 bits et est impair
        let mut sophie_germain = rng.gen_biguint(nbits - 1);
        sophie_germain.set_bit(nbits - 2, true);
        sophie_germain.set_bit(0, true);

        if combined_sieve(&sophie_germain) {
            continue;
        }
        if !is_probable_prime(&sophie_germain, MILLER_RABIN_ROUNDS, rng) {
            continue;
        }

        let safe_prime = (&sophie_germain << 1u32) + BigUint::one();
        if is_probable_prime(&safe_prime, MILLER_RABIN_ROUNDS, rng) {
            debug_assert_eq!(safe_prime.bits(), nbits);
            return Ok(safe_prime);
        }
    }
}

// Rejette q si q ou 2q+1 a un petit facteur. Un seul reste par petit premier.
fn combined_sieve(sophie_germain: &BigUint) -> bool {
    SMALL_PRIMES.iter().any(|&sp| {
        let r = (sophie_germain % sp).to_u64_digits().first().copied().unwrap_or(0);
        r == 0 || (2 * r + 1) % sp == 0
    })
}
