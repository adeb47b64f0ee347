//! Shared types and big-integer helpers

use std::mem;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::hash::PrimeHasher;

/// The byte width of a prime exponent, equal to the SHA-256 output size.
pub const PRIME_BYTES: usize = 32;

/// The default bit length of a freshly generated RSA modulus.
pub const DEFAULT_MODULUS_BITS: usize = 2048;

/// The default cap on hash-to-prime rounds.
pub const DEFAULT_MAX_HASH_ITERATIONS: usize = 65_536;

const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

// Fixed bases: hash-to-prime must be deterministic.
const WITNESS_BASES: [u32; 20] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71,
];

/// Define the configuration parameters for the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The bit length of the RSA modulus produced by the trusted setup.
    pub modulus_bits: usize,
    /// The maximum number of re-hashing rounds when mapping content to a prime.
    pub max_hash_iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modulus_bits: DEFAULT_MODULUS_BITS,
            max_hash_iterations: DEFAULT_MAX_HASH_ITERATIONS,
        }
    }
}

impl Config {
    /// Create the prime hasher described by this configuration.
    pub fn prime_hasher(&self) -> PrimeHasher {
        PrimeHasher::new(self.max_hash_iterations)
    }
}

/// Possible error cases from accumulator usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccumulatorError {
    /// A membership proof was requested for content outside the set.
    #[error("content is not a member of the accumulated set")]
    NotAMember,
    /// A non-membership proof was requested for content inside the set.
    #[error("content is a member of the accumulated set")]
    IsAMember,
    /// The group parameters failed validation.
    #[error("invalid group parameters: {0}")]
    InvalidParameters(&'static str),
    /// The Bézout coefficients did not satisfy `a*m + b*delta = 1`.
    #[error("extended euclid postcondition failed")]
    BezoutInvariantViolation,
    /// Hash-to-prime did not find a prime within the iteration cap.
    #[error("no prime found after {0} hash iterations")]
    HashToPrimeExhausted(usize),
    /// An encoded value or verification input was out of range.
    #[error("malformed input: {0}")]
    MalformedInput(&'static str),
}

/// The number of bytes needed to encode residues of `modulus`.
pub(crate) fn byte_width(modulus: &BigUint) -> usize {
    ((modulus.bits() + 7) / 8) as usize
}

/// Encode `value` as a big-endian integer left-padded to `width` bytes.
pub(crate) fn encode_fixed(value: &BigUint, width: usize) -> Result<Vec<u8>, AccumulatorError> {
    let bytes = value.to_bytes_be();
    if value.is_zero() {
        return Ok(vec![0u8; width]);
    }
    if bytes.len() > width {
        return Err(AccumulatorError::MalformedInput("value exceeds encoding width"));
    }
    let mut out = vec![0u8; width - bytes.len()];
    out.extend_from_slice(&bytes);
    Ok(out)
}

/// Iterative extended Euclid: returns `(gcd, x, y)` with `a*x + b*y = gcd`.
pub(crate) fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());
    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = mem::replace(&mut s, next_s);
        let next_t = &old_t - &q * &t;
        old_t = mem::replace(&mut t, next_t);
    }
    (old_r, old_s, old_t)
}

/// Compute the inverse of `value` modulo `modulus`, if one exists.
pub(crate) fn mod_inverse(value: &BigUint, modulus: &BigUint) -> Option<BigUint> {
    let modulus = BigInt::from(modulus.clone());
    let (gcd, x, _) = extended_gcd(&BigInt::from(value.clone()), &modulus);
    if !gcd.is_one() {
        return None;
    }
    x.mod_floor(&modulus).to_biguint()
}

/// Modular exponentiation accepting a negative exponent.
///
/// A negative exponent raises the inverse of `base`, so `None` is returned
/// when `base` is not a unit modulo `modulus`.
pub(crate) fn mod_pow_signed(base: &BigUint, exp: &BigInt, modulus: &BigUint) -> Option<BigUint> {
    match exp.sign() {
        Sign::Minus => {
            let inv = mod_inverse(base, modulus)?;
            Some(inv.modpow(exp.magnitude(), modulus))
        }
        _ => Some(base.modpow(exp.magnitude(), modulus)),
    }
}

/// Test whether `n` is an odd prime, rejecting every value `<= 2`.
///
/// Trial division by small primes followed by Miller-Rabin over fixed bases.
pub(crate) fn is_odd_prime(n: &BigUint) -> bool {
    if *n <= BigUint::from(2u8) || n.is_even() {
        return false;
    }
    for p in SMALL_PRIMES {
        let p = BigUint::from(p);
        if *n == p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // n > 97 from here on, so every base lies in [2, n - 2]
    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;
    'witness: for base in WITNESS_BASES {
        let mut x = BigUint::from(base).modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = &x * &x % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}
