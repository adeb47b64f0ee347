//! Deterministic mapping of content onto prime exponents

use log::trace;
use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use crate::common::{is_odd_prime, AccumulatorError, DEFAULT_MAX_HASH_ITERATIONS};

/// Maps arbitrary content to an odd prime by repeated SHA-256 hashing.
///
/// The content is hashed once and read as a big-endian integer. While that
/// integer is not an odd prime, its minimal big-endian encoding is hashed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimeHasher {
    max_iterations: usize,
}

impl Default for PrimeHasher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HASH_ITERATIONS)
    }
}

impl PrimeHasher {
    /// Create a hasher giving up after `max_iterations` hash rounds.
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
        }
    }

    /// The maximum number of hash rounds attempted.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Hash `content` to an odd prime.
    pub fn hash_to_prime(&self, content: &[u8]) -> Result<BigUint, AccumulatorError> {
        let mut candidate = sha256_int(content);
        for round in 1..=self.max_iterations {
            if is_odd_prime(&candidate) {
                trace!("hash-to-prime converged after {} rounds", round);
                return Ok(candidate);
            }
            if round < self.max_iterations {
                candidate = sha256_int(&candidate.to_bytes_be());
            }
        }
        Err(AccumulatorError::HashToPrimeExhausted(self.max_iterations))
    }
}

/// Hash `content` to an odd prime using the default iteration cap.
pub fn hash_to_prime(content: &[u8]) -> Result<BigUint, AccumulatorError> {
    PrimeHasher::default().hash_to_prime(content)
}

fn sha256_int(input: &[u8]) -> BigUint {
    BigUint::from_bytes_be(&Sha256::digest(input))
}
