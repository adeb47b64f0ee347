//! Accumulator implementation

use std::sync::Arc;

use log::debug;
use num_bigint::BigUint;

use crate::{
    common::{encode_fixed, AccumulatorError, Config},
    hash::PrimeHasher,
    setup::GroupParameters,
};

pub mod non_membership;
pub mod proof;

/// An RSA accumulator over a set of prime exponents.
///
/// The digest `g^(s_1 * ... * s_k) mod N` is cached and folded forward on
/// every addition.
#[derive(Debug, Clone)]
pub struct Accumulator {
    params: Arc<GroupParameters>,
    hasher: PrimeHasher,
    members: Vec<BigUint>,
    digest: BigUint,
}

impl Accumulator {
    /// Create an empty accumulator, whose digest is the generator.
    pub fn new(params: Arc<GroupParameters>) -> Self {
        Self::with_hasher(params, PrimeHasher::default())
    }

    /// Create an empty accumulator using the hasher described by `config`.
    pub fn with_config(params: Arc<GroupParameters>, config: &Config) -> Self {
        Self::with_hasher(params, config.prime_hasher())
    }

    /// Create an empty accumulator with a specific prime hasher.
    pub fn with_hasher(params: Arc<GroupParameters>, hasher: PrimeHasher) -> Self {
        let digest = params.generator().clone();
        Self {
            params,
            hasher,
            members: Vec::new(),
            digest,
        }
    }

    /// Access the group parameters.
    pub fn params(&self) -> &Arc<GroupParameters> {
        &self.params
    }

    /// Access the prime hasher.
    pub fn hasher(&self) -> PrimeHasher {
        self.hasher
    }

    /// Hash `content` to a prime and fold it into the digest.
    pub fn add(&mut self, content: &[u8]) -> Result<(), AccumulatorError> {
        let prime = self.hasher.hash_to_prime(content)?;
        self.add_prime(prime);
        Ok(())
    }

    /// Fold an already hashed prime exponent into the digest.
    pub(crate) fn add_prime(&mut self, prime: BigUint) {
        self.digest = self.digest.modpow(&prime, self.params.modulus());
        self.members.push(prime);
        debug!("accumulated member, set size {}", self.members.len());
    }

    /// The current digest.
    pub fn digest(&self) -> &BigUint {
        &self.digest
    }

    /// The current digest, big-endian at the residue width of `N`.
    pub fn digest_bytes(&self) -> Vec<u8> {
        encode_fixed(&self.digest, self.params.element_bytes())
            .unwrap_or_else(|_| unreachable!("digest exceeds modulus width"))
    }

    /// Recompute the digest from the generator and every member.
    pub fn recompute_digest(&self) -> BigUint {
        self.fold_members(|_| true)
    }

    /// Check whether `content` has been accumulated.
    pub fn contains(&self, content: &[u8]) -> Result<bool, AccumulatorError> {
        let prime = self.hasher.hash_to_prime(content)?;
        Ok(self.contains_prime(&prime))
    }

    pub(crate) fn contains_prime(&self, prime: &BigUint) -> bool {
        self.members.contains(prime)
    }

    /// The accumulated prime exponents, in insertion order.
    pub fn members(&self) -> &[BigUint] {
        &self.members
    }

    /// The number of accumulated members, counting duplicates.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check whether no member has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Raise the generator to every member accepted by `filter`, in order.
    fn fold_members(&self, mut filter: impl FnMut(&BigUint) -> bool) -> BigUint {
        let modulus = self.params.modulus();
        self.members
            .iter()
            .filter(|s| filter(s))
            .fold(self.params.generator().clone(), |acc, s| {
                acc.modpow(s, modulus)
            })
    }
}
