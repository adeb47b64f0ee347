//! A thread-safe accumulator with a single writer and concurrent readers.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use num_bigint::BigUint;

use crate::{
    accum::{non_membership::NonMembershipProof, proof::MembershipProof, Accumulator},
    common::AccumulatorError,
    hash::PrimeHasher,
    setup::GroupParameters,
};

/// An accumulator shared between threads.
///
/// Additions are serialized behind a write lock, while digest reads and proof
/// generation share a read lock. Content is hashed to a prime before any lock
/// is taken.
#[derive(Debug)]
pub struct SharedAccumulator {
    params: Arc<GroupParameters>,
    hasher: PrimeHasher,
    inner: RwLock<Accumulator>,
}

impl SharedAccumulator {
    /// Wrap an accumulator for shared use.
    pub fn new(accum: Accumulator) -> Self {
        Self {
            params: accum.params().clone(),
            hasher: accum.hasher(),
            inner: RwLock::new(accum),
        }
    }

    /// Access the group parameters.
    pub fn params(&self) -> &Arc<GroupParameters> {
        &self.params
    }

    /// Hash `content` and fold it into the digest.
    pub fn add(&self, content: &[u8]) -> Result<(), AccumulatorError> {
        let prime = self.hasher.hash_to_prime(content)?;
        self.write().add_prime(prime);
        Ok(())
    }

    /// The current digest.
    pub fn digest(&self) -> BigUint {
        self.read().digest().clone()
    }

    /// Clone the current state, releasing the lock immediately.
    pub fn snapshot(&self) -> Accumulator {
        self.read().clone()
    }

    /// Create a membership proof along with the digest it verifies against.
    pub fn prove_membership(
        &self,
        content: &[u8],
    ) -> Result<(MembershipProof, BigUint), AccumulatorError> {
        let prime = self.hasher.hash_to_prime(content)?;
        let accum = self.read();
        let proof = accum.prove_membership_prime(&prime)?;
        Ok((proof, accum.digest().clone()))
    }

    /// Create a non-membership proof along with the digest it verifies against.
    pub fn prove_non_membership(
        &self,
        content: &[u8],
    ) -> Result<(NonMembershipProof, BigUint), AccumulatorError> {
        let prime = self.hasher.hash_to_prime(content)?;
        let accum = self.read();
        let proof = accum.prove_non_membership_prime(&prime)?;
        Ok((proof, accum.digest().clone()))
    }

    /// Unwrap the inner accumulator.
    pub fn into_inner(self) -> Accumulator {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // mutation happens after hashing, so a poisoned lock never guards a partial update
    fn read(&self) -> RwLockReadGuard<'_, Accumulator> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Accumulator> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Accumulator> for SharedAccumulator {
    fn from(accum: Accumulator) -> Self {
        Self::new(accum)
    }
}
