//! RSA accumulators with membership and non-membership proofs.

#![warn(missing_docs)]

mod accum;
mod common;
mod hash;
mod setup;
mod shared;

pub use self::{
    accum::{
        non_membership::{verify_non_membership, NonMembershipProof},
        proof::{verify_membership, MembershipProof},
        Accumulator,
    },
    common::{AccumulatorError, Config, PRIME_BYTES},
    hash::{hash_to_prime, PrimeHasher},
    setup::{trusted_setup, GroupParameters},
    shared::SharedAccumulator,
};
