//! Non-membership proofs from Bézout coefficients
//!
//! For a prime `m` outside the set and `delta` the product of all members,
//! `gcd(m, delta) = 1` gives `a*m + b*delta = 1`. The proof is
//! `(q, b) = (g^a, b)`, and since `g = (g^a)^m * (g^delta)^b` the verifier
//! checks `q^m * d^b == g` against the digest `d`.

use log::{debug, error};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use crate::{
    accum::{proof::check_modulus, Accumulator},
    common::{encode_fixed, extended_gcd, mod_pow_signed, AccumulatorError, PRIME_BYTES},
    hash::PrimeHasher,
    setup::GroupParameters,
};

const SIGN_NON_NEGATIVE: u8 = 0;
const SIGN_NEGATIVE: u8 = 1;

impl Accumulator {
    /// Create a proof that `content` was never accumulated.
    pub fn prove_non_membership(
        &self,
        content: &[u8],
    ) -> Result<NonMembershipProof, AccumulatorError> {
        let prime = self.hasher.hash_to_prime(content)?;
        self.prove_non_membership_prime(&prime)
    }

    pub(crate) fn prove_non_membership_prime(
        &self,
        prime: &BigUint,
    ) -> Result<NonMembershipProof, AccumulatorError> {
        if self.contains_prime(prime) {
            return Err(AccumulatorError::IsAMember);
        }
        let delta: BigUint = self.members.iter().product();
        let m = BigInt::from(prime.clone());
        let delta = BigInt::from(delta);
        let (gcd, a, b) = extended_gcd(&m, &delta);
        if !gcd.is_one() || !(&a * &m + &b * &delta).is_one() {
            error!("bezout check failed for a set of {} members", self.len());
            return Err(AccumulatorError::BezoutInvariantViolation);
        }
        // g is a unit by construction, so the inverse always exists
        let witness = mod_pow_signed(self.params.generator(), &a, self.params.modulus())
            .ok_or(AccumulatorError::InvalidParameters(
                "generator must be coprime to N",
            ))?;
        debug!("non-membership witness over {} members", self.len());
        Ok(NonMembershipProof {
            witness,
            coefficient: b,
        })
    }
}

/// A witness that a prime exponent is coprime to every accumulated member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonMembershipProof {
    witness: BigUint,
    coefficient: BigInt,
}

impl NonMembershipProof {
    /// Assemble a proof from its parts.
    pub fn from_parts(witness: BigUint, coefficient: BigInt) -> Self {
        Self {
            witness,
            coefficient,
        }
    }

    /// The witness `g^a mod N`.
    pub fn witness(&self) -> &BigUint {
        &self.witness
    }

    /// The Bézout coefficient `b` of the member product.
    pub fn coefficient(&self) -> &BigInt {
        &self.coefficient
    }

    /// Verify the proof for `content` against a digest.
    pub fn verify(
        &self,
        params: &GroupParameters,
        content: &[u8],
        digest: &BigUint,
    ) -> Result<bool, AccumulatorError> {
        verify_non_membership(
            params.modulus(),
            content,
            digest,
            self,
            params.generator(),
        )
    }

    /// Encode as `witness || sign || |b|`.
    ///
    /// The witness uses the residue width of `N`, the sign is one byte and the
    /// coefficient magnitude uses the prime width.
    pub fn to_bytes(&self, params: &GroupParameters) -> Result<Vec<u8>, AccumulatorError> {
        let mut out = encode_fixed(&self.witness, params.element_bytes())?;
        out.push(match self.coefficient.sign() {
            Sign::Minus => SIGN_NEGATIVE,
            _ => SIGN_NON_NEGATIVE,
        });
        out.extend(encode_fixed(self.coefficient.magnitude(), PRIME_BYTES)?);
        Ok(out)
    }

    /// Decode a proof produced by `to_bytes`.
    pub fn from_bytes(params: &GroupParameters, bytes: &[u8]) -> Result<Self, AccumulatorError> {
        let width = params.element_bytes();
        if bytes.len() != width + 1 + PRIME_BYTES {
            return Err(AccumulatorError::MalformedInput("wrong proof length"));
        }
        let witness = BigUint::from_bytes_be(&bytes[..width]);
        if witness >= *params.modulus() {
            return Err(AccumulatorError::MalformedInput("witness out of range"));
        }
        let magnitude = BigUint::from_bytes_be(&bytes[width + 1..]);
        let sign = match bytes[width] {
            SIGN_NON_NEGATIVE => Sign::Plus,
            SIGN_NEGATIVE if magnitude.is_zero() => {
                return Err(AccumulatorError::MalformedInput("negative zero coefficient"))
            }
            SIGN_NEGATIVE => Sign::Minus,
            _ => return Err(AccumulatorError::MalformedInput("unknown sign byte")),
        };
        Ok(Self {
            witness,
            coefficient: BigInt::from_biguint(sign, magnitude),
        })
    }
}

/// Verify a non-membership proof: `q^H(content) * digest^b mod N == g`.
///
/// A mismatch, including a digest with no inverse when `b < 0`, yields
/// `Ok(false)`; out-of-range inputs are errors. Content is hashed with the
/// default iteration cap, see [`PrimeHasher::verify_non_membership`] for
/// accumulators using another cap.
pub fn verify_non_membership(
    modulus: &BigUint,
    content: &[u8],
    digest: &BigUint,
    proof: &NonMembershipProof,
    generator: &BigUint,
) -> Result<bool, AccumulatorError> {
    PrimeHasher::default().verify_non_membership(modulus, content, digest, proof, generator)
}

impl PrimeHasher {
    /// Verify a non-membership proof, hashing `content` with this hasher.
    pub fn verify_non_membership(
        &self,
        modulus: &BigUint,
        content: &[u8],
        digest: &BigUint,
        proof: &NonMembershipProof,
        generator: &BigUint,
    ) -> Result<bool, AccumulatorError> {
        check_modulus(modulus)?;
        if digest >= modulus {
            return Err(AccumulatorError::MalformedInput("digest out of range"));
        }
        // g in (1, N), as for GroupParameters
        if *generator <= BigUint::one() || generator >= modulus {
            return Err(AccumulatorError::MalformedInput("generator out of range"));
        }
        if proof.witness >= *modulus {
            return Err(AccumulatorError::MalformedInput("witness out of range"));
        }
        if proof.coefficient.bits() > (PRIME_BYTES * 8) as u64 {
            return Err(AccumulatorError::MalformedInput("coefficient too wide"));
        }
        let prime = self.hash_to_prime(content)?;
        let Some(digest_part) = mod_pow_signed(digest, &proof.coefficient, modulus) else {
            return Ok(false);
        };
        let lhs = proof.witness.modpow(&prime, modulus) * digest_part % modulus;
        Ok(lhs == *generator)
    }
}
