//! Membership proofs

use log::debug;
use num_bigint::BigUint;

use crate::{
    accum::Accumulator,
    common::{encode_fixed, AccumulatorError},
    hash::PrimeHasher,
    setup::GroupParameters,
};

impl Accumulator {
    /// Create a membership proof for `content`.
    ///
    /// The witness is the digest with a single occurrence of the content's
    /// prime left out.
    pub fn prove_membership(&self, content: &[u8]) -> Result<MembershipProof, AccumulatorError> {
        let prime = self.hasher.hash_to_prime(content)?;
        self.prove_membership_prime(&prime)
    }

    pub(crate) fn prove_membership_prime(
        &self,
        prime: &BigUint,
    ) -> Result<MembershipProof, AccumulatorError> {
        if !self.contains_prime(prime) {
            return Err(AccumulatorError::NotAMember);
        }
        let mut skipped = false;
        let witness = self.fold_members(|s| {
            if !skipped && s == prime {
                skipped = true;
                false
            } else {
                true
            }
        });
        debug!("membership witness over {} members", self.len() - 1);
        Ok(MembershipProof { witness })
    }
}

/// A witness that a prime exponent is included in a digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipProof {
    witness: BigUint,
}

impl MembershipProof {
    /// Wrap a raw witness value.
    pub fn from_witness(witness: BigUint) -> Self {
        Self { witness }
    }

    /// The witness value.
    pub fn witness(&self) -> &BigUint {
        &self.witness
    }

    /// Verify the proof for `content` against a digest.
    pub fn verify(
        &self,
        params: &GroupParameters,
        content: &[u8],
        digest: &BigUint,
    ) -> Result<bool, AccumulatorError> {
        verify_membership(params.modulus(), content, digest, self)
    }

    /// Encode the witness at the residue width of `N`.
    pub fn to_bytes(&self, params: &GroupParameters) -> Result<Vec<u8>, AccumulatorError> {
        encode_fixed(&self.witness, params.element_bytes())
    }

    /// Decode a witness produced by `to_bytes`.
    pub fn from_bytes(params: &GroupParameters, bytes: &[u8]) -> Result<Self, AccumulatorError> {
        if bytes.len() != params.element_bytes() {
            return Err(AccumulatorError::MalformedInput("wrong witness length"));
        }
        let witness = BigUint::from_bytes_be(bytes);
        if witness >= *params.modulus() {
            return Err(AccumulatorError::MalformedInput("witness out of range"));
        }
        Ok(Self { witness })
    }
}

/// Verify a membership proof: `witness^H(content) mod N == digest`.
///
/// A mismatch yields `Ok(false)`; out-of-range inputs are errors. Content is
/// hashed with the default iteration cap, see
/// [`PrimeHasher::verify_membership`] for accumulators using another cap.
pub fn verify_membership(
    modulus: &BigUint,
    content: &[u8],
    digest: &BigUint,
    proof: &MembershipProof,
) -> Result<bool, AccumulatorError> {
    PrimeHasher::default().verify_membership(modulus, content, digest, proof)
}

impl PrimeHasher {
    /// Verify a membership proof, hashing `content` with this hasher.
    pub fn verify_membership(
        &self,
        modulus: &BigUint,
        content: &[u8],
        digest: &BigUint,
        proof: &MembershipProof,
    ) -> Result<bool, AccumulatorError> {
        check_modulus(modulus)?;
        if digest >= modulus {
            return Err(AccumulatorError::MalformedInput("digest out of range"));
        }
        if proof.witness >= *modulus {
            return Err(AccumulatorError::MalformedInput("witness out of range"));
        }
        let prime = self.hash_to_prime(content)?;
        Ok(proof.witness.modpow(&prime, modulus) == *digest)
    }
}

pub(crate) fn check_modulus(modulus: &BigUint) -> Result<(), AccumulatorError> {
    if *modulus <= BigUint::from(3u8) || !modulus.bit(0) {
        Err(AccumulatorError::MalformedInput(
            "modulus must be odd and greater than 3",
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::{verify_membership, MembershipProof};
    use crate::{
        accum::Accumulator, common::AccumulatorError, hash::PrimeHasher,
        setup::tests::test_params,
    };

    #[test]
    fn check_member_proof() {
        let params = test_params();
        let mut acc = Accumulator::new(params.clone());
        acc.add(b"Hello!").unwrap();
        acc.add(b"Test!").unwrap();
        let digest = acc.digest().clone();

        for content in [&b"Hello!"[..], b"Test!"] {
            let proof = acc
                .prove_membership(content)
                .expect("Error creating membership proof");
            assert!(verify_membership(params.modulus(), content, &digest, &proof).unwrap());
            assert!(proof.verify(&params, content, &digest).unwrap());
        }

        // a proof does not transfer to other content
        let proof = acc.prove_membership(b"Hello!").unwrap();
        assert!(!proof.verify(&params, b"Test!", &digest).unwrap());

        assert_eq!(
            acc.prove_membership(b"QAQ"),
            Err(AccumulatorError::NotAMember)
        );
    }

    #[test]
    fn single_member_witness_is_generator() {
        let params = test_params();
        let mut acc = Accumulator::new(params.clone());
        acc.add(b"only").unwrap();
        let proof = acc.prove_membership(b"only").unwrap();
        assert_eq!(proof.witness(), params.generator());
        assert!(proof.verify(&params, b"only", acc.digest()).unwrap());
    }

    #[test]
    fn duplicate_member_keeps_one_copy() {
        let params = test_params();
        let mut acc = Accumulator::new(params.clone());
        acc.add(b"dup").unwrap();
        acc.add(b"other").unwrap();
        acc.add(b"dup").unwrap();
        let proof = acc.prove_membership(b"dup").unwrap();
        assert!(proof.verify(&params, b"dup", acc.digest()).unwrap());
    }

    #[test]
    fn stale_proof_fails() {
        let params = test_params();
        let mut acc = Accumulator::new(params.clone());
        acc.add(b"Hello!").unwrap();
        let proof = acc.prove_membership(b"Hello!").unwrap();
        acc.add(b"Test!").unwrap();
        assert!(!proof.verify(&params, b"Hello!", acc.digest()).unwrap());
    }

    #[test]
    fn tampered_proof_fails() {
        let params = test_params();
        let mut acc = Accumulator::new(params.clone());
        acc.add(b"Hello!").unwrap();
        acc.add(b"Test!").unwrap();
        let proof = acc.prove_membership(b"Hello!").unwrap();
        for bit in 0..params.modulus().bits() {
            let mut witness = proof.witness().clone();
            witness.set_bit(bit, !witness.bit(bit));
            let tampered = MembershipProof::from_witness(witness);
            assert!(!matches!(
                tampered.verify(&params, b"Hello!", acc.digest()),
                Ok(true)
            ));
        }
    }

    #[test]
    fn check_encoding() {
        let params = test_params();
        let mut acc = Accumulator::new(params.clone());
        acc.add(b"Hello!").unwrap();
        acc.add(b"Test!").unwrap();
        let proof = acc.prove_membership(b"Test!").unwrap();
        let bytes = proof.to_bytes(&params).unwrap();
        assert_eq!(bytes.len(), params.element_bytes());
        assert_eq!(MembershipProof::from_bytes(&params, &bytes).unwrap(), proof);

        assert!(MembershipProof::from_bytes(&params, &bytes[1..]).is_err());
        let too_big = vec![0xff; params.element_bytes()];
        assert_eq!(
            MembershipProof::from_bytes(&params, &too_big),
            Err(AccumulatorError::MalformedInput("witness out of range"))
        );
    }

    #[test]
    fn reject_out_of_range_inputs() {
        let params = test_params();
        let proof = MembershipProof::from_witness(BigUint::from(2u8));
        assert!(verify_membership(&BigUint::from(4u8), b"x", &BigUint::from(1u8), &proof).is_err());
        assert!(verify_membership(
            params.modulus(),
            b"x",
            params.modulus(),
            &proof
        )
        .is_err());
    }

    #[test]
    fn verify_with_hasher() {
        let params = test_params();
        let content = (0u32..)
            .map(|i| i.to_be_bytes())
            .find(|c| PrimeHasher::new(1).hash_to_prime(c).is_err())
            .unwrap();
        let mut acc = Accumulator::new(params.clone());
        acc.add(&content).unwrap();
        acc.add(b"Test!").unwrap();
        let proof = acc.prove_membership(&content).unwrap();
        assert_eq!(
            PrimeHasher::new(1).verify_membership(params.modulus(), &content, acc.digest(), &proof),
            Err(AccumulatorError::HashToPrimeExhausted(1))
        );
        assert!(acc
            .hasher()
            .verify_membership(params.modulus(), &content, acc.digest(), &proof)
            .unwrap());
    }
}
