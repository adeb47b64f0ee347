//! Group parameters and a development trusted setup

use log::info;
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand::{CryptoRng, RngCore};

use crate::common::{byte_width, encode_fixed, is_odd_prime, AccumulatorError};

/// The public parameters of an RSA group of unknown order.
///
/// The modulus must come from a setup which did not retain its factors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupParameters {
    modulus: BigUint,
    generator: BigUint,
}

impl GroupParameters {
    /// Validate and wrap a modulus and generator.
    pub fn new(modulus: BigUint, generator: BigUint) -> Result<Self, AccumulatorError> {
        if modulus <= BigUint::from(3u8) || modulus.is_even() {
            return Err(AccumulatorError::InvalidParameters(
                "modulus must be odd and greater than 3",
            ));
        }
        if generator <= BigUint::one() || generator >= modulus {
            return Err(AccumulatorError::InvalidParameters(
                "generator must lie in (1, N)",
            ));
        }
        if !generator.gcd(&modulus).is_one() {
            return Err(AccumulatorError::InvalidParameters(
                "generator must be coprime to N",
            ));
        }
        Ok(Self { modulus, generator })
    }

    /// The RSA modulus `N`.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// The generator `g`.
    pub fn generator(&self) -> &BigUint {
        &self.generator
    }

    /// The fixed byte width of a residue modulo `N`.
    pub fn element_bytes(&self) -> usize {
        byte_width(&self.modulus)
    }

    /// Encode as `N || g`, each big-endian at the residue width.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.modulus.to_bytes_be();
        // g < N always fits the modulus width
        out.extend(
            encode_fixed(&self.generator, self.element_bytes())
                .unwrap_or_else(|_| unreachable!("generator exceeds modulus width")),
        );
        out
    }

    /// Decode and validate parameters produced by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AccumulatorError> {
        if bytes.is_empty() || bytes.len() % 2 != 0 {
            return Err(AccumulatorError::MalformedInput(
                "parameter encoding has odd length",
            ));
        }
        let (modulus, generator) = bytes.split_at(bytes.len() / 2);
        if modulus[0] == 0 {
            return Err(AccumulatorError::MalformedInput(
                "modulus encoding has a leading zero",
            ));
        }
        Self::new(
            BigUint::from_bytes_be(modulus),
            BigUint::from_bytes_be(generator),
        )
    }
}

/// Run a single-party trusted setup, for development and testing only.
///
/// Two random primes of `(bits + 1) / 2` bits are multiplied and discarded.
/// A production deployment must obtain `N` from a multi-party ceremony.
pub fn trusted_setup(
    bits: usize,
    mut rng: impl RngCore + CryptoRng,
) -> Result<GroupParameters, AccumulatorError> {
    if bits < 16 {
        return Err(AccumulatorError::InvalidParameters(
            "modulus must have at least 16 bits",
        ));
    }
    let half = (bits + 1) / 2;
    let modulus = loop {
        let p = random_prime(half, &mut rng);
        let q = random_prime(half, &mut rng);
        if p != q {
            break p * q;
        }
    };
    let generator = random_unit(&modulus, &mut rng);
    info!("trusted setup produced a {}-bit modulus", modulus.bits());
    GroupParameters::new(modulus, generator)
}

/// Sample a prime with its top two bits set, so that a product of two such
/// primes has exactly `2 * bits` bits.
fn random_prime(bits: usize, rng: &mut (impl RngCore + CryptoRng)) -> BigUint {
    loop {
        let mut candidate = rng.gen_biguint(bits as u64);
        candidate.set_bit(bits as u64 - 1, true);
        candidate.set_bit(bits as u64 - 2, true);
        candidate.set_bit(0, true);
        if is_odd_prime(&candidate) {
            break candidate;
        }
    }
}

/// Rejection-sample `g` with `1 < g < N` and `gcd(g, N) = 1`.
fn random_unit(modulus: &BigUint, rng: &mut (impl RngCore + CryptoRng)) -> BigUint {
    let two = BigUint::from(2u8);
    loop {
        let g = rng.gen_biguint_range(&two, modulus);
        if g.gcd(modulus).is_one() {
            break g;
        }
    }
}
