//! Generic interval range proofs `v ∈ [A, B)`, composed from two `[0, 2^N)`
//! proofs as in Camenisch–Chaabouni–Shelat.
//!
//! Grounded on `original_source/bulletproofs/bprp.go` (`bprp`,
//! `SetupGeneric`, `ProveGeneric`, `Verify`): picking `N` as the smallest
//! power of two covering `B-A`, proving `v-A ∈ [0,2^N)` and
//! `B-1-v ∈ [0,2^N)`, and linking the two sub-commitments back to a single
//! value commitment via `V1 = V - A*B`, `V2 = (B-1)*B - V` rather than
//! revealing a second blinding factor. Unlike `bprp.go`, [`SetupGeneric`]
//! rejects `B - A > 2^N` up front (spec.md §9: the original silently
//! proceeds with an `N` too small to cover the interval, which makes
//! `ProveGeneric` fail or, worse, prove a narrower interval than requested).
//!
//! spec.md §4.5 requires two independent `PublicParams` here, with fresh
//! generators per sub-proof to preserve soundness, rather than one set
//! reused for both; [`SetupGeneric`] derives `p1`'s and `p2`'s generators
//! from distinct domain tags so neither sub-proof's `G⃗, H⃗, U` collide with
//! the other's.

use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};

use crate::errors::Error;
use crate::generators::MAX_RANGE_END;
use crate::range_proof::{setup_with_domain, PublicParams, RangeProof};
use crate::transcript::TranscriptProtocol;

/// Public parameters for proving membership in `[low, high)`: one
/// independent `PublicParams` per sub-proof, each with its own generators.
#[derive(Clone, Debug)]
pub struct GenericParams {
    p1_params: PublicParams,
    p2_params: PublicParams,
    low: u64,
    high: u64,
}

impl GenericParams {
    /// The lower bound `A` (inclusive).
    pub fn low(&self) -> u64 {
        self.low
    }

    /// The upper bound `B` (exclusive).
    pub fn high(&self) -> u64 {
        self.high
    }
}

/// Builds public parameters for `v ∈ [low, high)`. Picks the smallest
/// `n` with `2^n >= high - low` and rejects `high <= low` or an interval
/// wider than [`MAX_RANGE_END`].
pub fn SetupGeneric(low: u64, high: u64) -> Result<GenericParams, Error> {
    if high <= low {
        return Err(Error::InvalidRange("high must be strictly greater than low"));
    }
    let width = high - low;
    if width > MAX_RANGE_END {
        return Err(Error::InvalidRange("high - low exceeds MAX_RANGE_END"));
    }
    let range_end = width.next_power_of_two();
    let p1_params = setup_with_domain(range_end, b"generic-range.p1")?;
    let p2_params = setup_with_domain(range_end, b"generic-range.p2")?;
    tracing::debug!(low, high, range_end, "generated generic-range public parameters");
    Ok(GenericParams {
        p1_params,
        p2_params,
        low,
        high,
    })
}

/// Two linked `[0, 2^N)` proofs establishing `v ∈ [low, high)`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GenericRangeProof {
    p1: RangeProof,
    p2: RangeProof,
}

impl GenericRangeProof {
    /// Proves `v ∈ [params.low(), params.high())` under blinding `gamma`,
    /// returning the proof and the single value commitment `V = v*B +
    /// gamma*B_blinding` the verifier checks it against.
    #[tracing::instrument(level = "trace", skip(params, transcript, v, gamma, rng))]
    pub fn prove<R: RngCore + CryptoRng>(
        params: &GenericParams,
        transcript: &mut Transcript,
        v: u64,
        gamma: &Scalar,
        rng: &mut R,
    ) -> Result<(GenericRangeProof, RistrettoPoint), Error> {
        if v < params.low || v >= params.high {
            tracing::debug!("value outside generic range at prove time");
            return Err(Error::OutOfRange);
        }

        transcript.append_message_domain_sep(params.low, params.high);

        let shifted_low = v - params.low;
        let shifted_high = (params.high - 1) - v;
        let minus_gamma = -gamma;

        let (p1, V1) = RangeProof::prove(&params.p1_params, transcript, shifted_low, gamma, rng)?;
        let (p2, V2) = RangeProof::prove(
            &params.p2_params,
            transcript,
            shifted_high,
            &minus_gamma,
            rng,
        )?;

        // V1 and V2 commit under each sub-proof's own B, but both params
        // share the same Ristretto basepoint as B (see PedersenGens::with_domain),
        // so the linking arithmetic below is well-defined against either.
        let pc_gens = params.p1_params.pedersen_gens();
        let V = V1 + Scalar::from(params.low) * pc_gens.B;
        let expect_V2 = Scalar::from(params.high - 1) * pc_gens.B - V;
        debug_assert_eq!(V2, expect_V2);

        Ok((GenericRangeProof { p1, p2 }, V))
    }

    /// Checks that `V` is a commitment to some `v ∈ [params.low(),
    /// params.high())`.
    #[tracing::instrument(level = "trace", skip_all, fields(low = params.low, high = params.high))]
    pub fn verify(
        &self,
        params: &GenericParams,
        transcript: &mut Transcript,
        V: &RistrettoPoint,
    ) -> Result<(), Error> {
        transcript.append_message_domain_sep(params.low, params.high);

        let pc_gens = params.p1_params.pedersen_gens();
        let V1 = *V - Scalar::from(params.low) * pc_gens.B;
        let V2 = Scalar::from(params.high - 1) * pc_gens.B - *V;

        self.p1.verify(&params.p1_params, transcript, &V1)?;
        self.p2.verify(&params.p2_params, transcript, &V2)
    }

    /// Size in bytes of [`Self::to_bytes`]'s output.
    pub fn serialized_size(&self) -> usize {
        4 + self.p1.serialized_size() + self.p2.serialized_size()
    }

    /// Serializes as a little-endian `u32` length prefix for `p1` followed
    /// by `p1`'s bytes and then `p2`'s bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let p1_bytes = self.p1.to_bytes();
        let mut buf = Vec::with_capacity(4 + p1_bytes.len() + self.p2.serialized_size());
        buf.extend_from_slice(&(p1_bytes.len() as u32).to_le_bytes());
        buf.extend_from_slice(&p1_bytes);
        buf.extend_from_slice(&self.p2.to_bytes());
        buf
    }

    /// Inverse of [`Self::to_bytes`].
    pub fn from_bytes(slice: &[u8]) -> Result<GenericRangeProof, Error> {
        if slice.len() < 4 {
            return Err(Error::SerializationError("too short"));
        }
        let p1_len = u32::from_le_bytes(
            slice[0..4]
                .try_into()
                .map_err(|_| Error::SerializationError("bad length prefix"))?,
        ) as usize;
        if slice.len() < 4 + p1_len {
            return Err(Error::SerializationError("truncated p1"));
        }
        let p1 = RangeProof::from_bytes(&slice[4..4 + p1_len])?;
        let p2 = RangeProof::from_bytes(&slice[4 + p1_len..])?;
        Ok(GenericRangeProof { p1, p2 })
    }
}

trait GenericDomainSep {
    fn append_message_domain_sep(&mut self, low: u64, high: u64);
}

impl GenericDomainSep for Transcript {
    fn append_message_domain_sep(&mut self, low: u64, high: u64) {
        self.append_message(b"dom-sep", b"generic-range v1");
        self.append_u64(b"low", low);
        self.append_u64(b"high", high);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn setup_rejects_empty_or_inverted_interval() {
        assert!(SetupGeneric(10, 10).is_err());
        assert!(SetupGeneric(10, 5).is_err());
    }

    #[test]
    fn sub_proofs_use_independent_generators() {
        let params = SetupGeneric(18, 200).unwrap();
        assert_ne!(
            params.p1_params.bulletproof_gens().U,
            params.p2_params.bulletproof_gens().U
        );
        assert_ne!(
            params.p1_params.pedersen_gens().B_blinding,
            params.p2_params.pedersen_gens().B_blinding
        );
    }

    fn roundtrip(low: u64, high: u64, v: u64) -> Result<(), Error> {
        let params = SetupGeneric(low, high)?;
        let gamma = Scalar::random(&mut OsRng);

        let mut pt = Transcript::new(b"generic-range-test");
        let (proof, V) = GenericRangeProof::prove(&params, &mut pt, v, &gamma, &mut OsRng)?;

        let mut vt = Transcript::new(b"generic-range-test");
        proof.verify(&params, &mut vt, &V)
    }

    /// Scenario from spec.md §8: interval [18, 200).
    #[test]
    fn interval_18_200_accepts_interior_values() {
        assert!(roundtrip(18, 200, 18).is_ok());
        assert!(roundtrip(18, 200, 150).is_ok());
        assert!(roundtrip(18, 200, 199).is_ok());
    }

    #[test]
    fn interval_18_200_rejects_boundary_and_outside_values() {
        assert_eq!(roundtrip(18, 200, 17).unwrap_err(), Error::OutOfRange);
        assert_eq!(roundtrip(18, 200, 200).unwrap_err(), Error::OutOfRange);
    }

    #[test]
    fn non_power_of_two_width_is_handled() {
        // width = 182, not a power of two; SetupGeneric must still produce
        // usable parameters (n = 8, 2^8 = 256 >= 182).
        let params = SetupGeneric(18, 200).unwrap();
        assert_eq!(params.p1_params.n(), 8);
        assert_eq!(params.p2_params.n(), 8);
    }

    #[test]
    fn serialization_roundtrip() {
        let params = SetupGeneric(18, 200).unwrap();
        let gamma = Scalar::random(&mut OsRng);
        let mut pt = Transcript::new(b"generic-ser-roundtrip");
        let (proof, V) =
            GenericRangeProof::prove(&params, &mut pt, 150, &gamma, &mut OsRng).unwrap();

        let bytes = proof.to_bytes();
        let proof2 = GenericRangeProof::from_bytes(&bytes).unwrap();

        let mut vt = Transcript::new(b"generic-ser-roundtrip");
        assert!(proof2.verify(&params, &mut vt, &V).is_ok());
    }
}
