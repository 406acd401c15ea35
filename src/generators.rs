//! Deterministic public generators.
//!
//! There is no trusted setup: every generator is the output of a
//! domain-separated hash-to-group chain, so no party ever knows a
//! discrete-log relation between any two of them. Grounded on
//! `etsangsplk-ristretto-bulletproofs/src/generators.rs`'s
//! `GeneratorsChain` (a SHA-512-seeded iterator of independent points) and
//! on `vats98754-zero-knowledge-proofs/crates/bulletproofs-core/src/
//! generators.rs`'s per-index labeled derivation. The power-of-two and
//! `MAX_RANGE_END` bounds, and the choice of distinct seeds per role
//! (rather than one shared seed disambiguated only by an index suffix —
//! spec.md §9 Open Question (b)), are grounded on
//! `original_source/bulletproofs/bp.go::Setup`.

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::MultiscalarMul;
use sha2::Sha512;

use crate::errors::Error;

/// The largest interval width `Setup` will accept, `2^32`. Implementations
/// MAY raise this; it is a crate constant, not a protocol limit.
pub const MAX_RANGE_END: u64 = 1 << 32;

/// An arbitrary-length, deterministically-seeded sequence of independent
/// generators.
struct GeneratorsChain {
    next_point: RistrettoPoint,
}

impl GeneratorsChain {
    fn new(label: &[u8]) -> Self {
        let next_point = RistrettoPoint::hash_from_bytes::<Sha512>(label);
        GeneratorsChain { next_point }
    }
}

/// Appends a domain tag to a base label, leaving the label untouched for an
/// empty tag so the default (untagged) generator set is unaffected.
fn tagged_label(base: &[u8], domain: &[u8]) -> Vec<u8> {
    if domain.is_empty() {
        return base.to_vec();
    }
    let mut label = Vec::with_capacity(base.len() + 1 + domain.len());
    label.extend_from_slice(base);
    label.push(b'.');
    label.extend_from_slice(domain);
    label
}

impl Iterator for GeneratorsChain {
    type Item = RistrettoPoint;
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next_point;
        let mut seed = Vec::with_capacity(32 + 4);
        seed.extend_from_slice(current.compress().as_bytes());
        seed.extend_from_slice(b"next");
        self.next_point = RistrettoPoint::hash_from_bytes::<Sha512>(&seed);
        Some(current)
    }
}

/// The pair of bases used for a Pedersen commitment `v*B + gamma*B_blinding`.
#[derive(Clone, Debug)]
pub struct PedersenGens {
    /// Base for the committed value.
    pub B: RistrettoPoint,
    /// Base for the blinding factor.
    pub B_blinding: RistrettoPoint,
}

impl PedersenGens {
    /// Commits to `value` under `blinding`.
    pub fn commit(&self, value: Scalar, blinding: Scalar) -> RistrettoPoint {
        RistrettoPoint::multiscalar_mul(&[value, blinding], &[self.B, self.B_blinding])
    }

    /// Same bases as [`Default`], but with `B_blinding` derived from a
    /// domain-tagged seed so two independently-created `PedersenGens` never
    /// collide (used to give `GenericParams`' two sub-proofs independent
    /// generators rather than sharing one `PublicParams`).
    pub(crate) fn with_domain(domain: &[u8]) -> Self {
        let label = tagged_label(b"Bulletproofs.PedersenGens.B_blinding", domain);
        PedersenGens {
            B: RISTRETTO_BASEPOINT_POINT,
            B_blinding: GeneratorsChain::new(&label).next().expect("infinite iterator"),
        }
    }
}

impl Default for PedersenGens {
    fn default() -> Self {
        Self::with_domain(b"")
    }
}

/// The per-bit generator vectors `G⃗, H⃗` and the extra IPA generator `U`,
/// shared between the range proof and its embedded inner-product argument.
#[derive(Clone, Debug)]
pub struct BulletproofGens {
    /// Bit-length each vector is sized for.
    pub n: usize,
    G: Vec<RistrettoPoint>,
    H: Vec<RistrettoPoint>,
    /// Extra generator the inner-product argument is bound through: the
    /// verifier's `w` challenge scales `U` into the per-proof base `Q = w*U`
    /// (spec.md §4.3's `U' = x0*U`) that both `l(x)`/`r(x)` and `t_hat` tie
    /// into, rather than reusing the Pedersen value base `B` for that role.
    pub U: RistrettoPoint,
}

impl BulletproofGens {
    /// Builds `n` independent generators per vector (`n` need not be a
    /// power of two here; the range-proof layer enforces that).
    pub fn new(n: usize) -> Self {
        Self::with_domain(n, b"")
    }

    /// Same as [`Self::new`], but with every generator derived from a
    /// domain-tagged seed (see [`PedersenGens::with_domain`]).
    pub(crate) fn with_domain(n: usize, domain: &[u8]) -> Self {
        let G = GeneratorsChain::new(&tagged_label(b"Bulletproofs.BulletproofGens.G", domain))
            .take(n)
            .collect();
        let H = GeneratorsChain::new(&tagged_label(b"Bulletproofs.BulletproofGens.H", domain))
            .take(n)
            .collect();
        let U = GeneratorsChain::new(&tagged_label(b"Bulletproofs.BulletproofGens.U", domain))
            .next()
            .expect("infinite iterator");
        BulletproofGens { n, G, H, U }
    }

    /// The `G⃗` vector.
    pub fn G(&self) -> &[RistrettoPoint] {
        &self.G
    }

    /// The `H⃗` vector.
    pub fn H(&self) -> &[RistrettoPoint] {
        &self.H
    }
}

/// Rejects `range_end` unless it is a power of two in `(0, MAX_RANGE_END]`,
/// returning the corresponding bit-length `N`.
pub fn bit_length_for_range_end(range_end: u64) -> Result<usize, Error> {
    if range_end == 0 {
        return Err(Error::InvalidRange("range_end must be positive"));
    }
    if range_end > MAX_RANGE_END {
        return Err(Error::InvalidRange("range_end exceeds MAX_RANGE_END"));
    }
    if !range_end.is_power_of_two() {
        return Err(Error::InvalidRange("range_end must be a power of two"));
    }
    Ok(range_end.trailing_zeros() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::traits::{Identity, IsIdentity};

    #[test]
    fn generators_are_independent_and_nonidentity() {
        let gens = BulletproofGens::new(16);
        for p in gens.G().iter().chain(gens.H().iter()).chain([gens.U].iter()) {
            assert!(!p.is_identity());
        }
        // Spot-check pairwise distinctness; a collision here would mean a
        // catastrophic hash-to-group bug, not bad luck.
        for i in 0..gens.G().len() {
            for j in 0..gens.H().len() {
                assert_ne!(gens.G()[i], gens.H()[j]);
            }
        }
    }

    #[test]
    fn pedersen_commit_is_not_identity_for_nonzero_blinding() {
        let pc = PedersenGens::default();
        let c = pc.commit(Scalar::from(0u64), Scalar::from(1u64));
        assert_ne!(c, RistrettoPoint::identity());
    }

    #[test]
    fn bit_length_accepts_powers_of_two() {
        assert_eq!(bit_length_for_range_end(1).unwrap(), 0);
        assert_eq!(bit_length_for_range_end(32).unwrap(), 5);
        assert_eq!(bit_length_for_range_end(1 << 32).unwrap(), 32);
    }

    #[test]
    fn bit_length_rejects_non_power_of_two() {
        assert!(bit_length_for_range_end(3).is_err());
        assert!(bit_length_for_range_end(0).is_err());
        assert!(bit_length_for_range_end((1 << 32) + 1).is_err());
    }
}
