//! Single-value Bulletproof range proofs over `[0, 2^n)`.
//!
//! Grounded algebraically on `original_source/bulletproofs/bp.go` (`Setup`,
//! the three prover phases, and the verifier's `delta`/`UpdateGenerators`/
//! `commitVector` helpers), and on the teacher's `RangeProof` struct shape
//! and `prove_single`/`verify_single` naming in `range_proof/mod.rs` — with
//! the MPC/aggregation machinery that struct carried dropped entirely (no
//! aggregation is an explicit non-goal here). The Fiat-Shamir schedule
//! (`V,A,S -> y,z`; `T1,T2 -> x`; `tau_x,mu,t_hat -> w`) matches the order
//! `bp.go` absorbs the same values in, just through `transcript.rs` instead
//! of `HashBP`.

use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::{IsIdentity, MultiscalarMul};
use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::errors::Error;
use crate::generators::{self, BulletproofGens, PedersenGens};
use crate::inner_product_proof::InnerProductProof;
use crate::transcript::TranscriptProtocol;
use crate::util;

/// The generators and bit-length a range proof for `[0, range_end)` needs,
/// produced once by [`Setup`] and reused across many proofs.
#[derive(Clone, Debug)]
pub struct PublicParams {
    pub(crate) pc_gens: PedersenGens,
    pub(crate) bp_gens: BulletproofGens,
    n: usize,
}

impl PublicParams {
    /// The bit-length `N` the statement `[0, 2^N)` is proven over.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The shared Pedersen base pair.
    pub fn pedersen_gens(&self) -> &PedersenGens {
        &self.pc_gens
    }

    /// The shared per-bit generator vectors.
    pub fn bulletproof_gens(&self) -> &BulletproofGens {
        &self.bp_gens
    }
}

/// Builds the public parameters for proving membership in `[0, range_end)`.
/// `range_end` must be a power of two no larger than
/// [`generators::MAX_RANGE_END`] (spec.md §9 Open Question (a): a
/// non-power-of-two upper bound has no bit-decomposition to commit to, so
/// it is rejected here rather than silently rounded up).
pub fn Setup(range_end: u64) -> Result<PublicParams, Error> {
    setup_with_domain(range_end, b"")
}

/// Same as [`Setup`], but every generator is derived from a domain-tagged
/// seed, so two calls with distinct `domain` values never share a
/// generator. Used by `generic_range` to give its two linked sub-proofs
/// independent `PublicParams` rather than reusing one generator set.
pub(crate) fn setup_with_domain(range_end: u64, domain: &[u8]) -> Result<PublicParams, Error> {
    let n = generators::bit_length_for_range_end(range_end)?;
    tracing::debug!(range_end, n, "generated range-proof public parameters");
    Ok(PublicParams {
        pc_gens: PedersenGens::with_domain(domain),
        bp_gens: BulletproofGens::with_domain(n, domain),
        n,
    })
}

/// A complete single-value range proof: `A, S, T1, T2` bind the bit
/// decomposition and blinding polynomial; `tau_x, mu, t_hat` open the
/// polynomial commitment; `ipp_proof` is the folded inner-product argument
/// for the final linear relation.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RangeProof {
    A: CompressedRistretto,
    S: CompressedRistretto,
    T1: CompressedRistretto,
    T2: CompressedRistretto,
    tau_x: Scalar,
    mu: Scalar,
    t_hat: Scalar,
    ipp_proof: InnerProductProof,
}

/// `delta(y,z,n) = (z - z^2)*<1,y^n> - z^3*<1,2^n>`, the constant term the
/// verifier expects `t_hat` to differ from the value commitment by.
fn delta(y: &Scalar, z: &Scalar, n: usize) -> Scalar {
    let sum_y = util::sum_of_powers(y, n);
    let two = Scalar::from(2u64);
    let sum_2 = util::sum_of_powers(&two, n);
    let z2 = z * z;
    let z3 = z2 * z;
    (z - z2) * sum_y - z3 * sum_2
}

impl RangeProof {
    /// Proves that `v` lies in `[0, 2^n)` under blinding `gamma`, returning
    /// the proof alongside the Pedersen commitment `V = v*B + gamma*B_blinding`
    /// the verifier will check it against.
    #[tracing::instrument(level = "trace", skip(params, transcript, v, gamma, rng))]
    pub fn prove<R: RngCore + CryptoRng>(
        params: &PublicParams,
        transcript: &mut Transcript,
        v: u64,
        gamma: &Scalar,
        rng: &mut R,
    ) -> Result<(RangeProof, RistrettoPoint), Error> {
        let n = params.n;
        if n < 64 && v >= (1u64 << n) {
            tracing::debug!(n, "value out of range at prove time");
            return Err(Error::OutOfRange);
        }

        let pc_gens = &params.pc_gens;
        let bp_gens = &params.bp_gens;
        let G = bp_gens.G();
        let H = bp_gens.H();

        let V = pc_gens.commit(Scalar::from(v), *gamma);

        transcript.rangeproof_domain_sep(n as u64, 1);
        transcript.append_point(b"V", &V.compress());

        let a_L: Vec<Scalar> = (0..n)
            .map(|i| Scalar::from((v >> i) & 1))
            .collect();
        let a_R: Vec<Scalar> = a_L.iter().map(|b| b - Scalar::ONE).collect();

        let mut alpha = Scalar::random(rng);
        let A = RistrettoPoint::multiscalar_mul(
            std::iter::once(&alpha).chain(a_L.iter()).chain(a_R.iter()),
            std::iter::once(&pc_gens.B_blinding)
                .chain(G.iter())
                .chain(H.iter()),
        );

        let s_L: Vec<Scalar> = (0..n).map(|_| Scalar::random(rng)).collect();
        let s_R: Vec<Scalar> = (0..n).map(|_| Scalar::random(rng)).collect();
        let mut rho = Scalar::random(rng);
        let S = RistrettoPoint::multiscalar_mul(
            std::iter::once(&rho).chain(s_L.iter()).chain(s_R.iter()),
            std::iter::once(&pc_gens.B_blinding)
                .chain(G.iter())
                .chain(H.iter()),
        );

        transcript.append_point(b"A", &A.compress());
        transcript.append_point(b"S", &S.compress());
        let y = transcript.challenge_scalar(b"y")?;
        let z = transcript.challenge_scalar(b"z")?;

        let y_n: Vec<Scalar> = util::exp_iter(y).take(n).collect();
        let twos: Vec<Scalar> = util::exp_iter(Scalar::from(2u64)).take(n).collect();
        let z2 = z * z;

        // l(X) = l0 + l1*X, r(X) = r0 + r1*X
        let l0: Vec<Scalar> = a_L.iter().map(|a_Li| a_Li - z).collect();
        let l1 = s_L.clone();
        let r0: Vec<Scalar> = (0..n)
            .map(|i| y_n[i] * (a_R[i] + z) + z2 * twos[i])
            .collect();
        let r1: Vec<Scalar> = (0..n).map(|i| y_n[i] * s_R[i]).collect();

        let t1 = util::inner_product(&l0, &r1)? + util::inner_product(&l1, &r0)?;
        let t2 = util::inner_product(&l1, &r1)?;

        let mut tau1 = Scalar::random(rng);
        let mut tau2 = Scalar::random(rng);
        let T1 = pc_gens.commit(t1, tau1);
        let T2 = pc_gens.commit(t2, tau2);

        transcript.append_point(b"T1", &T1.compress());
        transcript.append_point(b"T2", &T2.compress());
        let x = transcript.challenge_scalar(b"x")?;

        let l: Vec<Scalar> = (0..n).map(|i| l0[i] + x * l1[i]).collect();
        let r: Vec<Scalar> = (0..n).map(|i| r0[i] + x * r1[i]).collect();
        let t_hat = util::inner_product(&l, &r)?;

        let tau_x = tau2 * x * x + tau1 * x + z2 * gamma;
        let mu = alpha + rho * x;

        transcript.append_scalar(b"tau_x", &tau_x);
        transcript.append_scalar(b"mu", &mu);
        transcript.append_scalar(b"t_hat", &t_hat);
        let w = transcript.challenge_scalar(b"w")?;
        let Q = w * bp_gens.U;

        let y_inv = y.invert();
        let H_prime: Vec<RistrettoPoint> = H
            .iter()
            .zip(util::exp_iter(y_inv).take(n))
            .map(|(h_i, y_inv_i)| h_i * y_inv_i)
            .collect();

        let ipp_proof = InnerProductProof::create(
            transcript,
            &Q,
            G.to_vec(),
            H_prime,
            l,
            r,
        )?;

        alpha.zeroize();
        rho.zeroize();
        tau1.zeroize();
        tau2.zeroize();

        tracing::trace!(n, "range proof generated");

        Ok((
            RangeProof {
                A: A.compress(),
                S: S.compress(),
                T1: T1.compress(),
                T2: T2.compress(),
                tau_x,
                mu,
                t_hat,
                ipp_proof,
            },
            V,
        ))
    }

    /// Checks that `V` is a commitment to some `v ∈ [0, 2^n)`.
    #[tracing::instrument(level = "trace", skip_all, fields(n = params.n))]
    pub fn verify(
        &self,
        params: &PublicParams,
        transcript: &mut Transcript,
        V: &RistrettoPoint,
    ) -> Result<(), Error> {
        let n = params.n;
        let pc_gens = &params.pc_gens;
        let bp_gens = &params.bp_gens;
        let G = bp_gens.G();
        let H = bp_gens.H();

        transcript.rangeproof_domain_sep(n as u64, 1);
        transcript.append_point(b"V", &V.compress());
        transcript.append_point(b"A", &self.A);
        transcript.append_point(b"S", &self.S);
        let y = transcript.challenge_scalar(b"y")?;
        let z = transcript.challenge_scalar(b"z")?;

        transcript.append_point(b"T1", &self.T1);
        transcript.append_point(b"T2", &self.T2);
        let x = transcript.challenge_scalar(b"x")?;

        transcript.append_scalar(b"tau_x", &self.tau_x);
        transcript.append_scalar(b"mu", &self.mu);
        transcript.append_scalar(b"t_hat", &self.t_hat);
        let w = transcript.challenge_scalar(b"w")?;
        let Q = w * bp_gens.U;

        // Check 1: t_hat is consistent with V, T1, T2 under (x, z).
        let delta_yzn = delta(&y, &z, n);
        let z2 = z * z;
        let check1 = RistrettoPoint::multiscalar_mul(
            &[self.t_hat, self.tau_x, -z2, -delta_yzn, -x, -(x * x)],
            &[
                pc_gens.B,
                pc_gens.B_blinding,
                *V,
                pc_gens.B,
                self.T1.decompress().ok_or(Error::SerializationError("T1"))?,
                self.T2.decompress().ok_or(Error::SerializationError("T2"))?,
            ],
        );
        if !check1.is_identity() {
            tracing::debug!("range proof rejected: polynomial commitment check failed");
            return Err(Error::VerificationFailed);
        }

        // Check 2: l, r (folded into ipp_proof) open the relation bound by
        // A, S, mu, t_hat.
        let y_inv = y.invert();
        let H_prime: Vec<RistrettoPoint> = H
            .iter()
            .zip(util::exp_iter(y_inv).take(n))
            .map(|(h_i, y_inv_i)| h_i * y_inv_i)
            .collect();

        let y_n: Vec<Scalar> = util::exp_iter(y).take(n).collect();
        let twos: Vec<Scalar> = util::exp_iter(Scalar::from(2u64)).take(n).collect();
        let h_prime_exponents: Vec<Scalar> = (0..n).map(|i| z * y_n[i] + z2 * twos[i]).collect();

        let A = self.A.decompress().ok_or(Error::SerializationError("A"))?;
        let S = self.S.decompress().ok_or(Error::SerializationError("S"))?;

        let minus_z = -z;
        let minus_mu = -self.mu;
        let mut p_scalars = Vec::with_capacity(2 + 2 * n + 2);
        let mut p_points = Vec::with_capacity(2 + 2 * n + 2);
        p_scalars.push(Scalar::ONE);
        p_points.push(A);
        p_scalars.push(x);
        p_points.push(S);
        for g_i in G.iter() {
            p_scalars.push(minus_z);
            p_points.push(*g_i);
        }
        for (exp, h_prime_i) in h_prime_exponents.iter().zip(H_prime.iter()) {
            p_scalars.push(*exp);
            p_points.push(*h_prime_i);
        }
        p_scalars.push(minus_mu);
        p_points.push(pc_gens.B_blinding);
        p_scalars.push(self.t_hat);
        p_points.push(Q);

        let p_ipa = RistrettoPoint::multiscalar_mul(&p_scalars, &p_points);

        let result = self.ipp_proof.verify(transcript, G, &H_prime, &Q, &p_ipa);
        if result.is_err() {
            tracing::debug!("range proof rejected: inner-product opening failed");
        }
        result
    }

    /// Size in bytes of [`Self::to_bytes`]'s output.
    pub fn serialized_size(&self) -> usize {
        7 * 32 + self.ipp_proof.serialized_size()
    }

    /// Serializes as `A || S || T1 || T2 || tau_x || mu || t_hat || ipp_proof`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.serialized_size());
        buf.extend_from_slice(self.A.as_bytes());
        buf.extend_from_slice(self.S.as_bytes());
        buf.extend_from_slice(self.T1.as_bytes());
        buf.extend_from_slice(self.T2.as_bytes());
        buf.extend_from_slice(self.tau_x.as_bytes());
        buf.extend_from_slice(self.mu.as_bytes());
        buf.extend_from_slice(self.t_hat.as_bytes());
        buf.extend_from_slice(&self.ipp_proof.to_bytes());
        buf
    }

    /// Inverse of [`Self::to_bytes`].
    pub fn from_bytes(slice: &[u8]) -> Result<RangeProof, Error> {
        if slice.len() < 7 * 32 {
            return Err(Error::SerializationError("too short"));
        }
        let scalar_at = |offset: usize| -> Result<Scalar, Error> {
            Scalar::from_canonical_bytes(util::read32(&slice[offset..]))
                .into_option()
                .ok_or(Error::SerializationError("non-canonical scalar"))
        };
        Ok(RangeProof {
            A: CompressedRistretto(util::read32(&slice[0..])),
            S: CompressedRistretto(util::read32(&slice[32..])),
            T1: CompressedRistretto(util::read32(&slice[64..])),
            T2: CompressedRistretto(util::read32(&slice[96..])),
            tau_x: scalar_at(128)?,
            mu: scalar_at(160)?,
            t_hat: scalar_at(192)?,
            ipp_proof: InnerProductProof::from_bytes(&slice[224..])?,
        })
    }
}
