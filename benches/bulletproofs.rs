//! Prove/verify throughput across bit-lengths.
//!
//! Grounded on `iquerejeta-zkSVM/inner_product_proof/benches/
//! ip_zk_proof.rs`'s per-size `criterion_group!` structure (fresh
//! transcript each iteration, sizes as explicit parameters), ported from
//! that crate's removed `bench_function_over_inputs` helper to the
//! `BenchmarkId`-based API of current `criterion`.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use curve25519_dalek::scalar::Scalar;
use merlin::Transcript;
use rand::rngs::OsRng;

use zk_bulletproofs::{PublicParams, RangeProof, Setup};

fn prove_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_proof_prove");
    for &n in &[8usize, 16, 32] {
        let range_end = 1u64 << n;
        let params = Setup(range_end).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &params, |b, params| {
            let mut rng = OsRng;
            b.iter(|| {
                let gamma = Scalar::random(&mut rng);
                let mut transcript = Transcript::new(b"bench prove");
                RangeProof::prove(params, &mut transcript, range_end >> 1, &gamma, &mut rng)
                    .unwrap()
            });
        });
    }
    group.finish();
}

fn verify_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_proof_verify");
    for &n in &[8usize, 16, 32] {
        let range_end = 1u64 << n;
        let params = Setup(range_end).unwrap();
        let (proof, commitment) = make_proof(&params, range_end);
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(params, proof, commitment),
            |b, (params, proof, commitment)| {
                b.iter(|| {
                    let mut transcript = Transcript::new(b"bench verify");
                    proof.verify(params, &mut transcript, commitment).unwrap()
                });
            },
        );
    }
    group.finish();
}

fn make_proof(
    params: &PublicParams,
    range_end: u64,
) -> (RangeProof, curve25519_dalek::ristretto::RistrettoPoint) {
    let mut rng = OsRng;
    let gamma = Scalar::random(&mut rng);
    let mut transcript = Transcript::new(b"bench verify");
    RangeProof::prove(params, &mut transcript, range_end >> 1, &gamma, &mut rng).unwrap()
}

criterion_group!(benches, prove_bench, verify_bench);
criterion_main!(benches);
