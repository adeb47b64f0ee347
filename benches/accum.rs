use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::thread_rng;

use rsa_accum::{trusted_setup, verify_membership, verify_non_membership, Accumulator};

const SAMPLES: usize = 10;
const MODULUS_BITS: usize = 1024;
const SET_SIZES: &[u32] = &[10, 100, 1000];

fn bench_accum(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulator");

    let params = Arc::new(trusted_setup(MODULUS_BITS, thread_rng()).expect("Error running setup"));

    group.bench_function("hash to prime", |b| {
        b.iter(|| black_box(rsa_accum::hash_to_prime(b"benchmark content").unwrap()))
    });

    for count in SET_SIZES.iter().copied() {
        let mut accum = Accumulator::new(params.clone());
        for idx in 0..count {
            accum.add(&idx.to_be_bytes()).unwrap();
        }
        let member = 0u32.to_be_bytes();
        let absent = count.to_be_bytes();

        group.bench_function(BenchmarkId::new("add member", count), |b| {
            b.iter(|| {
                let mut accum = accum.clone();
                accum.add(&absent).unwrap();
                black_box(accum)
            })
        });

        group.bench_function(BenchmarkId::new("prove membership", count), |b| {
            b.iter(|| black_box(accum.prove_membership(&member).unwrap()))
        });

        group.bench_function(BenchmarkId::new("prove non-membership", count), |b| {
            b.iter(|| black_box(accum.prove_non_membership(&absent).unwrap()))
        });

        let proof = accum.prove_membership(&member).unwrap();
        group.bench_function(BenchmarkId::new("verify membership", count), |b| {
            b.iter(|| {
                verify_membership(params.modulus(), &member, accum.digest(), &proof).unwrap()
            })
        });

        let proof = accum.prove_non_membership(&absent).unwrap();
        group.bench_function(BenchmarkId::new("verify non-membership", count), |b| {
            b.iter(|| {
                verify_non_membership(
                    params.modulus(),
                    &absent,
                    accum.digest(),
                    &proof,
                    params.generator(),
                )
                .unwrap()
            })
        });
    }
}

criterion_group!(
    name=benches;
    config=Criterion::default().sample_size(SAMPLES);
    targets=bench_accum
);
criterion_main!(benches);
