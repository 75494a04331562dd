//! Criterion benchmarks for restricting ambient intersection numbers.
//! Cases: the three worked examples, cold (fresh model) and in a basis.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p toric-cy

use std::rc::Rc;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use toric_cy::api::{restrict_cicy, special, CalabiYau, CyConfig, FixedVariety, IntNumsCfg, SymTensor};

fn model(name: &str) -> CalabiYau<FixedVariety> {
    match name {
        "quintic" => CalabiYau::new(special::quintic().unwrap(), None, CyConfig::default()).unwrap(),
        "p11169" => CalabiYau::new(special::p11169().unwrap(), None, CyConfig::default()).unwrap(),
        _ => CalabiYau::new(
            special::bicubic().unwrap(),
            Some(special::bicubic_nef_partition()),
            CyConfig::experimental(),
        )
        .unwrap(),
    }
}

/// Random rank-`rank` sparse tensor over `n` indices with near-integer values.
fn random_ambient(n: usize, rank: usize, entries: usize, seed: u64) -> SymTensor<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut t = SymTensor::new(rank);
    for _ in 0..entries {
        let key: Vec<usize> = (0..rank).map(|_| rng.gen_range(0..n)).collect();
        let v = rng.gen_range(-20i64..20) as f64 + rng.gen_range(-1e-3..1e-3);
        t.add(&key, v);
    }
    t
}

fn bench_models(c: &mut Criterion) {
    let mut group = c.benchmark_group("intnums");
    for name in ["quintic", "p11169", "bicubic"] {
        group.bench_with_input(BenchmarkId::new("canonical", name), &name, |b, &name| {
            b.iter_batched(
                || model(name),
                |cy| {
                    let _k = cy.intersection_numbers(&IntNumsCfg::default()).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("in_basis", name), &name, |b, &name| {
            b.iter_batched(
                || model(name),
                |cy| {
                    let _k = cy.intersection_numbers(&IntNumsCfg::in_basis()).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_restrict_cicy(c: &mut Criterion) {
    let mut group = c.benchmark_group("restrict_cicy");
    for &n in &[8usize, 16, 32] {
        let parts = vec![(1..n / 2).collect::<Vec<_>>(), (n / 2..n).collect()];
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || random_ambient(n, 5, 40 * n, 17),
                |amb| {
                    let _r = restrict_cicy(&amb, &parts, 1e-3, 5e-2);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
    // Keep the shared-ambient path honest: many models over one variety.
    let v = special::quintic().unwrap();
    c.bench_function("intnums/shared_ambient", |b| {
        b.iter(|| {
            let cy = CalabiYau::new(Rc::clone(&v), None, CyConfig::default()).unwrap();
            let _k = cy.intersection_numbers(&IntNumsCfg::in_basis()).unwrap();
        })
    });
}

criterion_group!(benches, bench_models, bench_restrict_cicy);
criterion_main!(benches);
