#![allow(unused)]
extern crate slotscope;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use slotscope::{
    estimate_units, BlockObservation, EstimatorConfig, FunctionObservation,
    LayoutCapacityEstimator,
};
use std::hint::black_box;

/// Builds a synthetic compilation unit of `functions` functions, each with a handful of
/// Thumb-sized blocks where every other block falls through.
fn synthetic_unit(functions: usize) -> Vec<FunctionObservation> {
    (0..functions)
        .map(|f| {
            let blocks = (0..(f % 7) + 1)
                .map(|b| BlockObservation::new(b % 2 == 0, vec![2, 4, 2, 2, 4]))
                .collect();
            FunctionObservation::new(blocks)
        })
        .collect()
}

/// Benchmark sequential observation of a single large unit
fn bench_observe(c: &mut Criterion) {
    let unit = synthetic_unit(10_000);
    let blocks: usize = unit.iter().map(|f| f.blocks.len()).sum();

    let mut group = c.benchmark_group("observe");
    group.throughput(Throughput::Elements(blocks as u64));
    group.bench_function("observe_function", |b| {
        b.iter(|| {
            let mut estimator = LayoutCapacityEstimator::new(EstimatorConfig::picoxom());
            for function in &unit {
                estimator.observe_function(black_box(function)).unwrap();
            }
            black_box(estimator.snapshot())
        });
    });
    group.finish();
}

/// Benchmark parallel estimation across many units
fn bench_units(c: &mut Criterion) {
    let units: Vec<_> = (0..64).map(|_| synthetic_unit(1_000)).collect();

    let mut group = c.benchmark_group("units");
    group.throughput(Throughput::Elements(64 * 1_000));
    group.bench_function("estimate_units", |b| {
        b.iter(|| {
            let estimates =
                estimate_units(&EstimatorConfig::picoxom(), black_box(&units)).unwrap();
            black_box(estimates.total)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_observe, bench_units);
criterion_main!(benches);
