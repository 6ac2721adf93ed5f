//! Criterion benchmarks for full query walks over a synthetic cell.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strata_bench::{profile_bounds, profile_interval, synthetic_cell};
use strata_core::Timestamp;
use strata_query::{QueryConfig, TemporalQuery};
use strata_test_utils::MockPolicy;

/// Benchmark: contribution walk over a 64-node / 8-way cell with
/// 32-version histories.
fn bench_contribution_walk(c: &mut Criterion) {
    let cell = synthetic_cell(64, 8, 32, 42);
    let (start, end) = profile_interval(32);
    let config = QueryConfig::between(profile_bounds(), start, end);
    let query = TemporalQuery::new(config, Arc::new(MockPolicy::lines())).unwrap();

    c.bench_function("contribution_walk_cell", |b| {
        b.iter(|| {
            let count = query.contributions(cell.clone()).unwrap().count();
            black_box(count);
        });
    });
}

/// Benchmark: snapshot reconstruction of the same cell at 8 instants.
fn bench_snapshot_walk(c: &mut Criterion) {
    let cell = synthetic_cell(64, 8, 32, 42);
    let instants: Vec<Timestamp> = (0..8).map(|i| Timestamp(2000 + i * 40_000)).collect();
    let config = QueryConfig::at(profile_bounds(), instants);
    let query = TemporalQuery::new(config, Arc::new(MockPolicy::lines())).unwrap();

    c.bench_function("snapshot_walk_cell", |b| {
        b.iter(|| {
            let count = query.snapshots(cell.clone()).unwrap().count();
            black_box(count);
        });
    });
}

criterion_group!(benches, bench_contribution_walk, bench_snapshot_walk);
criterion_main!(benches);
