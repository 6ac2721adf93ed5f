//! Criterion micro-benchmarks for geometry reconstruction.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strata_bench::editing_way;
use strata_core::Timestamp;
use strata_geom::geometry_at;
use strata_test_utils::MockPolicy;

/// Benchmark: rebuild an 8-node way's linestring at 100 instants.
fn bench_way_geometry(c: &mut Criterion) {
    let w = editing_way(1, 8, 64, 42);
    let policy = MockPolicy::lines();

    c.bench_function("way_geometry_100_instants", |b| {
        b.iter(|| {
            for i in 0..100i64 {
                let t = Timestamp(1000 + i * 3600);
                let g = geometry_at(&w, t, &policy).unwrap();
                black_box(&g);
            }
        });
    });
}

/// Benchmark: the same reconstruction twice at one instant — the
/// engine is pure, so this measures the cost a memoizing caller avoids.
fn bench_way_geometry_repeat(c: &mut Criterion) {
    let w = editing_way(1, 8, 64, 42);
    let policy = MockPolicy::lines();
    let t = Timestamp(1000 + 32 * 3600);

    c.bench_function("way_geometry_repeat", |b| {
        b.iter(|| {
            let first = geometry_at(&w, t, &policy).unwrap();
            let second = geometry_at(&w, t, &policy).unwrap();
            black_box((first, second));
        });
    });
}

criterion_group!(benches, bench_way_geometry, bench_way_geometry_repeat);
criterion_main!(benches);
