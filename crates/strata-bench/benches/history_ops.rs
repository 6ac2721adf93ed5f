//! Criterion micro-benchmarks for snapshot resolution.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strata_bench::{busy_node, editing_way};
use strata_core::Timestamp;

/// Benchmark: resolve 1000 snapshot lookups spread across a 256-version
/// node history.
fn bench_version_at_dense_node(c: &mut Criterion) {
    let n = busy_node(1, 256, 42);
    let last = n.last().timestamp.0;

    c.bench_function("version_at_dense_node", |b| {
        b.iter(|| {
            for i in 0..1000i64 {
                let t = Timestamp(1000 + (i * 977) % last);
                let v = n.version_at(t);
                black_box(&v);
            }
        });
    });
}

/// Benchmark: resolve every member of an 8-node way at one instant.
fn bench_members_at_way(c: &mut Criterion) {
    let w = editing_way(1, 8, 64, 42);
    let t = Timestamp(1000 + 32 * 3600);

    c.bench_function("members_at_way", |b| {
        b.iter(|| {
            let members = w.members_at(t).unwrap();
            black_box(&members);
        });
    });
}

/// Benchmark: collect the full change-instant union of a way whose
/// eight member nodes each carry 64 versions.
fn bench_change_timestamps_way(c: &mut Criterion) {
    let w = editing_way(1, 8, 64, 42);

    c.bench_function("change_timestamps_way", |b| {
        b.iter(|| {
            let ts = w.change_timestamps();
            black_box(&ts);
        });
    });
}

criterion_group!(
    benches,
    bench_version_at_dense_node,
    bench_members_at_way,
    bench_change_timestamps_way
);
criterion_main!(benches);
