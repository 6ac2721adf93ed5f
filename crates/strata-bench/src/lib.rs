//! Benchmark profiles for the strata history engine.
//!
//! Provides deterministic synthetic histories sized like real grid-cell
//! contents:
//!
//! - [`busy_node`]: one node with a long edit history
//! - [`editing_way`]: a way whose nodes drift over many instants
//! - [`synthetic_cell`]: a mixed cell of nodes and ways
//!
//! All generators are seeded ChaCha8, so repeated runs benchmark the
//! same data.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use strata_core::{GeoBounds, Timestamp};
use strata_store::EntityHistory;
use strata_test_utils::{node, way};

/// Spacing between synthetic edit instants, in seconds.
const EDIT_INTERVAL: i64 = 3600;

/// A node edited `versions` times, drifting randomly inside a 1°×1°
/// box anchored at `(base_lon, base_lat)`.
pub fn busy_node(id: i64, versions: u32, seed: u64) -> Arc<EntityHistory> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ id as u64);
    let base_lon: f64 = rng.gen_range(0.0..10.0);
    let base_lat: f64 = rng.gen_range(0.0..10.0);

    let mut builder = node(id);
    for v in 0..versions {
        let t = 1000 + i64::from(v) * EDIT_INTERVAL;
        let lon = base_lon + rng.gen::<f64>();
        let lat = base_lat + rng.gen::<f64>();
        builder = builder.at(t, lon, lat);
    }
    builder.build()
}

/// A way over `node_count` busy nodes, itself re-versioned every few
/// edits.
pub fn editing_way(id: i64, node_count: usize, versions: u32, seed: u64) -> Arc<EntityHistory> {
    let node_ids: Vec<i64> = (0..node_count as i64).map(|n| id * 1000 + n).collect();
    let mut builder = way(id);
    for v in 0..versions {
        let t = 1000 + i64::from(v) * EDIT_INTERVAL * 4;
        builder = builder.shaped(t, &node_ids);
    }
    for (i, n) in node_ids.iter().enumerate() {
        builder = builder.member(busy_node(*n, versions, seed.wrapping_add(i as u64)));
    }
    builder.build()
}

/// A mixed grid cell: `node_count` standalone nodes plus `way_count`
/// ways of eight nodes each.
pub fn synthetic_cell(
    node_count: usize,
    way_count: usize,
    versions: u32,
    seed: u64,
) -> Vec<Arc<EntityHistory>> {
    let mut cell: Vec<Arc<EntityHistory>> = Vec::with_capacity(node_count + way_count);
    for i in 0..node_count as i64 {
        cell.push(busy_node(i + 1, versions, seed));
    }
    for i in 0..way_count as i64 {
        cell.push(editing_way(i + 1, 8, versions, seed));
    }
    cell
}

/// The window every profile fits inside.
pub fn profile_bounds() -> GeoBounds {
    GeoBounds::new(-1.0, -1.0, 12.0, 12.0)
}

/// The full edit interval of a `versions`-deep profile.
pub fn profile_interval(versions: u32) -> (Timestamp, Timestamp) {
    (
        Timestamp(0),
        Timestamp(2000 + i64::from(versions) * EDIT_INTERVAL * 4),
    )
}
