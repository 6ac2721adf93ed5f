//! Integration test: per-cell worker fan-out.
//!
//! The same entities split across cells must produce the same entries
//! as one sequential pass, cell boundaries and worker scheduling
//! notwithstanding.

use std::sync::Arc;

use strata_core::{GeoBounds, Timestamp};
use strata_query::{parallel, QueryConfig, TemporalQuery};
use strata_store::EntityHistory;
use strata_test_utils::{node, MockPolicy};

fn moving_node(id: i64, base: f64) -> Arc<EntityHistory> {
    node(id)
        .at(100, base, base)
        .at(200, base + 0.5, base)
        .at(300, base + 1.0, base)
        .build()
}

#[test]
fn per_cell_workers_match_a_sequential_pass() {
    let cells: Vec<Vec<Arc<EntityHistory>>> = vec![
        vec![moving_node(1, 1.0), moving_node(2, 5.0)],
        vec![moving_node(3, 10.0)],
        vec![moving_node(4, 20.0), moving_node(5, 30.0)],
    ];

    let config = QueryConfig::between(
        GeoBounds::new(0.0, 0.0, 100.0, 100.0),
        Timestamp(100),
        Timestamp(400),
    );
    let query = TemporalQuery::new(config, Arc::new(MockPolicy::lines())).unwrap();

    let sequential: Vec<(i64, Timestamp)> = query
        .contributions(cells.iter().flatten().cloned().collect::<Vec<_>>())
        .unwrap()
        .map(|e| (e.entity().key().id, e.timestamp()))
        .collect();

    let mut streamed: Vec<(i64, Timestamp)> = Vec::new();
    parallel::contributions_per_cell(&query, cells, |entry| {
        streamed.push((entry.entity().key().id, entry.timestamp()));
    })
    .unwrap();

    // Cross-cell order is unspecified; compare as multisets.
    let mut sequential = sequential;
    sequential.sort_unstable();
    streamed.sort_unstable();
    assert_eq!(sequential, streamed);
    assert_eq!(streamed.len(), 15); // 5 nodes × 3 instants
}

#[test]
fn snapshot_fan_out_streams_every_cell() {
    let cells: Vec<Vec<Arc<EntityHistory>>> =
        vec![vec![moving_node(1, 1.0)], vec![moving_node(2, 5.0)]];

    let config = QueryConfig::at(
        GeoBounds::new(0.0, 0.0, 100.0, 100.0),
        vec![Timestamp(150), Timestamp(250)],
    );
    let query = TemporalQuery::new(config, Arc::new(MockPolicy::lines())).unwrap();

    let mut count = 0;
    parallel::snapshots_per_cell(&query, cells, |_entry| count += 1).unwrap();
    assert_eq!(count, 4); // 2 nodes × 2 instants
}
