//! Property tests for geometry reconstruction.
//!
//! Lives here as an integration test rather than an in-crate unit test:
//! it depends on `strata-test-utils`, which in turn depends on
//! `strata-geom`, so running it inside the crate's own test build would
//! link two distinct copies of `strata-geom`.

use proptest::prelude::*;
use strata_core::Timestamp;
use strata_geom::geometry_at;
use strata_test_utils::{node, way, MockPolicy};

proptest! {
    /// Reconstruction is pure: repeated calls with the same inputs
    /// return coordinate-identical geometry.
    #[test]
    fn geometry_at_is_idempotent(
        instants in proptest::collection::btree_set(100i64..1000, 1..6),
        probe in 100i64..1200,
    ) {
        let instants: Vec<i64> = instants.into_iter().collect();
        let mut a = node(1);
        let mut b = node(2);
        for (i, t) in instants.iter().enumerate() {
            a = a.at(*t, i as f64, 0.0);
            b = b.at(*t, 0.0, i as f64);
        }
        let w = way(10)
            .shaped(instants[0], &[1, 2])
            .member(a.build())
            .member(b.build())
            .build();
        let policy = MockPolicy::lines();

        let t = Timestamp(probe.max(instants[0]));
        let first = geometry_at(&w, t, &policy).unwrap();
        let second = geometry_at(&w, t, &policy).unwrap();
        prop_assert_eq!(first, second);
    }
}
