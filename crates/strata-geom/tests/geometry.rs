//! Integration tests: geometry reconstruction across entity kinds.
//!
//! Exercises the full path from versioned histories to geo-types
//! geometries: snapshot resolution, member lookup, ring assembly, and
//! the degradation rules for incomplete data.

use geo::HasDimensions;
use geo_types::{Coord, Geometry};
use strata_core::{EntityKey, Timestamp};
use strata_geom::geometry_at;
use strata_test_utils::{node, relation, way, MockPolicy, ROLE_INNER, ROLE_OTHER, ROLE_OUTER};

fn coords(pairs: &[(f64, f64)]) -> Vec<Coord<f64>> {
    pairs.iter().map(|&(x, y)| Coord { x, y }).collect()
}

// ── nodes ────────────────────────────────────────────────────────

#[test]
fn node_renders_as_point() {
    let n = node(1).at(100, 1.42, 1.22).build();
    match geometry_at(&n, Timestamp(100), &MockPolicy::lines()).unwrap() {
        Geometry::Point(p) => {
            assert!((p.x() - 1.42).abs() < 1e-9);
            assert!((p.y() - 1.22).abs() < 1e-9);
        }
        other => panic!("expected Point, got {other:?}"),
    }
}

#[test]
fn deleted_node_renders_empty() {
    let n = node(1).at(100, 1.0, 1.0).deleted(200).build();
    let g = geometry_at(&n, Timestamp(200), &MockPolicy::lines()).unwrap();
    assert!(g.is_empty());
}

#[test]
fn node_before_history_is_an_error() {
    let n = node(1).at(100, 1.0, 1.0).build();
    assert!(geometry_at(&n, Timestamp(50), &MockPolicy::lines()).is_err());
}

// ── ways ─────────────────────────────────────────────────────────

#[test]
fn way_renders_member_positions_at_the_query_instant() {
    let a = node(1).at(100, 0.0, 0.0).at(300, 0.5, 0.0).build();
    let b = node(2).at(100, 1.0, 1.0).build();
    let w = way(10).shaped(100, &[1, 2]).member(a).member(b).build();

    let early = geometry_at(&w, Timestamp(200), &MockPolicy::lines()).unwrap();
    match early {
        Geometry::LineString(ref ls) => {
            assert_eq!(ls.0, coords(&[(0.0, 0.0), (1.0, 1.0)]));
        }
        ref other => panic!("expected LineString, got {other:?}"),
    }

    let late = geometry_at(&w, Timestamp(300), &MockPolicy::lines()).unwrap();
    match late {
        Geometry::LineString(ls) => {
            assert_eq!(ls.0, coords(&[(0.5, 0.0), (1.0, 1.0)]));
        }
        other => panic!("expected LineString, got {other:?}"),
    }
}

#[test]
fn way_omits_missing_nodes_without_reordering() {
    // Node 2 is absent from the closure entirely.
    let a = node(1).at(100, 0.0, 0.0).build();
    let c = node(3).at(100, 2.0, 2.0).build();
    let w = way(10).shaped(100, &[1, 2, 3]).member(a).member(c).build();

    match geometry_at(&w, Timestamp(100), &MockPolicy::lines()).unwrap() {
        Geometry::LineString(ls) => {
            assert_eq!(ls.0, coords(&[(0.0, 0.0), (2.0, 2.0)]));
        }
        other => panic!("expected LineString, got {other:?}"),
    }
}

#[test]
fn way_with_one_resolvable_node_is_an_empty_line() {
    let a = node(1).at(100, 0.0, 0.0).build();
    let w = way(10).shaped(100, &[1, 2]).member(a).build();
    match geometry_at(&w, Timestamp(100), &MockPolicy::lines()).unwrap() {
        Geometry::LineString(ls) => assert!(ls.0.is_empty()),
        other => panic!("expected empty LineString, got {other:?}"),
    }
}

#[test]
fn closed_way_fills_to_polygon_under_area_policy() {
    let n1 = node(1).at(100, 0.0, 0.0).build();
    let n2 = node(2).at(100, 1.0, 0.0).build();
    let n3 = node(3).at(100, 1.0, 1.0).build();
    let n4 = node(4).at(100, 0.0, 1.0).build();
    let w = way(10)
        .shaped(100, &[1, 2, 3, 4, 1])
        .member(n1)
        .member(n2)
        .member(n3)
        .member(n4)
        .build();

    match geometry_at(&w, Timestamp(100), &MockPolicy::areas()).unwrap() {
        Geometry::Polygon(p) => {
            assert_eq!(p.exterior().0.len(), 5);
            assert!(p.interiors().is_empty());
        }
        other => panic!("expected Polygon, got {other:?}"),
    }

    // The same way under a line policy stays a closed linestring.
    match geometry_at(&w, Timestamp(100), &MockPolicy::lines()).unwrap() {
        Geometry::LineString(ls) => assert_eq!(ls.0.len(), 5),
        other => panic!("expected LineString, got {other:?}"),
    }
}

#[test]
fn geometry_is_idempotent() {
    let n1 = node(1).at(100, 0.0, 0.0).at(200, 0.1, 0.0).build();
    let n2 = node(2).at(100, 1.0, 0.0).build();
    let w = way(10).shaped(100, &[1, 2]).member(n1).member(n2).build();
    let policy = MockPolicy::lines();

    let first = geometry_at(&w, Timestamp(150), &policy).unwrap();
    let second = geometry_at(&w, Timestamp(150), &policy).unwrap();
    assert_eq!(first, second);
}

// ── multipolygon relations ───────────────────────────────────────

/// One outer ring split across two ways, one closed inner ring.
fn ring_relation() -> std::sync::Arc<strata_store::EntityHistory> {
    let n1 = node(1).at(100, 0.0, 0.0).build();
    let n2 = node(2).at(100, 4.0, 0.0).build();
    let n3 = node(3).at(100, 4.0, 4.0).build();
    let n4 = node(4).at(100, 0.0, 4.0).build();
    let n5 = node(5).at(100, 1.0, 1.0).build();
    let n6 = node(6).at(100, 2.0, 1.0).build();
    let n7 = node(7).at(100, 2.0, 2.0).build();
    let n8 = node(8).at(100, 1.0, 2.0).build();

    let outer_east = way(10)
        .shaped(100, &[1, 2, 3])
        .member(n1.clone())
        .member(n2)
        .member(n3.clone())
        .build();
    let outer_west = way(11)
        .shaped(100, &[3, 4, 1])
        .deleted(200)
        .member(n3)
        .member(n4)
        .member(n1)
        .build();
    let inner = way(12)
        .shaped(100, &[5, 6, 7, 8, 5])
        .member(n5)
        .member(n6)
        .member(n7)
        .member(n8)
        .build();

    relation(20)
        .assembled(
            100,
            &[
                (EntityKey::way(10), ROLE_OUTER),
                (EntityKey::way(11), ROLE_OUTER),
                (EntityKey::way(12), ROLE_INNER),
            ],
        )
        .member(outer_east)
        .member(outer_west)
        .member(inner)
        .build()
}

#[test]
fn multipolygon_assembles_outer_ring_with_hole() {
    let rel = ring_relation();
    match geometry_at(&rel, Timestamp(100), &MockPolicy::areas()).unwrap() {
        Geometry::Polygon(p) => {
            assert_eq!(
                p.exterior().0,
                coords(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)])
            );
            assert_eq!(p.interiors().len(), 1);
            assert_eq!(
                p.interiors()[0].0,
                coords(&[(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0), (1.0, 1.0)])
            );
        }
        other => panic!("expected Polygon, got {other:?}"),
    }
}

#[test]
fn deleting_a_ring_way_degrades_to_pieces() {
    // Way 11 is deleted at t=200; the outer ring can no longer close.
    let rel = ring_relation();
    match geometry_at(&rel, Timestamp(250), &MockPolicy::areas()).unwrap() {
        Geometry::GeometryCollection(gc) => {
            let polygons = gc
                .0
                .iter()
                .filter(|g| matches!(g, Geometry::Polygon(_)))
                .count();
            let lines = gc
                .0
                .iter()
                .filter(|g| matches!(g, Geometry::LineString(_)))
                .count();
            // The still-closed inner ring survives as a polygon piece,
            // the remaining outer half as an open chain.
            assert_eq!(polygons, 1);
            assert_eq!(lines, 1);
        }
        other => panic!("expected GeometryCollection, got {other:?}"),
    }
}

#[test]
fn relation_with_every_member_missing_degrades_quietly() {
    let rel = relation(20)
        .assembled(
            100,
            &[
                (EntityKey::way(40), ROLE_OUTER),
                (EntityKey::node(41), ROLE_OTHER),
            ],
        )
        .build();

    let g = geometry_at(&rel, Timestamp(100), &MockPolicy::areas()).unwrap();
    match g {
        Geometry::GeometryCollection(gc) => assert!(gc.0.is_empty()),
        other => panic!("expected empty GeometryCollection, got {other:?}"),
    }
}

// ── other relations ──────────────────────────────────────────────

#[test]
fn plain_relation_collects_member_geometries_in_order() {
    let n1 = node(1).at(100, 5.0, 5.0).build();
    let n2 = node(2).at(100, 0.0, 0.0).build();
    let n3 = node(3).at(100, 1.0, 0.0).build();
    let w = way(10)
        .shaped(100, &[2, 3])
        .member(n2)
        .member(n3)
        .build();

    let rel = relation(20)
        .assembled(
            100,
            &[(EntityKey::way(10), ROLE_OUTER), (EntityKey::node(1), ROLE_OUTER)],
        )
        .member(w)
        .member(n1)
        .build();

    match geometry_at(&rel, Timestamp(100), &MockPolicy::lines()).unwrap() {
        Geometry::GeometryCollection(gc) => {
            assert_eq!(gc.0.len(), 2);
            assert!(matches!(gc.0[0], Geometry::LineString(_)));
            assert!(matches!(gc.0[1], Geometry::Point(_)));
        }
        other => panic!("expected GeometryCollection, got {other:?}"),
    }
}

#[test]
fn relation_member_referencing_parent_is_skipped() {
    // A member reference back to the relation itself cannot resolve
    // (it is not in its own closure) and must simply be omitted.
    let n1 = node(1).at(100, 5.0, 5.0).build();
    let rel = relation(20)
        .assembled(
            100,
            &[(EntityKey::relation(20), ROLE_OUTER), (EntityKey::node(1), ROLE_OUTER)],
        )
        .member(n1)
        .build();

    match geometry_at(&rel, Timestamp(100), &MockPolicy::lines()).unwrap() {
        Geometry::GeometryCollection(gc) => assert_eq!(gc.0.len(), 1),
        other => panic!("expected GeometryCollection, got {other:?}"),
    }
}
