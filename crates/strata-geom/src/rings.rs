//! Ring assembly for multipolygon relations.
//!
//! Member-way node chains are merged on shared endpoint coordinates
//! until no merge applies, closed chains become outer/inner rings by
//! member-role majority, and inner rings are subtracted as holes from
//! the outer ring that spatially contains them. Anything that does not
//! assemble cleanly degrades to a collection of the constructible
//! pieces — assembly never fails.

use geo::{Contains, Validation};
use geo_types::{
    Geometry, GeometryCollection, LineString, MultiPolygon, Point, Polygon,
};
use strata_core::{EntityVersion, LonLat, OsmKind, Timestamp};
use strata_store::EntityHistory;

use crate::policy::{AreaPolicy, RingRole};

/// One node-coordinate chain under assembly, with the role votes of the
/// member ways merged into it so far.
#[derive(Clone, Debug)]
struct Chain {
    coords: Vec<LonLat>,
    outer_votes: u32,
    inner_votes: u32,
}

impl Chain {
    fn new(coords: Vec<LonLat>, role: RingRole) -> Self {
        // Unrecognized roles lean outer: unlabeled rings are outers in
        // practice, and an outer misread keeps more geometry than an
        // inner misread.
        let (outer_votes, inner_votes) = match role {
            RingRole::Inner => (0, 1),
            RingRole::Outer | RingRole::Other => (1, 0),
        };
        Self {
            coords,
            outer_votes,
            inner_votes,
        }
    }

    fn is_closed(&self) -> bool {
        self.coords.len() >= 4 && self.coords.first() == self.coords.last()
    }

    fn role(&self) -> RingRole {
        if self.inner_votes > self.outer_votes {
            RingRole::Inner
        } else {
            RingRole::Outer
        }
    }

    /// Merge `other` into `self` if the two chains share an endpoint,
    /// reversing one side as needed. Returns false when no endpoints
    /// coincide.
    fn try_join(&mut self, other: &Chain) -> bool {
        let (sf, sl) = (self.coords[0], self.coords[self.coords.len() - 1]);
        let (of, ol) = (other.coords[0], other.coords[other.coords.len() - 1]);

        if sl == of {
            self.coords.extend_from_slice(&other.coords[1..]);
        } else if sl == ol {
            self.coords.extend(other.coords[..other.coords.len() - 1].iter().rev());
        } else if sf == ol {
            let mut joined = other.coords.clone();
            joined.extend_from_slice(&self.coords[1..]);
            self.coords = joined;
        } else if sf == of {
            let mut joined: Vec<LonLat> = other.coords.iter().rev().copied().collect();
            joined.extend_from_slice(&self.coords[1..]);
            self.coords = joined;
        } else {
            return false;
        }
        self.outer_votes += other.outer_votes;
        self.inner_votes += other.inner_votes;
        true
    }

    fn to_line_string(&self) -> LineString<f64> {
        self.coords.iter().map(|c| c.to_coord()).collect()
    }
}

/// Assemble the geometry of a multipolygon-like relation at `t`.
///
/// `relation` is the history owning the member closure; `snapshot` is
/// its version active at `t`.
pub(crate) fn assemble(
    relation: &EntityHistory,
    snapshot: &EntityVersion,
    t: Timestamp,
    policy: &dyn AreaPolicy,
) -> Geometry<f64> {
    let mut chains: Vec<Chain> = Vec::new();
    let mut lone_points: Vec<Point<f64>> = Vec::new();
    let mut member_missing = false;

    for member in snapshot.relation_members() {
        match member.key.kind {
            OsmKind::Way => {
                let coords = way_chain(relation, member.key, t);
                if coords.len() < 2 {
                    // The way is gone at this instant, or too little of
                    // it resolves to contribute a segment.
                    member_missing = true;
                    continue;
                }
                chains.push(Chain::new(coords, policy.member_role(member)));
            }
            OsmKind::Node => {
                if let Some(c) = relation
                    .member_version_at(member.key, t)
                    .and_then(|v| v.coord())
                {
                    lone_points.push(Point(c.to_coord()));
                }
            }
            // Nested relations take no part in ring assembly.
            OsmKind::Relation => {}
        }
    }

    merge_chains(&mut chains);

    let (closed, open): (Vec<Chain>, Vec<Chain>) =
        chains.into_iter().partition(Chain::is_closed);

    if member_missing || closed.is_empty() {
        return piece_collection(&closed, &open, lone_points);
    }

    let mut outers: Vec<Polygon<f64>> = Vec::new();
    let mut inners: Vec<Polygon<f64>> = Vec::new();
    for ring in &closed {
        let poly = Polygon::new(ring.to_line_string(), Vec::new());
        match ring.role() {
            RingRole::Inner => inners.push(poly),
            _ => outers.push(poly),
        }
    }
    if outers.is_empty() {
        return piece_collection(&closed, &open, lone_points);
    }

    // Attach each inner ring as a hole of the first outer that
    // spatially contains it; inners contained by no outer are dropped.
    let mut polygons: Vec<Polygon<f64>> = outers;
    for inner in inners {
        if let Some(idx) = polygons.iter().position(|o| o.contains(&inner)) {
            let (exterior, mut holes) = polygons[idx].clone().into_inner();
            holes.push(inner.into_inner().0);
            polygons[idx] = Polygon::new(exterior, holes);
        }
    }

    let geometry: Geometry<f64> = if polygons.len() == 1 {
        Geometry::Polygon(polygons.into_iter().next().expect("one polygon"))
    } else {
        Geometry::MultiPolygon(MultiPolygon(polygons))
    };

    if geometry.is_valid() {
        geometry
    } else {
        // Topology is broken (self-intersection, crossing rings, ...).
        // Informational, not fatal: hand back the pieces.
        piece_collection(&closed, &open, lone_points)
    }
}

/// Coordinates of one member way at `t`, in node order, missing nodes
/// omitted. Empty when the way itself does not resolve or is deleted.
fn way_chain(relation: &EntityHistory, key: strata_core::EntityKey, t: Timestamp) -> Vec<LonLat> {
    let Some(way) = relation.member(key) else {
        return Vec::new();
    };
    let Ok(snapshot) = way.version_at(t) else {
        return Vec::new();
    };
    if !snapshot.visible {
        return Vec::new();
    }
    snapshot
        .way_nodes()
        .iter()
        .filter_map(|n| {
            way.member_version_at(strata_core::EntityKey::from(*n), t)
                .and_then(|v| v.coord())
        })
        .collect()
}

/// Merge chains that share endpoints until no merge applies.
///
/// Each pass performs at most one splice; total passes are bounded by
/// the initial chain count, which caps the loop even if a degenerate
/// chain (a way referencing itself) would otherwise match forever.
fn merge_chains(chains: &mut Vec<Chain>) {
    let max_merges = chains.len();
    for _ in 0..max_merges {
        let mut merged = false;
        'scan: for i in 0..chains.len() {
            if chains[i].is_closed() {
                continue;
            }
            for j in (i + 1)..chains.len() {
                if chains[j].is_closed() {
                    continue;
                }
                let other = chains[j].clone();
                if chains[i].try_join(&other) {
                    chains.swap_remove(j);
                    merged = true;
                    break 'scan;
                }
            }
        }
        if !merged {
            break;
        }
    }
}

/// The graceful-degradation result: every individually constructible
/// piece, nothing invented.
fn piece_collection(
    closed: &[Chain],
    open: &[Chain],
    lone_points: Vec<Point<f64>>,
) -> Geometry<f64> {
    let mut parts: Vec<Geometry<f64>> = Vec::new();
    for ring in closed {
        parts.push(Geometry::Polygon(Polygon::new(
            ring.to_line_string(),
            Vec::new(),
        )));
    }
    for chain in open {
        parts.push(Geometry::LineString(chain.to_line_string()));
    }
    parts.extend(lone_points.into_iter().map(Geometry::Point));
    Geometry::GeometryCollection(GeometryCollection(parts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(coords: &[(f64, f64)], role: RingRole) -> Chain {
        Chain::new(
            coords
                .iter()
                .map(|&(lon, lat)| LonLat::from_degrees(lon, lat))
                .collect(),
            role,
        )
    }

    #[test]
    fn join_head_to_tail() {
        let mut a = chain(&[(0.0, 0.0), (1.0, 0.0)], RingRole::Outer);
        let b = chain(&[(1.0, 0.0), (1.0, 1.0)], RingRole::Outer);
        assert!(a.try_join(&b));
        assert_eq!(a.coords.len(), 3);
        assert_eq!(a.outer_votes, 2);
    }

    #[test]
    fn join_tail_to_tail_reverses() {
        let mut a = chain(&[(0.0, 0.0), (1.0, 0.0)], RingRole::Outer);
        let b = chain(&[(1.0, 1.0), (1.0, 0.0)], RingRole::Outer);
        assert!(a.try_join(&b));
        assert_eq!(a.coords[2], LonLat::from_degrees(1.0, 1.0));
    }

    #[test]
    fn join_rejects_disjoint() {
        let mut a = chain(&[(0.0, 0.0), (1.0, 0.0)], RingRole::Outer);
        let b = chain(&[(5.0, 5.0), (6.0, 5.0)], RingRole::Outer);
        assert!(!a.try_join(&b));
    }

    #[test]
    fn two_halves_close_a_ring() {
        let mut chains = vec![
            chain(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], RingRole::Outer),
            chain(&[(1.0, 1.0), (0.0, 1.0), (0.0, 0.0)], RingRole::Outer),
        ];
        merge_chains(&mut chains);
        assert_eq!(chains.len(), 1);
        assert!(chains[0].is_closed());
    }

    #[test]
    fn merge_terminates_on_unmergeable_input() {
        let mut chains = vec![
            chain(&[(0.0, 0.0), (1.0, 0.0)], RingRole::Outer),
            chain(&[(5.0, 5.0), (6.0, 5.0)], RingRole::Inner),
        ];
        merge_chains(&mut chains);
        assert_eq!(chains.len(), 2);
    }

    #[test]
    fn role_majority_and_tie() {
        let mut a = chain(&[(0.0, 0.0), (1.0, 0.0)], RingRole::Inner);
        let b = chain(&[(1.0, 0.0), (2.0, 0.0)], RingRole::Inner);
        let c = chain(&[(2.0, 0.0), (3.0, 0.0)], RingRole::Outer);
        assert!(a.try_join(&b));
        assert!(a.try_join(&c));
        assert_eq!(a.role(), RingRole::Inner);

        // Exact tie resolves outer.
        let mut d = chain(&[(0.0, 0.0), (1.0, 0.0)], RingRole::Inner);
        let e = chain(&[(1.0, 0.0), (2.0, 0.0)], RingRole::Outer);
        assert!(d.try_join(&e));
        assert_eq!(d.role(), RingRole::Outer);
    }

    #[test]
    fn other_role_votes_outer() {
        let a = chain(&[(0.0, 0.0), (1.0, 0.0)], RingRole::Other);
        assert_eq!(a.role(), RingRole::Outer);
    }
}
