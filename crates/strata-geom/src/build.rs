//! Entity geometry reconstruction.

use geo_types::{Geometry, GeometryCollection, LineString, MultiPoint, Point, Polygon};
use smallvec::SmallVec;
use strata_core::{EntityKey, EntityVersion, LonLat, Payload, Timestamp};
use strata_store::{EntityHistory, SnapshotError};

use crate::policy::AreaPolicy;
use crate::rings;

/// The geometry of `entity` as it existed at instant `t`.
///
/// Output depends only on `(entity, t, policy)`: repeated calls return
/// coordinate-identical geometry. Structural incompleteness never fails —
/// missing member nodes are omitted from way lines, unresolvable relation
/// members are skipped, and broken multipolygon ring sets degrade to a
/// [`GeometryCollection`] of the constructible pieces.
///
/// # Errors
///
/// Only [`SnapshotError::PrecedesHistory`] when `t` lies before the
/// entity's first version, which is a caller contract violation — the
/// object had no state then, degraded or otherwise.
pub fn geometry_at(
    entity: &EntityHistory,
    t: Timestamp,
    policy: &dyn AreaPolicy,
) -> Result<Geometry<f64>, SnapshotError> {
    let mut ancestry = Vec::new();
    resolve(entity, t, policy, &mut ancestry)
}

fn resolve(
    entity: &EntityHistory,
    t: Timestamp,
    policy: &dyn AreaPolicy,
    ancestry: &mut Vec<EntityKey>,
) -> Result<Geometry<f64>, SnapshotError> {
    let snapshot = entity.version_at(t)?;
    if !snapshot.visible {
        return Ok(empty_for(snapshot));
    }
    Ok(match &snapshot.payload {
        Payload::Node { coord } => match coord {
            Some(c) => Geometry::Point(Point(c.to_coord())),
            // Visible but location-less should not happen in clean
            // data; treat like a deleted node.
            None => empty_point(),
        },
        Payload::Way { .. } => way_geometry(entity, snapshot, t, policy),
        Payload::Relation { .. } => {
            if policy.relation_is_multipolygon(snapshot) {
                rings::assemble(entity, snapshot, t, policy)
            } else {
                member_collection(entity, snapshot, t, policy, ancestry)
            }
        }
    })
}

/// Way reconstruction: the ordered coordinates of its member nodes at
/// `t`. Nodes that do not resolve are omitted — never interpolated,
/// never reordered.
fn way_geometry(
    way: &EntityHistory,
    snapshot: &EntityVersion,
    t: Timestamp,
    policy: &dyn AreaPolicy,
) -> Geometry<f64> {
    // Most ways fit the inline capacity of the payload's node list.
    let coords: SmallVec<[LonLat; 8]> = snapshot
        .way_nodes()
        .iter()
        .filter_map(|n| {
            way.member_version_at(EntityKey::from(*n), t)
                .and_then(|v| v.coord())
        })
        .collect();

    let closed = coords.len() >= 4 && coords.first() == coords.last();
    if closed && policy.way_is_area(snapshot) {
        let ring: LineString<f64> = coords.iter().map(|c| c.to_coord()).collect();
        return Geometry::Polygon(Polygon::new(ring, Vec::new()));
    }
    if coords.len() < 2 {
        return Geometry::LineString(LineString::new(Vec::new()));
    }
    Geometry::LineString(coords.iter().map(|c| c.to_coord()).collect())
}

/// Non-multipolygon relation: one geometry per member, in member order,
/// resolved recursively at the same instant. Members that cannot be
/// resolved (absent from the closure, born later, deleted, or already on
/// the resolution stack) are omitted, not replaced by placeholders.
fn member_collection(
    relation: &EntityHistory,
    snapshot: &EntityVersion,
    t: Timestamp,
    policy: &dyn AreaPolicy,
    ancestry: &mut Vec<EntityKey>,
) -> Geometry<f64> {
    ancestry.push(relation.key());
    let mut parts: Vec<Geometry<f64>> = Vec::new();
    for member in snapshot.relation_members() {
        // Membership graphs are acyclic in well-formed data; the
        // ancestry check stops accidental self-reference cold.
        if ancestry.contains(&member.key) {
            continue;
        }
        let Some(sub) = relation.member(member.key) else {
            continue;
        };
        match resolve(sub, t, policy, ancestry) {
            Ok(g) if !is_empty(&g) => parts.push(g),
            _ => {}
        }
    }
    ancestry.pop();
    Geometry::GeometryCollection(GeometryCollection(parts))
}

/// The empty geometry of the matching kind for an invisible snapshot.
fn empty_for(snapshot: &EntityVersion) -> Geometry<f64> {
    match &snapshot.payload {
        Payload::Node { .. } => empty_point(),
        Payload::Way { .. } => Geometry::LineString(LineString::new(Vec::new())),
        Payload::Relation { .. } => {
            Geometry::GeometryCollection(GeometryCollection(Vec::new()))
        }
    }
}

/// geo-types has no empty `Point`; the empty point set is an empty
/// `MultiPoint`.
fn empty_point() -> Geometry<f64> {
    Geometry::MultiPoint(MultiPoint(Vec::new()))
}

/// True when the geometry covers no point at all.
fn is_empty(g: &Geometry<f64>) -> bool {
    use geo::HasDimensions;
    g.is_empty()
}
