//! strata: a full-history OpenStreetMap store core.
//!
//! Every OSM object keeps its entire version history, and queries
//! reconstruct the world as it looked at arbitrary past instants or
//! between two changes. This is the top-level facade crate re-exporting
//! the public API from all strata sub-crates; for most users, adding
//! `strata` as a single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use strata::prelude::*;
//!
//! // A policy that never fills anything — fine for point/line data.
//! struct LinePolicy;
//! impl AreaPolicy for LinePolicy {
//!     fn way_is_area(&self, _: &EntityVersion) -> bool { false }
//!     fn relation_is_area(&self, _: &EntityVersion) -> bool { false }
//!     fn relation_is_multipolygon(&self, _: &EntityVersion) -> bool { false }
//!     fn member_role(&self, _: &RelMember) -> RingRole { RingRole::Other }
//! }
//!
//! // One node, created at t=2000 and moved at t=2005.
//! let versions = vec![
//!     EntityVersion {
//!         key: EntityKey::node(1),
//!         version: 1,
//!         timestamp: Timestamp(2000),
//!         changeset: ChangesetId(1),
//!         user: UserId(1),
//!         visible: true,
//!         tags: TagList::new(),
//!         payload: Payload::Node { coord: Some(LonLat::from_degrees(1.42, 1.22)) },
//!     },
//!     EntityVersion {
//!         key: EntityKey::node(1),
//!         version: 2,
//!         timestamp: Timestamp(2005),
//!         changeset: ChangesetId(2),
//!         user: UserId(1),
//!         visible: true,
//!         tags: TagList::new(),
//!         payload: Payload::Node { coord: Some(LonLat::from_degrees(1.42, 1.225)) },
//!     },
//! ];
//! let entity = Arc::new(EntityHistory::from_versions(versions, Vec::new()).unwrap());
//!
//! let config = QueryConfig::between(
//!     GeoBounds::new(0.0, 0.0, 10.0, 10.0),
//!     Timestamp(2000),
//!     Timestamp(2018),
//! );
//! let query = TemporalQuery::new(config, Arc::new(LinePolicy)).unwrap();
//! let entries: Vec<_> = query.contributions(vec![entity]).unwrap().collect();
//!
//! assert_eq!(entries.len(), 2);
//! assert!(entries[0].kinds().contains(ChangeKind::Creation));
//! assert!(entries[1].kinds().contains(ChangeKind::GeometryChange));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strata-core` | IDs, timestamps, coordinates, tags, entity versions |
//! | [`store`] | `strata-store` | `EntityHistory` and snapshot resolution |
//! | [`geom`] | `strata-geom` | Area policy, geometry reconstruction, clipping |
//! | [`query`] | `strata-query` | Temporal/spatial iteration and result entries |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and identifiers (`strata-core`).
///
/// Contains the typed ids, [`types::Timestamp`], fixed-point
/// [`types::LonLat`] coordinates, opaque tag pairs, and the
/// [`types::EntityVersion`] model.
pub use strata_core as types;

/// Versioned entity histories (`strata-store`).
///
/// [`store::EntityHistory`] owns one object's full version chain plus
/// the closure of every sub-entity it ever referenced.
pub use strata_store as store;

/// Geometry reconstruction (`strata-geom`).
///
/// [`geom::geometry_at`] materializes entity shapes at an instant;
/// [`geom::AreaPolicy`] is the seam for area/role heuristics.
pub use strata_geom as geom;

/// Temporal/spatial iteration (`strata-query`).
///
/// [`query::TemporalQuery`] drives contribution and snapshot streams;
/// [`query::parallel`] fans out per grid cell.
pub use strata_query as query;

/// Common imports for typical strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use strata_core::{
        ChangesetId, EntityKey, EntityVersion, GeoBounds, LonLat, NodeId, OsmKind, Payload,
        RelMember, RelationId, RoleId, TagDictionary, TagList, TagPair, Timestamp, UserId, WayId,
    };

    // Store
    pub use strata_store::{EntityHistory, HistoryError, SnapshotError};

    // Geometry
    pub use strata_geom::{geometry_at, AreaPolicy, ClipShape, RingRole, TagAreaPolicy};

    // Query
    pub use strata_query::{
        ChangeKind, ChangeKinds, Contribution, QueryConfig, QueryError, QueryMetrics,
        SnapshotEntry, TemporalQuery, Timeline,
    };
}
