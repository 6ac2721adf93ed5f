//! Core types for the strata full-history OSM query engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental vocabulary used throughout the strata workspace:
//! typed identifiers, timestamps, fixed-point coordinates, opaque tag
//! pairs, bounding boxes, and the entity-version model.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod bounds;
mod coord;
mod id;
mod tag;
mod time;
mod version;

pub use bounds::GeoBounds;
pub use coord::LonLat;
pub use id::{ChangesetId, EntityKey, NodeId, OsmKind, RelationId, RoleId, UserId, WayId};
pub use tag::{tag_value, tags_equal, TagDictionary, TagList, TagPair};
pub use time::Timestamp;
pub use version::{EntityVersion, Payload, RelMember};
