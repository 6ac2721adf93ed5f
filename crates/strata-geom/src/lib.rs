//! Geometry reconstruction for versioned OSM entities.
//!
//! [`geometry_at`] materializes the shape of an entity as it existed at
//! a given instant: points for nodes, lines or polygons for ways,
//! assembled multipolygons or collections for relations. Reconstruction
//! is pure over `(entity, instant, policy)` and never fails on
//! structurally incomplete data — missing members are omitted and broken
//! ring sets degrade to a [`geo_types::GeometryCollection`].
//!
//! The [`AreaPolicy`] trait is the seam for all tag-based "is this an
//! area" heuristics; geometry code never inspects tags itself.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod build;
mod clip;
mod policy;
mod rings;

pub use build::geometry_at;
pub use clip::ClipShape;
pub use policy::{AreaPolicy, RingRole, TagAreaPolicy};
