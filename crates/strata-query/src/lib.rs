//! Temporal/spatial iteration over versioned OSM entities.
//!
//! A [`TemporalQuery`] drives snapshot reconstruction and geometry
//! materialization across a time window and a spatial filter, producing
//! one of two lazy result streams: [`contributions`](TemporalQuery::contributions)
//! yields one entry per instant at which a matching entity changed,
//! classified into [`ChangeKinds`]; [`snapshots`](TemporalQuery::snapshots)
//! yields the reconstructed state at each of a fixed list of instants.
//!
//! Queries are purely functional over their inputs and safe to run in
//! parallel across grid cells, one iterator per worker — see
//! [`parallel`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod candidate;
mod config;
mod contribution;
mod error;
mod iter;
mod metrics;
pub mod parallel;

pub use config::{EntityFilter, QueryConfig, SnapshotFilter, Timeline};
pub use contribution::{ChangeKind, ChangeKinds, Contribution, SnapshotEntry};
pub use error::QueryError;
pub use iter::{ContributionIter, SnapshotIter, TemporalQuery};
pub use metrics::QueryMetrics;
