//! Versioned entity histories and snapshot resolution.
//!
//! An [`EntityHistory`] owns the full, ordered version chain of one OSM
//! object together with the histories of every sub-entity it ever
//! referenced, so any past state of the object — including the positions
//! of its member nodes at that moment — can be reconstructed without
//! going back to storage. Histories are immutable once built and shared
//! behind `Arc`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod error;
mod history;

pub use error::{HistoryError, SnapshotError};
pub use history::EntityHistory;
