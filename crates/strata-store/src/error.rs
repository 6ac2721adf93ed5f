//! Error types for history construction and snapshot resolution.

use std::fmt;

use strata_core::{EntityKey, OsmKind, Timestamp};

/// Structural defects detected while building an [`EntityHistory`](crate::EntityHistory).
///
/// These indicate a broken ingestion pipeline, not bad user input, so
/// construction refuses rather than repairing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryError {
    /// The version list was empty.
    EmptyHistory,
    /// A version belongs to a different object than the rest.
    KeyMismatch {
        /// Key of the first version.
        expected: EntityKey,
        /// The offending key.
        found: EntityKey,
    },
    /// Version numbers are not strictly increasing.
    NonMonotonicVersion {
        /// Object being built.
        key: EntityKey,
        /// Version number that failed to increase past its predecessor.
        version: u32,
    },
    /// Version timestamps decrease somewhere in the chain.
    NonMonotonicTimestamp {
        /// Object being built.
        key: EntityKey,
        /// Timestamp that precedes its predecessor's.
        timestamp: Timestamp,
    },
    /// A version's payload kind disagrees with the object's kind.
    PayloadKindMismatch {
        /// Object being built.
        key: EntityKey,
        /// Kind found in the payload.
        found: OsmKind,
    },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyHistory => write!(f, "history has no versions"),
            Self::KeyMismatch { expected, found } => {
                write!(f, "version for {found} in history of {expected}")
            }
            Self::NonMonotonicVersion { key, version } => {
                write!(f, "{key}: version {version} does not increase")
            }
            Self::NonMonotonicTimestamp { key, timestamp } => {
                write!(f, "{key}: timestamp {timestamp} decreases")
            }
            Self::PayloadKindMismatch { key, found } => {
                write!(f, "{key}: payload is a {found}")
            }
        }
    }
}

impl std::error::Error for HistoryError {}

/// Errors from resolving a snapshot against a history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    /// The requested instant lies before the object's first version.
    ///
    /// This is a caller contract violation: there is no state to report,
    /// and silently returning the first version would claim the object
    /// existed when it did not.
    PrecedesHistory {
        /// Object queried.
        key: EntityKey,
        /// Instant requested.
        requested: Timestamp,
        /// Instant of the first version.
        first: Timestamp,
    },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrecedesHistory {
                key,
                requested,
                first,
            } => {
                write!(
                    f,
                    "{key}: instant {requested} precedes first version at {first}"
                )
            }
        }
    }
}

impl std::error::Error for SnapshotError {}
