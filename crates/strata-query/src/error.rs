//! Query configuration errors.

use std::fmt;

use strata_core::{GeoBounds, Timestamp};

/// Errors detected during [`QueryConfig::validate()`](crate::QueryConfig::validate)
/// or query construction.
///
/// All of these are caller errors, rejected before any iteration work
/// happens; nothing in this module fails mid-stream.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryError {
    /// A bounding-box edge is non-finite, or min exceeds max.
    InvalidBounds {
        /// The offending box.
        bounds: GeoBounds,
    },
    /// The timestamp list of a [`Timeline::At`](crate::Timeline::At) is empty.
    EmptyTimeline,
    /// A [`Timeline::Between`](crate::Timeline::Between) interval with
    /// `start >= end` selects no instants.
    InvertedInterval {
        /// Interval start (inclusive).
        start: Timestamp,
        /// Interval end (exclusive).
        end: Timestamp,
    },
    /// The clip polygon is not covered by the bounding box, so the box
    /// could not serve as its pre-check.
    ClipOutsideBounds,
    /// `contributions()` needs a `Timeline::Between` interval.
    IntervalRequired,
    /// `snapshots()` needs an explicit `Timeline::At` instant list.
    InstantsRequired,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBounds { bounds } => {
                write!(f, "bounding box {bounds} is not a valid finite box")
            }
            Self::EmptyTimeline => write!(f, "timestamp list is empty"),
            Self::InvertedInterval { start, end } => {
                write!(f, "interval [{start}, {end}) selects no instants")
            }
            Self::ClipOutsideBounds => {
                write!(f, "clip polygon extends outside the bounding box")
            }
            Self::IntervalRequired => {
                write!(f, "contribution queries need an interval timeline")
            }
            Self::InstantsRequired => {
                write!(f, "snapshot queries need an explicit instant list")
            }
        }
    }
}

impl std::error::Error for QueryError {}
