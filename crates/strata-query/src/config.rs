//! Query configuration and validation.

use std::fmt;
use std::sync::Arc;

use geo::BoundingRect;
use geo_types::Polygon;
use strata_core::{EntityVersion, GeoBounds, Timestamp};
use strata_store::EntityHistory;

use crate::error::QueryError;

/// Cheap pre-filter evaluated on the raw entity before any
/// reconstruction. Shared so per-cell worker queries can clone the
/// config without duplicating the closure.
pub type EntityFilter = Arc<dyn Fn(&EntityHistory) -> bool + Send + Sync>;

/// Filter evaluated on a reconstructed snapshot (tag predicates and the
/// like). A snapshot failing it counts as absent at that instant.
pub type SnapshotFilter = Arc<dyn Fn(&EntityVersion) -> bool + Send + Sync>;

/// The time axis of a query.
#[derive(Clone, Debug, PartialEq)]
pub enum Timeline {
    /// Every instant at which something changed, within `[start, end)`.
    /// Contribution mode.
    Between {
        /// First instant considered, inclusive.
        start: Timestamp,
        /// First instant no longer considered, exclusive.
        end: Timestamp,
    },
    /// An explicit list of instants to reconstruct at. Snapshot mode.
    /// Sorted and deduplicated at query construction.
    At(Vec<Timestamp>),
}

/// Immutable configuration of one temporal/spatial query.
///
/// Construct with [`between`](QueryConfig::between) or
/// [`at`](QueryConfig::at) and adjust fields before handing it to
/// [`TemporalQuery::new`](crate::TemporalQuery::new), which validates.
#[derive(Clone)]
pub struct QueryConfig {
    /// Spatial window. Always consulted, also as the cheap pre-check
    /// when a clip polygon is present.
    pub bounds: GeoBounds,
    /// Optional refining clip polygon. Must be covered by `bounds`.
    pub clip: Option<Polygon<f64>>,
    /// The time axis.
    pub timeline: Timeline,
    /// Optional O(1) entity pre-filter.
    pub entity_filter: Option<EntityFilter>,
    /// Optional snapshot filter.
    pub snapshot_filter: Option<SnapshotFilter>,
    /// Also carry unclipped geometries on result entries.
    pub include_unclipped: bool,
}

impl QueryConfig {
    /// Contribution-mode config over `[start, end)` within `bounds`.
    pub fn between(bounds: GeoBounds, start: Timestamp, end: Timestamp) -> Self {
        Self {
            bounds,
            clip: None,
            timeline: Timeline::Between { start, end },
            entity_filter: None,
            snapshot_filter: None,
            include_unclipped: false,
        }
    }

    /// Snapshot-mode config at the given instants within `bounds`.
    pub fn at(bounds: GeoBounds, instants: Vec<Timestamp>) -> Self {
        Self {
            bounds,
            clip: None,
            timeline: Timeline::At(instants),
            entity_filter: None,
            snapshot_filter: None,
            include_unclipped: false,
        }
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), QueryError> {
        // 1. The box must be a real, finite window.
        if !self.bounds.is_valid() {
            return Err(QueryError::InvalidBounds {
                bounds: self.bounds,
            });
        }
        // 2. The timeline must select at least one instant.
        match &self.timeline {
            Timeline::Between { start, end } => {
                if start >= end {
                    return Err(QueryError::InvertedInterval {
                        start: *start,
                        end: *end,
                    });
                }
            }
            Timeline::At(instants) => {
                if instants.is_empty() {
                    return Err(QueryError::EmptyTimeline);
                }
            }
        }
        // 3. A clip polygon must be covered by the box, otherwise the
        //    box pre-check would wrongly discard matches.
        if let Some(clip) = &self.clip {
            let covered = clip.bounding_rect().is_some_and(|r| {
                self.bounds.contains_bounds(&GeoBounds::new(
                    r.min().x,
                    r.min().y,
                    r.max().x,
                    r.max().y,
                ))
            });
            if !covered {
                return Err(QueryError::ClipOutsideBounds);
            }
        }
        Ok(())
    }
}

impl fmt::Debug for QueryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryConfig")
            .field("bounds", &self.bounds)
            .field("clip", &self.clip.is_some())
            .field("timeline", &self.timeline)
            .field("entity_filter", &self.entity_filter.is_some())
            .field("snapshot_filter", &self.snapshot_filter.is_some())
            .field("include_unclipped", &self.include_unclipped)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::LineString;

    fn valid_config() -> QueryConfig {
        QueryConfig::between(
            GeoBounds::new(0.0, 0.0, 10.0, 10.0),
            Timestamp(100),
            Timestamp(200),
        )
    }

    #[test]
    fn validate_valid_config_succeeds() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validate_inverted_interval_fails() {
        let mut cfg = valid_config();
        cfg.timeline = Timeline::Between {
            start: Timestamp(200),
            end: Timestamp(200),
        };
        match cfg.validate() {
            Err(QueryError::InvertedInterval { .. }) => {}
            other => panic!("expected InvertedInterval, got {other:?}"),
        }
    }

    #[test]
    fn validate_empty_instants_fails() {
        let mut cfg = valid_config();
        cfg.timeline = Timeline::At(Vec::new());
        match cfg.validate() {
            Err(QueryError::EmptyTimeline) => {}
            other => panic!("expected EmptyTimeline, got {other:?}"),
        }
    }

    #[test]
    fn validate_bad_bounds_fails() {
        let mut cfg = valid_config();
        cfg.bounds = GeoBounds::new(5.0, 0.0, 1.0, 10.0);
        match cfg.validate() {
            Err(QueryError::InvalidBounds { .. }) => {}
            other => panic!("expected InvalidBounds, got {other:?}"),
        }
    }

    #[test]
    fn validate_clip_outside_bounds_fails() {
        let mut cfg = valid_config();
        // Triangle poking out of the box on the east side.
        cfg.clip = Some(Polygon::new(
            LineString::from(vec![(5.0, 5.0), (15.0, 5.0), (5.0, 8.0), (5.0, 5.0)]),
            Vec::new(),
        ));
        match cfg.validate() {
            Err(QueryError::ClipOutsideBounds) => {}
            other => panic!("expected ClipOutsideBounds, got {other:?}"),
        }
    }

    #[test]
    fn validate_covered_clip_succeeds() {
        let mut cfg = valid_config();
        cfg.clip = Some(Polygon::new(
            LineString::from(vec![(1.0, 1.0), (9.0, 1.0), (1.0, 9.0), (1.0, 1.0)]),
            Vec::new(),
        ));
        assert!(cfg.validate().is_ok());
    }
}
