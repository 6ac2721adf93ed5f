//! Per-instant candidate evaluation.

use std::sync::Arc;

use geo_types::Geometry;
use strata_core::Timestamp;
use strata_geom::{geometry_at, AreaPolicy, ClipShape};
use strata_store::EntityHistory;

use crate::config::SnapshotFilter;
use crate::metrics::QueryMetrics;

/// The state of one entity at one instant, as far as the query is
/// concerned.
///
/// "Present" means: a visible version exists, it passes the snapshot
/// filter, and its unclipped geometry touches the spatial window.
/// Everything else is "absent" — including instants where a version
/// exists but fails a filter.
#[derive(Debug)]
pub(crate) enum Candidate {
    /// No matching state at this instant.
    Absent {
        /// Index of the invisible (tombstone) version when the entity's
        /// own history says it is deleted here; `None` when the entity
        /// never existed yet or a filter made it absent.
        tombstone: Option<usize>,
    },
    /// Matching state, with its unclipped geometry.
    Present {
        /// Index of the snapshot version.
        version_idx: usize,
        /// Unclipped reconstruction, shared into result entries.
        unclipped: Arc<Geometry<f64>>,
    },
}

impl Candidate {
    pub(crate) fn is_present(&self) -> bool {
        matches!(self, Candidate::Present { .. })
    }
}

/// Evaluate one entity at one instant.
pub(crate) fn evaluate(
    entity: &EntityHistory,
    t: Timestamp,
    policy: &dyn AreaPolicy,
    clip: &ClipShape,
    snapshot_filter: Option<&SnapshotFilter>,
    metrics: &mut QueryMetrics,
) -> Candidate {
    metrics.instants_evaluated += 1;

    // Before the entity's first version there is nothing, which in a
    // query walk is an ordinary absence, not an error.
    let Ok(idx) = entity.index_at(t) else {
        return Candidate::Absent { tombstone: None };
    };
    let version = &entity.versions()[idx];
    if !version.visible {
        return Candidate::Absent {
            tombstone: Some(idx),
        };
    }
    if let Some(filter) = snapshot_filter {
        if !filter(version) {
            return Candidate::Absent { tombstone: None };
        }
    }

    let geometry = match geometry_at(entity, t, policy) {
        Ok(g) => g,
        // Unreachable given index_at succeeded; treat as absent rather
        // than crashing a long walk.
        Err(_) => return Candidate::Absent { tombstone: None },
    };
    metrics.geometries_built += 1;

    if !clip.intersects(&geometry) {
        return Candidate::Absent { tombstone: None };
    }
    Candidate::Present {
        version_idx: idx,
        unclipped: Arc::new(geometry),
    }
}
