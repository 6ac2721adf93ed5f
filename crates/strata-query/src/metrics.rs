//! Per-iterator work counters.

/// Counters describing how much work one iterator did.
///
/// Updated as the walk proceeds; read them via
/// [`ContributionIter::metrics`](crate::ContributionIter::metrics) or
/// [`SnapshotIter::metrics`](crate::SnapshotIter::metrics) at any point,
/// typically after exhaustion. Useful for verifying that the cheap
/// filters actually reject before reconstruction happens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryMetrics {
    /// Entities pulled from the source.
    pub entities_scanned: u64,
    /// Entities rejected by the entity pre-filter.
    pub entities_skipped_by_filter: u64,
    /// Entities rejected by the aggregate-bounds fast check.
    pub entities_skipped_by_bounds: u64,
    /// Instants evaluated into candidates.
    pub instants_evaluated: u64,
    /// Unclipped geometries materialized.
    pub geometries_built: u64,
    /// Result entries handed to the consumer.
    pub entries_emitted: u64,
}
