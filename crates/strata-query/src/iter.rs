//! The [`TemporalQuery`] and its two result streams.

use std::collections::HashSet;
use std::sync::Arc;

use strata_core::{tags_equal, ChangesetId, EntityKey, Timestamp};
use strata_geom::{AreaPolicy, ClipShape};
use strata_store::EntityHistory;

use crate::candidate::{evaluate, Candidate};
use crate::config::{QueryConfig, Timeline};
use crate::contribution::{ChangeKind, ChangeKinds, Contribution, GeomSlot, SnapshotEntry};
use crate::error::QueryError;
use crate::metrics::QueryMetrics;

/// A validated temporal/spatial query, ready to iterate entity sources.
///
/// Construction validates the configuration and prepares the clip
/// window once; the query itself is immutable and can drive any number
/// of iterators, including concurrently from several worker threads
/// (each iterator is single-threaded and owned by its worker).
pub struct TemporalQuery {
    config: QueryConfig,
    clip: Arc<ClipShape>,
    policy: Arc<dyn AreaPolicy + Send + Sync>,
}

impl TemporalQuery {
    /// Validate `config` and prepare the query.
    ///
    /// # Errors
    ///
    /// Any [`QueryError`] from [`QueryConfig::validate`] — malformed
    /// bounds, an empty or inverted timeline, or a clip polygon the
    /// bounds do not cover.
    pub fn new(
        config: QueryConfig,
        policy: Arc<dyn AreaPolicy + Send + Sync>,
    ) -> Result<Self, QueryError> {
        config.validate()?;
        let clip = match &config.clip {
            Some(polygon) => ClipShape::with_polygon(config.bounds, polygon.clone()),
            None => ClipShape::from_bounds(config.bounds),
        };
        Ok(Self {
            config,
            clip: Arc::new(clip),
            policy,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Iterate every change of every matching entity within the
    /// configured interval, oldest first per entity.
    ///
    /// The stream is lazy, finite, and single-pass; nothing beyond the
    /// entry being pulled is computed. Rebuild the iterator to walk the
    /// source again.
    ///
    /// # Errors
    ///
    /// [`QueryError::IntervalRequired`] when the timeline is an
    /// explicit instant list.
    pub fn contributions<I>(
        &self,
        entities: I,
    ) -> Result<ContributionIter<'_, I::IntoIter>, QueryError>
    where
        I: IntoIterator<Item = Arc<EntityHistory>>,
    {
        let Timeline::Between { start, end } = self.config.timeline else {
            return Err(QueryError::IntervalRequired);
        };
        Ok(ContributionIter {
            query: self,
            entities: entities.into_iter(),
            start,
            end,
            walk: None,
            metrics: QueryMetrics::default(),
        })
    }

    /// Reconstruct every matching entity at each configured instant.
    ///
    /// Instants are visited in ascending order per entity; instants at
    /// which an entity is absent produce nothing.
    ///
    /// # Errors
    ///
    /// [`QueryError::InstantsRequired`] when the timeline is an
    /// interval.
    pub fn snapshots<I>(&self, entities: I) -> Result<SnapshotIter<'_, I::IntoIter>, QueryError>
    where
        I: IntoIterator<Item = Arc<EntityHistory>>,
    {
        let Timeline::At(ref instants) = self.config.timeline else {
            return Err(QueryError::InstantsRequired);
        };
        let mut instants = instants.clone();
        instants.sort_unstable();
        instants.dedup();
        Ok(SnapshotIter {
            query: self,
            entities: entities.into_iter(),
            instants,
            walk: None,
            metrics: QueryMetrics::default(),
        })
    }

    /// Entity-level pre-filtering shared by both modes. Returns false
    /// when the entity cannot contribute anything.
    fn admit(&self, entity: &EntityHistory, metrics: &mut QueryMetrics) -> bool {
        metrics.entities_scanned += 1;
        if let Some(filter) = &self.config.entity_filter {
            if !filter(entity) {
                metrics.entities_skipped_by_filter += 1;
                return false;
            }
        }
        let bounds = entity.bounds();
        if bounds.is_empty() || !bounds.intersects(&self.config.bounds) {
            metrics.entities_skipped_by_bounds += 1;
            return false;
        }
        true
    }
}

impl std::fmt::Debug for TemporalQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemporalQuery")
            .field("config", &self.config)
            .finish()
    }
}

// ── contribution mode ───────────────────────────────────────────

/// Per-entity walk state of a contribution iteration.
struct ContributionWalk {
    entity: Arc<EntityHistory>,
    /// Change instants inside `[start, end)`.
    instants: Vec<Timestamp>,
    pos: usize,
    prev: Candidate,
}

/// Lazy stream of [`Contribution`] entries. Single-pass; see
/// [`TemporalQuery::contributions`].
pub struct ContributionIter<'q, I> {
    query: &'q TemporalQuery,
    entities: I,
    start: Timestamp,
    end: Timestamp,
    walk: Option<ContributionWalk>,
    metrics: QueryMetrics,
}

impl<I> ContributionIter<'_, I> {
    /// Work counters accumulated so far.
    pub fn metrics(&self) -> QueryMetrics {
        self.metrics
    }
}

impl<I> Iterator for ContributionIter<'_, I>
where
    I: Iterator<Item = Arc<EntityHistory>>,
{
    type Item = Contribution;

    fn next(&mut self) -> Option<Contribution> {
        loop {
            if let Some(walk) = &mut self.walk {
                while walk.pos < walk.instants.len() {
                    let t = walk.instants[walk.pos];
                    walk.pos += 1;
                    let current = evaluate(
                        &walk.entity,
                        t,
                        self.query.policy.as_ref(),
                        &self.query.clip,
                        self.query.config.snapshot_filter.as_ref(),
                        &mut self.metrics,
                    );
                    let entry = classify(
                        self.query,
                        &walk.entity,
                        t,
                        &walk.prev,
                        &current,
                    );
                    walk.prev = current;
                    if let Some(entry) = entry {
                        self.metrics.entries_emitted += 1;
                        return Some(entry);
                    }
                }
                self.walk = None;
            }

            let entity = self.entities.next()?;
            if !self.query.admit(&entity, &mut self.metrics) {
                continue;
            }

            let all = entity.change_timestamps();
            let instants: Vec<Timestamp> = all
                .iter()
                .copied()
                .filter(|t| *t >= self.start && *t < self.end)
                .collect();
            if instants.is_empty() {
                continue;
            }
            // The predecessor state for the first in-window instant is
            // whatever the entity looked like at its last change before
            // the window.
            let prev = match all.iter().rev().find(|t| **t < instants[0]) {
                Some(before) => evaluate(
                    &entity,
                    *before,
                    self.query.policy.as_ref(),
                    &self.query.clip,
                    self.query.config.snapshot_filter.as_ref(),
                    &mut self.metrics,
                ),
                None => Candidate::Absent { tombstone: None },
            };
            self.walk = Some(ContributionWalk {
                entity,
                instants,
                pos: 0,
                prev,
            });
        }
    }
}

/// Compare two consecutive candidates and build the entry, if any.
fn classify(
    query: &TemporalQuery,
    entity: &Arc<EntityHistory>,
    t: Timestamp,
    prev: &Candidate,
    current: &Candidate,
) -> Option<Contribution> {
    let mut kinds = ChangeKinds::empty();
    let mut geom_before = GeomSlot::absent();
    let mut geom_after = GeomSlot::absent();
    let mut before = None;
    let mut after = None;

    match (prev, current) {
        (Candidate::Absent { .. }, Candidate::Absent { .. }) => return None,
        (Candidate::Absent { .. }, Candidate::Present { version_idx, unclipped }) => {
            kinds.insert(ChangeKind::Creation);
            after = Some(*version_idx);
            geom_after = GeomSlot::present(Arc::clone(unclipped));
        }
        (Candidate::Present { version_idx, unclipped }, Candidate::Absent { tombstone }) => {
            kinds.insert(ChangeKind::Deletion);
            before = Some(*version_idx);
            after = *tombstone;
            geom_before = GeomSlot::present(Arc::clone(unclipped));
        }
        (
            Candidate::Present {
                version_idx: prev_idx,
                unclipped: prev_geom,
            },
            Candidate::Present {
                version_idx: cur_idx,
                unclipped: cur_geom,
            },
        ) => {
            before = Some(*prev_idx);
            after = Some(*cur_idx);
            geom_before = GeomSlot::present(Arc::clone(prev_geom));
            geom_after = GeomSlot::present(Arc::clone(cur_geom));

            let versions = entity.versions();
            if !tags_equal(&versions[*prev_idx].tags, &versions[*cur_idx].tags) {
                kinds.insert(ChangeKind::TagChange);
            }

            // Equal unclipped geometry cannot differ clipped; only when
            // the unclipped forms diverge is the clip worth computing.
            if prev_geom != cur_geom {
                let clipped_prev = query.clip.clip(prev_geom);
                let clipped_cur = query.clip.clip(cur_geom);
                if clipped_prev != clipped_cur {
                    kinds.insert(ChangeKind::GeometryChange);
                }
                // Either way the work is done once; keep it for the
                // entry's accessors.
                let _ = geom_before.clipped.set(Some(clipped_prev));
                let _ = geom_after.clipped.set(Some(clipped_cur));
            }
        }
    }

    if kinds.is_empty() {
        return None;
    }

    let changeset = triggering_changeset(entity, t)
        .unwrap_or_else(|| fallback_changeset(entity, before, after));

    Some(Contribution {
        entity: Arc::clone(entity),
        timestamp: t,
        changeset,
        kinds,
        after,
        before,
        geom_after,
        geom_before,
        clip: Arc::clone(&query.clip),
        include_unclipped: query.config.include_unclipped,
    })
}

/// Changeset of the version change that produced instant `t`: walk the
/// entity and its closure for versions stamped exactly `t` and take the
/// one with the smallest key. Deterministic regardless of closure
/// iteration order.
fn triggering_changeset(entity: &EntityHistory, t: Timestamp) -> Option<ChangesetId> {
    fn visit(
        entity: &EntityHistory,
        t: Timestamp,
        best: &mut Option<(EntityKey, ChangesetId)>,
        seen: &mut HashSet<EntityKey>,
    ) {
        if !seen.insert(entity.key()) {
            return;
        }
        if let Ok(v) = entity.version_at(t) {
            if v.timestamp == t && best.map_or(true, |(key, _)| entity.key() < key) {
                *best = Some((entity.key(), v.changeset));
            }
        }
        for member in entity.members() {
            visit(member, t, best, seen);
        }
    }

    let mut best = None;
    let mut seen = HashSet::new();
    visit(entity, t, &mut best, &mut seen);
    best.map(|(_, changeset)| changeset)
}

/// Last resort when no version is stamped exactly at `t` (possible when
/// an entry's instant came from a filter transition): report the
/// snapshot's own changeset.
fn fallback_changeset(
    entity: &EntityHistory,
    before: Option<usize>,
    after: Option<usize>,
) -> ChangesetId {
    let idx = after.or(before).unwrap_or(0);
    entity.versions()[idx].changeset
}

// ── snapshot mode ───────────────────────────────────────────────

/// Per-entity walk state of a snapshot iteration.
struct SnapshotWalk {
    entity: Arc<EntityHistory>,
    pos: usize,
}

/// Lazy stream of [`SnapshotEntry`] values. Single-pass; see
/// [`TemporalQuery::snapshots`].
pub struct SnapshotIter<'q, I> {
    query: &'q TemporalQuery,
    entities: I,
    /// Sorted, deduplicated instants, shared by every entity.
    instants: Vec<Timestamp>,
    walk: Option<SnapshotWalk>,
    metrics: QueryMetrics,
}

impl<I> SnapshotIter<'_, I> {
    /// Work counters accumulated so far.
    pub fn metrics(&self) -> QueryMetrics {
        self.metrics
    }
}

impl<I> Iterator for SnapshotIter<'_, I>
where
    I: Iterator<Item = Arc<EntityHistory>>,
{
    type Item = SnapshotEntry;

    fn next(&mut self) -> Option<SnapshotEntry> {
        loop {
            if let Some(walk) = &mut self.walk {
                while walk.pos < self.instants.len() {
                    let t = self.instants[walk.pos];
                    walk.pos += 1;
                    let candidate = evaluate(
                        &walk.entity,
                        t,
                        self.query.policy.as_ref(),
                        &self.query.clip,
                        self.query.config.snapshot_filter.as_ref(),
                        &mut self.metrics,
                    );
                    if let Candidate::Present {
                        version_idx,
                        unclipped,
                    } = candidate
                    {
                        self.metrics.entries_emitted += 1;
                        return Some(SnapshotEntry {
                            entity: Arc::clone(&walk.entity),
                            timestamp: t,
                            version_idx,
                            geom: GeomSlot::present(unclipped),
                            clip: Arc::clone(&self.query.clip),
                            include_unclipped: self.query.config.include_unclipped,
                        });
                    }
                }
                self.walk = None;
            }

            let entity = self.entities.next()?;
            if !self.query.admit(&entity, &mut self.metrics) {
                continue;
            }
            self.walk = Some(SnapshotWalk { entity, pos: 0 });
        }
    }
}
