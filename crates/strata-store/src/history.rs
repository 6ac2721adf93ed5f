//! The [`EntityHistory`] versioned entity.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;

use strata_core::{EntityKey, EntityVersion, GeoBounds, Payload, Timestamp};

use crate::error::{HistoryError, SnapshotError};

/// The full version history of one OSM object plus the closure of every
/// sub-entity it ever referenced.
///
/// The member closure is the union over *all* versions: a node dropped
/// from a way in version 3 stays in the closure so version 2 remains
/// reconstructable. Each member is itself a full `EntityHistory` behind
/// `Arc` — sub-entities are shared between parents, never duplicated.
///
/// Built once (at ingestion into a grid cell) and immutable afterwards;
/// appending a version means building a replacement history, which is the
/// ingestion pipeline's job, not ours.
#[derive(Clone, Debug)]
pub struct EntityHistory {
    key: EntityKey,
    /// Versions ordered by strictly increasing version number.
    versions: Vec<EntityVersion>,
    /// Every sub-entity ever referenced, keyed by identity. Insertion
    /// order is preserved so iteration is deterministic.
    members: IndexMap<EntityKey, Arc<EntityHistory>>,
    /// Aggregate extent over all versions and all member histories.
    bounds: GeoBounds,
}

impl EntityHistory {
    /// Build a history from a batch of versions and the member closure.
    ///
    /// Validates the structural invariants the rest of the workspace
    /// relies on: a non-empty chain, one object per history, strictly
    /// increasing version numbers, non-decreasing timestamps, and
    /// payloads matching the object kind.
    ///
    /// The member list may contain more histories than the versions
    /// reference (a superset closure is fine); sufficiency for
    /// reconstruction is the ingestion pipeline's contract.
    pub fn from_versions(
        versions: Vec<EntityVersion>,
        members: Vec<Arc<EntityHistory>>,
    ) -> Result<Self, HistoryError> {
        let first = versions.first().ok_or(HistoryError::EmptyHistory)?;
        let key = first.key;

        for pair in versions.windows(2) {
            if pair[1].version <= pair[0].version {
                return Err(HistoryError::NonMonotonicVersion {
                    key,
                    version: pair[1].version,
                });
            }
            if pair[1].timestamp < pair[0].timestamp {
                return Err(HistoryError::NonMonotonicTimestamp {
                    key,
                    timestamp: pair[1].timestamp,
                });
            }
        }
        for v in &versions {
            if v.key != key {
                return Err(HistoryError::KeyMismatch {
                    expected: key,
                    found: v.key,
                });
            }
            if v.payload.kind() != key.kind {
                return Err(HistoryError::PayloadKindMismatch {
                    key,
                    found: v.payload.kind(),
                });
            }
        }

        let members: IndexMap<EntityKey, Arc<EntityHistory>> =
            members.into_iter().map(|m| (m.key(), m)).collect();

        let mut bounds = GeoBounds::EMPTY;
        for v in &versions {
            if let Payload::Node { coord: Some(c) } = &v.payload {
                bounds.expand_to(*c);
            }
        }
        for m in members.values() {
            bounds = bounds.union(&m.bounds);
        }

        Ok(Self {
            key,
            versions,
            members,
            bounds,
        })
    }

    /// Identity of the object this history describes.
    pub fn key(&self) -> EntityKey {
        self.key
    }

    /// All versions, oldest first.
    pub fn versions(&self) -> &[EntityVersion] {
        &self.versions
    }

    /// The oldest version.
    pub fn first(&self) -> &EntityVersion {
        &self.versions[0]
    }

    /// The newest version.
    pub fn last(&self) -> &EntityVersion {
        &self.versions[self.versions.len() - 1]
    }

    /// Aggregate historical extent of this object and its members.
    ///
    /// Empty (in the [`GeoBounds::is_empty`] sense) for objects that
    /// never had a located version, e.g. a relation of deleted nodes.
    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    /// Sub-entity histories in closure insertion order.
    pub fn members(&self) -> impl Iterator<Item = &Arc<EntityHistory>> {
        self.members.values()
    }

    /// Look up one sub-entity history in the closure.
    pub fn member(&self, key: EntityKey) -> Option<&Arc<EntityHistory>> {
        self.members.get(&key)
    }

    /// The version active at `t`: greatest version timestamp ≤ `t`.
    ///
    /// Instants at or after the last version return the last version
    /// unchanged — history is frozen forward, a deleted object stays
    /// deleted and a live one keeps its final state.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::PrecedesHistory`] if `t` lies before the first
    /// version; the object did not exist yet and there is nothing
    /// truthful to return.
    pub fn version_at(&self, t: Timestamp) -> Result<&EntityVersion, SnapshotError> {
        self.index_at(t).map(|i| &self.versions[i])
    }

    /// Like [`version_at`](Self::version_at) but returns the index into
    /// [`versions`](Self::versions).
    pub fn index_at(&self, t: Timestamp) -> Result<usize, SnapshotError> {
        let n = self.versions.partition_point(|v| v.timestamp <= t);
        if n == 0 {
            return Err(SnapshotError::PrecedesHistory {
                key: self.key,
                requested: t,
                first: self.versions[0].timestamp,
            });
        }
        Ok(n - 1)
    }

    /// Resolve one referenced sub-entity's snapshot at `t`.
    ///
    /// Returns `None` when the key is not in the closure *or* when the
    /// sub-entity's history starts after `t`: either way the member does
    /// not exist at that instant, and callers treat that as "absent",
    /// never as an error. Upstream ingestion may simply not have the
    /// object yet, and a referencing entity must stay reconstructable
    /// regardless.
    pub fn member_version_at(&self, key: EntityKey, t: Timestamp) -> Option<&EntityVersion> {
        self.members.get(&key)?.version_at(t).ok()
    }

    /// Resolve every member reference of the snapshot at `t`, in member
    /// order, skipping references that do not resolve.
    ///
    /// Duplicated references (a closed way names its first node twice)
    /// are preserved. For nodes the result is always empty.
    ///
    /// # Errors
    ///
    /// Fails only when `t` precedes *this* object's history; missing
    /// members are skipped, not reported.
    pub fn members_at(
        &self,
        t: Timestamp,
    ) -> Result<Vec<(EntityKey, &EntityVersion)>, SnapshotError> {
        let snapshot = self.version_at(t)?;
        let refs: Vec<EntityKey> = match &snapshot.payload {
            Payload::Node { .. } => Vec::new(),
            Payload::Way { nodes } => nodes.iter().map(|n| EntityKey::from(*n)).collect(),
            Payload::Relation { members } => members.iter().map(|m| m.key).collect(),
        };
        Ok(refs
            .into_iter()
            .filter_map(|key| self.member_version_at(key, t).map(|v| (key, v)))
            .collect())
    }

    /// Every instant at which this object — or anything it ever
    /// referenced, recursively — gained a version. Sorted ascending,
    /// deduplicated.
    ///
    /// This is the instant axis of contribution queries: between two
    /// consecutive entries nothing about the reconstructed object can
    /// have changed.
    pub fn change_timestamps(&self) -> Vec<Timestamp> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.collect_change_timestamps(&mut out, &mut seen);
        out.sort_unstable();
        out.dedup();
        out
    }

    fn collect_change_timestamps(&self, out: &mut Vec<Timestamp>, seen: &mut HashSet<EntityKey>) {
        if !seen.insert(self.key) {
            return;
        }
        out.extend(self.versions.iter().map(|v| v.timestamp));
        for m in self.members.values() {
            m.collect_change_timestamps(out, seen);
        }
    }
}
