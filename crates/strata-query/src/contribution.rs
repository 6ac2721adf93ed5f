//! Result entry types and the change-kind bitset.

use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

use geo_types::Geometry;
use strata_core::{ChangesetId, EntityVersion, Timestamp};
use strata_geom::ClipShape;
use strata_store::EntityHistory;

/// One way an entity changed between two consecutive instants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    /// Absent before, present now.
    Creation,
    /// Present before, absent now.
    Deletion,
    /// Present on both sides with differing tag sets.
    TagChange,
    /// Present on both sides with differing *clipped* geometry.
    GeometryChange,
}

impl ChangeKind {
    fn bit(self) -> u8 {
        match self {
            Self::Creation => 1 << 0,
            Self::Deletion => 1 << 1,
            Self::TagChange => 1 << 2,
            Self::GeometryChange => 1 << 3,
        }
    }

    /// All kinds, in bit order.
    pub const ALL: [ChangeKind; 4] = [
        Self::Creation,
        Self::Deletion,
        Self::TagChange,
        Self::GeometryChange,
    ];
}

/// A set of [`ChangeKind`]s as a small bitset.
///
/// Creation and deletion are mutually exclusive with every other kind;
/// tag and geometry changes may co-occur. The classifier upholds that —
/// the set itself is just bits.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeKinds {
    bits: u8,
}

impl ChangeKinds {
    /// The empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Insert one kind.
    pub fn insert(&mut self, kind: ChangeKind) {
        self.bits |= kind.bit();
    }

    /// Set membership test.
    pub fn contains(&self, kind: ChangeKind) -> bool {
        self.bits & kind.bit() != 0
    }

    /// True when no kind is set.
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterate the kinds present, in bit order.
    pub fn iter(&self) -> impl Iterator<Item = ChangeKind> + '_ {
        ChangeKind::ALL.into_iter().filter(|k| self.contains(*k))
    }
}

impl fmt::Debug for ChangeKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<ChangeKind> for ChangeKinds {
    fn from_iter<I: IntoIterator<Item = ChangeKind>>(iter: I) -> Self {
        let mut kinds = Self::empty();
        for k in iter {
            kinds.insert(k);
        }
        kinds
    }
}

/// Geometry state carried by an entry for one side (before/after) of a
/// change: the unclipped reconstruction, plus a call-once cell for its
/// clipped form.
///
/// The unclipped geometry always exists when the side was present — it
/// was needed to decide presence in the first place. The clipped form is
/// computed at most once: either by the classifier (when it had to
/// compare) or on first access, whichever comes first.
#[derive(Debug)]
pub(crate) struct GeomSlot {
    pub unclipped: Option<Arc<Geometry<f64>>>,
    pub clipped: OnceCell<Option<Geometry<f64>>>,
}

impl GeomSlot {
    pub(crate) fn absent() -> Self {
        Self {
            unclipped: None,
            clipped: OnceCell::new(),
        }
    }

    pub(crate) fn present(unclipped: Arc<Geometry<f64>>) -> Self {
        Self {
            unclipped: Some(unclipped),
            clipped: OnceCell::new(),
        }
    }

    fn clipped(&self, clip: &ClipShape) -> Option<&Geometry<f64>> {
        self.clipped
            .get_or_init(|| self.unclipped.as_ref().map(|g| clip.clip(g)))
            .as_ref()
    }
}

/// One change of one entity at one instant, as yielded by
/// [`ContributionIter`](crate::ContributionIter).
///
/// Geometries are computed lazily and at most once; inspecting only
/// [`kinds`](Self::kinds) never builds a polygon that the classifier did
/// not already need.
#[derive(Debug)]
pub struct Contribution {
    pub(crate) entity: Arc<EntityHistory>,
    pub(crate) timestamp: Timestamp,
    pub(crate) changeset: ChangesetId,
    pub(crate) kinds: ChangeKinds,
    /// Version index of the snapshot after the change. For deletions
    /// this is the tombstone version when the entity's own history
    /// produced one, `None` when a filter or the spatial window made
    /// the candidate absent.
    pub(crate) after: Option<usize>,
    /// Version index of the snapshot before the change.
    pub(crate) before: Option<usize>,
    pub(crate) geom_after: GeomSlot,
    pub(crate) geom_before: GeomSlot,
    pub(crate) clip: Arc<ClipShape>,
    pub(crate) include_unclipped: bool,
}

impl Contribution {
    /// The instant of the change.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Changeset of the underlying version change that produced this
    /// instant. When several referenced entities changed at the exact
    /// same instant, the one with the smallest key (node < way <
    /// relation, then id) is reported.
    pub fn changeset(&self) -> ChangesetId {
        self.changeset
    }

    /// How the entity changed at this instant.
    pub fn kinds(&self) -> ChangeKinds {
        self.kinds
    }

    /// The entity this contribution belongs to.
    pub fn entity(&self) -> &Arc<EntityHistory> {
        &self.entity
    }

    /// Snapshot after the change. `None` only for deletions caused by
    /// the spatial window or the snapshot filter; a deletion in the
    /// entity's own history carries the tombstone version.
    pub fn snapshot(&self) -> Option<&EntityVersion> {
        self.after.map(|i| &self.entity.versions()[i])
    }

    /// Snapshot before the change, when one was present.
    pub fn previous_snapshot(&self) -> Option<&EntityVersion> {
        self.before.map(|i| &self.entity.versions()[i])
    }

    /// Clipped geometry after the change. Computed on first access.
    pub fn geometry(&self) -> Option<&Geometry<f64>> {
        self.geom_after.clipped(&self.clip)
    }

    /// Clipped geometry before the change. Computed on first access.
    pub fn previous_geometry(&self) -> Option<&Geometry<f64>> {
        self.geom_before.clipped(&self.clip)
    }

    /// Unclipped geometry after the change. `None` unless the query
    /// requested unclipped output.
    pub fn unclipped_geometry(&self) -> Option<&Geometry<f64>> {
        if !self.include_unclipped {
            return None;
        }
        self.geom_after.unclipped.as_deref()
    }

    /// Unclipped geometry before the change. `None` unless the query
    /// requested unclipped output.
    pub fn unclipped_previous_geometry(&self) -> Option<&Geometry<f64>> {
        if !self.include_unclipped {
            return None;
        }
        self.geom_before.unclipped.as_deref()
    }
}

/// The reconstructed state of one entity at one requested instant, as
/// yielded by [`SnapshotIter`](crate::SnapshotIter).
#[derive(Debug)]
pub struct SnapshotEntry {
    pub(crate) entity: Arc<EntityHistory>,
    pub(crate) timestamp: Timestamp,
    pub(crate) version_idx: usize,
    pub(crate) geom: GeomSlot,
    pub(crate) clip: Arc<ClipShape>,
    pub(crate) include_unclipped: bool,
}

impl SnapshotEntry {
    /// The instant this entry reconstructs.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// The entity this entry belongs to.
    pub fn entity(&self) -> &Arc<EntityHistory> {
        &self.entity
    }

    /// The snapshot active at the instant. Always present — absent
    /// candidates are simply not emitted in snapshot mode.
    pub fn snapshot(&self) -> &EntityVersion {
        &self.entity.versions()[self.version_idx]
    }

    /// Clipped geometry at the instant. Computed on first access.
    pub fn geometry(&self) -> Option<&Geometry<f64>> {
        self.geom.clipped(&self.clip)
    }

    /// Unclipped geometry at the instant. `None` unless the query
    /// requested unclipped output.
    pub fn unclipped_geometry(&self) -> Option<&Geometry<f64>> {
        if !self.include_unclipped {
            return None;
        }
        self.geom.unclipped.as_deref()
    }
}
