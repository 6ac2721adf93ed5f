//! One historical revision of an OSM object.

use smallvec::SmallVec;

use crate::coord::LonLat;
use crate::id::{ChangesetId, EntityKey, NodeId, OsmKind, RoleId, UserId};
use crate::tag::TagList;
use crate::time::Timestamp;

/// A member reference inside a relation version.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelMember {
    /// Which entity is referenced.
    pub key: EntityKey,
    /// Interned role handle ("outer", "inner", "stop", ...).
    pub role: RoleId,
}

impl RelMember {
    /// Construct a member reference.
    pub fn new(key: EntityKey, role: RoleId) -> Self {
        Self { key, role }
    }
}

/// Kind-specific payload of a version, dispatched by pattern matching.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// A node's coordinate. `None` when the version is deleted — a
    /// deleted node has no location.
    Node {
        /// Position at this version, absent on deleted versions.
        coord: Option<LonLat>,
    },
    /// A way's ordered node references. Ways carry no per-member roles.
    Way {
        /// Referenced nodes in drawing order.
        nodes: SmallVec<[NodeId; 8]>,
    },
    /// A relation's ordered, typed, role-carrying member references.
    Relation {
        /// Members in declaration order.
        members: Vec<RelMember>,
    },
}

impl Payload {
    /// The object kind this payload belongs to.
    pub fn kind(&self) -> OsmKind {
        match self {
            Self::Node { .. } => OsmKind::Node,
            Self::Way { .. } => OsmKind::Way,
            Self::Relation { .. } => OsmKind::Relation,
        }
    }
}

/// One historical revision of an OSM object.
///
/// Deletion is an explicit `visible: false` version, not an id sentinel;
/// a deleted version still records who deleted it and when, which is what
/// the contribution classifier reports for deletions.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityVersion {
    /// Identity of the object this revision belongs to.
    pub key: EntityKey,
    /// Version number, strictly increasing per object.
    pub version: u32,
    /// When this revision became current.
    pub timestamp: Timestamp,
    /// Changeset the revision was uploaded in.
    pub changeset: ChangesetId,
    /// Author of the revision.
    pub user: UserId,
    /// False for deleted revisions.
    pub visible: bool,
    /// Tags as opaque dictionary handles.
    pub tags: TagList,
    /// Kind-specific data.
    pub payload: Payload,
}

impl EntityVersion {
    /// The node coordinate, if this is a visible node version.
    pub fn coord(&self) -> Option<LonLat> {
        match &self.payload {
            Payload::Node { coord } if self.visible => *coord,
            _ => None,
        }
    }

    /// The way's node references, empty slice for other kinds.
    pub fn way_nodes(&self) -> &[NodeId] {
        match &self.payload {
            Payload::Way { nodes } => nodes,
            _ => &[],
        }
    }

    /// The relation's members, empty slice for other kinds.
    pub fn relation_members(&self) -> &[RelMember] {
        match &self.payload {
            Payload::Relation { members } => members,
            _ => &[],
        }
    }
}
