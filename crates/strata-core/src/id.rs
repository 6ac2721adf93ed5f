//! Strongly-typed identifiers for OSM objects and their metadata.

use std::fmt;

/// Identifies a node. Node ids are assigned by the upstream OSM database
/// and are positive in well-formed data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NodeId {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

/// Identifies a way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WayId(pub i64);

impl fmt::Display for WayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for WayId {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

/// Identifies a relation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationId(pub i64);

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RelationId {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

/// Identifies the changeset a version was uploaded in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChangesetId(pub u64);

impl fmt::Display for ChangesetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChangesetId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies the user who authored a version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for UserId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Integer handle for a relation-member role string.
///
/// Role strings ("outer", "inner", "stop", ...) are interned by the
/// external tag dictionary; the core only ever compares the handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoleId(pub u32);

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RoleId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// The three OSM object kinds.
///
/// The derived `Ord` (node < way < relation) is load-bearing: it is the
/// primary key of the deterministic tie-break applied when several
/// entities change at the same instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OsmKind {
    /// A point feature with a coordinate.
    Node,
    /// An ordered sequence of node references.
    Way,
    /// An ordered sequence of typed, role-carrying member references.
    Relation,
}

impl fmt::Display for OsmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => write!(f, "node"),
            Self::Way => write!(f, "way"),
            Self::Relation => write!(f, "relation"),
        }
    }
}

/// Fully-qualified identity of one OSM object: kind plus id.
///
/// Ids are only unique within a kind, so every cross-entity map in the
/// workspace is keyed by `EntityKey`, never by the bare id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    /// Object kind.
    pub kind: OsmKind,
    /// Object id within the kind.
    pub id: i64,
}

impl EntityKey {
    /// Key for a node.
    pub fn node(id: i64) -> Self {
        Self {
            kind: OsmKind::Node,
            id,
        }
    }

    /// Key for a way.
    pub fn way(id: i64) -> Self {
        Self {
            kind: OsmKind::Way,
            id,
        }
    }

    /// Key for a relation.
    pub fn relation(id: i64) -> Self {
        Self {
            kind: OsmKind::Relation,
            id,
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

impl From<NodeId> for EntityKey {
    fn from(id: NodeId) -> Self {
        Self::node(id.0)
    }
}

impl From<WayId> for EntityKey {
    fn from(id: WayId) -> Self {
        Self::way(id.0)
    }
}

impl From<RelationId> for EntityKey {
    fn from(id: RelationId) -> Self {
        Self::relation(id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_key_ordering_puts_kind_first() {
        // node < way < relation regardless of id magnitude.
        assert!(EntityKey::node(i64::MAX) < EntityKey::way(1));
        assert!(EntityKey::way(i64::MAX) < EntityKey::relation(1));
        assert!(EntityKey::node(3) < EntityKey::node(4));
    }

    #[test]
    fn entity_key_display() {
        assert_eq!(EntityKey::way(42).to_string(), "way/42");
        assert_eq!(EntityKey::node(7).to_string(), "node/7");
    }
}
