//! Test utilities and mock types for strata development.
//!
//! Provides fluent history builders ([`node`], [`way`], [`relation`]),
//! a [`MockPolicy`] with fixed area answers, and a [`MockDictionary`]
//! backed by in-memory maps. Versions are numbered 1, 2, 3, ... in the
//! order they are added; each version's changeset defaults to its
//! version number unless set explicitly.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::HashMap;
use std::sync::Arc;

use strata_core::{
    ChangesetId, EntityKey, EntityVersion, LonLat, NodeId, Payload, RelMember, RoleId,
    TagDictionary, TagList, TagPair, Timestamp, UserId,
};
use strata_geom::{AreaPolicy, RingRole};
use strata_store::EntityHistory;

/// Role handle the mocks treat as "outer".
pub const ROLE_OUTER: u32 = 0;
/// Role handle the mocks treat as "inner".
pub const ROLE_INNER: u32 = 1;
/// A role handle the mocks map to `RingRole::Other`.
pub const ROLE_OTHER: u32 = 7;

/// Start building a node history.
pub fn node(id: i64) -> HistoryBuilder {
    HistoryBuilder::new(EntityKey::node(id))
}

/// Start building a way history.
pub fn way(id: i64) -> HistoryBuilder {
    HistoryBuilder::new(EntityKey::way(id))
}

/// Start building a relation history.
pub fn relation(id: i64) -> HistoryBuilder {
    HistoryBuilder::new(EntityKey::relation(id))
}

/// Fluent builder for an [`EntityHistory`] of any kind.
pub struct HistoryBuilder {
    key: EntityKey,
    versions: Vec<EntityVersion>,
    members: Vec<Arc<EntityHistory>>,
}

impl HistoryBuilder {
    fn new(key: EntityKey) -> Self {
        Self {
            key,
            versions: Vec::new(),
            members: Vec::new(),
        }
    }

    fn push(&mut self, t: i64, visible: bool, payload: Payload) {
        let version = self.versions.len() as u32 + 1;
        self.versions.push(EntityVersion {
            key: self.key,
            version,
            timestamp: Timestamp(t),
            changeset: ChangesetId(u64::from(version)),
            user: UserId(1),
            visible,
            tags: TagList::new(),
            payload,
        });
    }

    /// Add a visible node version at `(lon, lat)` degrees.
    pub fn at(mut self, t: i64, lon: f64, lat: f64) -> Self {
        self.push(
            t,
            true,
            Payload::Node {
                coord: Some(LonLat::from_degrees(lon, lat)),
            },
        );
        self
    }

    /// Add a visible way version referencing `nodes`.
    pub fn shaped(mut self, t: i64, nodes: &[i64]) -> Self {
        self.push(
            t,
            true,
            Payload::Way {
                nodes: nodes.iter().map(|&n| NodeId(n)).collect(),
            },
        );
        self
    }

    /// Add a visible relation version with `(key, role)` members.
    pub fn assembled(mut self, t: i64, members: &[(EntityKey, u32)]) -> Self {
        self.push(
            t,
            true,
            Payload::Relation {
                members: members
                    .iter()
                    .map(|&(key, role)| RelMember::new(key, RoleId(role)))
                    .collect(),
            },
        );
        self
    }

    /// Add a deleted version at `t`. The payload is an empty one of the
    /// entity's kind.
    pub fn deleted(mut self, t: i64) -> Self {
        let payload = match self.key.kind {
            strata_core::OsmKind::Node => Payload::Node { coord: None },
            strata_core::OsmKind::Way => Payload::Way {
                nodes: Default::default(),
            },
            strata_core::OsmKind::Relation => Payload::Relation {
                members: Vec::new(),
            },
        };
        self.push(t, false, payload);
        self
    }

    /// Set the tags of the most recently added version.
    pub fn tags(mut self, tags: &[(u32, u32)]) -> Self {
        let v = self.versions.last_mut().expect("add a version before tags");
        v.tags = tags.iter().map(|&(k, val)| TagPair::new(k, val)).collect();
        self
    }

    /// Set the changeset of the most recently added version.
    pub fn changeset(mut self, cs: u64) -> Self {
        let v = self
            .versions
            .last_mut()
            .expect("add a version before changeset");
        v.changeset = ChangesetId(cs);
        self
    }

    /// Add a sub-entity history to the member closure.
    pub fn member(mut self, history: Arc<EntityHistory>) -> Self {
        self.members.push(history);
        self
    }

    /// Build the history. Panics on invariant violations — these are
    /// test fixtures, a broken one is a bug in the test.
    pub fn build(self) -> Arc<EntityHistory> {
        Arc::new(
            EntityHistory::from_versions(self.versions, self.members)
                .expect("valid test history"),
        )
    }
}

/// Fixed-answer [`AreaPolicy`] for tests.
///
/// Roles map by the `ROLE_*` constants: 0 outer, 1 inner, anything
/// else other.
#[derive(Clone, Copy, Debug)]
pub struct MockPolicy {
    pub closed_ways_are_areas: bool,
    pub relations_are_multipolygons: bool,
}

impl MockPolicy {
    /// Everything renders as lines/collections; nothing is an area.
    pub fn lines() -> Self {
        Self {
            closed_ways_are_areas: false,
            relations_are_multipolygons: false,
        }
    }

    /// Closed ways fill to polygons and relations assemble to
    /// multipolygons.
    pub fn areas() -> Self {
        Self {
            closed_ways_are_areas: true,
            relations_are_multipolygons: true,
        }
    }
}

impl AreaPolicy for MockPolicy {
    fn way_is_area(&self, _way: &EntityVersion) -> bool {
        self.closed_ways_are_areas
    }

    fn relation_is_area(&self, _relation: &EntityVersion) -> bool {
        self.relations_are_multipolygons
    }

    fn relation_is_multipolygon(&self, _relation: &EntityVersion) -> bool {
        self.relations_are_multipolygons
    }

    fn member_role(&self, member: &RelMember) -> RingRole {
        match member.role.0 {
            ROLE_OUTER => RingRole::Outer,
            ROLE_INNER => RingRole::Inner,
            _ => RingRole::Other,
        }
    }
}

/// In-memory [`TagDictionary`] for tests.
#[derive(Clone, Debug, Default)]
pub struct MockDictionary {
    keys: HashMap<String, u32>,
    values: HashMap<String, u32>,
    roles: HashMap<String, u32>,
}

impl MockDictionary {
    pub fn new(
        keys: &[(&str, u32)],
        values: &[(&str, u32)],
        roles: &[(&str, u32)],
    ) -> Self {
        let to_map = |pairs: &[(&str, u32)]| {
            pairs
                .iter()
                .map(|&(s, id)| (s.to_string(), id))
                .collect::<HashMap<_, _>>()
        };
        Self {
            keys: to_map(keys),
            values: to_map(values),
            roles: to_map(roles),
        }
    }
}

impl TagDictionary for MockDictionary {
    fn key_id(&self, key: &str) -> Option<u32> {
        self.keys.get(key).copied()
    }

    fn value_id(&self, value: &str) -> Option<u32> {
        self.values.get(value).copied()
    }

    fn role_id(&self, role: &str) -> Option<u32> {
        self.roles.get(role).copied()
    }
}
