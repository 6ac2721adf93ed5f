//! The area/role policy seam.

use strata_core::{EntityVersion, RelMember, TagDictionary};

/// How a relation member participates in ring assembly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingRole {
    /// Part of an outer ring boundary.
    Outer,
    /// Part of a hole boundary.
    Inner,
    /// Neither — the member plays some other role ("admin_centre",
    /// "stop", an unrecognized string, ...).
    Other,
}

/// Decides whether ways/relations are filled areas and what role a
/// relation member plays.
///
/// Implementations must be pure, side-effect-free, and total: every
/// method answers for every input, and none of them returns a `Result`.
/// All tag-based heuristics live behind this trait so the geometry
/// engine stays free of tag knowledge. Supplied fully constructed by
/// the embedding application.
pub trait AreaPolicy {
    /// Should a closed way with these tags be filled to a polygon?
    fn way_is_area(&self, way: &EntityVersion) -> bool;

    /// Should this relation be treated as a filled area?
    fn relation_is_area(&self, relation: &EntityVersion) -> bool;

    /// Should this relation's member ways be assembled into rings?
    fn relation_is_multipolygon(&self, relation: &EntityVersion) -> bool;

    /// Ring role of one relation member.
    fn member_role(&self, member: &RelMember) -> RingRole;
}

/// Reference [`AreaPolicy`] driven by interned tag handles.
///
/// Resolves the handful of well-known keys/values it cares about once,
/// through the external [`TagDictionary`], at construction time. Keys the
/// dictionary has never seen resolve to `None` and simply never match —
/// the policy stays total either way.
#[derive(Clone, Debug)]
pub struct TagAreaPolicy {
    /// Keys whose presence marks a closed way as an area
    /// (building, landuse, natural, leisure, amenity).
    area_keys: Vec<u32>,
    /// The "area" key, for the explicit `area=yes`/`area=no` override.
    area_key: Option<u32>,
    /// Value handle of "yes".
    yes_value: Option<u32>,
    /// Value handle of "no".
    no_value: Option<u32>,
    /// The "type" key on relations.
    type_key: Option<u32>,
    /// Value handles of "multipolygon" and "boundary".
    multipolygon_values: Vec<u32>,
    /// Role handle of "outer" (and the empty role, which OSM treats as outer).
    outer_roles: Vec<u32>,
    /// Role handle of "inner".
    inner_role: Option<u32>,
}

impl TagAreaPolicy {
    /// Resolve the well-known handles through the dictionary.
    pub fn from_dictionary(dict: &dyn TagDictionary) -> Self {
        let area_keys = ["building", "landuse", "natural", "leisure", "amenity"]
            .iter()
            .filter_map(|k| dict.key_id(k))
            .collect();
        let multipolygon_values = ["multipolygon", "boundary"]
            .iter()
            .filter_map(|v| dict.value_id(v))
            .collect();
        let outer_roles = ["outer", ""].iter().filter_map(|r| dict.role_id(r)).collect();
        Self {
            area_keys,
            area_key: dict.key_id("area"),
            yes_value: dict.value_id("yes"),
            no_value: dict.value_id("no"),
            type_key: dict.key_id("type"),
            multipolygon_values,
            outer_roles,
            inner_role: dict.role_id("inner"),
        }
    }
}

impl AreaPolicy for TagAreaPolicy {
    fn way_is_area(&self, way: &EntityVersion) -> bool {
        // area=yes/no overrides the key heuristic in both directions.
        if let Some(v) = self.area_key.and_then(|k| strata_core::tag_value(&way.tags, k)) {
            if Some(v) == self.yes_value {
                return true;
            }
            if Some(v) == self.no_value {
                return false;
            }
        }
        way.tags.iter().any(|t| self.area_keys.contains(&t.key))
    }

    fn relation_is_area(&self, relation: &EntityVersion) -> bool {
        self.relation_is_multipolygon(relation)
    }

    fn relation_is_multipolygon(&self, relation: &EntityVersion) -> bool {
        match self.type_key.and_then(|k| strata_core::tag_value(&relation.tags, k)) {
            Some(v) => self.multipolygon_values.contains(&v),
            None => false,
        }
    }

    fn member_role(&self, member: &RelMember) -> RingRole {
        if self.outer_roles.contains(&member.role.0) {
            RingRole::Outer
        } else if Some(member.role.0) == self.inner_role {
            RingRole::Inner
        } else {
            RingRole::Other
        }
    }
}
