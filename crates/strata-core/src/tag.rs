//! Opaque integer tag pairs and the external dictionary contract.
//!
//! The engine never sees tag strings. Keys and values are interned to
//! `u32` handles by an external dictionary at ingestion time; everything
//! in this workspace compares and stores the handles only. The
//! [`TagDictionary`] trait is the seam through which policy
//! implementations (and nothing else) translate strings.

use smallvec::SmallVec;
use std::fmt;

/// One key/value tag as a pair of dictionary handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagPair {
    /// Interned key handle.
    pub key: u32,
    /// Interned value handle.
    pub value: u32,
}

impl TagPair {
    /// Construct a tag pair from raw handles.
    pub fn new(key: u32, value: u32) -> Self {
        Self { key, value }
    }
}

impl fmt::Display for TagPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Tag list of one entity version.
///
/// `SmallVec<[TagPair; 4]>` keeps the common case (a handful of tags)
/// off the heap. Order is whatever the ingestion pipeline delivered;
/// semantic comparison is unordered, see [`tags_equal`].
pub type TagList = SmallVec<[TagPair; 4]>;

/// Compare two tag lists as unordered sets.
///
/// Tag order carries no meaning in OSM, so a pure reordering between two
/// versions must not count as a tag change.
pub fn tags_equal(a: &[TagPair], b: &[TagPair]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a: SmallVec<[TagPair; 8]> = SmallVec::from_slice(a);
    let mut b: SmallVec<[TagPair; 8]> = SmallVec::from_slice(b);
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

/// Look up the value handle for a key handle in a tag list.
pub fn tag_value(tags: &[TagPair], key: u32) -> Option<u32> {
    tags.iter().find(|t| t.key == key).map(|t| t.value)
}

/// External string⇄handle dictionary contract.
///
/// Supplied fully constructed by the embedding application. The engine
/// itself never calls this; it exists so policy implementations can
/// resolve the handles they care about once, up front, instead of
/// parsing strings per snapshot.
pub trait TagDictionary {
    /// Handle for a key string, if the key has been interned.
    fn key_id(&self, key: &str) -> Option<u32>;

    /// Handle for a value string, if the value has been interned.
    fn value_id(&self, value: &str) -> Option<u32>;

    /// Handle for a relation-member role string, if interned.
    fn role_id(&self, role: &str) -> Option<u32>;
}
