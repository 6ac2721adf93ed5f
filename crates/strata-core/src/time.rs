//! The [`Timestamp`] instant type.

use std::fmt;

/// An instant on the OSM history axis, in whole epoch seconds.
///
/// Timestamps are opaque and totally ordered; the engine never does
/// calendar arithmetic on them. Second granularity matches what the
/// upstream replication feed delivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// The earliest representable instant.
    pub const MIN: Timestamp = Timestamp(i64::MIN);

    /// The latest representable instant.
    pub const MAX: Timestamp = Timestamp(i64::MAX);
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Timestamp {
    fn from(v: i64) -> Self {
        Self(v)
    }
}
