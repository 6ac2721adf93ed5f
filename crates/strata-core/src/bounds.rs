//! Axis-aligned geographic bounding boxes.

use crate::coord::LonLat;
use std::fmt;

/// An axis-aligned bounding box in degrees, min/max inclusive.
///
/// Used both as the query window of the iterator and as the aggregate
/// historical extent of an entity (union over all versions and member
/// histories), so box-vs-box intersection is the cheap first-stage
/// spatial filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    /// Western edge.
    pub min_lon: f64,
    /// Southern edge.
    pub min_lat: f64,
    /// Eastern edge.
    pub max_lon: f64,
    /// Northern edge.
    pub max_lat: f64,
}

impl GeoBounds {
    /// A box with inverted infinite extent; the identity for [`union`](Self::union).
    ///
    /// `is_empty()` is true for it, and `union` with any real box yields
    /// that box.
    pub const EMPTY: GeoBounds = GeoBounds {
        min_lon: f64::INFINITY,
        min_lat: f64::INFINITY,
        max_lon: f64::NEG_INFINITY,
        max_lat: f64::NEG_INFINITY,
    };

    /// Construct from edges.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// True if the box contains no points (inverted edges).
    pub fn is_empty(&self) -> bool {
        self.min_lon > self.max_lon || self.min_lat > self.max_lat
    }

    /// True if every edge is a finite number and the box is not inverted.
    pub fn is_valid(&self) -> bool {
        self.min_lon.is_finite()
            && self.min_lat.is_finite()
            && self.max_lon.is_finite()
            && self.max_lat.is_finite()
            && !self.is_empty()
    }

    /// Box/box intersection test, edges inclusive.
    pub fn intersects(&self, other: &GeoBounds) -> bool {
        self.min_lon <= other.max_lon
            && self.max_lon >= other.min_lon
            && self.min_lat <= other.max_lat
            && self.max_lat >= other.min_lat
    }

    /// True if `other` lies entirely inside this box.
    pub fn contains_bounds(&self, other: &GeoBounds) -> bool {
        self.min_lon <= other.min_lon
            && self.max_lon >= other.max_lon
            && self.min_lat <= other.min_lat
            && self.max_lat >= other.max_lat
    }

    /// True if the point lies inside this box, edges inclusive.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Smallest box covering both inputs.
    pub fn union(&self, other: &GeoBounds) -> GeoBounds {
        GeoBounds {
            min_lon: self.min_lon.min(other.min_lon),
            min_lat: self.min_lat.min(other.min_lat),
            max_lon: self.max_lon.max(other.max_lon),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    /// Grow the box to cover one coordinate.
    pub fn expand_to(&mut self, c: LonLat) {
        self.min_lon = self.min_lon.min(c.lon());
        self.min_lat = self.min_lat.min(c.lat());
        self.max_lon = self.max_lon.max(c.lon());
        self.max_lat = self.max_lat.max(c.lat());
    }

    /// Convert to a geo-types rectangle.
    pub fn to_rect(&self) -> geo_types::Rect<f64> {
        geo_types::Rect::new(
            geo_types::Coord {
                x: self.min_lon,
                y: self.min_lat,
            },
            geo_types::Coord {
                x: self.max_lon,
                y: self.max_lat,
            },
        )
    }
}

impl fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_union_identity() {
        let b = GeoBounds::new(1.0, 2.0, 3.0, 4.0);
        assert!(GeoBounds::EMPTY.is_empty());
        assert_eq!(GeoBounds::EMPTY.union(&b), b);
    }

    #[test]
    fn intersects_edge_touching() {
        let a = GeoBounds::new(0.0, 0.0, 1.0, 1.0);
        let b = GeoBounds::new(1.0, 1.0, 2.0, 2.0);
        assert!(a.intersects(&b));
        let c = GeoBounds::new(1.001, 1.001, 2.0, 2.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn contains_bounds_is_inclusive() {
        let outer = GeoBounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(outer.contains_bounds(&GeoBounds::new(0.0, 0.0, 10.0, 10.0)));
        assert!(outer.contains_bounds(&GeoBounds::new(2.0, 2.0, 3.0, 3.0)));
        assert!(!outer.contains_bounds(&GeoBounds::new(2.0, 2.0, 11.0, 3.0)));
    }

    #[test]
    fn expand_to_grows_from_empty() {
        let mut b = GeoBounds::EMPTY;
        b.expand_to(LonLat::from_degrees(1.0, 2.0));
        b.expand_to(LonLat::from_degrees(-1.0, 5.0));
        assert_eq!(b, GeoBounds::new(-1.0, 2.0, 1.0, 5.0));
    }

    #[test]
    fn invalid_bounds_detected() {
        assert!(!GeoBounds::new(1.0, 0.0, 0.0, 1.0).is_valid());
        assert!(!GeoBounds::new(f64::NAN, 0.0, 1.0, 1.0).is_valid());
        assert!(GeoBounds::new(0.0, 0.0, 1.0, 1.0).is_valid());
    }
}
