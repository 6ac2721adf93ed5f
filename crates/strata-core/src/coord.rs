//! Fixed-point geographic coordinates.

use std::fmt;

/// Scale factor between fixed-point storage and degrees.
const SCALE: f64 = 1e-7;

/// A longitude/latitude pair in fixed-point 1e-7 degrees.
///
/// This is the resolution the upstream OSM database uses, so round-trips
/// through ingestion are lossless and coordinate equality is exact — the
/// ring assembler matches chain endpoints by `==`, and the contribution
/// classifier compares geometries coordinate-wise, neither of which
/// tolerates float fuzz. Conversion to `f64` degrees happens once, at
/// geometry-construction time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LonLat {
    /// Longitude in 1e-7 degrees. Valid range ±1_800_000_000.
    pub lon_e7: i32,
    /// Latitude in 1e-7 degrees. Valid range ±900_000_000.
    pub lat_e7: i32,
}

impl LonLat {
    /// Construct from raw fixed-point values.
    pub fn new(lon_e7: i32, lat_e7: i32) -> Self {
        Self { lon_e7, lat_e7 }
    }

    /// Construct from degrees, rounding to the storage grid.
    pub fn from_degrees(lon: f64, lat: f64) -> Self {
        Self {
            lon_e7: (lon / SCALE).round() as i32,
            lat_e7: (lat / SCALE).round() as i32,
        }
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        f64::from(self.lon_e7) * SCALE
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        f64::from(self.lat_e7) * SCALE
    }

    /// Convert to a geo-types coordinate (degrees, x = lon, y = lat).
    pub fn to_coord(self) -> geo_types::Coord<f64> {
        geo_types::Coord {
            x: self.lon(),
            y: self.lat(),
        }
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lon(), self.lat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_round_trip() {
        let c = LonLat::from_degrees(1.42, 1.225);
        assert_eq!(c.lon_e7, 14_200_000);
        assert_eq!(c.lat_e7, 12_250_000);
        assert!((c.lon() - 1.42).abs() < 1e-9);
        assert!((c.lat() - 1.225).abs() < 1e-9);
    }

    #[test]
    fn exact_equality_on_grid() {
        // Two coordinates built from the same degrees are identical,
        // which is what endpoint matching relies on.
        assert_eq!(
            LonLat::from_degrees(8.6821, 49.4141),
            LonLat::from_degrees(8.6821, 49.4141)
        );
    }
}
