//! Geographic and raster coordinate types.
//! All coordinate math uses f64 for precision.
use serde::{Deserialize, Serialize};

/// A point on the globe in geographic coordinates. Not range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude in degrees, conceptually -90 to +90.
    pub lat: f64,
    /// Longitude in degrees, conceptually -180 to +180.
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// A raster cell address. Column `x` runs west→east, row `y` north→south.
///
/// Signed so that projections landing off the raster stay representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridIndex {
    pub x: i64,
    pub y: i64,
}

impl GridIndex {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// True if the index addresses a cell of a `width`×`height` raster.
    pub fn within(self, width: usize, height: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as u64) < width as u64 && (self.y as u64) < height as u64
    }

    /// Clamp both axes into `[0, width-1]` × `[0, height-1]`.
    ///
    /// `width` and `height` must be non-zero.
    pub fn clamp(self, width: usize, height: usize) -> Self {
        Self {
            x: self.x.clamp(0, width as i64 - 1),
            y: self.y.clamp(0, height as i64 - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_rejects_edges_and_negatives() {
        assert!(GridIndex::new(0, 0).within(4, 2));
        assert!(GridIndex::new(3, 1).within(4, 2));
        assert!(!GridIndex::new(4, 1).within(4, 2));
        assert!(!GridIndex::new(3, 2).within(4, 2));
        assert!(!GridIndex::new(-1, 0).within(4, 2));
        assert!(!GridIndex::new(0, -1).within(4, 2));
    }

    #[test]
    fn clamp_pulls_indices_onto_the_raster() {
        assert_eq!(GridIndex::new(-5, 9).clamp(4, 2), GridIndex::new(0, 1));
        assert_eq!(GridIndex::new(4, -1).clamp(4, 2), GridIndex::new(3, 0));
        assert_eq!(GridIndex::new(2, 1).clamp(4, 2), GridIndex::new(2, 1));
    }

    #[test]
    fn non_finite_coordinates_are_flagged() {
        assert!(LatLon::new(10.0, 20.0).is_finite());
        assert!(!LatLon::new(f64::NAN, 20.0).is_finite());
        assert!(!LatLon::new(10.0, f64::INFINITY).is_finite());
    }
}
