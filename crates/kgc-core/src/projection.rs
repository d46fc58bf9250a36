//! Equirectangular lat/lon ↔ raster cell mapping.
//!
//! Longitude -180° is the west edge of column 0 and latitude +90° the north
//! edge of row 0. Both directions round half to even, so the scalar and batch
//! classifiers always agree on interior points.

use crate::coords::{GridIndex, LatLon};
use crate::raster::ZoneRaster;

/// Maps coordinates onto a raster of fixed dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridProjector {
    width: usize,
    height: usize,
}

impl GridProjector {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn for_raster(raster: &ZoneRaster) -> Self {
        Self::new(raster.width(), raster.height())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Forward mapping. No clamping: the result may lie off the raster.
    ///
    /// Non-finite input saturates to an arbitrary index; use
    /// [`try_project`](Self::try_project) when the input is untrusted.
    pub fn project(&self, p: LatLon) -> GridIndex {
        let w = self.width as f64;
        let h = self.height as f64;
        let fx = (p.lon + 180.0) * w / 360.0 - 0.5;
        let fy = -(p.lat - 90.0) * h / 180.0 - 0.5;
        GridIndex::new(round_index(fx), round_index(fy))
    }

    /// Forward mapping that refuses NaN and infinite coordinates.
    pub fn try_project(&self, p: LatLon) -> Option<GridIndex> {
        p.is_finite().then(|| self.project(p))
    }

    /// Center of cell `idx`, rounded to 2 decimal places.
    pub fn cell_center(&self, idx: GridIndex) -> LatLon {
        let w = self.width as f64;
        let h = self.height as f64;
        let lon = (idx.x as f64 + 0.5) * 360.0 / w - 180.0;
        let lat = -(idx.y as f64 + 0.5) * 180.0 / h + 90.0;
        LatLon::new(round_2dp(lat), round_2dp(lon))
    }

    /// Snap `p` to the center of the cell it falls in.
    pub fn snap_to_grid(&self, p: LatLon) -> LatLon {
        self.cell_center(self.project(p))
    }
}

/// Nearest integer, ties to even. Shared by every projection path.
#[inline]
fn round_index(v: f64) -> i64 {
    v.round_ties_even() as i64
}

/// Round the exact binary value to 2 decimals, true ties to even.
/// Scaling by 100 first would itself round some near-ties onto .5.
fn round_2dp(v: f64) -> f64 {
    format!("{v:.2}").parse().unwrap_or(v)
}
