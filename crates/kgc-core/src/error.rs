use thiserror::Error;

use crate::raster::ZoneCode;

/// Every way a core operation can fail.
///
/// Single-coordinate lookups surface these directly. The batch classifier
/// only ever returns `LengthMismatch`; per-element failures there become the
/// unresolved sentinel instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KgcError {
    #[error("grid index ({x}, {y}) lies outside the {width}x{height} raster")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("raster code {code} at ({x}, {y}) has no zone label")]
    UnknownZoneCode { code: ZoneCode, x: i64, y: i64 },

    #[error("coordinate ({lat}, {lon}) is not finite")]
    NonFiniteCoordinate { lat: f64, lon: f64 },

    #[error("latitude array has {lats} elements but longitude array has {lons}")]
    LengthMismatch { lats: usize, lons: usize },

    #[error("no matching rows found for {key}")]
    NotFound { key: String },

    #[error("search failed: {message}")]
    SearchFailed { message: String },

    #[error("invalid raster: {0}")]
    InvalidRaster(String),
}

pub type Result<T> = std::result::Result<T, KgcError>;
