//! Köppen–Geiger climate zone lookup on an equirectangular zone raster.
//!
//! The core is IO-free: callers hand it an already-decoded [`ZoneRaster`] and
//! the reference tables, bundled once into an immutable [`KgcContext`], and
//! every operation is a pure function of its inputs plus that context.

pub mod classify;
pub mod context;
pub mod coords;
pub mod error;
pub mod lookup;
pub mod projection;
pub mod raster;
pub mod tables;
pub mod uncertainty;

pub use classify::{classify, classify_batch};
pub use context::KgcContext;
pub use coords::{GridIndex, LatLon};
pub use error::{KgcError, Result};
pub use lookup::{quantiles_for, resolve_zip, IrradianceQuantiles, LookupOutcome};
pub use projection::GridProjector;
pub use raster::{ZoneCode, ZoneRaster};
pub use tables::{QuantileRecord, QuantileTable, ZipRecord, ZipTable, ZoneRecord, ZoneTable};
pub use uncertainty::{estimate_uncertainty, UncertaintyReport, ZoneShare, DEFAULT_WINDOW_RADIUS};
