//! The immutable lookup context shared by every core operation.

use log::warn;

use crate::coords::LatLon;
use crate::error::Result;
use crate::lookup::{IrradianceQuantiles, LookupOutcome};
use crate::projection::GridProjector;
use crate::raster::ZoneRaster;
use crate::tables::{QuantileTable, ZipTable, ZoneTable};
use crate::uncertainty::UncertaintyReport;

/// Raster plus reference tables, loaded once and never mutated.
///
/// Holds only owned data, so it is `Send + Sync` and can be shared across
/// threads behind a plain reference or an `Arc`.
#[derive(Debug, Clone)]
pub struct KgcContext {
    raster: ZoneRaster,
    zones: ZoneTable,
    zips: ZipTable,
    quantiles: QuantileTable,
    projector: GridProjector,
}

impl KgcContext {
    /// Build a context with empty zip and quantile tables.
    ///
    /// Raster codes without a zone label are logged, not rejected: they only
    /// fail the lookups that actually land on them.
    pub fn new(raster: ZoneRaster, zones: ZoneTable) -> Self {
        for code in zones.missing_codes(&raster) {
            warn!("raster code {code} has no entry in the zone table");
        }
        let projector = GridProjector::for_raster(&raster);
        Self {
            raster,
            zones,
            zips: ZipTable::default(),
            quantiles: QuantileTable::default(),
            projector,
        }
    }

    pub fn with_zips(mut self, zips: ZipTable) -> Self {
        self.zips = zips;
        self
    }

    pub fn with_quantiles(mut self, quantiles: QuantileTable) -> Self {
        self.quantiles = quantiles;
        self
    }

    pub fn raster(&self) -> &ZoneRaster {
        &self.raster
    }

    pub fn zones(&self) -> &ZoneTable {
        &self.zones
    }

    pub fn zips(&self) -> &ZipTable {
        &self.zips
    }

    pub fn quantiles(&self) -> &QuantileTable {
        &self.quantiles
    }

    pub fn projector(&self) -> GridProjector {
        self.projector
    }

    // ── Operation shorthands ─────────────────────────────────────────────────

    pub fn classify(&self, lat: f64, lon: f64) -> Result<&str> {
        crate::classify::classify(self, lat, lon)
    }

    pub fn snap_to_grid(&self, lat: f64, lon: f64) -> LatLon {
        self.projector.snap_to_grid(LatLon::new(lat, lon))
    }

    pub fn estimate_uncertainty(&self, lat: f64, lon: f64, radius: u32) -> Result<UncertaintyReport> {
        crate::uncertainty::estimate_uncertainty(self, lat, lon, radius)
    }

    pub fn classify_batch(&self, lats: &[f64], lons: &[f64]) -> Result<Vec<Option<&str>>> {
        crate::classify::classify_batch(self, lats, lons)
    }

    pub fn resolve_zip(&self, zip: impl std::fmt::Display) -> LookupOutcome<LatLon> {
        crate::lookup::resolve_zip(&self.zips, zip)
    }

    pub fn quantiles_for(&self, zone: &str) -> LookupOutcome<IrradianceQuantiles> {
        crate::lookup::quantiles_for(&self.quantiles, zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{QuantileRecord, ZipRecord};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn context_is_shareable_across_threads() {
        assert_send_sync::<KgcContext>();
    }

    #[test]
    fn shorthands_forward_to_the_tables() {
        let raster = ZoneRaster::from_rows(&[vec![1, 1], vec![2, 1]]).unwrap();
        let ctx = KgcContext::new(raster, ZoneTable::from_pairs([(1, "Af"), (2, "BWh")]))
            .with_zips(ZipTable::from_records([ZipRecord {
                zip: "02138".into(),
                lat: 42.37,
                lon: -71.12,
            }]))
            .with_quantiles(QuantileTable::from_records([QuantileRecord {
                zone: "Af".into(),
                p98: 9.0,
                p80: 7.0,
                p50: 5.0,
                p30: 3.0,
            }]));

        assert_eq!(ctx.projector(), GridProjector::new(2, 2));
        assert_eq!(ctx.classify(45.0, -90.0), Ok("Af"));
        assert_eq!(ctx.snap_to_grid(40.0, -100.0), LatLon::new(45.0, -90.0));
        assert_eq!(ctx.resolve_zip("02138"), LookupOutcome::Found(LatLon::new(42.37, -71.12)));
        assert!(ctx.quantiles_for("Af").is_found());
        assert_eq!(ctx.classify_batch(&[45.0], &[-90.0]), Ok(vec![Some("Af")]));
        assert_eq!(ctx.estimate_uncertainty(45.0, -90.0, 0).unwrap().center_zone, "Af");
    }
}
