//! Table joins that report misses as values: zip code → coordinate and
//! climate zone → irradiance quantiles.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::coords::LatLon;
use crate::error::{KgcError, Result};
use crate::tables::{QuantileTable, ZipTable};

/// Outcome of a single-key table join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum LookupOutcome<T> {
    Found(T),
    /// No row carries the key.
    NotFound { key: String },
    /// The join itself could not produce a usable value.
    SearchFailed { message: String },
}

impl<T> LookupOutcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            _ => None,
        }
    }

    /// Fold misses into [`KgcError`] for callers that propagate with `?`.
    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Found(v) => Ok(v),
            Self::NotFound { key } => Err(KgcError::NotFound { key }),
            Self::SearchFailed { message } => Err(KgcError::SearchFailed { message }),
        }
    }
}

/// Global horizontal irradiance quantiles for one climate zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrradianceQuantiles {
    pub p98: f64,
    pub p80: f64,
    pub p50: f64,
    pub p30: f64,
}

impl IrradianceQuantiles {
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.p98, self.p80, self.p50, self.p30)
    }

    fn is_finite(&self) -> bool {
        [self.p98, self.p80, self.p50, self.p30].iter().all(|v| v.is_finite())
    }
}

/// Coordinate of the first row matching `zip`.
///
/// The key is the display form of `zip` with surrounding whitespace trimmed,
/// so numeric callers work too; note that a number carries no leading zeros.
pub fn resolve_zip(zips: &ZipTable, zip: impl Display) -> LookupOutcome<LatLon> {
    let key = zip.to_string().trim().to_string();
    let Some(row) = zips.find(&key) else {
        return LookupOutcome::NotFound { key: format!("zipcode {key}") };
    };
    let coord = LatLon::new(row.lat, row.lon);
    if !coord.is_finite() {
        return LookupOutcome::SearchFailed {
            message: format!("zipcode {key} maps to a non-finite coordinate ({}, {})", row.lat, row.lon),
        };
    }
    LookupOutcome::Found(coord)
}

/// Irradiance quantiles of the first row for climate zone `zone`.
pub fn quantiles_for(quantiles: &QuantileTable, zone: &str) -> LookupOutcome<IrradianceQuantiles> {
    let Some(row) = quantiles.find(zone) else {
        return LookupOutcome::NotFound { key: format!("climate zone {zone}") };
    };
    let q = IrradianceQuantiles {
        p98: row.p98,
        p80: row.p80,
        p50: row.p50,
        p30: row.p30,
    };
    if !q.is_finite() {
        return LookupOutcome::SearchFailed {
            message: format!("climate zone {zone} has non-finite quantiles {:?}", q.as_tuple()),
        };
    }
    LookupOutcome::Found(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{QuantileRecord, ZipRecord};

    fn zips() -> ZipTable {
        ZipTable::from_records([
            ZipRecord { zip: "02138".into(), lat: 42.37, lon: -71.12 },
            ZipRecord { zip: "80401".into(), lat: 39.74, lon: -105.18 },
            ZipRecord { zip: "80401".into(), lat: 0.0, lon: 0.0 },
            ZipRecord { zip: "99999".into(), lat: f64::NAN, lon: 0.0 },
        ])
    }

    fn quantiles() -> QuantileTable {
        QuantileTable::from_records([
            QuantileRecord { zone: "Af".into(), p98: 9.0, p80: 7.0, p50: 5.0, p30: 3.0 },
            QuantileRecord { zone: "BWh".into(), p98: f64::NAN, p80: 1.0, p50: 1.0, p30: 1.0 },
        ])
    }

    #[test]
    fn resolves_known_zip() {
        assert_eq!(resolve_zip(&zips(), "02138"), LookupOutcome::Found(LatLon::new(42.37, -71.12)));
    }

    #[test]
    fn zip_key_is_trimmed() {
        assert_eq!(resolve_zip(&zips(), " 02138\n"), LookupOutcome::Found(LatLon::new(42.37, -71.12)));
    }

    #[test]
    fn unknown_zip_is_not_found() {
        assert_eq!(
            resolve_zip(&zips(), "00000"),
            LookupOutcome::NotFound { key: "zipcode 00000".into() }
        );
    }

    #[test]
    fn numeric_zip_uses_display_form() {
        assert_eq!(resolve_zip(&zips(), 80401), LookupOutcome::Found(LatLon::new(39.74, -105.18)));
        // 2138 has lost its leading zero and matches nothing.
        assert!(!resolve_zip(&zips(), 2138).is_found());
    }

    #[test]
    fn unusable_zip_row_is_a_failed_search() {
        let outcome = resolve_zip(&zips(), "99999");
        assert!(matches!(outcome, LookupOutcome::SearchFailed { .. }), "got {outcome:?}");
        assert!(matches!(outcome.into_result(), Err(KgcError::SearchFailed { .. })));
    }

    #[test]
    fn quantiles_for_known_and_unknown_zones() {
        let q = quantiles_for(&quantiles(), "Af").found().unwrap();
        assert_eq!(q.as_tuple(), (9.0, 7.0, 5.0, 3.0));
        assert_eq!(
            quantiles_for(&quantiles(), "Xyz"),
            LookupOutcome::NotFound { key: "climate zone Xyz".into() }
        );
        assert!(matches!(
            quantiles_for(&quantiles(), "BWh"),
            LookupOutcome::SearchFailed { .. }
        ));
    }

    #[test]
    fn into_result_maps_each_outcome() {
        assert_eq!(LookupOutcome::Found(1).into_result(), Ok(1));
        assert_eq!(
            LookupOutcome::<i32>::NotFound { key: "k".into() }.into_result(),
            Err(KgcError::NotFound { key: "k".into() })
        );
    }
}
