//! Neighbourhood uncertainty: how much of the window around a cell agrees
//! with the cell's own zone, and which other zones are nearby.
//!
//! Window cells off the raster and cells whose code has no label are left
//! out of the sample, each counted under its own reason. The centre cell
//! itself must resolve.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::context::KgcContext;
use crate::coords::{GridIndex, LatLon};
use crate::error::{KgcError, Result};

/// Window half-width used when the caller has no preference.
pub const DEFAULT_WINDOW_RADIUS: u32 = 1;

/// Share of the sampled window taken by one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneShare {
    pub zone: String,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyReport {
    /// Zone of the cell containing the query coordinate.
    pub center_zone: String,
    /// Fraction of sampled window cells sharing `center_zone`, in [0, 1].
    pub agreement: f64,
    /// Other zones seen in the window, deduplicated, in first-seen order.
    pub alternatives: Vec<String>,
    /// Fraction per zone over all sampled cells, in first-seen order.
    pub distribution: Vec<ZoneShare>,
    /// Window cells that contributed to `distribution`.
    pub sampled_cells: usize,
    pub skipped_out_of_bounds: usize,
    pub skipped_unknown_code: usize,
}

/// Sample the `(2r+1)`×`(2r+1)` window centred on the cell containing
/// (`lat`, `lon`) and summarise its zone distribution.
///
/// Errors are those of [`classify`](crate::classify::classify) for the
/// centre cell; neighbours never fail the call.
pub fn estimate_uncertainty(ctx: &KgcContext, lat: f64, lon: f64, radius: u32) -> Result<UncertaintyReport> {
    let raster = ctx.raster();
    let zones = ctx.zones();
    let center = ctx
        .projector()
        .try_project(LatLon::new(lat, lon))
        .ok_or(KgcError::NonFiniteCoordinate { lat, lon })?;

    let center_code = raster.get(center).ok_or(KgcError::OutOfBounds {
        x: center.x,
        y: center.y,
        width: raster.width(),
        height: raster.height(),
    })?;
    let center_zone = zones.label(center_code).ok_or(KgcError::UnknownZoneCode {
        code: center_code,
        x: center.x,
        y: center.y,
    })?;

    let r = i64::from(radius);
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut sampled = 0usize;
    let mut skipped_oob = 0usize;
    let mut skipped_unknown = 0usize;

    for i in center.x - r..=center.x + r {
        for j in center.y - r..=center.y + r {
            let idx = GridIndex::new(i, j);
            if !raster.contains(idx) {
                skipped_oob += 1;
                continue;
            }
            let code = raster.at(i as usize, j as usize);
            let Some(zone) = zones.label(code) else {
                debug!("window cell ({i}, {j}) has unlabelled code {code}, skipped");
                skipped_unknown += 1;
                continue;
            };
            match counts.iter_mut().find(|(z, _)| *z == zone) {
                Some((_, n)) => *n += 1,
                None => counts.push((zone, 1)),
            }
            sampled += 1;
        }
    }
    if skipped_oob > 0 {
        debug!(
            "window around ({}, {}) r={radius}: {skipped_oob} cells off the raster",
            center.x, center.y
        );
    }

    // The centre is always sampled, so `sampled >= 1`.
    let total = sampled as f64;
    let distribution: Vec<ZoneShare> = counts
        .iter()
        .map(|&(zone, n)| ZoneShare {
            zone: zone.to_string(),
            fraction: n as f64 / total,
        })
        .collect();
    let agreement = distribution
        .iter()
        .find(|s| s.zone == center_zone)
        .map_or(1.0, |s| s.fraction);
    let alternatives = counts
        .iter()
        .filter(|(zone, _)| *zone != center_zone)
        .map(|(zone, _)| zone.to_string())
        .collect();

    Ok(UncertaintyReport {
        center_zone: center_zone.to_string(),
        agreement,
        alternatives,
        distribution,
        sampled_cells: sampled,
        skipped_out_of_bounds: skipped_oob,
        skipped_unknown_code: skipped_unknown,
    })
}
