//! Single-coordinate and batched zone classification.
//!
//! The two paths share the projection but differ at the raster edge: the
//! scalar classifier reports `OutOfBounds`, the batch classifier clamps onto
//! the nearest edge cell and never fails per element.

use log::debug;
#[cfg(feature = "threading")]
use rayon::prelude::*;

use crate::context::KgcContext;
use crate::coords::LatLon;
use crate::error::{KgcError, Result};

/// Köppen–Geiger label of the cell containing (`lat`, `lon`).
///
/// Fails with `OutOfBounds` when the projected cell is off the raster and with
/// `UnknownZoneCode` when the cell's code has no label.
pub fn classify(ctx: &KgcContext, lat: f64, lon: f64) -> Result<&str> {
    let raster = ctx.raster();
    let idx = ctx
        .projector()
        .try_project(LatLon::new(lat, lon))
        .ok_or(KgcError::NonFiniteCoordinate { lat, lon })?;
    let code = raster.get(idx).ok_or(KgcError::OutOfBounds {
        x: idx.x,
        y: idx.y,
        width: raster.width(),
        height: raster.height(),
    })?;
    ctx.zones()
        .label(code)
        .ok_or(KgcError::UnknownZoneCode { code, x: idx.x, y: idx.y })
}

/// Classify paired `lats[i]`, `lons[i]` elementwise.
///
/// Output has one entry per input pair, in input order. `None` marks an
/// element that could not be resolved (non-finite coordinate, or a code with
/// no label); it never aborts the rest of the batch. The only error is a
/// length mismatch between the two inputs.
pub fn classify_batch<'a>(ctx: &'a KgcContext, lats: &[f64], lons: &[f64]) -> Result<Vec<Option<&'a str>>> {
    if lats.len() != lons.len() {
        return Err(KgcError::LengthMismatch {
            lats: lats.len(),
            lons: lons.len(),
        });
    }

    #[cfg(feature = "threading")]
    let labels = lats
        .par_iter()
        .zip(lons.par_iter())
        .map(|(&lat, &lon)| classify_clamped(ctx, lat, lon))
        .collect();

    #[cfg(not(feature = "threading"))]
    let labels = lats
        .iter()
        .zip(lons.iter())
        .map(|(&lat, &lon)| classify_clamped(ctx, lat, lon))
        .collect();

    Ok(labels)
}

fn classify_clamped(ctx: &KgcContext, lat: f64, lon: f64) -> Option<&str> {
    let raster = ctx.raster();
    let Some(idx) = ctx.projector().try_project(LatLon::new(lat, lon)) else {
        debug!("batch: ({lat}, {lon}) is not finite, unresolved");
        return None;
    };
    let idx = idx.clamp(raster.width(), raster.height());
    let code = raster.get(idx)?;
    let label = ctx.zones().label(code);
    if label.is_none() {
        debug!("batch: code {code} at ({}, {}) has no zone label, unresolved", idx.x, idx.y);
    }
    label
}
