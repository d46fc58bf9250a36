use std::collections::BTreeSet;

use crate::coords::GridIndex;
use crate::error::{KgcError, Result};

/// Integer zone code stored in each raster cell.
pub type ZoneCode = u16;

/// A global equirectangular grid of zone codes, row-major.
/// Row 0 is the northernmost row, column 0 the westernmost column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRaster {
    codes: Vec<ZoneCode>,
    width: usize,
    height: usize,
}

impl ZoneRaster {
    /// Wrap decoded row-major `codes`. Dimensions must be non-zero and match.
    pub fn new(width: usize, height: usize, codes: Vec<ZoneCode>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(KgcError::InvalidRaster(format!(
                "dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let expected = width.checked_mul(height).ok_or_else(|| {
            KgcError::InvalidRaster(format!("{width}x{height} overflows the address space"))
        })?;
        if codes.len() != expected {
            return Err(KgcError::InvalidRaster(format!(
                "{width}x{height} raster needs {expected} cells, got {}",
                codes.len()
            )));
        }
        Ok(Self { codes, width, height })
    }

    /// Build from north→south rows of equal length.
    pub fn from_rows(rows: &[Vec<ZoneCode>]) -> Result<Self> {
        let width = rows.first().map_or(0, Vec::len);
        if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(KgcError::InvalidRaster(format!(
                "row {r} has {} cells, expected {width}",
                row.len()
            )));
        }
        Self::new(width, rows.len(), rows.concat())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// True if `idx` addresses a cell of this raster.
    #[inline]
    pub fn contains(&self, idx: GridIndex) -> bool {
        idx.within(self.width, self.height)
    }

    /// Code at column `x`, row `y`. Panics off the raster.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> ZoneCode {
        self.codes[y * self.width + x]
    }

    /// Code at `idx`, or `None` off the raster.
    #[inline]
    pub fn get(&self, idx: GridIndex) -> Option<ZoneCode> {
        self.contains(idx).then(|| self.at(idx.x as usize, idx.y as usize))
    }

    /// Sorted set of codes present anywhere in the raster.
    pub fn distinct_codes(&self) -> BTreeSet<ZoneCode> {
        self.codes.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_reads_row_major_north_first() {
        let r = ZoneRaster::from_rows(&[vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(r.width(), 3);
        assert_eq!(r.height(), 2);
        assert_eq!(r.get(GridIndex::new(0, 0)), Some(1));
        assert_eq!(r.get(GridIndex::new(2, 0)), Some(3));
        assert_eq!(r.get(GridIndex::new(0, 1)), Some(4));
        assert_eq!(r.get(GridIndex::new(2, 1)), Some(6));
    }

    #[test]
    fn get_out_of_bounds_returns_none() {
        let r = ZoneRaster::new(2, 2, vec![1; 4]).unwrap();
        assert_eq!(r.get(GridIndex::new(2, 0)), None);
        assert_eq!(r.get(GridIndex::new(0, 2)), None);
        assert_eq!(r.get(GridIndex::new(-1, 1)), None);
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(matches!(ZoneRaster::new(0, 3, vec![]), Err(KgcError::InvalidRaster(_))));
        assert!(matches!(ZoneRaster::new(2, 2, vec![1; 3]), Err(KgcError::InvalidRaster(_))));
        assert!(matches!(
            ZoneRaster::from_rows(&[vec![1, 2], vec![3]]),
            Err(KgcError::InvalidRaster(_))
        ));
        assert!(matches!(ZoneRaster::from_rows(&[]), Err(KgcError::InvalidRaster(_))));
    }

    #[test]
    fn distinct_codes_are_sorted_and_deduplicated() {
        let r = ZoneRaster::from_rows(&[vec![7, 1, 7], vec![3, 1, 3]]).unwrap();
        assert_eq!(r.distinct_codes().into_iter().collect::<Vec<_>>(), vec![1, 3, 7]);
    }
}
