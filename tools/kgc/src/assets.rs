//! Decoding of the packaged data files into core types.
//!
//! kmz_int_reshape.png  grayscale PNG, one zone code per pixel, north-up
//! kg_zoneNum.csv       zoneNum,kg_zone
//! zipcodes.csv         zip,lat,lon           (zip kept as text)
//! df_quantile.csv      kg_zone,quantilep98,quantilep80,quantilep50,quantilep30
//!
//! Leading index columns written by the table exporters are ignored.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use image::{DynamicImage, ImageReader};
use kgc_core::{
    QuantileRecord, QuantileTable, ZipRecord, ZipTable, ZoneCode, ZoneRaster, ZoneRecord, ZoneTable,
};
use log::info;
use serde::de::DeserializeOwned;

pub const RASTER_FILE: &str = "kmz_int_reshape.png";
pub const ZONES_FILE: &str = "kg_zoneNum.csv";
pub const ZIPS_FILE: &str = "zipcodes.csv";
pub const QUANTILES_FILE: &str = "df_quantile.csv";

// ── Raster ────────────────────────────────────────────────────────────────────

pub fn load_raster(path: &Path) -> Result<ZoneRaster> {
    let bytes = fs::read(path).with_context(|| format!("Cannot read {}", path.display()))?;
    let raster = decode_raster(&bytes).with_context(|| format!("Cannot decode {}", path.display()))?;
    info!("loaded {}x{} zone raster from {}", raster.width(), raster.height(), path.display());
    Ok(raster)
}

/// Decode an encoded grayscale image; pixel values are zone codes as-is.
pub fn decode_raster(bytes: &[u8]) -> Result<ZoneRaster> {
    let mut reader = ImageReader::new(io::Cursor::new(bytes))
        .with_guessed_format()
        .context("Cannot sniff image format")?;
    // The global raster is far larger than the decoder's default budget.
    reader.no_limits();
    let img = reader.decode().context("Image decode failed")?;

    let (width, height) = (img.width() as usize, img.height() as usize);
    let codes: Vec<ZoneCode> = match img {
        DynamicImage::ImageLuma8(buf) => buf.into_raw().into_iter().map(ZoneCode::from).collect(),
        DynamicImage::ImageLuma16(buf) => buf.into_raw(),
        other => bail!(
            "Unsupported pixel layout {:?}: expected 8- or 16-bit grayscale zone codes",
            other.color()
        ),
    };
    Ok(ZoneRaster::new(width, height, codes)?)
}

// ── Tables ────────────────────────────────────────────────────────────────────

fn read_rows<T: DeserializeOwned, R: Read>(reader: R, what: &str) -> Result<Vec<T>> {
    csv::Reader::from_reader(reader)
        .deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("{what}: bad row {}", i + 1)))
        .collect()
}

fn open(path: &Path) -> Result<fs::File> {
    fs::File::open(path).with_context(|| format!("Cannot open {}", path.display()))
}

pub fn read_zone_table<R: Read>(reader: R) -> Result<ZoneTable> {
    let rows: Vec<ZoneRecord> = read_rows(reader, "zone table")?;
    Ok(ZoneTable::from_records(rows))
}

pub fn read_zip_table<R: Read>(reader: R) -> Result<ZipTable> {
    let rows: Vec<ZipRecord> = read_rows(reader, "zip table")?;
    Ok(ZipTable::from_records(rows))
}

pub fn read_quantile_table<R: Read>(reader: R) -> Result<QuantileTable> {
    let rows: Vec<QuantileRecord> = read_rows(reader, "quantile table")?;
    Ok(QuantileTable::from_records(rows))
}

pub fn load_zone_table(path: &Path) -> Result<ZoneTable> {
    let table = read_zone_table(open(path)?).with_context(|| format!("Cannot parse {}", path.display()))?;
    info!("loaded {} zone labels from {}", table.len(), path.display());
    Ok(table)
}

pub fn load_zip_table(path: &Path) -> Result<ZipTable> {
    let table = read_zip_table(open(path)?).with_context(|| format!("Cannot parse {}", path.display()))?;
    info!("loaded {} zip codes from {}", table.len(), path.display());
    Ok(table)
}

pub fn load_quantile_table(path: &Path) -> Result<QuantileTable> {
    let table =
        read_quantile_table(open(path)?).with_context(|| format!("Cannot parse {}", path.display()))?;
    info!("loaded {} quantile rows from {}", table.len(), path.display());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, ImageFormat, Luma, RgbImage};
    use kgc_core::GridIndex;

    fn encode_png(img: DynamicImage) -> Vec<u8> {
        let mut out = io::Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_luma8_codes_unscaled() {
        let img = GrayImage::from_raw(3, 2, vec![1, 2, 3, 29, 30, 31]).unwrap();
        let raster = decode_raster(&encode_png(DynamicImage::ImageLuma8(img))).unwrap();
        assert_eq!((raster.width(), raster.height()), (3, 2));
        assert_eq!(raster.get(GridIndex::new(0, 0)), Some(1));
        assert_eq!(raster.get(GridIndex::new(2, 1)), Some(31));
    }

    #[test]
    fn decodes_luma16_codes_unscaled() {
        let img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_raw(2, 1, vec![7, 300]).unwrap();
        let raster = decode_raster(&encode_png(DynamicImage::ImageLuma16(img))).unwrap();
        assert_eq!(raster.get(GridIndex::new(1, 0)), Some(300));
    }

    #[test]
    fn rejects_colour_images() {
        let img = RgbImage::new(2, 2);
        let err = decode_raster(&encode_png(DynamicImage::ImageRgb8(img))).unwrap_err();
        assert!(format!("{err:#}").contains("grayscale"), "{err:#}");
    }

    #[test]
    fn rejects_garbage_bytes() {
        assert!(decode_raster(b"definitely not a png").is_err());
    }

    #[test]
    fn zone_table_ignores_index_column() {
        let csv = ",zoneNum,kg_zone\n0,1,Af\n1,2,Am\n2,3,As\n";
        let t = read_zone_table(csv.as_bytes()).unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.label(2), Some("Am"));
    }

    #[test]
    fn zip_table_keeps_leading_zeros() {
        let csv = ",zip,lat,lon\n0,02138,42.37,-71.12\n1,00501,40.81,-73.04\n";
        let t = read_zip_table(csv.as_bytes()).unwrap();
        assert_eq!(t.find("02138").map(|r| (r.lat, r.lon)), Some((42.37, -71.12)));
        assert!(t.find("501").is_none());
    }

    #[test]
    fn quantile_table_reads_packaged_columns() {
        let csv = ",kg_zone,quantilep98,quantilep80,quantilep50,quantilep30\n0,Af,9,7,5,3\n";
        let t = read_quantile_table(csv.as_bytes()).unwrap();
        let row = t.find("Af").unwrap();
        assert_eq!((row.p98, row.p80, row.p50, row.p30), (9.0, 7.0, 5.0, 3.0));
    }

    #[test]
    fn bad_rows_name_the_table_and_row() {
        let csv = "zoneNum,kg_zone\n1,Af\nnot-a-number,Am\n";
        let err = read_zone_table(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("zone table: bad row 2"), "{err:#}");
    }
}
