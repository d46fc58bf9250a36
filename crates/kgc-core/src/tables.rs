//! Immutable reference tables joined against raster codes and zone labels.
//!
//! Each table is built once from rows in file order. Keys may repeat; the
//! first row for a key wins.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::raster::{ZoneCode, ZoneRaster};

// ── Rows ──────────────────────────────────────────────────────────────────────

/// One `kg_zoneNum.csv` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    #[serde(rename = "zoneNum")]
    pub code: ZoneCode,
    #[serde(rename = "kg_zone")]
    pub label: String,
}

/// One `zipcodes.csv` row. `zip` stays a string so leading zeros survive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipRecord {
    pub zip: String,
    pub lat: f64,
    pub lon: f64,
}

/// One `df_quantile.csv` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileRecord {
    #[serde(rename = "kg_zone")]
    pub zone: String,
    #[serde(rename = "quantilep98")]
    pub p98: f64,
    #[serde(rename = "quantilep80")]
    pub p80: f64,
    #[serde(rename = "quantilep50")]
    pub p50: f64,
    #[serde(rename = "quantilep30")]
    pub p30: f64,
}

// ── ZoneTable ─────────────────────────────────────────────────────────────────

/// Raster code → Köppen–Geiger label.
#[derive(Debug, Clone, Default)]
pub struct ZoneTable {
    by_code: HashMap<ZoneCode, String>,
}

impl ZoneTable {
    pub fn from_records(records: impl IntoIterator<Item = ZoneRecord>) -> Self {
        let mut by_code = HashMap::new();
        for rec in records {
            by_code.entry(rec.code).or_insert(rec.label);
        }
        Self { by_code }
    }

    /// Shorthand for tests and small fixtures.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (ZoneCode, &'a str)>) -> Self {
        Self::from_records(pairs.into_iter().map(|(code, label)| ZoneRecord {
            code,
            label: label.to_string(),
        }))
    }

    pub fn label(&self, code: ZoneCode) -> Option<&str> {
        self.by_code.get(&code).map(String::as_str)
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.by_code.values().any(|l| l == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.by_code.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// Codes present in `raster` with no label here, ascending.
    pub fn missing_codes(&self, raster: &ZoneRaster) -> Vec<ZoneCode> {
        raster
            .distinct_codes()
            .into_iter()
            .filter(|c| !self.by_code.contains_key(c))
            .collect()
    }
}

// ── ZipTable ──────────────────────────────────────────────────────────────────

/// Zip code → coordinate.
#[derive(Debug, Clone, Default)]
pub struct ZipTable {
    rows: Vec<ZipRecord>,
    first_row: HashMap<String, usize>,
}

impl ZipTable {
    pub fn from_records(records: impl IntoIterator<Item = ZipRecord>) -> Self {
        let rows: Vec<ZipRecord> = records.into_iter().collect();
        let mut first_row = HashMap::with_capacity(rows.len());
        for (i, rec) in rows.iter().enumerate() {
            first_row.entry(rec.zip.clone()).or_insert(i);
        }
        Self { rows, first_row }
    }

    /// First row whose zip equals `zip` exactly.
    pub fn find(&self, zip: &str) -> Option<&ZipRecord> {
        self.first_row.get(zip).map(|&i| &self.rows[i])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── QuantileTable ─────────────────────────────────────────────────────────────

/// Zone label → irradiance quantiles.
#[derive(Debug, Clone, Default)]
pub struct QuantileTable {
    rows: Vec<QuantileRecord>,
    first_row: HashMap<String, usize>,
}

impl QuantileTable {
    pub fn from_records(records: impl IntoIterator<Item = QuantileRecord>) -> Self {
        let rows: Vec<QuantileRecord> = records.into_iter().collect();
        let mut first_row = HashMap::with_capacity(rows.len());
        for (i, rec) in rows.iter().enumerate() {
            first_row.entry(rec.zone.clone()).or_insert(i);
        }
        Self { rows, first_row }
    }

    pub fn find(&self, zone: &str) -> Option<&QuantileRecord> {
        self.first_row.get(zone).map(|&i| &self.rows[i])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
