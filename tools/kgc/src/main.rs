//! Command-line front end: loads the packaged raster and tables and runs one
//! lookup. Results go to stdout, diagnostics to stderr.

mod assets;

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use kgc_core::{GridProjector, KgcContext, LatLon, LookupOutcome, DEFAULT_WINDOW_RADIUS};
use log::info;
use serde::{Deserialize, Serialize};

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "kgc", about = "Köppen–Geiger climate zone lookup")]
struct Args {
    /// Directory holding the packaged raster and tables.
    #[arg(long, env = "KGC_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Zone raster PNG (default: <data-dir>/kmz_int_reshape.png).
    #[arg(long, global = true)]
    raster: Option<PathBuf>,

    /// Zone code table (default: <data-dir>/kg_zoneNum.csv).
    #[arg(long, global = true)]
    zones: Option<PathBuf>,

    /// Zip code table (default: <data-dir>/zipcodes.csv).
    #[arg(long, global = true)]
    zips: Option<PathBuf>,

    /// Irradiance quantile table (default: <data-dir>/df_quantile.csv).
    #[arg(long, global = true)]
    quantiles: Option<PathBuf>,

    /// Emit JSON instead of plain text.
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Climate zone at a coordinate.
    #[command(allow_negative_numbers = true)]
    Classify { lat: f64, lon: f64 },

    /// Centre of the raster cell containing a coordinate.
    #[command(allow_negative_numbers = true)]
    Snap { lat: f64, lon: f64 },

    /// Zone agreement in the window around a coordinate.
    #[command(allow_negative_numbers = true)]
    Uncertainty {
        lat: f64,
        lon: f64,
        /// Window half-width in cells.
        #[arg(short, long, default_value_t = DEFAULT_WINDOW_RADIUS)]
        radius: u32,
    },

    /// Classify every row of a `lat,lon` CSV (stdin when no file is given).
    Batch {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Coordinate of a zip code.
    Zip { zip: String },

    /// Irradiance quantiles of a climate zone.
    Quantiles { zone: String },
}

impl Args {
    fn asset(&self, explicit: &Option<PathBuf>, default_name: &str) -> PathBuf {
        explicit.clone().unwrap_or_else(|| self.data_dir.join(default_name))
    }

    fn load_context(&self) -> Result<KgcContext> {
        let raster = assets::load_raster(&self.asset(&self.raster, assets::RASTER_FILE))?;
        let zones = assets::load_zone_table(&self.asset(&self.zones, assets::ZONES_FILE))?;
        Ok(KgcContext::new(raster, zones))
    }
}

// ── Output rows ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ZoneAt<'a> {
    lat: f64,
    lon: f64,
    zone: Option<&'a str>,
}

#[derive(Deserialize)]
struct BatchRow {
    lat: f64,
    lon: f64,
}

// ── Commands ─────────────────────────────────────────────────────────────────

fn read_batch(input: Option<&Path>) -> Result<(Vec<f64>, Vec<f64>)> {
    let reader: Box<dyn Read> = match input {
        Some(path) => Box::new(
            fs::File::open(path).with_context(|| format!("Cannot open {}", path.display()))?,
        ),
        None => Box::new(io::stdin().lock()),
    };
    let mut lats = Vec::new();
    let mut lons = Vec::new();
    for (i, row) in csv::Reader::from_reader(reader).deserialize::<BatchRow>().enumerate() {
        let row = row.with_context(|| format!("batch input: bad row {}", i + 1))?;
        lats.push(row.lat);
        lons.push(row.lon);
    }
    Ok((lats, lons))
}

fn print_outcome<T: Serialize>(
    out: &mut impl Write,
    json: bool,
    outcome: LookupOutcome<T>,
    text: impl FnOnce(&T) -> String,
) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?;
        return Ok(());
    }
    let value = outcome.into_result()?;
    writeln!(out, "{}", text(&value))?;
    Ok(())
}

fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    match &args.command {
        Command::Classify { lat, lon } => {
            let ctx = args.load_context()?;
            let zone = ctx.classify(*lat, *lon)?;
            if args.json {
                let row = ZoneAt { lat: *lat, lon: *lon, zone: Some(zone) };
                writeln!(out, "{}", serde_json::to_string_pretty(&row)?)?;
            } else {
                writeln!(out, "{zone}")?;
            }
        }
        Command::Snap { lat, lon } => {
            // Only the raster dimensions matter here.
            let raster = assets::load_raster(&args.asset(&args.raster, assets::RASTER_FILE))?;
            let snapped = GridProjector::for_raster(&raster).snap_to_grid(LatLon::new(*lat, *lon));
            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&snapped)?)?;
            } else {
                writeln!(out, "{:.2} {:.2}", snapped.lat, snapped.lon)?;
            }
        }
        Command::Uncertainty { lat, lon, radius } => {
            let ctx = args.load_context()?;
            let report = ctx.estimate_uncertainty(*lat, *lon, *radius)?;
            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                writeln!(
                    out,
                    "{} agreement={:.4} alternatives=[{}]",
                    report.center_zone,
                    report.agreement,
                    report.alternatives.join(", ")
                )?;
            }
        }
        Command::Batch { input } => {
            let (lats, lons) = read_batch(input.as_deref())?;
            let ctx = args.load_context()?;
            let zones = ctx.classify_batch(&lats, &lons)?;
            let unresolved = zones.iter().filter(|z| z.is_none()).count();
            info!("classified {} coordinates, {unresolved} unresolved", zones.len());

            let rows: Vec<ZoneAt> = lats
                .iter()
                .zip(&lons)
                .zip(zones)
                .map(|((&lat, &lon), zone)| ZoneAt { lat, lon, zone })
                .collect();
            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
            } else {
                let mut writer = csv::Writer::from_writer(&mut *out);
                if rows.is_empty() {
                    writer.write_record(["lat", "lon", "zone"])?;
                }
                for row in &rows {
                    writer.serialize(row)?;
                }
                writer.flush()?;
            }
        }
        Command::Zip { zip } => {
            let zips = assets::load_zip_table(&args.asset(&args.zips, assets::ZIPS_FILE))?;
            let outcome = kgc_core::resolve_zip(&zips, zip);
            print_outcome(out, args.json, outcome, |p| format!("{} {}", p.lat, p.lon))?;
        }
        Command::Quantiles { zone } => {
            let table =
                assets::load_quantile_table(&args.asset(&args.quantiles, assets::QUANTILES_FILE))?;
            let outcome = kgc_core::quantiles_for(&table, zone);
            print_outcome(out, args.json, outcome, |q| {
                format!("p98={} p80={} p50={} p30={}", q.p98, q.p80, q.p50, q.p30)
            })?;
        }
    }
    Ok(())
}

// ── Main ─────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    if !args.data_dir.is_dir()
        && [&args.raster, &args.zones, &args.zips, &args.quantiles].iter().all(|p| p.is_none())
    {
        bail!(
            "Data directory {} not found; pass --data-dir or set KGC_DATA_DIR",
            args.data_dir.display()
        );
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&args, &mut out)
}
