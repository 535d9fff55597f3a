//! # seiscsv Converter
//!
//! A command-line tool for converting earthquake catalogs between the
//! CSV, CSZ and EVENTTXT formats.
//!
//! ## Usage
//!
//! ```bash
//! # Convert an EVENTTXT bulletin to a CSZ bundle
//! seiscsv-convert convert events.txt catalog.csz
//!
//! # Show what a file contains
//! seiscsv-convert info catalog.csz
//!
//! # Name the detected format
//! seiscsv-convert detect events.csv
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use seiscsv::csz::{write_csz, Compression, CszWriteOptions};
use seiscsv::format::{detect, read_events, FileFormat};
use seiscsv::reader::{CsvReadOptions, Defaults};
use seiscsv::writer::{write_csv, CsvWriteOptions};

/// seiscsv - Earthquake Catalog Format Converter
#[derive(Parser)]
#[command(name = "seiscsv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a catalog file to CSV or CSZ
    Convert {
        /// Input catalog (CSV, CSZ or EVENTTXT, auto-detected)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output path (format chosen by extension unless --to is given)
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Output format: csv or csz
        #[arg(long)]
        to: Option<String>,

        /// Deflate CSZ members instead of storing them
        #[arg(long)]
        compress: bool,

        /// Compression level for deflated members
        #[arg(short = 'c', long)]
        compression_level: Option<i64>,

        /// Read and write depth in meters instead of kilometers
        #[arg(long)]
        depth_in_m: bool,

        /// Magnitude type substituted where the input gives none
        #[arg(long)]
        magtype: Option<String>,
    },

    /// Display event and pick counts of a catalog file
    Info {
        /// Input catalog file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the detected format of a file
    Detect {
        /// Input file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            to,
            compress,
            compression_level,
            depth_in_m,
            magtype,
        } => convert(
            &input,
            &output,
            to.as_deref(),
            compress,
            compression_level,
            depth_in_m,
            magtype,
        ),
        Commands::Info { file } => show_info(&file),
        Commands::Detect { file } => {
            let format = detect(&file)
                .with_context(|| format!("format of {} not recognized", file.display()))?;
            println!("{format}");
            Ok(())
        }
    }
}

fn target_format(output: &Path, to: Option<&str>) -> Result<FileFormat> {
    match to {
        Some(name) => match name.to_uppercase().as_str() {
            "CSV" => Ok(FileFormat::Csv),
            "CSZ" => Ok(FileFormat::Csz),
            "EVENTTXT" => bail!("EVENTTXT is read-only"),
            other => bail!("unknown output format {other:?}"),
        },
        None => {
            let by_extension = output
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("csz"))
                .unwrap_or(false);
            Ok(if by_extension {
                FileFormat::Csz
            } else {
                FileFormat::Csv
            })
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn convert(
    input: &Path,
    output: &Path,
    to: Option<&str>,
    compress: bool,
    compression_level: Option<i64>,
    depth_in_m: bool,
    magtype: Option<String>,
) -> Result<()> {
    let read_options = CsvReadOptions {
        depth_in_km: !depth_in_m,
        defaults: Defaults { magtype },
        ..CsvReadOptions::default()
    };
    let catalog = read_events(input, &read_options)
        .with_context(|| format!("cannot read {}", input.display()))?;
    info!("read {} events from {}", catalog.len(), input.display());

    match target_format(output, to)? {
        FileFormat::Csv => {
            let options = CsvWriteOptions {
                depth_in_km: !depth_in_m,
                ..CsvWriteOptions::default()
            };
            write_csv(&catalog, output, &options)
                .with_context(|| format!("cannot write {}", output.display()))?;
        }
        FileFormat::Csz => {
            let options = CszWriteOptions {
                depth_in_km: !depth_in_m,
                compression: Compression::from(compress),
                compression_level,
                ..CszWriteOptions::default()
            };
            write_csz(&catalog, output, &options)
                .with_context(|| format!("cannot write {}", output.display()))?;
        }
        FileFormat::EventTxt => bail!("EVENTTXT is read-only"),
    }
    info!("wrote {}", output.display());
    Ok(())
}

fn show_info(file: &Path) -> Result<()> {
    let format = detect(file)
        .with_context(|| format!("format of {} not recognized", file.display()))?;
    let catalog = read_events(file, &CsvReadOptions::default())?;
    let picks: usize = catalog.iter().map(|event| event.picks.len()).sum();
    let magnitudes = catalog
        .iter()
        .filter(|event| event.preferred_magnitude().is_some())
        .count();
    println!("format:     {format}");
    println!("events:     {}", catalog.len());
    println!("magnitudes: {magnitudes}");
    println!("picks:      {picks}");
    Ok(())
}
