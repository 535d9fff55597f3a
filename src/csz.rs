//! CSZ bundle codec.
//!
//! A CSZ file is a zip archive holding the events table as `events.csv`
//! and one optional `picks_<eventid>.csv` member per event. The archive
//! comment tags the format (`CSZ format v<version> obspy_no_uncompress`)
//! so detection never has to decompress anything, and generic zip
//! handling in host tooling leaves the bundle alone.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{CsvError, Result};
use crate::event::Catalog;
use crate::format::Sniff;
use crate::io::{Input, Output};
use crate::picks::{read_picks, write_picks};
use crate::reader::{read_csv, CsvReadOptions};
use crate::template::{Fields, TemplateConfig};
use crate::writer::{write_csv, CsvWriteOptions};

/// Archive comment identifying a CSZ bundle.
pub const CSZ_COMMENT: &str = concat!(
    "CSZ format v",
    env!("CARGO_PKG_VERSION"),
    " obspy_no_uncompress"
);

/// Name of the required events-table member.
pub const EVENTS_MEMBER: &str = "events.csv";

/// Compression applied to archive members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// Store members uncompressed (default)
    #[default]
    Stored,
    /// Deflate members
    Deflated,
}

impl Compression {
    fn method(self) -> CompressionMethod {
        match self {
            Self::Stored => CompressionMethod::Stored,
            Self::Deflated => CompressionMethod::Deflated,
        }
    }
}

impl From<bool> for Compression {
    /// `true` is shorthand for deflate.
    fn from(value: bool) -> Self {
        if value {
            Self::Deflated
        } else {
            Self::Stored
        }
    }
}

/// Options for [`write_csz`].
#[derive(Debug, Clone)]
pub struct CszWriteOptions {
    /// Field selection for the events table
    pub fields: Fields,
    /// Field selection for the pick tables
    pub fields_picks: Fields,
    /// Write depth in kilometers (default) rather than meters
    pub depth_in_km: bool,
    /// Cell delimiter within the member tables
    pub delimiter: char,
    /// Member compression method
    pub compression: Compression,
    /// Member compression level, where the method supports one
    pub compression_level: Option<i64>,
    /// Named presets for the events table
    pub templates: TemplateConfig,
    /// Named presets for the pick tables
    pub pick_templates: TemplateConfig,
}

impl Default for CszWriteOptions {
    fn default() -> Self {
        Self {
            fields: Fields::default(),
            fields_picks: Fields::default(),
            depth_in_km: true,
            delimiter: ',',
            compression: Compression::default(),
            compression_level: None,
            templates: TemplateConfig::events(),
            pick_templates: TemplateConfig::picks(),
        }
    }
}

/// Write a catalog with picks to a CSZ file.
pub fn write_csz(
    catalog: &Catalog,
    path: impl AsRef<Path>,
    options: &CszWriteOptions,
) -> Result<()> {
    let mut sink = write_csz_to(catalog, BufWriter::new(File::create(path)?), options)?;
    sink.flush()?;
    Ok(())
}

/// Write a catalog with picks to any seekable sink, returning the sink.
///
/// Events with no picks, or with no resolvable origin, get no pick
/// member; the events table itself still warns about and skips origin-less
/// events.
pub fn write_csz_to<W: Write + Seek>(
    catalog: &Catalog,
    sink: W,
    options: &CszWriteOptions,
) -> Result<W> {
    let mut archive = ZipWriter::new(sink);
    archive.set_comment(CSZ_COMMENT);
    let member_options = SimpleFileOptions::default()
        .compression_method(options.compression.method())
        .compression_level(options.compression_level);

    let csv_options = CsvWriteOptions {
        fields: options.fields.clone(),
        depth_in_km: options.depth_in_km,
        delimiter: options.delimiter,
        templates: options.templates.clone(),
    };
    // stage each member in memory so a failed event cannot leave a
    // half-written entry behind
    let mut staged = Vec::new();
    write_csv(catalog, Output::from_writer(&mut staged), &csv_options)?;
    archive.start_file(EVENTS_MEMBER, member_options)?;
    archive.write_all(&staged)?;

    for event in catalog {
        if event.picks.is_empty() || event.preferred_origin().is_none() {
            continue;
        }
        staged.clear();
        write_picks(
            event,
            &mut staged,
            &options.fields_picks,
            &options.pick_templates,
            options.delimiter,
        )?;
        archive.start_file(format!("picks_{}.csv", event.short_id()), member_options)?;
        archive.write_all(&staged)?;
    }
    Ok(archive.finish()?)
}

/// Read a CSZ file into a catalog with picks.
pub fn read_csz(path: impl AsRef<Path>, options: &CsvReadOptions) -> Result<Catalog> {
    read_csz_from(File::open(path)?, options)
}

/// Read a CSZ bundle from any seekable source.
///
/// Events without a matching `picks_<eventid>.csv` member keep empty
/// pick lists. An event that lacks a usable origin when its pick member
/// is attached is a hard error.
pub fn read_csz_from<R: Read + Seek>(source: R, options: &CsvReadOptions) -> Result<Catalog> {
    let mut archive = ZipArchive::new(source)?;
    let mut catalog = {
        let entry = archive.by_name(EVENTS_MEMBER).map_err(|error| match error {
            ZipError::FileNotFound => CsvError::MissingMember(EVENTS_MEMBER.to_string()),
            other => other.into(),
        })?;
        read_csv(Input::from_reader(entry), options)?
    };
    for event in catalog.iter_mut() {
        let member = format!("picks_{}.csv", event.short_id());
        match archive.by_name(&member) {
            Ok(entry) => read_picks(event, entry)?,
            Err(ZipError::FileNotFound) => continue,
            Err(other) => return Err(other.into()),
        }
    }
    Ok(catalog)
}

/// Probe whether the file is a CSZ bundle.
///
/// Matches iff the target is a valid zip archive whose comment starts
/// with the format tag and ends with the no-auto-decompress marker; the
/// archive members are never read.
pub fn sniff_csz(path: impl AsRef<Path>) -> Sniff {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_) => return Sniff::Inconclusive,
    };
    match ZipArchive::new(BufReader::new(file)) {
        Ok(archive) => {
            let comment = archive.comment();
            if comment.starts_with(b"CSZ") && comment.ends_with(b"obspy_no_uncompress") {
                Sniff::Match
            } else {
                Sniff::NoMatch
            }
        }
        Err(_) => Sniff::NoMatch,
    }
}
