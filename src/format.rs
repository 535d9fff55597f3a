//! Format registry and detection.
//!
//! Each supported format offers a sniff predicate and a reader; CSV and
//! CSZ also offer writers. Sniffing is a side-effect-free structural
//! check (archive comment tag, header-and-first-row shape), never a
//! full decode.

use std::fmt;
use std::path::Path;

use crate::csz::{read_csz, sniff_csz};
use crate::error::{CsvError, Result};
use crate::event::Catalog;
use crate::eventtxt::{read_eventtxt, sniff_eventtxt};
use crate::reader::{read_csv, sniff_csv, CsvReadOptions};

/// Outcome of a format probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sniff {
    /// The file is of this format
    Match,
    /// The file is definitely not of this format
    NoMatch,
    /// The file could not be examined
    Inconclusive,
}

/// A registered catalog file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Zip bundle of events table plus per-event pick tables
    Csz,
    /// Pipe-delimited FDSN event text
    EventTxt,
    /// Plain events CSV
    Csv,
}

impl FileFormat {
    /// All formats in detection order.
    ///
    /// CSZ comes first so the zip bundle is never mistaken for plain
    /// text; EVENTTXT before CSV because its pipe layout is the more
    /// specific shape.
    pub const ALL: [Self; 3] = [Self::Csz, Self::EventTxt, Self::Csv];

    /// Format name as exposed to format-detecting callers.
    pub fn name(self) -> &'static str {
        match self {
            Self::Csz => "CSZ",
            Self::EventTxt => "EVENTTXT",
            Self::Csv => "CSV",
        }
    }

    /// Probe whether the file at `path` is of this format.
    pub fn sniff(self, path: &Path) -> Sniff {
        match self {
            Self::Csz => sniff_csz(path),
            Self::EventTxt => sniff_eventtxt(path),
            Self::Csv => sniff_csv(path, &CsvReadOptions::default()),
        }
    }

    /// Read the file at `path` as this format.
    pub fn read(self, path: &Path, options: &CsvReadOptions) -> Result<Catalog> {
        match self {
            Self::Csz => read_csz(path, options),
            Self::EventTxt => read_eventtxt(path, &options.defaults),
            Self::Csv => read_csv(path, options),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the format of the file at `path`.
pub fn detect(path: &Path) -> Option<FileFormat> {
    FileFormat::ALL
        .into_iter()
        .find(|format| format.sniff(path) == Sniff::Match)
}

/// Read a catalog from `path`, auto-detecting the format.
pub fn read_events(path: impl AsRef<Path>, options: &CsvReadOptions) -> Result<Catalog> {
    let path = path.as_ref();
    let format = detect(path).ok_or_else(|| CsvError::UnknownFormat(path.to_path_buf()))?;
    format.read(path, options)
}
