//! Columnar table loader.
//!
//! Loads a CSV or CSZ file straight into named, typed columns for
//! analysis use, bypassing the structured event model. The schema is
//! fixed: time at millisecond resolution, lat/lon/dep/mag as floats,
//! magtype and id as width-limited text. Columns outside the schema are
//! dropped; `only` restricts the result to a named subset.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use zip::result::ZipError;
use zip::ZipArchive;

use crate::csz::EVENTS_MEMBER;
use crate::error::{CsvError, Result};
use crate::event::Catalog;
use crate::io::{Input, Output};
use crate::time::UtcTime;
use crate::writer::{write_csv, CsvWriteOptions};

/// Width limit of the magtype text column.
const MAGTYPE_WIDTH: usize = 10;
/// Width limit of the id text column.
const ID_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Time,
    Float,
    Text(usize),
}

/// Fixed column schema: `(name, kind)` for every loadable column.
fn schema_kind(name: &str) -> Option<(&'static str, ColumnKind)> {
    match name {
        "time" => Some(("time", ColumnKind::Time)),
        "lat" => Some(("lat", ColumnKind::Float)),
        "lon" => Some(("lon", ColumnKind::Float)),
        "dep" => Some(("dep", ColumnKind::Float)),
        "mag" => Some(("mag", ColumnKind::Float)),
        "magtype" => Some(("magtype", ColumnKind::Text(MAGTYPE_WIDTH))),
        "id" => Some(("id", ColumnKind::Text(ID_WIDTH))),
        _ => None,
    }
}

/// One typed column of a loaded table.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Milliseconds since the Unix epoch; `None` for empty cells
    Time(Vec<Option<i64>>),
    /// Floating-point values; empty cells load as NaN
    Float(Vec<f64>),
    /// Width-limited text
    Text(Vec<String>),
}

impl Column {
    /// Borrow the float values, if this is a float column.
    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            Self::Float(values) => Some(values),
            _ => None,
        }
    }

    /// Borrow the text values, if this is a text column.
    pub fn as_texts(&self) -> Option<&[String]> {
        match self {
            Self::Text(values) => Some(values),
            _ => None,
        }
    }

    /// Borrow the time values, if this is a time column.
    pub fn as_times(&self) -> Option<&[Option<i64>]> {
        match self {
            Self::Time(values) => Some(values),
            _ => None,
        }
    }
}

/// A columnar view of an events table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTable {
    columns: Vec<(String, Column)>,
    rows: usize,
}

impl EventTable {
    /// Column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, data)| data)
    }

    /// Column names in appearance order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    /// True if the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// Options for [`load_table`].
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Restrict to this named column subset
    pub only: Option<Vec<String>>,
    /// Column-name override; when absent the file's header line is used
    pub names: Option<Vec<String>>,
    /// Cell delimiter
    pub delimiter: u8,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            only: None,
            names: None,
            delimiter: b',',
        }
    }
}

/// Load a CSV or CSZ file into a columnar table.
///
/// For a CSZ path the embedded events table is located transparently.
pub fn load_table<'a>(input: impl Into<Input<'a>>, options: &TableOptions) -> Result<EventTable> {
    let input = input.into();
    if let Some(path) = input.path() {
        if let Some(table) = load_from_archive(path, options)? {
            return Ok(table);
        }
    }

    let mut source = input.open()?;
    let names: Vec<String> = match &options.names {
        Some(names) => names.clone(),
        None => {
            let mut header = String::new();
            source.read_line(&mut header)?;
            header
                .trim_end()
                .split(options.delimiter as char)
                .map(|name| name.trim().to_string())
                .collect()
        }
    };

    let selected: Vec<(usize, &'static str, ColumnKind)> = names
        .iter()
        .enumerate()
        .filter_map(|(index, name)| {
            let (name, kind) = schema_kind(name)?;
            let wanted = options
                .only
                .as_ref()
                .map_or(true, |only| only.iter().any(|n| n == name));
            wanted.then_some((index, name, kind))
        })
        .collect();

    let mut columns: Vec<(String, Column)> = selected
        .iter()
        .map(|&(_, name, kind)| {
            let data = match kind {
                ColumnKind::Time => Column::Time(Vec::new()),
                ColumnKind::Float => Column::Float(Vec::new()),
                ColumnKind::Text(_) => Column::Text(Vec::new()),
            };
            (name.to_string(), data)
        })
        .collect();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .has_headers(false)
        .from_reader(source);
    let mut rows = 0;
    for record in reader.records() {
        let record = record?;
        for (&(index, name, kind), (_, data)) in selected.iter().zip(columns.iter_mut()) {
            let cell = record.get(index).unwrap_or("");
            match (kind, data) {
                (ColumnKind::Time, Column::Time(values)) => values.push(if cell.is_empty() {
                    None
                } else {
                    Some(UtcTime::parse(cell)?.timestamp_millis())
                }),
                (ColumnKind::Float, Column::Float(values)) => values.push(if cell.is_empty() {
                    f64::NAN
                } else {
                    cell.parse().map_err(|_| CsvError::InvalidNumber {
                        field: name,
                        value: cell.to_string(),
                    })?
                }),
                (ColumnKind::Text(width), Column::Text(values)) => {
                    values.push(cell.chars().take(width).collect());
                }
                _ => unreachable!("column kind mismatch"),
            }
        }
        rows += 1;
    }
    Ok(EventTable { columns, rows })
}

/// Try the path as a zip archive; `Ok(None)` means "not an archive".
fn load_from_archive(path: &Path, options: &TableOptions) -> Result<Option<EventTable>> {
    let Ok(file) = File::open(path) else {
        return Ok(None); // plain open will report the error
    };
    let Ok(mut archive) = ZipArchive::new(BufReader::new(file)) else {
        return Ok(None);
    };
    let entry = archive.by_name(EVENTS_MEMBER).map_err(|error| match error {
        ZipError::FileNotFound => CsvError::MissingMember(EVENTS_MEMBER.to_string()),
        other => other.into(),
    })?;
    load_table(Input::from_reader(entry), options).map(Some)
}

/// Convert a catalog to a columnar table through an in-memory CSV.
pub fn catalog_to_table(catalog: &Catalog) -> Result<EventTable> {
    let mut staged = Vec::new();
    write_csv(catalog, Output::from_writer(&mut staged), &CsvWriteOptions::default())?;
    load_table(Input::from_reader(Cursor::new(staged)), &TableOptions::default())
}
