//! CSV catalog reader.
//!
//! Reads files written by this crate as well as external CSVs: leading
//! lines can be skipped and column names overridden, with `_`-prefixed
//! names marking columns to ignore. Row parsing concerns (delimiter,
//! quoting, whitespace) are delegated to the `csv` crate.

use std::collections::{BTreeMap, HashMap};
use std::io::BufRead;

use crate::error::Result;
use crate::event::Catalog;
use crate::format::Sniff;
use crate::io::Input;
use crate::row::{event_from_row, Row};
use crate::template::is_skip_name;

/// Default values substituted while reading, currently only the
/// magnitude-type label.
#[derive(Debug, Clone, Default)]
pub struct Defaults {
    /// Magnitude type used where a row gives none
    pub magtype: Option<String>,
}

/// Column-name override for foreign layouts.
///
/// Unnamed positions use the `_` skip sentinel. All three shapes
/// normalize to the same ordered name list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnNames {
    /// Whitespace-joined name list, e.g. `"year mon day _ lat lon"`
    Joined(String),
    /// Pre-split ordered name list
    List(Vec<String>),
    /// Sparse column-index-to-name mapping; gaps fill with the sentinel
    Sparse(BTreeMap<usize, String>),
}

impl ColumnNames {
    pub(crate) fn resolve(&self) -> Vec<String> {
        match self {
            Self::Joined(joined) => joined.split_whitespace().map(str::to_string).collect(),
            Self::List(names) => names.clone(),
            Self::Sparse(map) => {
                let len = map.keys().next_back().map_or(0, |&i| i + 1);
                let mut names = vec!["_".to_string(); len];
                for (&index, name) in map {
                    names[index] = name.clone();
                }
                names
            }
        }
    }
}

/// Options for [`read_csv`].
#[derive(Debug, Clone)]
pub struct CsvReadOptions {
    /// Number of leading lines to skip before parsing
    pub skipheader: usize,
    /// Depth column is in kilometers (default) rather than meters
    pub depth_in_km: bool,
    /// Default values substituted while reading
    pub defaults: Defaults,
    /// Column-name override; when set, the file's own header is not used
    pub names: Option<ColumnNames>,
    /// Cell delimiter
    pub delimiter: u8,
    /// Quote character
    pub quote: u8,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            skipheader: 0,
            depth_in_km: true,
            defaults: Defaults::default(),
            names: None,
            delimiter: b',',
            quote: b'"',
        }
    }
}

fn skip_lines(source: &mut dyn BufRead, count: usize) -> Result<()> {
    let mut line = String::new();
    for _ in 0..count {
        line.clear();
        source.read_line(&mut line)?;
    }
    Ok(())
}

fn csv_reader<'a>(
    source: Box<dyn BufRead + 'a>,
    options: &CsvReadOptions,
) -> csv::Reader<Box<dyn BufRead + 'a>> {
    csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .flexible(true)
        .trim(csv::Trim::All)
        .has_headers(options.names.is_none())
        .from_reader(source)
}

/// Column name to index, first occurrence wins, sentinels dropped.
fn column_index<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    options: &CsvReadOptions,
) -> Result<HashMap<String, usize>> {
    let names: Vec<String> = match &options.names {
        Some(names) => names.resolve(),
        None => reader.headers()?.iter().map(str::to_string).collect(),
    };
    let mut columns = HashMap::new();
    for (index, name) in names.iter().enumerate() {
        if name.is_empty() || is_skip_name(name) {
            continue;
        }
        columns.entry(name.clone()).or_insert(index);
    }
    Ok(columns)
}

/// Read a CSV file or stream into a catalog.
///
/// Empty input yields an empty catalog. The first unparsable row aborts
/// the whole read; no partial catalog is returned.
///
/// # Examples
///
/// ```
/// use seiscsv::reader::{read_csv, CsvReadOptions};
/// use seiscsv::io::Input;
///
/// let data = "time,lat,lon,dep,mag,magtype,id\n\
///             2023-05-06T19:55:01.30000,10.194200,124.830000,50.470,0.20,Ml,2023abcde\n";
/// let catalog = read_csv(
///     Input::from_reader(data.as_bytes()),
///     &CsvReadOptions::default(),
/// )
/// .unwrap();
/// assert_eq!(catalog.len(), 1);
/// ```
pub fn read_csv<'a>(input: impl Into<Input<'a>>, options: &CsvReadOptions) -> Result<Catalog> {
    let mut source = input.into().open()?;
    skip_lines(&mut source, options.skipheader)?;
    let mut reader = csv_reader(source, options);
    let columns = column_index(&mut reader, options)?;
    let mut catalog = Catalog::new();
    for record in reader.records() {
        let record = record?;
        let event = event_from_row(
            &Row::new(&columns, &record),
            options.depth_in_km,
            options.defaults.magtype.as_deref(),
        )?;
        catalog.push(event);
    }
    Ok(catalog)
}

/// Probe whether the input looks like a catalog CSV.
///
/// [`Sniff::Match`] iff the first data row parses into an event; a file
/// with zero data rows is [`Sniff::NoMatch`] even though [`read_csv`]
/// would return an empty catalog for it.
pub fn sniff_csv<'a>(input: impl Into<Input<'a>>, options: &CsvReadOptions) -> Sniff {
    let mut source = match input.into().open() {
        Ok(source) => source,
        Err(_) => return Sniff::Inconclusive,
    };
    if skip_lines(&mut source, options.skipheader).is_err() {
        return Sniff::Inconclusive;
    }
    let mut reader = csv_reader(source, options);
    let columns = match column_index(&mut reader, options) {
        Ok(columns) => columns,
        Err(_) => return Sniff::NoMatch,
    };
    match reader.records().next() {
        Some(Ok(record)) => {
            let row = Row::new(&columns, &record);
            match event_from_row(&row, options.depth_in_km, options.defaults.magtype.as_deref()) {
                Ok(_) => Sniff::Match,
                Err(_) => Sniff::NoMatch,
            }
        }
        Some(Err(_)) | None => Sniff::NoMatch,
    }
}
