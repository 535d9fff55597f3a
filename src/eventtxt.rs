//! EVENTTXT reader.
//!
//! The FDSN event-text layout: pipe-delimited, one header line, 13
//! columns of which id, time, lat, lon, dep, magtype and mag are used.
//! This is a preset parameterization of the CSV reader, not a separate
//! parser.

use crate::error::Result;
use crate::event::Catalog;
use crate::format::Sniff;
use crate::io::Input;
use crate::reader::{read_csv, sniff_csv, ColumnNames, CsvReadOptions, Defaults};

/// Column names mapping the 13-column layout onto the row codec.
pub const EVENTTXT_COLUMNS: [&str; 13] = [
    "id", "time", "lat", "lon", "dep", "_", "_", "_", "_", "magtype", "mag", "_", "_",
];

fn eventtxt_options(defaults: Defaults) -> CsvReadOptions {
    CsvReadOptions {
        skipheader: 1,
        delimiter: b'|',
        names: Some(ColumnNames::List(
            EVENTTXT_COLUMNS.iter().map(|s| s.to_string()).collect(),
        )),
        defaults,
        ..CsvReadOptions::default()
    }
}

/// Read an EVENTTXT file or stream into a catalog.
pub fn read_eventtxt<'a>(input: impl Into<Input<'a>>, defaults: &Defaults) -> Result<Catalog> {
    read_csv(input, &eventtxt_options(defaults.clone()))
}

/// Probe whether the input looks like an EVENTTXT file.
pub fn sniff_eventtxt<'a>(input: impl Into<Input<'a>>) -> Sniff {
    sniff_csv(input, &eventtxt_options(Defaults::default()))
}
