//! # seiscsv - Earthquake Catalogs as CSV, CSZ and EVENTTXT
//!
//! `seiscsv` reads and writes earthquake catalogs in three related text
//! and archive formats:
//!
//! - **CSV**: one header line plus one line per event, under a
//!   configurable field template (time, lat, lon, dep, mag, magtype, id
//!   by default).
//! - **CSZ**: a zip bundle of the events CSV plus one pick table per
//!   event, tagged by an archive comment so it is never mistaken for a
//!   plain CSV or a generic zip.
//! - **EVENTTXT**: the pipe-delimited FDSN event-text layout (read only).
//!
//! ## Quick Start
//!
//! ```
//! use seiscsv::io::{Input, Output};
//! use seiscsv::reader::{read_csv, CsvReadOptions};
//! use seiscsv::writer::{write_csv, CsvWriteOptions};
//!
//! let data = "time,lat,lon,dep,mag,magtype,id\n\
//!             2023-05-06T19:55:01.30000,10.194200,124.830000,50.470,0.20,Ml,2023abcde\n";
//! let catalog = read_csv(Input::from_reader(data.as_bytes()), &CsvReadOptions::default())?;
//! assert_eq!(catalog.len(), 1);
//!
//! let mut out = Vec::new();
//! write_csv(&catalog, Output::from_writer(&mut out), &CsvWriteOptions::default())?;
//! assert_eq!(String::from_utf8_lossy(&out), data);
//! # Ok::<(), seiscsv::error::CsvError>(())
//! ```
//!
//! ## Reading External Catalogs
//!
//! Foreign CSV layouts are mapped onto the expected columns with a name
//! override; `_`-prefixed names skip columns:
//!
//! ```no_run
//! use seiscsv::reader::{read_csv, ColumnNames, CsvReadOptions};
//!
//! let options = CsvReadOptions {
//!     skipheader: 1,
//!     names: Some(ColumnNames::Joined(
//!         "year mon day hour minu sec _ lat lon dep _ _ mag _ id".to_string(),
//!     )),
//!     ..CsvReadOptions::default()
//! };
//! let catalog = read_csv("external.csv", &options)?;
//! # Ok::<(), seiscsv::error::CsvError>(())
//! ```
//!
//! ## Format Detection
//!
//! Each format offers a structural sniff; [`format::read_events`]
//! dispatches through detection:
//!
//! ```no_run
//! use seiscsv::format::{detect, read_events, FileFormat};
//! use seiscsv::reader::CsvReadOptions;
//!
//! let catalog = read_events("catalog.csz", &CsvReadOptions::default())?;
//! # Ok::<(), seiscsv::error::CsvError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`event`]: the catalog object model (events, origins, magnitudes,
//!   picks, arrivals)
//! - [`template`]: field-template engine shared by all writers
//! - [`reader`] / [`writer`]: the events CSV codec
//! - [`picks`]: per-event pick tables
//! - [`csz`]: the zip bundle codec
//! - [`eventtxt`]: FDSN event-text preset reader
//! - [`table`]: columnar loader bypassing the object model
//! - [`format`]: format registry and detection

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod csz;
pub mod error;
pub mod event;
pub mod eventtxt;
pub mod format;
pub mod io;
pub mod picks;
pub mod reader;
mod row;
pub mod table;
pub mod template;
pub mod time;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::csz::{read_csz, sniff_csz, write_csz, Compression, CszWriteOptions};
    pub use crate::error::{CsvError, Result};
    pub use crate::event::{
        Arrival, Catalog, Event, Magnitude, Origin, Pick, ResourceId, WaveformStreamId,
    };
    pub use crate::eventtxt::{read_eventtxt, sniff_eventtxt};
    pub use crate::format::{detect, read_events, FileFormat, Sniff};
    pub use crate::io::{Input, Output};
    pub use crate::reader::{read_csv, sniff_csv, ColumnNames, CsvReadOptions, Defaults};
    pub use crate::table::{catalog_to_table, load_table, Column, EventTable, TableOptions};
    pub use crate::template::{Fields, FieldTemplate, TemplateConfig};
    pub use crate::time::UtcTime;
    pub use crate::writer::{write_csv, CsvWriteOptions};
}
