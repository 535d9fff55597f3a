//! Error types shared by the CSV, CSZ and EVENTTXT codecs.

use std::path::PathBuf;

/// Errors that can occur while reading or writing catalog files
#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Row-level CSV error from the underlying delimited parser
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Unparsable timestamp text
    #[error("cannot parse time: {0:?}")]
    TimeParse(String),

    /// A column required by the row codec is missing
    #[error("missing column: {0}")]
    MissingColumn(&'static str),

    /// A numeric column holds text that does not parse
    #[error("cannot parse {field} value {value:?} as number")]
    InvalidNumber {
        /// Column name
        field: &'static str,
        /// Offending cell text
        value: String,
    },

    /// A record handed to the template renderer lacks a required field
    #[error("record is missing field {0:?} required by the template")]
    MissingField(String),

    /// A template fragment does not follow the `{name!conv:spec}` shape
    #[error("invalid template fragment {0:?}")]
    InvalidTemplate(String),

    /// A field preset name has no entry in the template configuration
    #[error("unknown field preset {0:?}")]
    UnknownPreset(String),

    /// An event has no usable origin where one is required
    #[error("no origin found for event {0}")]
    NoOrigin(String),

    /// A required archive member is absent
    #[error("archive member {0:?} not found")]
    MissingMember(String),

    /// No registered format matched the file
    #[error("format of {} not recognized", .0.display())]
    UnknownFormat(PathBuf),
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, CsvError>;
