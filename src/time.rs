//! UTC timestamps with sub-second precision.
//!
//! Origin and pick times are exchanged as ISO-8601-like text in the CSV
//! formats. Parsing is deliberately lenient: `T` or space separator,
//! fractional seconds of any length (including none), an optional trailing
//! `Z`, and non-zero-padded components as emitted by external catalogs.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{CsvError, Result};

/// A UTC timestamp.
///
/// # Examples
///
/// ```
/// use seiscsv::time::UtcTime;
///
/// let t = UtcTime::parse("2023-05-06T19:55:01.3").unwrap();
/// assert_eq!(t.to_string(), "2023-05-06T19:55:01.300000Z");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UtcTime(DateTime<Utc>);

impl UtcTime {
    /// Parse ISO-8601-like text into a UTC timestamp.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let stripped = trimmed
            .strip_suffix('Z')
            .or_else(|| trimmed.strip_suffix('z'))
            .unwrap_or(trimmed);
        let normalized = stripped.replacen(&['T', 't'][..], " ", 1);
        NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S%.f")
            .map(|naive| Self(naive.and_utc()))
            .map_err(|_| CsvError::TimeParse(text.to_string()))
    }

    /// Seconds elapsed since `other`, negative if `self` is earlier.
    pub fn seconds_since(&self, other: &UtcTime) -> f64 {
        let delta = self.0 - other.0;
        match delta.num_nanoseconds() {
            Some(ns) => ns as f64 / 1e9,
            None => delta.num_milliseconds() as f64 / 1e3,
        }
    }

    /// Shift by a fractional number of seconds.
    pub fn add_seconds(&self, seconds: f64) -> Self {
        Self(self.0 + chrono::Duration::nanoseconds((seconds * 1e9).round() as i64))
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl From<DateTime<Utc>> for UtcTime {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%.6fZ"))
    }
}
