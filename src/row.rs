//! Row codec: one tabular row into one structured event.
//!
//! Bad `time`/`lat`/`lon`/`dep` cells are hard errors that abort the whole
//! read. Bad `mag`/`magtype` cells are recovered locally: the event is kept
//! with zero magnitudes.

use std::collections::HashMap;

use crate::error::{CsvError, Result};
use crate::event::{Event, Magnitude, Origin, ResourceId};
use crate::time::UtcTime;

/// Magnitude-type labels treated as "no value given".
const MAGTYPE_SENTINELS: [&str; 3] = ["none", "null", "nan"];

/// One data row, addressed by column name.
pub(crate) struct Row<'r> {
    columns: &'r HashMap<String, usize>,
    record: &'r csv::StringRecord,
}

impl<'r> Row<'r> {
    pub(crate) fn new(columns: &'r HashMap<String, usize>, record: &'r csv::StringRecord) -> Self {
        Self { columns, record }
    }

    /// Trimmed cell text for a named column, `None` if the column is
    /// absent or the row is too short.
    pub(crate) fn get(&self, name: &str) -> Option<&'r str> {
        self.columns
            .get(name)
            .and_then(|&index| self.record.get(index))
            .map(str::trim)
    }
}

pub(crate) fn parse_float(row: &Row<'_>, field: &'static str) -> Result<f64> {
    let text = row.get(field).ok_or(CsvError::MissingColumn(field))?;
    text.parse().map_err(|_| CsvError::InvalidNumber {
        field,
        value: text.to_string(),
    })
}

/// Build one event from one row.
pub(crate) fn event_from_row(
    row: &Row<'_>,
    depth_in_km: bool,
    default_magtype: Option<&str>,
) -> Result<Event> {
    let time = match row.get("time") {
        Some(text) => UtcTime::parse(text)?,
        None => {
            let part = |name| row.get(name).ok_or(CsvError::MissingColumn("time"));
            let composed = format!(
                "{}-{}-{} {}:{}:{}",
                part("year")?,
                part("mon")?,
                part("day")?,
                part("hour")?,
                part("minu")?,
                part("sec")?
            );
            UtcTime::parse(&composed)?
        }
    };
    let latitude = parse_float(row, "lat")?;
    let longitude = parse_float(row, "lon")?;
    let unit = if depth_in_km { 1000.0 } else { 1.0 };
    let depth = parse_float(row, "dep")? * unit;

    let magnitudes = match row.get("mag").map(str::parse::<f64>) {
        Some(Ok(mag)) if mag.is_finite() => {
            // add zero to collapse negative zero
            let mag = mag + 0.0;
            let magnitude_type = match row.get("magtype") {
                Some(label)
                    if !label.is_empty()
                        && !MAGTYPE_SENTINELS.contains(&label.to_lowercase().as_str()) =>
                {
                    Some(label.to_string())
                }
                _ => default_magtype.map(str::to_string),
            };
            vec![Magnitude {
                mag,
                magnitude_type,
            }]
        }
        _ => Vec::new(),
    };

    let resource_id = match row.get("id") {
        Some(id) => ResourceId::from(id),
        None => ResourceId::new(),
    };

    Ok(Event {
        resource_id,
        origins: vec![Origin::new(time, latitude, longitude, depth)],
        magnitudes,
        picks: Vec::new(),
        preferred_origin_index: None,
        preferred_magnitude_index: None,
    })
}
