//! CSV catalog writer.
//!
//! One header line from the active field template, one data line per
//! event. An event without a usable origin is skipped with a warning; an
//! event without a magnitude is still written, with empty magnitude and
//! magtype cells.

use std::io::Write;

use log::warn;

use crate::error::Result;
use crate::event::Catalog;
use crate::io::Output;
use crate::template::{Fields, Record, TemplateConfig, Value};

/// Options for [`write_csv`].
#[derive(Debug, Clone)]
pub struct CsvWriteOptions {
    /// Field selection, resolved through `templates`
    pub fields: Fields,
    /// Write depth in kilometers (default) rather than meters
    pub depth_in_km: bool,
    /// Cell delimiter
    pub delimiter: char,
    /// Named template presets
    pub templates: TemplateConfig,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            fields: Fields::default(),
            depth_in_km: true,
            delimiter: ',',
            templates: TemplateConfig::events(),
        }
    }
}

/// Write a catalog to a CSV file or stream.
///
/// # Examples
///
/// ```no_run
/// use seiscsv::writer::{write_csv, CsvWriteOptions};
/// use seiscsv::event::Catalog;
///
/// let catalog = Catalog::new();
/// write_csv(&catalog, "events.csv", &CsvWriteOptions::default()).unwrap();
/// ```
pub fn write_csv<'a>(
    catalog: &Catalog,
    output: impl Into<Output<'a>>,
    options: &CsvWriteOptions,
) -> Result<()> {
    let template = options.templates.resolve(&options.fields)?;
    let mut sink = output.into().create()?;
    writeln!(sink, "{}", template.header(options.delimiter))?;
    let unit = if options.depth_in_km { 1000.0 } else { 1.0 };
    for event in catalog {
        let evid = event.short_id();
        let Some(origin) = event.preferred_origin() else {
            warn!("no origin found, skipping event {evid}");
            continue;
        };
        let (mag, magtype) = match event.preferred_magnitude() {
            Some(magnitude) => (
                magnitude.mag,
                magnitude.magnitude_type.clone().unwrap_or_default(),
            ),
            None => {
                warn!("no magnitude found for event {evid}");
                (f64::NAN, String::new())
            }
        };
        let mut record = Record::new();
        record.insert("time".to_string(), Value::Time(origin.time));
        record.insert("lat".to_string(), Value::Float(origin.latitude));
        record.insert("lon".to_string(), Value::Float(origin.longitude));
        record.insert("dep".to_string(), Value::Float(origin.depth / unit));
        record.insert("mag".to_string(), Value::Float(mag));
        record.insert("magtype".to_string(), Value::Text(magtype));
        record.insert("id".to_string(), Value::Text(evid.to_string()));
        writeln!(sink, "{}", template.render(&record, options.delimiter)?)?;
    }
    sink.flush()?;
    Ok(())
}
