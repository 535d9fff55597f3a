//! Field-template engine for the tabular formats.
//!
//! A template is an ordered list of `{name}`, `{name!s:.N}` or `{name:.Nf}`
//! fragments. It is parsed once into a structured field table and then
//! reused: the same template yields the header line (field names joined by
//! the delimiter) and renders one record per data line.
//!
//! The canonical event template is
//! `{time!s:.25} {lat:.6f} {lon:.6f} {dep:.3f} {mag:.2f} {magtype} {id}`:
//! time as ISO text truncated to 25 characters, fixed-point numbers, and
//! verbatim text fields. Presets live in an explicit [`TemplateConfig`]
//! rather than a process-wide table, so callers can register their own
//! record shapes.

use std::collections::HashMap;

use crate::error::{CsvError, Result};
use crate::time::UtcTime;

/// Canonical event-table template, preset name "basic".
pub const BASIC_EVENT_TEMPLATE: &str =
    "{time!s:.25} {lat:.6f} {lon:.6f} {dep:.3f} {mag:.2f} {magtype} {id}";

/// Canonical pick-table template, preset name "basic".
pub const BASIC_PICK_TEMPLATE: &str = "{seedid} {phase} {time:.5f} {weight:.3f}";

/// Column-name sentinel marking a parse-only position.
///
/// Names equal to or prefixed by `_` denote columns to skip when reading
/// foreign layouts; they never appear as keys required for writing.
pub fn is_skip_name(name: &str) -> bool {
    name.starts_with('_')
}

/// A value placed into a record for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Verbatim text
    Text(String),
    /// Floating-point number
    Float(f64),
    /// UTC timestamp, rendered as ISO text
    Time(UtcTime),
}

/// A record handed to the renderer: field name to value.
pub type Record = HashMap<String, Value>;

/// How a single field is formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    /// Text form unchanged
    Verbatim,
    /// Text form truncated to at most this many characters
    Truncate(usize),
    /// Fixed-point with this many decimal places
    Fixed(usize),
}

/// One parsed template fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field name
    pub name: String,
    /// Formatting applied on write
    pub format: FieldFormat,
}

impl FieldSpec {
    /// Parse a `{name}`, `{name!conv:spec}` or `{name:spec}` fragment.
    fn parse(fragment: &str) -> Result<Self> {
        let inner = fragment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or_else(|| CsvError::InvalidTemplate(fragment.to_string()))?;
        let (head, spec) = match inner.split_once(':') {
            Some((head, spec)) => (head, Some(spec)),
            None => (inner, None),
        };
        let (name, conversion) = match head.split_once('!') {
            Some((name, conv)) => (name, Some(conv)),
            None => (head, None),
        };
        if name.is_empty() || !matches!(conversion, None | Some("s")) {
            return Err(CsvError::InvalidTemplate(fragment.to_string()));
        }
        let format = match spec {
            None | Some("") => FieldFormat::Verbatim,
            Some(spec) => {
                let digits = spec
                    .strip_prefix('.')
                    .ok_or_else(|| CsvError::InvalidTemplate(fragment.to_string()))?;
                if let Some(precision) = digits.strip_suffix('f') {
                    FieldFormat::Fixed(
                        precision
                            .parse()
                            .map_err(|_| CsvError::InvalidTemplate(fragment.to_string()))?,
                    )
                } else {
                    FieldFormat::Truncate(
                        digits
                            .parse()
                            .map_err(|_| CsvError::InvalidTemplate(fragment.to_string()))?,
                    )
                }
            }
        };
        Ok(Self {
            name: name.to_string(),
            format,
        })
    }

    /// Render one value with this field's format.
    fn render(&self, value: &Value) -> String {
        // Non-finite numbers degrade to the empty string, never "NaN".
        if let Value::Float(v) = value {
            if !v.is_finite() {
                return String::new();
            }
        }
        match self.format {
            FieldFormat::Verbatim => text_form(value),
            FieldFormat::Truncate(n) => text_form(value).chars().take(n).collect(),
            FieldFormat::Fixed(precision) => match value {
                Value::Float(v) => format!("{v:.precision$}"),
                other => text_form(other),
            },
        }
    }
}

fn text_form(value: &Value) -> String {
    match value {
        Value::Text(s) => s.clone(),
        Value::Float(v) => v.to_string(),
        Value::Time(t) => t.to_string(),
    }
}

/// A parsed, reusable field template.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTemplate {
    fields: Vec<FieldSpec>,
}

impl FieldTemplate {
    /// Parse a whitespace-joined template string.
    pub fn parse(template: &str) -> Result<Self> {
        Self::from_fragments(template.split_whitespace())
    }

    /// Build from pre-split per-field fragments.
    ///
    /// Normalizes to the same field list as [`FieldTemplate::parse`] on
    /// the joined form.
    pub fn from_fragments<I, S>(fragments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = fragments
            .into_iter()
            .map(|f| FieldSpec::parse(f.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { fields })
    }

    /// Field names in appearance order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Parsed field specifications.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// The header line: field names joined by the delimiter.
    pub fn header(&self, delimiter: char) -> String {
        self.field_names()
            .collect::<Vec<_>>()
            .join(&delimiter.to_string())
    }

    /// Render one record into a delimited data line.
    ///
    /// A record missing a required field is a hard formatting failure.
    pub fn render(&self, record: &Record, delimiter: char) -> Result<String> {
        let mut cells = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = record
                .get(&field.name)
                .ok_or_else(|| CsvError::MissingField(field.name.clone()))?;
            cells.push(field.render(value));
        }
        Ok(cells.join(&delimiter.to_string()))
    }
}

/// Writer-side field selection: a preset name, a full template string, or
/// a pre-split fragment list.
#[derive(Debug, Clone, PartialEq)]
pub enum Fields {
    /// Look up a named preset in the [`TemplateConfig`]
    Preset(String),
    /// Use the string as a template directly
    Template(String),
    /// Use pre-split fragments
    List(Vec<String>),
}

impl Default for Fields {
    fn default() -> Self {
        Self::Preset("basic".to_string())
    }
}

impl From<&str> for Fields {
    /// Template strings contain `{`; anything else is a preset name.
    fn from(value: &str) -> Self {
        if value.contains('{') {
            Self::Template(value.to_string())
        } else {
            Self::Preset(value.to_string())
        }
    }
}

/// Named template presets, passed explicitly to readers and writers.
#[derive(Debug, Clone)]
pub struct TemplateConfig {
    presets: HashMap<String, String>,
}

impl TemplateConfig {
    /// Preset table for event tables ("basic").
    pub fn events() -> Self {
        let mut presets = HashMap::new();
        presets.insert("basic".to_string(), BASIC_EVENT_TEMPLATE.to_string());
        Self { presets }
    }

    /// Preset table for pick tables ("basic").
    pub fn picks() -> Self {
        let mut presets = HashMap::new();
        presets.insert("basic".to_string(), BASIC_PICK_TEMPLATE.to_string());
        Self { presets }
    }

    /// Register an additional named preset.
    pub fn insert(&mut self, name: &str, template: &str) {
        self.presets.insert(name.to_string(), template.to_string());
    }

    /// Resolve a field selection into a parsed template.
    pub fn resolve(&self, fields: &Fields) -> Result<FieldTemplate> {
        match fields {
            Fields::Preset(name) => {
                let template = self
                    .presets
                    .get(name)
                    .ok_or_else(|| CsvError::UnknownPreset(name.clone()))?;
                FieldTemplate::parse(template)
            }
            Fields::Template(template) => FieldTemplate::parse(template),
            Fields::List(fragments) => FieldTemplate::from_fragments(fragments),
        }
    }
}
