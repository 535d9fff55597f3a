//! Minimal event object model for catalog serialization.
//!
//! Covers exactly what the CSV/CSZ/EVENTTXT codecs touch: a catalog of
//! events, each with origins, magnitudes and picks, plus the resource
//! identifier and waveform identifier wrappers. Preferred origins and
//! magnitudes are chosen by index with a fallback to the first element.

use std::fmt;

use uuid::Uuid;

use crate::time::UtcTime;

/// Resource identifier for events and picks.
///
/// The string form is slash-delimited; the last path segment is the short
/// identifier used in file output and archive member names.
///
/// # Examples
///
/// ```
/// use seiscsv::event::ResourceId;
///
/// let id = ResourceId::from("smi:local/event/2023abcde");
/// assert_eq!(id.short_id(), "2023abcde");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    /// Mint a fresh unique identifier.
    pub fn new() -> Self {
        Self(format!("smi:local/{}", Uuid::new_v4()))
    }

    /// Return the full identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the last `/`-separated segment.
    pub fn short_id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// SEED-style waveform stream identifier, `NET.STA.LOC.CHA`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveformStreamId {
    raw: String,
}

impl WaveformStreamId {
    /// Wrap a seed identifier string.
    pub fn new(seed_string: &str) -> Self {
        Self {
            raw: seed_string.trim().to_string(),
        }
    }

    /// Return the full seed identifier string.
    pub fn id(&self) -> &str {
        &self.raw
    }

    /// Extract the network code.
    pub fn network(&self) -> &str {
        self.component(0)
    }

    /// Extract the station code.
    pub fn station(&self) -> &str {
        self.component(1)
    }

    /// Extract the location code.
    pub fn location(&self) -> &str {
        self.component(2)
    }

    /// Extract the channel code.
    pub fn channel(&self) -> &str {
        self.component(3)
    }

    fn component(&self, index: usize) -> &str {
        self.raw.split('.').nth(index).unwrap_or("")
    }
}

impl fmt::Display for WaveformStreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// A hypothesized location and time for an event.
#[derive(Debug, Clone, PartialEq)]
pub struct Origin {
    /// Origin time
    pub time: UtcTime,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Depth in meters
    pub depth: f64,
    /// Arrivals used to locate this origin
    pub arrivals: Vec<Arrival>,
}

impl Origin {
    /// Create an origin with no arrivals.
    pub fn new(time: UtcTime, latitude: f64, longitude: f64, depth: f64) -> Self {
        Self {
            time,
            latitude,
            longitude,
            depth,
            arrivals: Vec::new(),
        }
    }
}

/// A size estimate for an event.
#[derive(Debug, Clone, PartialEq)]
pub struct Magnitude {
    /// Scalar magnitude value
    pub mag: f64,
    /// Free-text magnitude type label, e.g. "Mw"
    pub magnitude_type: Option<String>,
}

/// A phase arrival identified at a station/channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Pick {
    /// Identifier cross-referenced by arrivals
    pub resource_id: ResourceId,
    /// Station/channel the phase was observed on
    pub waveform_id: WaveformStreamId,
    /// Phase label as assigned by the picker
    pub phase_hint: String,
    /// Absolute pick time
    pub time: UtcTime,
}

/// Origin-side record linking a pick to a phase and a weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrival {
    /// Identifier of the associated pick
    pub pick_id: ResourceId,
    /// Phase label used in location
    pub phase: String,
    /// Weighting factor, 1.0 where absent
    pub time_weight: Option<f64>,
}

/// A seismic event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Event identifier
    pub resource_id: ResourceId,
    /// Candidate origins; at most one is preferred
    pub origins: Vec<Origin>,
    /// Candidate magnitudes; at most one is preferred
    pub magnitudes: Vec<Magnitude>,
    /// Picks associated with this event
    pub picks: Vec<Pick>,
    /// Index of the preferred origin, if explicitly chosen
    pub preferred_origin_index: Option<usize>,
    /// Index of the preferred magnitude, if explicitly chosen
    pub preferred_magnitude_index: Option<usize>,
}

impl Event {
    /// Create an empty event with a fresh identifier.
    pub fn new() -> Self {
        Self {
            resource_id: ResourceId::new(),
            origins: Vec::new(),
            magnitudes: Vec::new(),
            picks: Vec::new(),
            preferred_origin_index: None,
            preferred_magnitude_index: None,
        }
    }

    /// Short event identifier, the last path segment of the resource id.
    pub fn short_id(&self) -> &str {
        self.resource_id.short_id()
    }

    /// The preferred origin, falling back to the first origin.
    pub fn preferred_origin(&self) -> Option<&Origin> {
        self.preferred_origin_index
            .and_then(|i| self.origins.get(i))
            .or_else(|| self.origins.first())
    }

    /// The preferred magnitude, falling back to the first magnitude.
    pub fn preferred_magnitude(&self) -> Option<&Magnitude> {
        self.preferred_magnitude_index
            .and_then(|i| self.magnitudes.get(i))
            .or_else(|| self.magnitudes.first())
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

/// An ordered collection of seismic events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    events: Vec<Event>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events in the catalog.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the catalog holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Append an event.
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Iterate over events.
    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Iterate mutably over events.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Event> {
        self.events.iter_mut()
    }

    /// Borrow the events as a slice.
    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

impl From<Vec<Event>> for Catalog {
    fn from(events: Vec<Event>) -> Self {
        Self { events }
    }
}

impl FromIterator<Event> for Catalog {
    fn from_iter<T: IntoIterator<Item = Event>>(iter: T) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Catalog {
    type Item = Event;
    type IntoIter = std::vec::IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
