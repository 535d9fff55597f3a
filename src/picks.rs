//! Per-event pick tables.
//!
//! The pick table is the CSZ companion of the events table: one row per
//! pick with seed identifier, phase label, time offset from the parent
//! origin in seconds, and arrival weight. Reading replaces the event's
//! pick list and the origin's arrival list wholesale.

use std::collections::HashMap;
use std::io::{Read, Write};

use crate::error::{CsvError, Result};
use crate::event::{Arrival, Event, Pick, ResourceId, WaveformStreamId};
use crate::row::{parse_float, Row};
use crate::template::{Fields, Record, TemplateConfig, Value};

/// Read a pick table and attach its picks and arrivals to the event.
///
/// Requires the event to carry a resolvable origin: pick times are stored
/// relative to the origin time. Replaces `event.picks` and the first
/// origin's arrivals entirely.
pub fn read_picks<R: Read>(event: &mut Event, source: R) -> Result<()> {
    let origin_time = event
        .preferred_origin()
        .ok_or_else(|| CsvError::NoOrigin(event.short_id().to_string()))?
        .time;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    let columns: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(index, name)| (name.to_string(), index))
        .collect();
    let mut picks = Vec::new();
    let mut arrivals = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = Row::new(&columns, &record);
        let seedid = row.get("seedid").ok_or(CsvError::MissingColumn("seedid"))?;
        let phase = row.get("phase").ok_or(CsvError::MissingColumn("phase"))?;
        let offset = parse_float(&row, "time")?;
        let weight = parse_float(&row, "weight")?;
        let pick = Pick {
            resource_id: ResourceId::new(),
            waveform_id: WaveformStreamId::new(seedid),
            phase_hint: phase.to_string(),
            time: origin_time.add_seconds(offset),
        };
        arrivals.push(Arrival {
            pick_id: pick.resource_id.clone(),
            phase: phase.to_string(),
            time_weight: Some(weight),
        });
        picks.push(pick);
    }
    event.picks = picks;
    if let Some(origin) = event.origins.first_mut() {
        origin.arrivals = arrivals;
    }
    Ok(())
}

/// Write the event's pick table.
///
/// Phase and weight come from the arrival referencing each pick where
/// that arrival carries a non-empty phase or non-zero weight; otherwise
/// the pick's own phase label and a weight of 1.0 are used.
pub fn write_picks<W: Write>(
    event: &Event,
    mut sink: W,
    fields_picks: &Fields,
    templates: &TemplateConfig,
    delimiter: char,
) -> Result<()> {
    let template = templates.resolve(fields_picks)?;
    let origin = event
        .preferred_origin()
        .ok_or_else(|| CsvError::NoOrigin(event.short_id().to_string()))?;
    let mut weights: HashMap<&str, f64> = HashMap::new();
    let mut phases: HashMap<&str, &str> = HashMap::new();
    for arrival in &origin.arrivals {
        if let Some(weight) = arrival.time_weight {
            if weight != 0.0 {
                weights.insert(arrival.pick_id.as_str(), weight);
            }
        }
        if !arrival.phase.is_empty() {
            phases.insert(arrival.pick_id.as_str(), &arrival.phase);
        }
    }
    writeln!(sink, "{}", template.header(delimiter))?;
    for pick in &event.picks {
        let pick_id = pick.resource_id.as_str();
        let phase = phases.get(pick_id).copied().unwrap_or(&pick.phase_hint);
        let weight = weights.get(pick_id).copied().unwrap_or(1.0);
        let mut record = Record::new();
        record.insert(
            "seedid".to_string(),
            Value::Text(pick.waveform_id.id().to_string()),
        );
        record.insert("phase".to_string(), Value::Text(phase.to_string()));
        record.insert(
            "time".to_string(),
            Value::Float(pick.time.seconds_since(&origin.time)),
        );
        record.insert("weight".to_string(), Value::Float(weight));
        writeln!(sink, "{}", template.render(&record, delimiter)?)?;
    }
    sink.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Origin;
    use crate::time::UtcTime;

    fn event_with_picks() -> Event {
        let origin_time = UtcTime::parse("2023-05-06T19:55:01").unwrap();
        let mut event = Event::new();
        event.resource_id = ResourceId::from("smi:local/event/2023abcde");
        let mut origin = Origin::new(origin_time, 10.0, 20.0, 5000.0);
        for (seedid, phase, offset, weight) in [
            ("GE.DAV..HHZ", "P", 4.53217, Some(1.0)),
            ("GE.DAV..HHN", "S", 8.11004, Some(0.5)),
        ] {
            let pick = Pick {
                resource_id: ResourceId::new(),
                waveform_id: WaveformStreamId::new(seedid),
                phase_hint: phase.to_string(),
                time: origin_time.add_seconds(offset),
            };
            origin.arrivals.push(Arrival {
                pick_id: pick.resource_id.clone(),
                phase: phase.to_string(),
                time_weight: weight,
            });
            event.picks.push(pick);
        }
        event.origins.push(origin);
        event
    }

    #[test]
    fn test_write_picks_table() {
        let event = event_with_picks();
        let mut buf = Vec::new();
        write_picks(
            &event,
            &mut buf,
            &Fields::default(),
            &TemplateConfig::picks(),
            ',',
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "seedid,phase,time,weight\n\
             GE.DAV..HHZ,P,4.53217,1.000\n\
             GE.DAV..HHN,S,8.11004,0.500\n"
        );
    }

    #[test]
    fn test_roundtrip_picks() {
        let event = event_with_picks();
        let mut buf = Vec::new();
        write_picks(
            &event,
            &mut buf,
            &Fields::default(),
            &TemplateConfig::picks(),
            ',',
        )
        .unwrap();

        let mut rebuilt = Event::new();
        rebuilt.resource_id = event.resource_id.clone();
        rebuilt
            .origins
            .push(Origin::new(event.origins[0].time, 10.0, 20.0, 5000.0));
        read_picks(&mut rebuilt, &buf[..]).unwrap();
        assert_eq!(rebuilt.picks.len(), 2);
        assert_eq!(rebuilt.origins[0].arrivals.len(), 2);
        assert_eq!(rebuilt.picks[0].waveform_id.id(), "GE.DAV..HHZ");
        assert_eq!(rebuilt.picks[1].phase_hint, "S");
        assert_eq!(rebuilt.origins[0].arrivals[1].time_weight, Some(0.5));
        let offset = rebuilt.picks[0].time.seconds_since(&rebuilt.origins[0].time);
        assert!((offset - 4.53217).abs() < 1e-5);
        // arrivals cross-reference the freshly minted pick ids
        assert_eq!(
            rebuilt.origins[0].arrivals[0].pick_id,
            rebuilt.picks[0].resource_id
        );
    }

    #[test]
    fn test_zero_weight_falls_back_to_default() {
        let mut event = event_with_picks();
        event.origins[0].arrivals[0].time_weight = Some(0.0);
        event.origins[0].arrivals[1].time_weight = None;
        let mut buf = Vec::new();
        write_picks(
            &event,
            &mut buf,
            &Fields::default(),
            &TemplateConfig::picks(),
            ',',
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        for line in text.lines().skip(1) {
            assert!(line.ends_with(",1.000"), "line was {line:?}");
        }
    }

    #[test]
    fn test_empty_arrival_phase_falls_back_to_pick() {
        let mut event = event_with_picks();
        event.origins[0].arrivals[0].phase = String::new();
        let mut buf = Vec::new();
        write_picks(
            &event,
            &mut buf,
            &Fields::default(),
            &TemplateConfig::picks(),
            ',',
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("GE.DAV..HHZ,P,"));
    }

    #[test]
    fn test_read_picks_requires_origin() {
        let mut event = Event::new();
        let table = b"seedid,phase,time,weight\nGE.DAV..HHZ,P,1.0,1.0\n";
        assert!(matches!(
            read_picks(&mut event, &table[..]),
            Err(CsvError::NoOrigin(_))
        ));
    }

    #[test]
    fn test_write_picks_requires_origin() {
        let mut event = event_with_picks();
        event.origins.clear();
        let mut buf = Vec::new();
        let result = write_picks(
            &event,
            &mut buf,
            &Fields::default(),
            &TemplateConfig::picks(),
            ',',
        );
        assert!(matches!(result, Err(CsvError::NoOrigin(_))));
    }
}
