//! End-to-end round trips through real files for all three formats.

use std::collections::BTreeMap;

use tempfile::tempdir;

use seiscsv::prelude::*;

fn sample_event(id: &str, time: &str, lat: f64, lon: f64, depth_m: f64, mag: f64) -> Event {
    let mut event = Event::new();
    event.resource_id = ResourceId::from(format!("smi:local/event/{id}"));
    event
        .origins
        .push(Origin::new(UtcTime::parse(time).unwrap(), lat, lon, depth_m));
    event.magnitudes.push(Magnitude {
        mag,
        magnitude_type: Some("Mw".to_string()),
    });
    event
}

fn add_picks(event: &mut Event, count: usize) {
    let origin_time = event.origins[0].time;
    for i in 0..count {
        let phase = if i % 2 == 0 { "P" } else { "S" };
        let pick = Pick {
            resource_id: ResourceId::new(),
            waveform_id: WaveformStreamId::new(&format!("GE.ST{i:02}..HHZ")),
            phase_hint: phase.to_string(),
            time: origin_time.add_seconds(3.25 + 1.5 * i as f64),
        };
        event.origins[0].arrivals.push(Arrival {
            pick_id: pick.resource_id.clone(),
            phase: pick.phase_hint.clone(),
            time_weight: Some(1.0 - 0.1 * i as f64),
        });
        event.picks.push(pick);
    }
}

fn sample_catalog() -> Catalog {
    let mut first = sample_event("2023abcde", "2023-05-06T19:55:01.3", 10.1942, 124.83, 50470.0, 5.2);
    add_picks(&mut first, 3);
    let second = sample_event("2023fghij", "2023-05-07T00:01:02", -5.1, 110.0, 10000.0, 4.5);
    Catalog::from(vec![first, second])
}

#[test]
fn test_csv_file_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.csv");
    let catalog = sample_catalog();
    write_csv(&catalog, &path, &CsvWriteOptions::default()).unwrap();

    let reread = read_csv(&path, &CsvReadOptions::default()).unwrap();
    assert_eq!(reread.len(), catalog.len());
    for (original, rebuilt) in catalog.iter().zip(reread.iter()) {
        let a = original.preferred_origin().unwrap();
        let b = rebuilt.preferred_origin().unwrap();
        assert_eq!(a.time, b.time);
        assert!((a.latitude - b.latitude).abs() < 1e-6);
        assert!((a.longitude - b.longitude).abs() < 1e-6);
        assert!((a.depth - b.depth).abs() < 1.0);
        let ma = original.preferred_magnitude().unwrap();
        let mb = rebuilt.preferred_magnitude().unwrap();
        assert!((ma.mag - mb.mag).abs() < 5e-3);
        assert_eq!(ma.magnitude_type, mb.magnitude_type);
        assert_eq!(original.short_id(), rebuilt.short_id());
    }
}

#[test]
fn test_incomplete_catalog_written_with_warnings() {
    let mut events: Vec<Event> = sample_catalog().into_iter().collect();
    events[0].magnitudes[0].magnitude_type = None;
    events[1].magnitudes.clear();
    let mut lost = sample_event("2023lost", "2023-05-08T12:00:00", 1.0, 2.0, 3000.0, 1.0);
    lost.origins.clear();
    events.push(lost);

    let dir = tempdir().unwrap();
    let path = dir.path().join("events.csv");
    write_csv(&Catalog::from(events.clone()), &path, &CsvWriteOptions::default()).unwrap();

    let reread = read_csv(&path, &CsvReadOptions::default()).unwrap();
    // the origin-less event is skipped, the magnitude-less one is kept
    assert_eq!(reread.len(), 2);
    assert_eq!(
        reread.events()[0].origins[0].time,
        events[0].origins[0].time
    );
    assert!(reread.events()[0].magnitudes[0].magnitude_type.is_none());
    assert!(reread.events()[1].magnitudes.is_empty());
    assert_eq!(reread.events()[1].short_id(), "2023fghij");
}

#[test]
fn test_reading_external_catalog() {
    let external = "\
        Year, Month, Day, Hour, Minute, Seconds, code, Lat, Lon, Depth, Station_count, time_residual_RMS, Magnitude, etc\n\
        2023, 05, 06, 19, 55, 01.3, LI, 10.1942, 124.8300, 50.47, 111, 0.0, 0.2, 42, 0.0, 0.0176, 0.0127, 0.02, 0.3, 2023abcde\n";
    let dir = tempdir().unwrap();
    let path = dir.path().join("external.csv");
    std::fs::write(&path, external).unwrap();

    // the foreign layout is not recognized as our CSV
    assert_eq!(sniff_csv(&path, &CsvReadOptions::default()), Sniff::NoMatch);

    let options = CsvReadOptions {
        skipheader: 1,
        names: Some(ColumnNames::Joined(
            "year mon day hour minu sec _ lat lon dep _ _ mag _ _ _ _ _ _ id".to_string(),
        )),
        ..CsvReadOptions::default()
    };
    let catalog = read_csv(&path, &options).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(
        catalog.events()[0].origins[0].time.to_string(),
        "2023-05-06T19:55:01.300000Z"
    );
    assert_eq!(catalog.events()[0].magnitudes.len(), 1);

    // truncated name list without mag: event survives with no magnitude
    let incomplete = CsvReadOptions {
        skipheader: 1,
        names: Some(ColumnNames::Joined(
            "year mon day hour minu sec _ lat lon dep".to_string(),
        )),
        ..CsvReadOptions::default()
    };
    let catalog = read_csv(&path, &incomplete).unwrap();
    assert_eq!(catalog.len(), 1);
    assert!(catalog.events()[0].magnitudes.is_empty());
}

#[test]
fn test_sparse_name_override() {
    let data = "x;y;z\n2023-05-06T19:55:01;junk;9.5;1.0;2.0;3.0\n";
    let dir = tempdir().unwrap();
    let path = dir.path().join("sparse.csv");
    std::fs::write(&path, data).unwrap();

    let names: BTreeMap<usize, String> = [
        (0, "time".to_string()),
        (2, "mag".to_string()),
        (3, "lat".to_string()),
        (4, "lon".to_string()),
        (5, "dep".to_string()),
    ]
    .into_iter()
    .collect();
    let options = CsvReadOptions {
        skipheader: 1,
        names: Some(ColumnNames::Sparse(names)),
        delimiter: b';',
        ..CsvReadOptions::default()
    };
    let catalog = read_csv(&path, &options).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.events()[0].magnitudes[0].mag, 9.5);
}

#[test]
fn test_csz_roundtrip_with_picks() {
    let dir = tempdir().unwrap();
    let catalog = sample_catalog();

    for (compression, level) in [
        (Compression::Stored, None),
        (Compression::from(false), None),
        (Compression::from(true), Some(9)),
    ] {
        let path = dir.path().join("catalog.csz");
        let options = CszWriteOptions {
            compression,
            compression_level: level,
            ..CszWriteOptions::default()
        };
        write_csz(&catalog, &path, &options).unwrap();
        assert_eq!(sniff_csz(&path), Sniff::Match);

        let reread = read_csz(&path, &CsvReadOptions::default()).unwrap();
        assert_eq!(reread.len(), catalog.len());
        for (original, rebuilt) in catalog.iter().zip(reread.iter()) {
            assert_eq!(original.picks.len(), rebuilt.picks.len());
            assert_eq!(
                original.origins[0].arrivals.len(),
                rebuilt.origins[0].arrivals.len()
            );
        }
        let rebuilt = &reread.events()[0];
        assert_eq!(rebuilt.picks[1].phase_hint, "S");
        assert_eq!(rebuilt.origins[0].arrivals[1].time_weight, Some(0.9));
        let offset = rebuilt.picks[0]
            .time
            .seconds_since(&rebuilt.origins[0].time);
        assert!((offset - 3.25).abs() < 1e-5);
    }
}

#[test]
fn test_csz_missing_origin_drops_event() {
    let mut events: Vec<Event> = sample_catalog().into_iter().collect();
    events[1].origins.clear();
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.csz");
    write_csz(&Catalog::from(events), &path, &CszWriteOptions::default()).unwrap();
    assert_eq!(sniff_csz(&path), Sniff::Match);

    let reread = read_csz(&path, &CsvReadOptions::default()).unwrap();
    assert_eq!(reread.len(), 1);
    assert_eq!(reread.events()[0].picks.len(), 3);
}

#[test]
fn test_csz_detection_beats_csv() {
    // a CSZ bundle must be detected as CSZ, never as plain CSV
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.csz");
    write_csz(&sample_catalog(), &path, &CszWriteOptions::default()).unwrap();
    assert_eq!(detect(&path), Some(FileFormat::Csz));

    let catalog = read_events(&path, &CsvReadOptions::default()).unwrap();
    assert_eq!(catalog.len(), 2);
}

#[test]
fn test_eventtxt_file() {
    let text = "\
        #EventID|Time|Latitude|Longitude|Depth/km|Author|Catalog|Contributor|ContributorID|MagType|Magnitude|MagAuthor|EventLocationName\n\
        usp000jv5f|2023-05-06T19:55:01.300|10.1942|124.8300|50.47|us|us|us|usp000jv5f|mb|5.0|us|Philippine Islands Region\n";
    let dir = tempdir().unwrap();
    let path = dir.path().join("bulletin.txt");
    std::fs::write(&path, text).unwrap();

    assert_eq!(detect(&path), Some(FileFormat::EventTxt));
    let catalog = read_events(&path, &CsvReadOptions::default()).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.events()[0].short_id(), "usp000jv5f");
    assert_eq!(catalog.events()[0].origins[0].depth, 50470.0);
}

#[test]
fn test_table_loader_from_files() {
    let dir = tempdir().unwrap();
    let catalog = sample_catalog();

    let csv_path = dir.path().join("events.csv");
    write_csv(&catalog, &csv_path, &CsvWriteOptions::default()).unwrap();
    let table = load_table(&csv_path, &TableOptions::default()).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.column("id").unwrap().as_texts().unwrap(),
        ["2023abcde".to_string(), "2023fghij".to_string()]
    );

    let csz_path = dir.path().join("catalog.csz");
    write_csz(&catalog, &csz_path, &CszWriteOptions::default()).unwrap();
    let only_mag = TableOptions {
        only: Some(vec!["mag".to_string()]),
        ..TableOptions::default()
    };
    let table = load_table(&csz_path, &only_mag).unwrap();
    let names: Vec<_> = table.names().collect();
    assert_eq!(names, ["mag"]);
    let mag = table.column("mag").unwrap().as_floats().unwrap();
    assert!((mag[0] - 5.2).abs() < 5e-3);
}
