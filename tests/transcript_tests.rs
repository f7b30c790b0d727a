mod common;

use common::load_fixture;
use fogwalk::{EventLog, Navigator, SimulationConfig, TranscriptWriter};
use std::fs;

/// Every directory under test_data/scenarios holds the three inputs and the
/// transcript the run must print.
#[test]
fn scenario_transcript_tests() {
    let test_dir = "./test_data/scenarios";
    let mut passed = 0;

    let mut entries: Vec<_> = fs::read_dir(test_dir)
        .expect("scenario directory should exist")
        .filter_map(Result::ok)
        .filter(|e| e.path().is_dir())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let dir = entry.path();
        let expected = fs::read_to_string(dir.join("expected.txt"))
            .unwrap_or_else(|e| panic!("{}: missing expected.txt: {}", dir.display(), e));

        let scenario = load_fixture(&dir);
        let mut transcript = TranscriptWriter::new(Vec::new());
        Navigator::new(scenario, &SimulationConfig::default()).run(&mut transcript);
        let actual = String::from_utf8(transcript.finish().unwrap()).unwrap();

        assert_eq!(
            actual.lines().collect::<Vec<_>>(),
            expected.lines().collect::<Vec<_>>(),
            "Scenario '{}' transcript differs",
            dir.display()
        );
        passed += 1;
    }

    assert!(passed > 0, "no scenarios found");
    println!("All {} scenario transcripts matched", passed);
}

#[test]
fn event_log_matches_transcript_writer() {
    let scenario = load_fixture("./test_data/scenarios/wizard".as_ref());
    let mut sinks = (EventLog::new(), TranscriptWriter::new(Vec::new()));
    let report = Navigator::new(scenario, &SimulationConfig::default()).run(&mut sinks);
    let (log, writer) = sinks;

    assert!(report.outcome.is_completed());
    let written = String::from_utf8(writer.finish().unwrap()).unwrap();
    assert_eq!(log.transcript(), written);
    assert_eq!(log.len(), 7);
}

#[test]
fn event_log_survives_json_round_trip() {
    let scenario = load_fixture("./test_data/scenarios/detour".as_ref());
    let mut log = EventLog::new();
    Navigator::new(scenario, &SimulationConfig::default()).run(&mut log);

    let path = std::env::temp_dir().join(format!("fogwalk_detour_events_{}.json", std::process::id()));
    log.save_to_file(&path).unwrap();
    let loaded = EventLog::load_from_file(&path).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(loaded.transcript(), log.transcript());
    assert!(loaded.summary().contains("Objective"));
}
