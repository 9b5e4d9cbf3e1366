pub mod percentiles;
pub mod predict;
pub mod rank;
pub mod server;
pub mod stats;
pub mod ttest;

use std::path::Path;

use scoutstat_core::{
    MatchRecord, SimulationConfig, TeamRatings, filter_by_phase, load_config_from_path,
    load_ratings_from_path, load_records_from_path, parse_team_key,
};
use serde::Serialize;

/// Where the scouting snapshot comes from, as given on the command line.
pub struct SnapshotSource<'a> {
    pub records_path: &'a str,
    pub ratings_path: Option<&'a str>,
    pub config_path: Option<&'a str>,
    pub include_practice: bool,
}

/// Phase-filtered records plus optional ratings and tuning.
pub struct LoadedSnapshot {
    pub records: Vec<MatchRecord>,
    pub ratings: TeamRatings,
    pub config: SimulationConfig,
}

/// Load and filter everything a command needs.
pub fn load_snapshot(source: &SnapshotSource<'_>) -> Result<LoadedSnapshot, String> {
    let records = load_records_from_path(Path::new(source.records_path))
        .map_err(|e| format!("Cannot load records: {e}"))?;
    let records = filter_by_phase(&records, source.include_practice);

    let ratings = match source.ratings_path {
        Some(path) => load_ratings_from_path(Path::new(path))
            .map_err(|e| format!("Cannot load ratings: {e}"))?,
        None => TeamRatings::new(),
    };

    let config = match source.config_path {
        Some(path) => load_config_from_path(Path::new(path))
            .map_err(|e| format!("Cannot load config {path}: {e}"))?,
        None => SimulationConfig::default(),
    };

    log::info!(
        "{} records, {} ratings from {}",
        records.len(),
        ratings.len(),
        source.records_path
    );
    Ok(LoadedSnapshot {
        records,
        ratings,
        config,
    })
}

/// Like [`load_snapshot`], but print the error and exit.
pub fn load_snapshot_or_exit(source: &SnapshotSource<'_>) -> LoadedSnapshot {
    match load_snapshot(source) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Parse a team argument, exiting on garbage.
pub fn team_or_exit(arg: &str) -> u32 {
    match parse_team_key(arg) {
        Some(team) => team,
        None => {
            eprintln!("Invalid team number: {arg}");
            std::process::exit(1);
        }
    }
}

/// Write `value` as pretty JSON to `path`.
pub fn write_json<T: Serialize>(value: &T, path: &str, label: &str) {
    let json = match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to serialize {label}: {e}");
            std::process::exit(1);
        }
    };
    match std::fs::write(path, json) {
        Ok(()) => println!("\n{label} written to {path}"),
        Err(e) => {
            eprintln!("Failed to write {path}: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoutstat_core::MatchPhase;
    use std::io::Write;

    fn temp_json(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const RECORDS: &str = r#"[
        {"team_number": 254, "match_number": 1, "match_type": "qm", "total_points": 80},
        {"team_number": 254, "match_number": 0, "match_type": "practice", "total_points": 10},
        {"teamNumber": 1678, "matchNumber": 1, "matchType": "match", "totalPoints": 70}
    ]"#;

    // -----------------------------------------------------------------------
    // load_snapshot tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_load_filters_practice() {
        let records = temp_json(RECORDS);
        let path = records.path().to_str().unwrap();
        let source = SnapshotSource {
            records_path: path,
            ratings_path: None,
            config_path: None,
            include_practice: false,
        };
        let snapshot = load_snapshot(&source).unwrap();
        assert_eq!(snapshot.records.len(), 2);
        assert!(snapshot.records.iter().all(|r| r.phase == MatchPhase::Qualification));
        assert!(snapshot.ratings.is_empty());
        assert_eq!(snapshot.config, SimulationConfig::default());

        let source = SnapshotSource {
            include_practice: true,
            ..source
        };
        assert_eq!(load_snapshot(&source).unwrap().records.len(), 3);
    }

    #[test]
    fn test_load_ratings_and_config() {
        let records = temp_json(RECORDS);
        let ratings = temp_json(r#"{"frc254": 40.5}"#);
        let config = temp_json(r#"{"level_capacity": 9}"#);
        let source = SnapshotSource {
            records_path: records.path().to_str().unwrap(),
            ratings_path: ratings.path().to_str(),
            config_path: config.path().to_str(),
            include_practice: false,
        };
        let snapshot = load_snapshot(&source).unwrap();
        assert_eq!(snapshot.ratings[&254], 40.5);
        assert_eq!(snapshot.config.level_capacity, 9.0);
        assert_eq!(snapshot.config.efficiency_tax, 0.15);
    }

    #[test]
    fn test_load_missing_file() {
        let source = SnapshotSource {
            records_path: "/nonexistent/records.json",
            ratings_path: None,
            config_path: None,
            include_practice: false,
        };
        let err = load_snapshot(&source).err().unwrap();
        assert!(err.starts_with("Cannot load records"));
    }

    #[test]
    fn test_load_bad_config() {
        let records = temp_json(RECORDS);
        let config = temp_json("{not json");
        let source = SnapshotSource {
            records_path: records.path().to_str().unwrap(),
            ratings_path: None,
            config_path: config.path().to_str(),
            include_practice: false,
        };
        assert!(load_snapshot(&source).is_err());
    }

    #[test]
    fn test_write_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let path = path.to_str().unwrap();
        write_json(&serde_json::json!({"teams": [254]}), path, "Test");
        let back: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(back["teams"][0], 254);
    }
}
