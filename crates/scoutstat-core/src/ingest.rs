//! Snapshot ingest and normalization.
//!
//! Scouting backends have shipped the same columns under both snake_case and
//! camelCase names, with numbers occasionally arriving as strings or nulls.
//! Everything is reconciled here so the rest of the crate only sees a clean
//! [`MatchRecord`].

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::record::{MatchPhase, MatchRecord};

/// External per-team rating (OPR-equivalent), keyed by team number.
pub type TeamRatings = HashMap<u32, f64>;

/// Failure to read or parse a snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Lenient field decoding
// ---------------------------------------------------------------------------

fn value_to_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    // "NaN" and "inf" parse as floats but are not scouting values.
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Numeric column: numbers and numeric strings pass through, anything else is 0.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value))
}

/// Identifier column: non-negative integers, `frc`-prefixed strings accepted.
pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::String(s) => parse_team_key(s).unwrap_or(0),
        other => {
            let n = value_to_f64(other);
            if n.is_finite() && n > 0.0 && n <= u32::MAX as f64 {
                n as u32
            } else {
                0
            }
        }
    })
}

pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    })
}

pub(crate) fn lenient_phase<'de, D>(deserializer: D) -> Result<MatchPhase, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => MatchPhase::parse(&s),
        _ => MatchPhase::default(),
    })
}

/// Parse `"frc254"` or `"254"` into a team number.
pub fn parse_team_key(key: &str) -> Option<u32> {
    let key = key.trim();
    let digits = key
        .strip_prefix("frc")
        .or_else(|| key.strip_prefix("FRC"))
        .unwrap_or(key);
    digits.parse::<u32>().ok().filter(|&n| n > 0)
}

/// Parse a comma-separated alliance such as `"frc254, 1678,971"`.
pub fn parse_team_list(list: &str) -> Result<Vec<u32>, String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|key| parse_team_key(key).ok_or_else(|| format!("invalid team number: {key}")))
        .collect()
}

// ---------------------------------------------------------------------------
// Snapshot loading
// ---------------------------------------------------------------------------

/// Parse a JSON array of match rows. Rows without a usable team number are dropped.
pub fn parse_records(json: &str) -> Result<Vec<MatchRecord>, IngestError> {
    let rows: Vec<MatchRecord> = serde_json::from_str(json)?;
    let total = rows.len();
    let records: Vec<MatchRecord> = rows.into_iter().filter(|r| r.team_number > 0).collect();
    if records.len() < total {
        log::warn!(
            "dropped {} of {total} rows without a team number",
            total - records.len()
        );
    }
    Ok(records)
}

/// Load match rows from a JSON file.
pub fn load_records_from_path(path: &Path) -> Result<Vec<MatchRecord>, IngestError> {
    let raw = read(path)?;
    let records = parse_records(&raw)?;
    log::debug!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse a rating map such as `{"frc254": 41.23, "1678": 30.0}`.
///
/// Keys that are not team numbers and non-numeric ratings are skipped.
pub fn parse_ratings(json: &str) -> Result<TeamRatings, IngestError> {
    let raw: HashMap<String, Value> = serde_json::from_str(json)?;
    let mut ratings = TeamRatings::new();
    for (key, value) in raw {
        let Some(team) = parse_team_key(&key) else {
            log::warn!("skipping rating with unrecognized team key {key:?}");
            continue;
        };
        match value.as_f64() {
            Some(rating) if rating.is_finite() => {
                ratings.insert(team, rating);
            }
            _ => log::warn!("skipping non-numeric rating for team {team}"),
        }
    }
    Ok(ratings)
}

/// Load a rating map from a JSON file.
pub fn load_ratings_from_path(path: &Path) -> Result<TeamRatings, IngestError> {
    parse_ratings(&read(path)?)
}

fn read(path: &Path) -> Result<String, IngestError> {
    std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Phase filtering
// ---------------------------------------------------------------------------

/// Keep qualification records, plus practice records when `include_practice` is set.
///
/// Records from any other phase are never part of a scouting snapshot.
pub fn filter_by_phase(records: &[MatchRecord], include_practice: bool) -> Vec<MatchRecord> {
    records
        .iter()
        .filter(|r| match r.phase {
            MatchPhase::Qualification => true,
            MatchPhase::Practice => include_practice,
            MatchPhase::Other => false,
        })
        .cloned()
        .collect()
}
