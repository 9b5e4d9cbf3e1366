//! # scoutstat-core
//!
//! **Turn scouting sheets into numbers you can pick alliances with.**
//!
//! `scoutstat-core` aggregates per-match scouting records into per-team
//! summaries, ranks teams against each other with percentile bands, and
//! predicts alliance scores by replaying every combination of the teams'
//! historical matches.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use scoutstat_core::{SimulationConfig, compute_team_stats, load_records_from_path, predict_match};
//!
//! let records = load_records_from_path(Path::new("records.json")).unwrap();
//! let table = compute_team_stats(&records);
//! println!("{} teams scouted", table.len());
//!
//! let prediction = predict_match(&[254, 1678], &[971], &records, &SimulationConfig::default());
//! println!("red mean {}", prediction.alliance_a.mean_score);
//! ```
//!
//! ## Architecture
//!
//! Records → per-team stats → column percentiles
//!
//! Records → capability flags → combinations → simulated outcomes → prediction
//!
//! Everything here is synchronous and pure. Callers own the record set and
//! pass it in; nothing is cached between calls.

pub mod aggregate;
pub mod capability;
pub mod config;
pub mod ingest;
pub mod percentiles;
pub mod predict;
pub mod rank_points;
pub mod record;
pub mod simulate;
pub mod stats;

pub use aggregate::{
    TeamRank, TeamStats, TeamStatsTable, compute_team_stats, compute_team_stats_with_ratings,
    group_by_team, rank_teams,
};
pub use capability::{Capabilities, CapabilityIndex, ScoringSlot, performs_action};
pub use config::{CapabilityThresholds, PointValues, SimulationConfig, load_config_from_path};
pub use ingest::{
    IngestError, TeamRatings, filter_by_phase, load_ratings_from_path, load_records_from_path,
    parse_ratings, parse_records, parse_team_key, parse_team_list,
};
pub use percentiles::{
    ColumnPercentiles, HIGHLIGHT_METRICS, PercentileTier, compute_column_percentiles,
};
pub use predict::{
    MatchPrediction, ScorePrediction, alliance_combinations, predict_alliance, predict_match,
};
pub use rank_points::{RankPointLikelihoods, coral_levels_met, estimate_rank_points};
pub use record::{MatchPhase, MatchRecord, Metric};
pub use simulate::{
    Combination, OutcomeSet, Pick, SimulatedOutcome, SlotTotals, allocate_pieces,
    cartesian_product, combination_count, simulate_outcome, simulate_outcomes, team_histories,
};
pub use stats::{PercentileBand, StatKind, StatRecord, compute_stats, percentile, round1};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
