//! Alliance and match prediction.
//!
//! Glues the pipeline together: team histories, combination product,
//! outcome simulation, score summary and rank point likelihoods.

use serde::Serialize;

use crate::capability::CapabilityIndex;
use crate::config::SimulationConfig;
use crate::rank_points::{RankPointLikelihoods, estimate_rank_points};
use crate::record::MatchRecord;
use crate::simulate::{
    SimulatedOutcome, cartesian_product, combination_count, simulate_outcomes, team_histories,
};
use crate::stats::compute_stats;

/// Score distribution and bonus likelihoods for one alliance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScorePrediction {
    /// Requested teams that had at least one record.
    pub teams: Vec<u32>,
    pub combinations: usize,
    pub maximum_score: f64,
    pub minimum_score: f64,
    pub mean_score: f64,
    pub median_score: f64,
    pub q3_score: f64,
    pub rank_points: RankPointLikelihoods,
    /// Ascending.
    pub all_scores: Vec<f64>,
    pub worst_outcome: Option<SimulatedOutcome>,
    pub median_outcome: Option<SimulatedOutcome>,
    pub best_outcome: Option<SimulatedOutcome>,
}

/// Both sides of a head-to-head match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchPrediction {
    pub alliance_a: ScorePrediction,
    pub alliance_b: ScorePrediction,
    /// Chance that alliance A wins. Not computed yet; always `None`.
    pub win_probability: Option<f64>,
}

/// How many combinations predicting `teams` would simulate, or `None` on overflow.
pub fn alliance_combinations(teams: &[u32], records: &[MatchRecord]) -> Option<u128> {
    combination_count(&team_histories(teams, records))
}

/// Predict one alliance's score distribution from historical records.
///
/// Teams without records are dropped. An alliance with no known teams
/// predicts all zeros.
pub fn predict_alliance(
    teams: &[u32],
    records: &[MatchRecord],
    config: &SimulationConfig,
) -> ScorePrediction {
    let capabilities = CapabilityIndex::build(records, &config.thresholds);
    predict_with(teams, records, &capabilities, config)
}

/// Predict both alliances of a match.
pub fn predict_match(
    alliance_a: &[u32],
    alliance_b: &[u32],
    records: &[MatchRecord],
    config: &SimulationConfig,
) -> MatchPrediction {
    let shared: Vec<u32> = alliance_a
        .iter()
        .copied()
        .filter(|t| alliance_b.contains(t))
        .collect();
    if !shared.is_empty() {
        log::warn!("teams {shared:?} appear on both alliances");
    }

    let capabilities = CapabilityIndex::build(records, &config.thresholds);
    MatchPrediction {
        alliance_a: predict_with(alliance_a, records, &capabilities, config),
        alliance_b: predict_with(alliance_b, records, &capabilities, config),
        win_probability: None,
    }
}

fn predict_with(
    teams: &[u32],
    records: &[MatchRecord],
    capabilities: &CapabilityIndex,
    config: &SimulationConfig,
) -> ScorePrediction {
    let histories = team_histories(teams, records);
    let combinations = cartesian_product(&histories);
    let outcomes = simulate_outcomes(&combinations, capabilities, config);
    let scores = outcomes.scores();
    let summary = compute_stats(&scores).rounded();

    log::debug!(
        "alliance {teams:?}: {} combinations, mean {}",
        combinations.len(),
        summary.mean
    );

    ScorePrediction {
        teams: histories
            .iter()
            .filter_map(|h| h.first().map(|r| r.team_number))
            .collect(),
        combinations: combinations.len(),
        maximum_score: summary.max,
        minimum_score: summary.min,
        mean_score: summary.mean,
        median_score: summary.median,
        q3_score: summary.q3,
        rank_points: estimate_rank_points(&combinations, capabilities, config),
        worst_outcome: outcomes.worst().cloned(),
        median_outcome: outcomes.median().cloned(),
        best_outcome: outcomes.best().cloned(),
        all_scores: scores,
    }
}
