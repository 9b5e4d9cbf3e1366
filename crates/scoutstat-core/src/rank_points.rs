//! Rank point likelihoods.
//!
//! Each combination is checked for the coral and barge bonus conditions. The
//! coral check reuses the simulator's allocation walk over the reef levels,
//! but with every team's full coral count and a much lower per-level bar.
//! The reef levels are always walked top down, whatever the scoring priority.

use serde::Serialize;

use crate::capability::{CapabilityIndex, ScoringSlot};
use crate::config::SimulationConfig;
use crate::record::MatchRecord;
use crate::simulate::{Combination, SlotTotals, allocate_team};
use crate::stats::round1;

/// Reef levels checked for the coral rank points, in walk order.
pub const REEF_LEVELS: [ScoringSlot; 4] = [
    ScoringSlot::L4,
    ScoringSlot::L3,
    ScoringSlot::L2,
    ScoringSlot::L1,
];

/// Percent of combinations (0–100, one decimal) meeting each condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RankPointLikelihoods {
    pub coral_normal: f64,
    pub coral_coop: f64,
    pub barge: f64,
}

/// Reef levels that reach `config.rank_point_level_capacity` for one combination.
pub fn coral_levels_met(
    combination: &[&MatchRecord],
    capabilities: &CapabilityIndex,
    config: &SimulationConfig,
) -> usize {
    let capacity = config.rank_point_level_capacity;
    let mut totals = SlotTotals::default();
    for record in combination {
        allocate_team(
            &mut totals,
            capabilities.get(record.team_number),
            REEF_LEVELS.into_iter(),
            capacity,
            record.total_coral,
            0.0,
        );
    }
    REEF_LEVELS
        .iter()
        .filter(|&&slot| totals.get(slot) >= capacity)
        .count()
}

pub fn estimate_rank_points(
    combinations: &[Combination<'_>],
    capabilities: &CapabilityIndex,
    config: &SimulationConfig,
) -> RankPointLikelihoods {
    if combinations.is_empty() {
        return RankPointLikelihoods::default();
    }

    let all_levels = REEF_LEVELS.len();
    let mut normal = 0usize;
    let mut coop = 0usize;
    let mut barge = 0usize;

    for combination in combinations {
        let met = coral_levels_met(combination, capabilities, config);
        if met >= all_levels {
            normal += 1;
        }
        if met >= config.coop_levels_required {
            coop += 1;
        }
        let endgame: f64 = combination.iter().map(|r| r.endgame_points).sum();
        if endgame >= config.barge_threshold {
            barge += 1;
        }
    }

    let n = combinations.len() as f64;
    let pct = |count: usize| round1(count as f64 / n * 100.0);
    RankPointLikelihoods {
        coral_normal: pct(normal),
        coral_coop: pct(coop),
        barge: pct(barge),
    }
}
