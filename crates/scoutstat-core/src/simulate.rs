//! Alliance outcome simulation.
//!
//! Every way of picking one historical match per team is treated as a
//! possible alliance performance. For each such combination the autonomous
//! and endgame points are summed as recorded, while teleoperated game pieces
//! are re-allocated across the shared scoring slots: teams fill slots in
//! priority order, each slot holds a bounded number of pieces, and a team only
//! uses slots it has shown it can reach.
//!
//! Cost is the product of the history lengths. Use [`combination_count`] to
//! bound it before calling [`cartesian_product`].

use serde::Serialize;

use crate::capability::{Capabilities, CapabilityIndex, ScoringSlot};
use crate::config::SimulationConfig;
use crate::record::MatchRecord;
use crate::stats::round_half_up;

/// One pick of one historical record per team.
pub type Combination<'a> = Vec<&'a MatchRecord>;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Game pieces allocated to each scoring slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SlotTotals {
    pub l4: f64,
    pub l3: f64,
    pub l2: f64,
    pub l1: f64,
    pub net: f64,
}

impl SlotTotals {
    pub fn get(&self, slot: ScoringSlot) -> f64 {
        match slot {
            ScoringSlot::L4 => self.l4,
            ScoringSlot::L3 => self.l3,
            ScoringSlot::L2 => self.l2,
            ScoringSlot::L1 => self.l1,
            ScoringSlot::Net => self.net,
        }
    }

    fn add(&mut self, slot: ScoringSlot, pieces: f64) {
        match slot {
            ScoringSlot::L4 => self.l4 += pieces,
            ScoringSlot::L3 => self.l3 += pieces,
            ScoringSlot::L2 => self.l2 += pieces,
            ScoringSlot::L1 => self.l1 += pieces,
            ScoringSlot::Net => self.net += pieces,
        }
    }
}

/// Which historical match each team contributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pick {
    pub team: u32,
    pub match_number: u32,
}

/// One hypothetical alliance performance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatedOutcome {
    pub picks: Vec<Pick>,
    pub auto_points: f64,
    pub endgame_points: f64,
    pub pieces: SlotTotals,
    pub total_score: f64,
}

/// Simulated outcomes, ascending by total score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutcomeSet {
    outcomes: Vec<SimulatedOutcome>,
}

impl OutcomeSet {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcomes(&self) -> &[SimulatedOutcome] {
        &self.outcomes
    }

    /// Total scores, ascending.
    pub fn scores(&self) -> Vec<f64> {
        self.outcomes.iter().map(|o| o.total_score).collect()
    }

    pub fn worst(&self) -> Option<&SimulatedOutcome> {
        self.outcomes.first()
    }

    pub fn best(&self) -> Option<&SimulatedOutcome> {
        self.outcomes.last()
    }

    /// The outcome at index `round(n / 2)`, clamped to the last element.
    ///
    /// For even `n` this sits one above the lower middle.
    pub fn median(&self) -> Option<&SimulatedOutcome> {
        let n = self.outcomes.len();
        if n == 0 {
            return None;
        }
        let idx = (round_half_up(n as f64 / 2.0) as usize).min(n - 1);
        self.outcomes.get(idx)
    }
}

// ---------------------------------------------------------------------------
// Enumeration
// ---------------------------------------------------------------------------

/// Each requested team's records, in request order. Teams with no records are dropped.
pub fn team_histories<'a>(teams: &[u32], records: &'a [MatchRecord]) -> Vec<Vec<&'a MatchRecord>> {
    teams
        .iter()
        .filter_map(|&team| {
            let history: Vec<&MatchRecord> =
                records.iter().filter(|r| r.team_number == team).collect();
            if history.is_empty() {
                log::warn!("team {team} has no match records; leaving it out of the alliance");
                None
            } else {
                Some(history)
            }
        })
        .collect()
}

/// Number of combinations [`cartesian_product`] would produce, or `None` on overflow.
pub fn combination_count(histories: &[Vec<&MatchRecord>]) -> Option<u128> {
    if histories.is_empty() {
        return Some(0);
    }
    histories
        .iter()
        .try_fold(1u128, |acc, h| acc.checked_mul(h.len() as u128))
}

/// Every way of picking one record from each history.
///
/// No histories means no combinations.
pub fn cartesian_product<'a>(histories: &[Vec<&'a MatchRecord>]) -> Vec<Combination<'a>> {
    if histories.is_empty() {
        return Vec::new();
    }
    let mut product: Vec<Combination<'a>> = vec![Vec::with_capacity(histories.len())];
    for history in histories {
        product = product
            .into_iter()
            .flat_map(|prefix| {
                history.iter().map(move |&record| {
                    let mut next = prefix.clone();
                    next.push(record);
                    next
                })
            })
            .collect();
    }
    product
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

/// Pour one team's pieces into `totals`, walking `slots` in order.
///
/// Net slots draw from `net`, every other slot from `coral`. Slots the team
/// cannot reach and slots already at `capacity` are skipped. The walk ends as
/// soon as the coral pool is used up. A non-finite pool counts as empty.
pub(crate) fn allocate_team(
    totals: &mut SlotTotals,
    caps: Capabilities,
    slots: impl Iterator<Item = ScoringSlot>,
    capacity: f64,
    mut coral: f64,
    mut net: f64,
) {
    if !coral.is_finite() {
        coral = 0.0;
    }
    if !net.is_finite() {
        net = 0.0;
    }
    for slot in slots {
        if !caps.can(slot) {
            continue;
        }
        let current = totals.get(slot);
        if current >= capacity {
            continue;
        }
        let pool = if slot.is_net() { &mut net } else { &mut coral };
        let added = (*pool).min(capacity - current);
        *pool -= added;
        totals.add(slot, added);
        if coral <= 0.0 {
            break;
        }
    }
}

/// Allocate every team's teleoperated pieces for one combination.
///
/// Level coral is taxed by `config.efficiency_tax` and rounded; net pieces are not.
pub fn allocate_pieces(
    combination: &[&MatchRecord],
    capabilities: &CapabilityIndex,
    config: &SimulationConfig,
) -> SlotTotals {
    let mut totals = SlotTotals::default();
    for record in combination {
        let coral = round_half_up(record.tele_level_coral() * (1.0 - config.efficiency_tax));
        allocate_team(
            &mut totals,
            capabilities.get(record.team_number),
            config.priority.iter().copied(),
            config.level_capacity,
            coral,
            record.tele_net,
        );
    }
    totals
}

/// Score one combination.
pub fn simulate_outcome(
    combination: &[&MatchRecord],
    capabilities: &CapabilityIndex,
    config: &SimulationConfig,
) -> SimulatedOutcome {
    let auto_points: f64 = combination.iter().map(|r| r.auto_points).sum();
    let endgame_points: f64 = combination.iter().map(|r| r.endgame_points).sum();
    let pieces = allocate_pieces(combination, capabilities, config);
    let tele_points: f64 = ScoringSlot::ALL
        .iter()
        .map(|&slot| pieces.get(slot) * config.point_values.for_slot(slot))
        .sum();

    SimulatedOutcome {
        picks: combination
            .iter()
            .map(|r| Pick {
                team: r.team_number,
                match_number: r.match_number,
            })
            .collect(),
        auto_points,
        endgame_points,
        pieces,
        total_score: auto_points + endgame_points + tele_points,
    }
}

/// Score every combination and sort ascending by total score.
pub fn simulate_outcomes(
    combinations: &[Combination<'_>],
    capabilities: &CapabilityIndex,
    config: &SimulationConfig,
) -> OutcomeSet {
    log::debug!("simulating {} alliance combinations", combinations.len());
    let mut outcomes: Vec<SimulatedOutcome> = combinations
        .iter()
        .map(|c| simulate_outcome(c, capabilities, config))
        .collect();
    outcomes.sort_by(|a, b| {
        a.total_score
            .partial_cmp(&b.total_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    OutcomeSet { outcomes }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(team: u32, match_number: u32) -> MatchRecord {
        MatchRecord {
            team_number: team,
            match_number,
            ..Default::default()
        }
    }

    fn all_capable() -> Capabilities {
        Capabilities {
            l4: true,
            l3: true,
            l2: true,
            l1: true,
            net: true,
        }
    }

    #[test]
    fn test_singletons_make_one_combination() {
        let a = rec(1, 1);
        let b = rec(2, 1);
        let histories = vec![vec![&a], vec![&b]];
        assert_eq!(combination_count(&histories), Some(1));
        let product = cartesian_product(&histories);
        assert_eq!(product.len(), 1);
        assert_eq!(product[0].len(), 2);
    }

    #[test]
    fn test_product_size_and_order() {
        let a1 = rec(1, 1);
        let a2 = rec(1, 2);
        let b1 = rec(2, 1);
        let b2 = rec(2, 2);
        let b3 = rec(2, 3);
        let histories = vec![vec![&a1, &a2], vec![&b1, &b2, &b3]];
        assert_eq!(combination_count(&histories), Some(6));
        let product = cartesian_product(&histories);
        assert_eq!(product.len(), 6);
        assert_eq!(product[0][0].match_number, 1);
        assert_eq!(product[0][1].match_number, 1);
        assert_eq!(product[5][0].match_number, 2);
        assert_eq!(product[5][1].match_number, 3);
    }

    #[test]
    fn test_empty_histories() {
        assert!(cartesian_product(&[]).is_empty());
        assert_eq!(combination_count(&[]), Some(0));
    }

    #[test]
    fn test_team_histories_drops_unknown() {
        let records = vec![rec(1, 1), rec(1, 2), rec(3, 1)];
        let histories = team_histories(&[3, 2, 1], &records);
        assert_eq!(histories.len(), 2);
        assert_eq!(histories[0][0].team_number, 3);
        assert_eq!(histories[1].len(), 2);
    }

    #[test]
    fn test_allocation_respects_capacity() {
        let mut totals = SlotTotals::default();
        let slots = [ScoringSlot::L4, ScoringSlot::L3];
        allocate_team(&mut totals, all_capable(), slots.into_iter(), 12.0, 20.0, 0.0);
        assert_eq!(totals.l4, 12.0);
        assert_eq!(totals.l3, 8.0);

        // Second team finds L4 full.
        allocate_team(&mut totals, all_capable(), slots.into_iter(), 12.0, 6.0, 0.0);
        assert_eq!(totals.l4, 12.0);
        assert_eq!(totals.l3, 12.0);
    }

    #[test]
    fn test_allocation_skips_incapable_slots() {
        let mut totals = SlotTotals::default();
        let caps = Capabilities {
            l2: true,
            ..Default::default()
        };
        allocate_team(&mut totals, caps, ScoringSlot::ALL.into_iter(), 12.0, 5.0, 3.0);
        assert_eq!(totals.l2, 5.0);
        assert_eq!(totals.l4 + totals.l3 + totals.l1 + totals.net, 0.0);
    }

    #[test]
    fn test_walk_stops_when_coral_exhausted() {
        // L4 takes all coral, so the later net slot is never reached.
        let mut totals = SlotTotals::default();
        let order = [ScoringSlot::L4, ScoringSlot::Net];
        allocate_team(&mut totals, all_capable(), order.into_iter(), 12.0, 4.0, 3.0);
        assert_eq!(totals.l4, 4.0);
        assert_eq!(totals.net, 0.0);
    }

    #[test]
    fn test_net_before_coral_levels_is_filled() {
        let mut totals = SlotTotals::default();
        let order = [ScoringSlot::Net, ScoringSlot::L2];
        allocate_team(&mut totals, all_capable(), order.into_iter(), 12.0, 4.0, 3.0);
        assert_eq!(totals.net, 3.0);
        assert_eq!(totals.l2, 4.0);
    }

    #[test]
    fn test_non_finite_pools_place_nothing() {
        let mut totals = SlotTotals::default();
        allocate_team(&mut totals, all_capable(), ScoringSlot::ALL.into_iter(), 12.0, f64::NAN, 2.0);
        assert_eq!(totals, SlotTotals::default());

        allocate_team(
            &mut totals,
            all_capable(),
            [ScoringSlot::Net, ScoringSlot::L4].into_iter(),
            12.0,
            3.0,
            f64::INFINITY,
        );
        assert_eq!(totals.net, 0.0);
        assert_eq!(totals.l4, 3.0);
    }

    #[test]
    fn test_outcome_score() {
        let record = MatchRecord {
            team_number: 1,
            match_number: 4,
            auto_points: 15.0,
            endgame_points: 12.0,
            tele_l4: 6.0,
            tele_l3: 2.0,
            tele_l2: 2.0,
            tele_net: 2.0,
            ..Default::default()
        };
        let records = vec![record];
        let config = SimulationConfig::default();
        let caps = CapabilityIndex::build(&records, &config.thresholds);
        let combo: Vec<&MatchRecord> = records.iter().collect();
        let outcome = simulate_outcome(&combo, &caps, &config);
        // coral = round(10 * 0.85) = round(8.5) = 9, all onto L4.
        assert_eq!(outcome.pieces.l4, 9.0);
        assert_eq!(outcome.pieces.net, 0.0);
        assert_eq!(outcome.total_score, 15.0 + 12.0 + 45.0);
        assert_eq!(outcome.picks, vec![Pick { team: 1, match_number: 4 }]);
    }

    #[test]
    fn test_outcomes_sorted_with_median_index() {
        let records: Vec<MatchRecord> = (1..=4)
            .map(|m| MatchRecord {
                team_number: 1,
                match_number: m,
                auto_points: (5 - m) as f64 * 10.0,
                ..Default::default()
            })
            .collect();
        let config = SimulationConfig::default();
        let caps = CapabilityIndex::build(&records, &config.thresholds);
        let histories = team_histories(&[1], &records);
        let set = simulate_outcomes(&cartesian_product(&histories), &caps, &config);
        assert_eq!(set.scores(), vec![10.0, 20.0, 30.0, 40.0]);
        assert_eq!(set.worst().map(|o| o.total_score), Some(10.0));
        assert_eq!(set.best().map(|o| o.total_score), Some(40.0));
        // round(4 / 2) = 2
        assert_eq!(set.median().map(|o| o.total_score), Some(30.0));
    }

    #[test]
    fn test_median_of_single_outcome_is_clamped() {
        let records = vec![rec(1, 1)];
        let config = SimulationConfig::default();
        let caps = CapabilityIndex::build(&records, &config.thresholds);
        let set = simulate_outcomes(
            &cartesian_product(&team_histories(&[1], &records)),
            &caps,
            &config,
        );
        assert_eq!(set.len(), 1);
        assert_eq!(set.median(), set.best());
        assert!(OutcomeSet::default().median().is_none());
    }
}
