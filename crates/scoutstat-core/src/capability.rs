//! Capability inference from match history.
//!
//! A team "can" score in a slot when it did so in more than a policy fraction
//! of its scouted matches. Reef levels cascade downward: a team that scores on
//! L4 is assumed able to score on L3 and L2. L1 and the net are judged alone.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::group_by_team;
use crate::config::CapabilityThresholds;
use crate::record::MatchRecord;

/// A teleoperated scoring destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringSlot {
    L4,
    L3,
    L2,
    L1,
    Net,
}

impl ScoringSlot {
    pub const ALL: [ScoringSlot; 5] = [
        ScoringSlot::L4,
        ScoringSlot::L3,
        ScoringSlot::L2,
        ScoringSlot::L1,
        ScoringSlot::Net,
    ];

    /// The net draws on a separate game piece pool from the reef levels.
    pub fn is_net(self) -> bool {
        matches!(self, ScoringSlot::Net)
    }

    /// Pieces scored in this slot during teleop of one match.
    pub fn value(self, record: &MatchRecord) -> f64 {
        match self {
            ScoringSlot::L4 => record.tele_l4,
            ScoringSlot::L3 => record.tele_l3,
            ScoringSlot::L2 => record.tele_l2,
            ScoringSlot::L1 => record.tele_l1,
            ScoringSlot::Net => record.tele_net,
        }
    }
}

/// True iff the team scored in `slot` in more than `threshold` of its matches.
///
/// A team with no matches is never capable.
pub fn performs_action(team_records: &[&MatchRecord], slot: ScoringSlot, threshold: f64) -> bool {
    if team_records.is_empty() {
        return false;
    }
    let hits = team_records
        .iter()
        .filter(|r| {
            let v = slot.value(r);
            v != 0.0 && !v.is_nan()
        })
        .count();
    hits as f64 / team_records.len() as f64 > threshold
}

/// Per-slot capability flags for one team, after cascading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub l4: bool,
    pub l3: bool,
    pub l2: bool,
    pub l1: bool,
    pub net: bool,
}

impl Capabilities {
    /// Infer flags from one team's history.
    pub fn infer(team_records: &[&MatchRecord], thresholds: &CapabilityThresholds) -> Self {
        let raw = |slot: ScoringSlot| performs_action(team_records, slot, thresholds.for_slot(slot));
        let l4 = raw(ScoringSlot::L4);
        let l3 = raw(ScoringSlot::L3) || l4;
        let l2 = raw(ScoringSlot::L2) || l3;
        Self {
            l4,
            l3,
            l2,
            l1: raw(ScoringSlot::L1),
            net: raw(ScoringSlot::Net),
        }
    }

    pub fn can(&self, slot: ScoringSlot) -> bool {
        match slot {
            ScoringSlot::L4 => self.l4,
            ScoringSlot::L3 => self.l3,
            ScoringSlot::L2 => self.l2,
            ScoringSlot::L1 => self.l1,
            ScoringSlot::Net => self.net,
        }
    }
}

/// Capability flags for every team in a historical record set.
#[derive(Debug, Clone, Default)]
pub struct CapabilityIndex {
    teams: HashMap<u32, Capabilities>,
}

impl CapabilityIndex {
    pub fn build(records: &[MatchRecord], thresholds: &CapabilityThresholds) -> Self {
        let teams = group_by_team(records)
            .into_iter()
            .map(|(team, rows)| (team, Capabilities::infer(&rows, thresholds)))
            .collect();
        Self { teams }
    }

    /// Flags for `team`; a team with no history is capable of nothing.
    pub fn get(&self, team: u32) -> Capabilities {
        self.teams.get(&team).copied().unwrap_or_default()
    }
}
