//! Typed scouting records.
//!
//! A [`MatchRecord`] is one team's performance in one match. Every numeric
//! column the scouting form produces is a named field; [`Metric`] enumerates
//! the columns the aggregator summarizes so callers never index rows by string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ingest::{lenient_bool, lenient_f64, lenient_phase, lenient_u32};

// ---------------------------------------------------------------------------
// Match phase
// ---------------------------------------------------------------------------

/// Which part of the event a match belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    #[default]
    Qualification,
    Practice,
    Other,
}

impl MatchPhase {
    /// Parse the phase labels used by scouting backends.
    ///
    /// `match`, `qm` and `qualification` are qualification matches; `practice`
    /// and `pre` are practice matches. Anything else is `Other`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "match" | "qm" | "qual" | "qualification" => Self::Qualification,
            "practice" | "pre" | "pm" => Self::Practice,
            _ => Self::Other,
        }
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// A numeric column summarized per team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Opr,
    TotalPoints,
    AutoPoints,
    TelePoints,
    EndgamePoints,
    AutoCoral,
    TeleCoral,
    TotalCoral,
    TotalAlgae,
    TotalGamepieces,
    AutoNet,
    AutoMissNet,
    AutoProcessor,
    AutoL4,
    AutoL3,
    AutoL2,
    AutoL1,
    AutoMissCoral,
    TeleNet,
    TeleMissNet,
    TeleProcessor,
    TeleL4,
    TeleL3,
    TeleL2,
    TeleL1,
    TeleMissCoral,
}

impl Metric {
    /// Every metric, synthetic `Opr` first, in table column order.
    pub const ALL: [Metric; 26] = [
        Metric::Opr,
        Metric::TotalPoints,
        Metric::AutoPoints,
        Metric::TelePoints,
        Metric::EndgamePoints,
        Metric::AutoCoral,
        Metric::TeleCoral,
        Metric::TotalCoral,
        Metric::TotalAlgae,
        Metric::TotalGamepieces,
        Metric::AutoNet,
        Metric::AutoMissNet,
        Metric::AutoProcessor,
        Metric::AutoL4,
        Metric::AutoL3,
        Metric::AutoL2,
        Metric::AutoL1,
        Metric::AutoMissCoral,
        Metric::TeleNet,
        Metric::TeleMissNet,
        Metric::TeleProcessor,
        Metric::TeleL4,
        Metric::TeleL3,
        Metric::TeleL2,
        Metric::TeleL1,
        Metric::TeleMissCoral,
    ];

    /// Metrics read directly off a [`MatchRecord`] (everything except `Opr`).
    pub fn recorded() -> impl Iterator<Item = Metric> {
        Self::ALL.into_iter().filter(|m| !m.is_synthetic())
    }

    /// True for metrics injected from an external source rather than scouted.
    pub fn is_synthetic(self) -> bool {
        matches!(self, Metric::Opr)
    }

    pub fn name(self) -> &'static str {
        match self {
            Metric::Opr => "opr",
            Metric::TotalPoints => "total_points",
            Metric::AutoPoints => "auto_points",
            Metric::TelePoints => "tele_points",
            Metric::EndgamePoints => "endgame_points",
            Metric::AutoCoral => "auto_coral",
            Metric::TeleCoral => "tele_coral",
            Metric::TotalCoral => "total_coral",
            Metric::TotalAlgae => "total_algae",
            Metric::TotalGamepieces => "total_gamepieces",
            Metric::AutoNet => "auto_net",
            Metric::AutoMissNet => "auto_miss_net",
            Metric::AutoProcessor => "auto_processor",
            Metric::AutoL4 => "auto_l4",
            Metric::AutoL3 => "auto_l3",
            Metric::AutoL2 => "auto_l2",
            Metric::AutoL1 => "auto_l1",
            Metric::AutoMissCoral => "auto_miss_coral",
            Metric::TeleNet => "tele_net",
            Metric::TeleMissNet => "tele_miss_net",
            Metric::TeleProcessor => "tele_processor",
            Metric::TeleL4 => "tele_l4",
            Metric::TeleL3 => "tele_l3",
            Metric::TeleL2 => "tele_l2",
            Metric::TeleL1 => "tele_l1",
            Metric::TeleMissCoral => "tele_miss_coral",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = String;

    /// Accepts snake_case names and their camelCase spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Metric::ALL
            .into_iter()
            .find(|m| m.name().replace('_', "") == wanted)
            .ok_or_else(|| format!("unknown metric: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Match record
// ---------------------------------------------------------------------------

/// One team's scouted performance in one match.
///
/// Missing numeric fields deserialize as 0 and non-numeric values are coerced
/// to 0; see [`crate::ingest`] for the accepted key spellings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRecord {
    #[serde(alias = "teamNumber", deserialize_with = "lenient_u32")]
    pub team_number: u32,
    #[serde(alias = "matchNumber", deserialize_with = "lenient_u32")]
    pub match_number: u32,
    #[serde(alias = "match_type", alias = "matchType", deserialize_with = "lenient_phase")]
    pub phase: MatchPhase,

    #[serde(alias = "totalPoints", deserialize_with = "lenient_f64")]
    pub total_points: f64,
    #[serde(alias = "autoPoints", deserialize_with = "lenient_f64")]
    pub auto_points: f64,
    #[serde(alias = "telePoints", deserialize_with = "lenient_f64")]
    pub tele_points: f64,
    #[serde(alias = "endgamePoints", deserialize_with = "lenient_f64")]
    pub endgame_points: f64,

    #[serde(alias = "autoCoral", deserialize_with = "lenient_f64")]
    pub auto_coral: f64,
    #[serde(alias = "teleCoral", deserialize_with = "lenient_f64")]
    pub tele_coral: f64,
    #[serde(alias = "totalCoral", deserialize_with = "lenient_f64")]
    pub total_coral: f64,
    #[serde(alias = "totalAlgae", deserialize_with = "lenient_f64")]
    pub total_algae: f64,
    #[serde(alias = "totalGamepieces", deserialize_with = "lenient_f64")]
    pub total_gamepieces: f64,

    #[serde(alias = "autoNetCount", alias = "auto_made_net", deserialize_with = "lenient_f64")]
    pub auto_net: f64,
    #[serde(alias = "autoMissNetCount", deserialize_with = "lenient_f64")]
    pub auto_miss_net: f64,
    #[serde(alias = "autoProcessorCount", deserialize_with = "lenient_f64")]
    pub auto_processor: f64,
    #[serde(alias = "autoL4Count", deserialize_with = "lenient_f64")]
    pub auto_l4: f64,
    #[serde(alias = "autoL3Count", deserialize_with = "lenient_f64")]
    pub auto_l3: f64,
    #[serde(alias = "autoL2Count", deserialize_with = "lenient_f64")]
    pub auto_l2: f64,
    #[serde(alias = "autoL1Count", deserialize_with = "lenient_f64")]
    pub auto_l1: f64,
    #[serde(alias = "autoMissCoralCount", deserialize_with = "lenient_f64")]
    pub auto_miss_coral: f64,

    #[serde(alias = "teleNetCount", alias = "tele_made_net", deserialize_with = "lenient_f64")]
    pub tele_net: f64,
    #[serde(alias = "teleMissNetCount", deserialize_with = "lenient_f64")]
    pub tele_miss_net: f64,
    #[serde(alias = "teleProcessorCount", deserialize_with = "lenient_f64")]
    pub tele_processor: f64,
    #[serde(alias = "teleL4Count", deserialize_with = "lenient_f64")]
    pub tele_l4: f64,
    #[serde(alias = "teleL3Count", deserialize_with = "lenient_f64")]
    pub tele_l3: f64,
    #[serde(alias = "teleL2Count", deserialize_with = "lenient_f64")]
    pub tele_l2: f64,
    #[serde(alias = "teleL1Count", deserialize_with = "lenient_f64")]
    pub tele_l1: f64,
    #[serde(alias = "teleMissCoralCount", deserialize_with = "lenient_f64")]
    pub tele_miss_coral: f64,

    #[serde(alias = "commentText", alias = "comment_text")]
    pub comment: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub disabled: bool,
    #[serde(alias = "lostComms", deserialize_with = "lenient_bool")]
    pub lost_comms: bool,
}

impl MatchRecord {
    /// Value of a recorded metric. `Opr` is never scouted and reads as 0.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Opr => 0.0,
            Metric::TotalPoints => self.total_points,
            Metric::AutoPoints => self.auto_points,
            Metric::TelePoints => self.tele_points,
            Metric::EndgamePoints => self.endgame_points,
            Metric::AutoCoral => self.auto_coral,
            Metric::TeleCoral => self.tele_coral,
            Metric::TotalCoral => self.total_coral,
            Metric::TotalAlgae => self.total_algae,
            Metric::TotalGamepieces => self.total_gamepieces,
            Metric::AutoNet => self.auto_net,
            Metric::AutoMissNet => self.auto_miss_net,
            Metric::AutoProcessor => self.auto_processor,
            Metric::AutoL4 => self.auto_l4,
            Metric::AutoL3 => self.auto_l3,
            Metric::AutoL2 => self.auto_l2,
            Metric::AutoL1 => self.auto_l1,
            Metric::AutoMissCoral => self.auto_miss_coral,
            Metric::TeleNet => self.tele_net,
            Metric::TeleMissNet => self.tele_miss_net,
            Metric::TeleProcessor => self.tele_processor,
            Metric::TeleL4 => self.tele_l4,
            Metric::TeleL3 => self.tele_l3,
            Metric::TeleL2 => self.tele_l2,
            Metric::TeleL1 => self.tele_l1,
            Metric::TeleMissCoral => self.tele_miss_coral,
        }
    }

    /// Teleoperated coral placed on all four levels.
    pub fn tele_level_coral(&self) -> f64 {
        self.tele_l4 + self.tele_l3 + self.tele_l2 + self.tele_l1
    }
}
