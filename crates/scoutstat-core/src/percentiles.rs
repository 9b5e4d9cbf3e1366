//! Cross-team percentile bands.
//!
//! For each metric and each [`StatKind`], the chosen statistic is collected
//! across every team and summarized as a [`PercentileBand`]. The bands drive
//! table highlighting via [`PercentileTier::classify`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::TeamStatsTable;
use crate::record::Metric;
use crate::stats::{PercentileBand, StatKind, sort_ascending};

/// Metric → statistic kind → band.
pub type ColumnPercentiles = BTreeMap<Metric, BTreeMap<StatKind, PercentileBand>>;

/// Metrics that get percentile highlighting in team tables.
pub const HIGHLIGHT_METRICS: &[Metric] = &[
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
    Metric::TeleNet,
];

/// Where a value sits relative to a [`PercentileBand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentileTier {
    Bottom10,
    Bottom25,
    Middle,
    Top25,
    Top10,
}

impl PercentileTier {
    /// Bottom tiers take precedence when bands collapse onto one value.
    pub fn classify(value: f64, band: &PercentileBand) -> Self {
        if value <= band.p10 {
            Self::Bottom10
        } else if value <= band.p25 {
            Self::Bottom25
        } else if value >= band.p90 {
            Self::Top10
        } else if value >= band.p75 {
            Self::Top25
        } else {
            Self::Middle
        }
    }
}

/// Percentile bands for every metric present on at least one team.
pub fn compute_column_percentiles(table: &TeamStatsTable) -> ColumnPercentiles {
    let mut result = ColumnPercentiles::new();

    for metric in Metric::ALL {
        let present = table.values().any(|stats| stats.contains_key(&metric));
        if !present {
            continue;
        }

        let mut bands = BTreeMap::new();
        for kind in StatKind::ALL {
            let mut values: Vec<f64> = table
                .values()
                .map(|stats| stats.get(&metric).map_or(0.0, |s| s.get(kind)))
                .filter(|v| !v.is_nan())
                .collect();
            sort_ascending(&mut values);
            bands.insert(kind, PercentileBand::from_sorted(&values));
        }
        result.insert(metric, bands);
    }

    result
}
