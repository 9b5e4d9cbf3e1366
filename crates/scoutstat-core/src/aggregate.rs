//! Per-team aggregation.
//!
//! Groups match records by team and summarizes every recorded metric with
//! [`compute_stats`]. The synthetic `opr` metric is filled from an external
//! rating map afterwards, defaulting to zeros so the column is always present.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ingest::TeamRatings;
use crate::record::{MatchRecord, Metric};
use crate::stats::{StatKind, StatRecord, compute_stats, round1};

/// Metric → summary for one team.
pub type TeamStats = BTreeMap<Metric, StatRecord>;

/// Team number → per-metric summaries.
pub type TeamStatsTable = BTreeMap<u32, TeamStats>;

/// One row of a team ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamRank {
    pub rank: usize,
    pub team: u32,
    pub value: f64,
}

/// Group records by team number.
pub fn group_by_team(records: &[MatchRecord]) -> BTreeMap<u32, Vec<&MatchRecord>> {
    let mut grouped: BTreeMap<u32, Vec<&MatchRecord>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.team_number).or_default().push(record);
    }
    grouped
}

/// Summarize every recorded metric for every team, with an all-zero `opr`.
pub fn compute_team_stats(records: &[MatchRecord]) -> TeamStatsTable {
    compute_team_stats_with_ratings(records, &TeamRatings::new())
}

/// Summarize every recorded metric for every team and inject external ratings.
///
/// A rating only lands on a team that appears in `records`; ratings for
/// unknown teams are ignored. Teams without a rating get an all-zero `opr`.
pub fn compute_team_stats_with_ratings(
    records: &[MatchRecord],
    ratings: &TeamRatings,
) -> TeamStatsTable {
    let mut table = TeamStatsTable::new();

    for (team, rows) in group_by_team(records) {
        let mut stats = TeamStats::new();
        for metric in Metric::recorded() {
            let values: Vec<f64> = rows
                .iter()
                .map(|r| r.metric(metric))
                .filter(|v| !v.is_nan())
                .collect();
            stats.insert(metric, compute_stats(&values));
        }
        let opr = ratings
            .get(&team)
            .map(|&rating| StatRecord::uniform(round1(rating)))
            .unwrap_or_default();
        stats.insert(Metric::Opr, opr);
        table.insert(team, stats);
    }

    let unmatched = ratings.keys().filter(|t| !table.contains_key(t)).count();
    if unmatched > 0 {
        log::debug!("{unmatched} rated teams have no scouting records");
    }
    log::debug!("aggregated {} records into {} teams", records.len(), table.len());
    table
}

/// Order teams by one statistic of one metric, highest first.
///
/// Ties keep ascending team-number order. Teams missing the metric rank as 0.
pub fn rank_teams(table: &TeamStatsTable, metric: Metric, kind: StatKind) -> Vec<TeamRank> {
    let mut rows: Vec<(u32, f64)> = table
        .iter()
        .map(|(&team, stats)| (team, stats.get(&metric).map_or(0.0, |s| s.get(kind))))
        .collect();
    rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    rows.into_iter()
        .enumerate()
        .map(|(i, (team, value))| TeamRank {
            rank: i + 1,
            team,
            value,
        })
        .collect()
}
