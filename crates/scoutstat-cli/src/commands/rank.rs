use scoutstat_core::{
    Metric, PercentileTier, StatKind, compute_column_percentiles,
    compute_team_stats_with_ratings, rank_teams,
};

fn tier_label(tier: PercentileTier) -> &'static str {
    match tier {
        PercentileTier::Top10 => "top 10%",
        PercentileTier::Top25 => "top 25%",
        PercentileTier::Middle => "",
        PercentileTier::Bottom25 => "bottom 25%",
        PercentileTier::Bottom10 => "bottom 10%",
    }
}

pub fn run(
    source: &super::SnapshotSource<'_>,
    metric: Metric,
    kind: StatKind,
    limit: Option<usize>,
    output_path: Option<&str>,
) {
    let snapshot = super::load_snapshot_or_exit(source);
    let table = compute_team_stats_with_ratings(&snapshot.records, &snapshot.ratings);
    let band = compute_column_percentiles(&table)
        .get(&metric)
        .and_then(|by_kind| by_kind.get(&kind).copied());

    let mut ranking = rank_teams(&table, metric, kind);
    if let Some(n) = limit {
        ranking.truncate(n);
    }

    println!("Teams by {kind} {metric}\n");
    println!("{:>4}  {:<8} {:>10}  Tier", "#", "Team", "Value");
    println!("{}", "-".repeat(40));
    for row in &ranking {
        let tier = band
            .as_ref()
            .map_or("", |b| tier_label(PercentileTier::classify(row.value, b)));
        println!("{:>4}  {:<8} {:>10.1}  {tier}", row.rank, row.team, row.value);
    }

    if let Some(path) = output_path {
        super::write_json(&ranking, path, "Ranking");
    }
}
