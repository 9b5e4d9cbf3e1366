use scoutstat_core::{
    HIGHLIGHT_METRICS, Metric, compute_column_percentiles, compute_team_stats_with_ratings,
};

pub fn run(source: &super::SnapshotSource<'_>, metric: Option<Metric>, output_path: Option<&str>) {
    let snapshot = super::load_snapshot_or_exit(source);
    let table = compute_team_stats_with_ratings(&snapshot.records, &snapshot.ratings);
    let bands = compute_column_percentiles(&table);

    let shown: Vec<Metric> = match metric {
        Some(m) => vec![m],
        None => HIGHLIGHT_METRICS.to_vec(),
    };

    println!("Percentile bands across {} teams", table.len());
    for m in shown {
        let Some(by_kind) = bands.get(&m) else {
            println!("\n{m}: no data");
            continue;
        };
        println!("\n{m}");
        println!(
            "  {:<8} {:>8} {:>8} {:>8} {:>8}",
            "Stat", "p10", "p25", "p75", "p90"
        );
        for (kind, band) in by_kind {
            println!(
                "  {:<8} {:>8.1} {:>8.1} {:>8.1} {:>8.1}",
                kind.name(),
                band.p10,
                band.p25,
                band.p75,
                band.p90
            );
        }
    }

    if let Some(path) = output_path {
        super::write_json(&bands, path, "Percentile bands");
    }
}
