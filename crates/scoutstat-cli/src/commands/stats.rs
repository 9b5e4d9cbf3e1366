use scoutstat_core::{Metric, compute_team_stats_with_ratings, group_by_team};

const SUMMARY_COLUMNS: &[(Metric, &str)] = &[
    (Metric::TotalPoints, "Total"),
    (Metric::AutoPoints, "Auto"),
    (Metric::TelePoints, "Tele"),
    (Metric::EndgamePoints, "Endgame"),
    (Metric::TotalCoral, "Coral"),
    (Metric::TotalAlgae, "Algae"),
    (Metric::Opr, "OPR"),
];

pub fn run(source: &super::SnapshotSource<'_>, team: Option<&str>, output_path: Option<&str>) {
    let snapshot = super::load_snapshot_or_exit(source);
    let table = compute_team_stats_with_ratings(&snapshot.records, &snapshot.ratings);
    if table.is_empty() {
        eprintln!("No records in {}.", source.records_path);
        std::process::exit(1);
    }
    let match_counts = group_by_team(&snapshot.records);

    if let Some(arg) = team {
        let number = super::team_or_exit(arg);
        let Some(stats) = table.get(&number) else {
            eprintln!("Team {number} has no records.");
            std::process::exit(1);
        };
        let matches = match_counts.get(&number).map_or(0, Vec::len);
        println!("Team {number} ({matches} matches)\n");
        println!(
            "{:<20} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "Metric", "Min", "Max", "Median", "Mean", "Q3"
        );
        println!("{}", "-".repeat(66));
        for (metric, s) in stats {
            println!(
                "{:<20} {:>8.1} {:>8.1} {:>8.1} {:>8.1} {:>8.1}",
                metric.name(),
                s.min,
                s.max,
                s.median,
                s.mean,
                s.q3
            );
        }
        if let Some(path) = output_path {
            super::write_json(stats, path, "Team statistics");
        }
        return;
    }

    println!("Mean per match, {} teams\n", table.len());
    print!("{:<8} {:>7}", "Team", "Matches");
    for (_, label) in SUMMARY_COLUMNS {
        print!(" {label:>8}");
    }
    println!();
    println!("{}", "-".repeat(16 + 9 * SUMMARY_COLUMNS.len()));

    for (team, stats) in &table {
        let matches = match_counts.get(team).map_or(0, Vec::len);
        print!("{team:<8} {matches:>7}");
        for (metric, _) in SUMMARY_COLUMNS {
            let mean = stats.get(metric).map_or(0.0, |s| s.mean);
            print!(" {mean:>8.1}");
        }
        println!();
    }

    if let Some(path) = output_path {
        super::write_json(&table, path, "Team statistics");
    }
}
