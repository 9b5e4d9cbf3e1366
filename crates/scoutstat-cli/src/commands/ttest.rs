use scoutstat_core::{MatchRecord, Metric};
use scoutstat_tests::welch_t_test_with_alpha;

/// Per-match values of `metric` for one team, NaNs dropped.
fn team_series(records: &[MatchRecord], team: u32, metric: Metric) -> Vec<f64> {
    records
        .iter()
        .filter(|r| r.team_number == team)
        .map(|r| r.metric(metric))
        .filter(|v| !v.is_nan())
        .collect()
}

pub fn run(
    source: &super::SnapshotSource<'_>,
    team_a: &str,
    team_b: &str,
    metric: Metric,
    alpha: f64,
    output_path: Option<&str>,
) {
    if metric == Metric::Opr {
        eprintln!("opr is a single external rating per team; pick a per-match metric.");
        std::process::exit(1);
    }
    let snapshot = super::load_snapshot_or_exit(source);
    let a = super::team_or_exit(team_a);
    let b = super::team_or_exit(team_b);

    let first = team_series(&snapshot.records, a, metric);
    let second = team_series(&snapshot.records, b, metric);

    let result = match welch_t_test_with_alpha(&first, &second, alpha) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Welch t-test failed: {e}");
            std::process::exit(1);
        }
    };

    println!("Welch t-test on {metric}: {a} vs {b}\n");
    println!("  {:<22} {:>10.3}  (n={})", format!("mean {a}"), result.mean1, first.len());
    println!("  {:<22} {:>10.3}  (n={})", format!("mean {b}"), result.mean2, second.len());
    println!("  {:<22} {:>10.3}", "difference", result.mean_difference);
    println!("  {:<22} {:>10.3}", "t", result.t_statistic);
    println!("  {:<22} {:>10.3}", "df", result.degrees_of_freedom);
    println!("  {:<22} {:>10.4}", "p (two-tailed)", result.p_value);
    let (lo, hi) = result.confidence_interval;
    let confidence = (1.0 - alpha) * 100.0;
    println!("  {:<22} [{lo:.3}, {hi:.3}]", format!("{confidence:.0}% interval"));
    println!(
        "\n  {}",
        if result.significant() {
            "Significant difference at this alpha."
        } else {
            "No significant difference at this alpha."
        }
    );

    if let Some(path) = output_path {
        super::write_json(&result, path, "Test result");
    }
}
