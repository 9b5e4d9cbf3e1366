use scoutstat_core::{
    MatchRecord, ScorePrediction, alliance_combinations, parse_team_list, predict_alliance,
    predict_match,
};

pub struct PredictCommandConfig<'a> {
    pub source: &'a super::SnapshotSource<'a>,
    pub alliance_a: &'a str,
    pub alliance_b: Option<&'a str>,
    pub max_combinations: u128,
    pub output_path: Option<&'a str>,
}

fn alliance_or_exit(label: &str, list: &str) -> Vec<u32> {
    match parse_team_list(list) {
        Ok(teams) if !teams.is_empty() => teams,
        Ok(_) => {
            eprintln!("Alliance {label} is empty.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Alliance {label}: {e}");
            std::process::exit(1);
        }
    }
}

/// Exit if simulating `teams` would exceed `limit` combinations.
fn check_combinations(label: &str, teams: &[u32], records: &[MatchRecord], limit: u128) {
    match alliance_combinations(teams, records) {
        Some(n) if n <= limit => log::debug!("alliance {label}: {n} combinations"),
        Some(n) => {
            eprintln!(
                "Alliance {label} has {n} match combinations (limit {limit}). \
                 Use --max-combinations to raise it."
            );
            std::process::exit(1);
        }
        None => {
            eprintln!("Alliance {label} has too many match combinations to enumerate.");
            std::process::exit(1);
        }
    }
}

fn print_prediction(label: &str, requested: &[u32], p: &ScorePrediction) {
    let missing: Vec<u32> = requested
        .iter()
        .copied()
        .filter(|t| !p.teams.contains(t))
        .collect();

    println!("Alliance {label}: {:?}", p.teams);
    if !missing.is_empty() {
        println!("  (no records for {missing:?})");
    }
    println!("  Combinations: {}", p.combinations);
    println!(
        "  Score  min {:.1}  median {:.1}  mean {:.1}  q3 {:.1}  max {:.1}",
        p.minimum_score, p.median_score, p.mean_score, p.q3_score, p.maximum_score
    );
    println!(
        "  Rank points  coral {:.1}%  coral (coop) {:.1}%  barge {:.1}%",
        p.rank_points.coral_normal, p.rank_points.coral_coop, p.rank_points.barge
    );
    if let Some(best) = &p.best_outcome {
        println!(
            "  Best case  {:.0} pts  L4 {} L3 {} L2 {} L1 {} net {}",
            best.total_score,
            best.pieces.l4,
            best.pieces.l3,
            best.pieces.l2,
            best.pieces.l1,
            best.pieces.net
        );
    }
}

pub fn run(cfg: PredictCommandConfig<'_>) {
    let snapshot = super::load_snapshot_or_exit(cfg.source);
    let a = alliance_or_exit("A", cfg.alliance_a);
    check_combinations("A", &a, &snapshot.records, cfg.max_combinations);

    match cfg.alliance_b {
        Some(list) => {
            let b = alliance_or_exit("B", list);
            check_combinations("B", &b, &snapshot.records, cfg.max_combinations);

            let prediction = predict_match(&a, &b, &snapshot.records, &snapshot.config);
            print_prediction("A", &a, &prediction.alliance_a);
            println!();
            print_prediction("B", &b, &prediction.alliance_b);
            let margin = prediction.alliance_a.mean_score - prediction.alliance_b.mean_score;
            println!("\nMean margin (A - B): {margin:+.1}");

            if let Some(path) = cfg.output_path {
                super::write_json(&prediction, path, "Match prediction");
            }
        }
        None => {
            let prediction = predict_alliance(&a, &snapshot.records, &snapshot.config);
            print_prediction("A", &a, &prediction);

            if let Some(path) = cfg.output_path {
                super::write_json(&prediction, path, "Alliance prediction");
            }
        }
    }
}
