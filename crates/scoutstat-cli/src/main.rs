//! CLI for scoutstat: team statistics, percentile bands and match predictions.

mod commands;

use clap::{Parser, Subcommand};
use scoutstat_core::{Metric, StatKind};

#[derive(Parser)]
#[command(name = "scoutstat")]
#[command(about = "scoutstat: team statistics and alliance predictions from scouting snapshots")]
#[command(version = scoutstat_core::VERSION)]
struct Cli {
    /// Scouting snapshot: JSON array of per-match records
    #[arg(long, global = true, default_value = "records.json")]
    records: String,

    /// External team ratings JSON (e.g. {"frc254": 41.2}) injected as the opr metric
    #[arg(long, global = true)]
    ratings: Option<String>,

    /// Include practice matches alongside qualification matches
    #[arg(long, global = true)]
    include_practice: bool,

    /// Simulation config JSON; missing keys keep their defaults
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-team summary statistics. Use --team for every metric of one team.
    Stats {
        /// Show all metrics for a single team (e.g. 254 or frc254)
        #[arg(long)]
        team: Option<String>,

        /// Write the full statistics table as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Cross-team percentile bands (p10, p25, p75, p90) per metric and statistic
    Percentiles {
        /// Only show this metric (default: the highlighted metrics)
        #[arg(long)]
        metric: Option<Metric>,

        /// Write all bands as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Rank teams by one statistic of one metric, highest first
    Rank {
        /// Metric to rank by (snake_case or camelCase)
        #[arg(long, default_value = "total_points")]
        metric: Metric,

        /// Statistic: min, max, median, mean, q3
        #[arg(long, default_value = "mean")]
        kind: StatKind,

        /// Show only the top N teams
        #[arg(long)]
        limit: Option<usize>,

        /// Write the ranking as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Predict alliance scores by replaying every combination of historical matches
    Predict {
        /// Comma-separated teams for alliance A (e.g. 254,1678,971)
        #[arg(long)]
        a: String,

        /// Comma-separated teams for alliance B; omit to predict A alone
        #[arg(long)]
        b: Option<String>,

        /// Refuse alliances with more simulated combinations than this
        #[arg(long, default_value = "1000000")]
        max_combinations: u128,

        /// Write the full prediction as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Welch t-test comparing two teams' per-match values of one metric
    Ttest {
        /// First team
        team_a: String,

        /// Second team
        team_b: String,

        /// Metric to compare
        #[arg(long, default_value = "total_points")]
        metric: Metric,

        /// Significance level for the confidence interval
        #[arg(long, default_value = "0.05")]
        alpha: f64,

        /// Write the test result as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Start an HTTP server answering stats, rank and predict queries
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Refuse alliances with more simulated combinations than this
        #[arg(long, default_value = "1000000")]
        max_combinations: u128,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let source = commands::SnapshotSource {
        records_path: &cli.records,
        ratings_path: cli.ratings.as_deref(),
        config_path: cli.config.as_deref(),
        include_practice: cli.include_practice,
    };

    match cli.command {
        Commands::Stats { team, output } => {
            commands::stats::run(&source, team.as_deref(), output.as_deref())
        }
        Commands::Percentiles { metric, output } => {
            commands::percentiles::run(&source, metric, output.as_deref())
        }
        Commands::Rank {
            metric,
            kind,
            limit,
            output,
        } => commands::rank::run(&source, metric, kind, limit, output.as_deref()),
        Commands::Predict {
            a,
            b,
            max_combinations,
            output,
        } => commands::predict::run(commands::predict::PredictCommandConfig {
            source: &source,
            alliance_a: &a,
            alliance_b: b.as_deref(),
            max_combinations,
            output_path: output.as_deref(),
        }),
        Commands::Ttest {
            team_a,
            team_b,
            metric,
            alpha,
            output,
        } => commands::ttest::run(&source, &team_a, &team_b, metric, alpha, output.as_deref()),
        Commands::Serve {
            port,
            host,
            max_combinations,
        } => commands::server::run(&source, &host, port, max_combinations),
    }
}
