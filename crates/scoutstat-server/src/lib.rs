//! HTTP scouting server.
//!
//! Serves per-team statistics, percentile bands, rankings and alliance
//! predictions for one scouting snapshot. The snapshot is loaded once and
//! shared read-only between requests.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use scoutstat_core::{
    ColumnPercentiles, MatchPrediction, MatchRecord, Metric, SimulationConfig, StatKind,
    TeamRank, TeamRatings, TeamStats, TeamStatsTable, alliance_combinations,
    compute_column_percentiles, compute_team_stats_with_ratings, parse_team_key, parse_team_list,
    predict_match, rank_teams,
};
use scoutstat_tests::{DEFAULT_ALPHA, WelchResult, welch_t_test_with_alpha};

/// Default cap on simulated combinations per alliance.
pub const DEFAULT_MAX_COMBINATIONS: u128 = 1_000_000;

/// Everything precomputed from one scouting snapshot.
pub struct Snapshot {
    records: Vec<MatchRecord>,
    table: TeamStatsTable,
    percentiles: ColumnPercentiles,
    config: SimulationConfig,
    max_combinations: u128,
}

impl Snapshot {
    pub fn new(
        records: Vec<MatchRecord>,
        ratings: &TeamRatings,
        config: SimulationConfig,
        max_combinations: u128,
    ) -> Self {
        let table = compute_team_stats_with_ratings(&records, ratings);
        let percentiles = compute_column_percentiles(&table);
        Self {
            records,
            table,
            percentiles,
            config,
            max_combinations,
        }
    }

    pub fn team_count(&self) -> usize {
        self.table.len()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Predict a match, refusing alliances whose combination product exceeds the cap.
    pub fn predict(&self, alliance_a: &[u32], alliance_b: &[u32]) -> Result<MatchPrediction, String> {
        for (label, teams) in [("a", alliance_a), ("b", alliance_b)] {
            match alliance_combinations(teams, &self.records) {
                Some(n) if n <= self.max_combinations => {}
                Some(n) => {
                    return Err(format!(
                        "alliance {label} has {n} match combinations (limit {})",
                        self.max_combinations
                    ));
                }
                None => return Err(format!("alliance {label} has too many match combinations")),
            }
        }
        Ok(predict_match(alliance_a, alliance_b, &self.records, &self.config))
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    teams: usize,
    records: usize,
}

#[derive(Deserialize)]
struct RankParams {
    metric: Option<String>,
    kind: Option<String>,
}

#[derive(Debug, Serialize)]
struct RankResponse {
    metric: Metric,
    kind: StatKind,
    teams: Vec<TeamRank>,
}

#[derive(Deserialize)]
struct PredictParams {
    a: Option<String>,
    b: Option<String>,
}

#[derive(Deserialize)]
struct TTestRequest {
    first: Vec<f64>,
    second: Vec<f64>,
    alpha: Option<f64>,
}

async fn handle_health(State(state): State<Arc<Snapshot>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        teams: state.team_count(),
        records: state.record_count(),
    })
}

async fn handle_stats(State(state): State<Arc<Snapshot>>) -> Json<TeamStatsTable> {
    Json(state.table.clone())
}

async fn handle_team_stats(
    State(state): State<Arc<Snapshot>>,
    Path(team): Path<String>,
) -> Result<Json<TeamStats>, ApiError> {
    let number = parse_team_key(&team)
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, format!("invalid team number: {team}")))?;
    state
        .table
        .get(&number)
        .cloned()
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("no records for team {number}")))
}

async fn handle_percentiles(State(state): State<Arc<Snapshot>>) -> Json<ColumnPercentiles> {
    Json(state.percentiles.clone())
}

async fn handle_rank(
    State(state): State<Arc<Snapshot>>,
    Query(params): Query<RankParams>,
) -> Result<Json<RankResponse>, ApiError> {
    let metric = match params.metric.as_deref() {
        Some(m) => m.parse::<Metric>(),
        None => Ok(Metric::TotalPoints),
    }
    .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;
    let kind = match params.kind.as_deref() {
        Some(k) => k.parse::<StatKind>(),
        None => Ok(StatKind::Mean),
    }
    .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    Ok(Json(RankResponse {
        metric,
        kind,
        teams: rank_teams(&state.table, metric, kind),
    }))
}

fn alliance_param(list: Option<&str>, label: &str) -> Result<Vec<u32>, ApiError> {
    let list = list.ok_or_else(|| {
        api_error(StatusCode::BAD_REQUEST, format!("missing alliance parameter `{label}`"))
    })?;
    parse_team_list(list).map_err(|e| api_error(StatusCode::BAD_REQUEST, e))
}

async fn handle_predict(
    State(state): State<Arc<Snapshot>>,
    Query(params): Query<PredictParams>,
) -> Result<Json<MatchPrediction>, ApiError> {
    let a = alliance_param(params.a.as_deref(), "a")?;
    let b = alliance_param(params.b.as_deref(), "b")?;

    // Replaying combinations is CPU bound; keep it off the async workers.
    tokio::task::spawn_blocking(move || state.predict(&a, &b))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map(Json)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))
}

async fn handle_ttest(Json(req): Json<TTestRequest>) -> Result<Json<WelchResult>, ApiError> {
    welch_t_test_with_alpha(&req.first, &req.second, req.alpha.unwrap_or(DEFAULT_ALPHA))
        .map(Json)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))
}

async fn handle_index(State(state): State<Arc<Snapshot>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "scoutstat server",
        "version": scoutstat_core::VERSION,
        "teams": state.team_count(),
        "records": state.record_count(),
        "endpoints": {
            "/": "This API index",
            "/health": "Health check",
            "/stats": "Per-team statistics for every metric",
            "/stats/{team}": "Statistics for one team",
            "/percentiles": "Cross-team percentile bands per metric and statistic",
            "/rank": {
                "method": "GET",
                "params": {
                    "metric": "Metric name (default: total_points)",
                    "kind": "min, max, median, mean, q3 (default: mean)",
                }
            },
            "/predict": {
                "method": "GET",
                "params": {
                    "a": "Comma-separated team numbers for alliance A",
                    "b": "Comma-separated team numbers for alliance B",
                }
            },
            "/ttest": {
                "method": "POST",
                "body": "{\"first\": [..], \"second\": [..], \"alpha\": 0.05}",
            },
        },
        "examples": {
            "rank": "/rank?metric=tele_points&kind=median",
            "predict": "/predict?a=254,1678,971&b=118,148,2056",
        }
    }))
}

/// Build the axum router.
pub fn build_router(snapshot: Snapshot) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/stats", get(handle_stats))
        .route("/stats/{team}", get(handle_team_stats))
        .route("/percentiles", get(handle_percentiles))
        .route("/rank", get(handle_rank))
        .route("/predict", get(handle_predict))
        .route("/ttest", post(handle_ttest))
        .with_state(Arc::new(snapshot))
}

/// Run the HTTP scouting server.
pub async fn run_server(snapshot: Snapshot, host: &str, port: u16) -> std::io::Result<()> {
    let app = build_router(snapshot);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("listening on http://{addr}");
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> Arc<Snapshot> {
        let records = vec![
            MatchRecord {
                team_number: 1,
                match_number: 1,
                total_points: 40.0,
                auto_points: 10.0,
                tele_l4: 4.0,
                ..Default::default()
            },
            MatchRecord {
                team_number: 1,
                match_number: 2,
                total_points: 20.0,
                auto_points: 6.0,
                ..Default::default()
            },
            MatchRecord {
                team_number: 2,
                match_number: 1,
                total_points: 35.0,
                auto_points: 3.0,
                ..Default::default()
            },
        ];
        let ratings = TeamRatings::from([(1, 12.0)]);
        Arc::new(Snapshot::new(
            records,
            &ratings,
            SimulationConfig::default(),
            DEFAULT_MAX_COMBINATIONS,
        ))
    }

    #[tokio::test]
    async fn test_health() {
        let Json(health) = handle_health(State(state())).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.teams, 2);
        assert_eq!(health.records, 3);
    }

    #[tokio::test]
    async fn test_team_stats() {
        let Json(stats) = handle_team_stats(State(state()), Path("frc1".to_string()))
            .await
            .unwrap();
        assert_eq!(stats[&Metric::TotalPoints].mean, 30.0);
        assert_eq!(stats[&Metric::Opr].mean, 12.0);

        let (status, _) = handle_team_stats(State(state()), Path("99".to_string()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = handle_team_stats(State(state()), Path("nope".to_string()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rank_defaults_and_errors() {
        let params = RankParams {
            metric: None,
            kind: None,
        };
        let Json(ranked) = handle_rank(State(state()), Query(params)).await.unwrap();
        assert_eq!(ranked.metric, Metric::TotalPoints);
        assert_eq!(ranked.teams[0].team, 2);

        let params = RankParams {
            metric: Some("autoPoints".to_string()),
            kind: Some("max".to_string()),
        };
        let Json(ranked) = handle_rank(State(state()), Query(params)).await.unwrap();
        assert_eq!(ranked.teams[0].team, 1);
        assert_eq!(ranked.teams[0].value, 10.0);

        let params = RankParams {
            metric: Some("shoe_size".to_string()),
            kind: None,
        };
        let (status, Json(body)) = handle_rank(State(state()), Query(params)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("shoe_size"));
    }

    #[tokio::test]
    async fn test_predict_matches_core() {
        let snapshot = state();
        let params = PredictParams {
            a: Some("1".to_string()),
            b: Some("frc2".to_string()),
        };
        let Json(prediction) = handle_predict(State(snapshot.clone()), Query(params))
            .await
            .unwrap();
        let direct = predict_match(&[1], &[2], &snapshot.records, &snapshot.config);
        assert_eq!(prediction, direct);
        assert_eq!(prediction.alliance_a.combinations, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_predictions() {
        let snapshot = state();
        let query = || {
            Query(PredictParams {
                a: Some("1".to_string()),
                b: Some("2".to_string()),
            })
        };
        let (first, second) = tokio::join!(
            handle_predict(State(snapshot.clone()), query()),
            handle_predict(State(snapshot.clone()), query()),
        );
        assert_eq!(first.unwrap().0, second.unwrap().0);
    }

    #[tokio::test]
    async fn test_predict_rejects_bad_input() {
        let params = PredictParams {
            a: Some("1".to_string()),
            b: None,
        };
        let (status, _) = handle_predict(State(state()), Query(params)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let capped = Arc::new(Snapshot::new(
            state().records.clone(),
            &TeamRatings::new(),
            SimulationConfig::default(),
            1,
        ));
        let params = PredictParams {
            a: Some("1".to_string()),
            b: Some("2".to_string()),
        };
        let (_, Json(body)) = handle_predict(State(capped), Query(params)).await.unwrap_err();
        assert!(body.error.contains("limit 1"));
    }

    #[tokio::test]
    async fn test_ttest() {
        let req = TTestRequest {
            first: vec![1.0, 2.0, 3.0],
            second: vec![1.0, 2.0, 3.0],
            alpha: None,
        };
        let Json(result) = handle_ttest(Json(req)).await.unwrap();
        assert_eq!(result.t_statistic, 0.0);
        assert_eq!(result.alpha, DEFAULT_ALPHA);

        let req = TTestRequest {
            first: vec![1.0],
            second: vec![1.0, 2.0],
            alpha: None,
        };
        let (status, _) = handle_ttest(Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
