//! HTTP JSON API over the calibscope kernel.
//!
//! Dashboards POST the snapshot or values they already fetched and get chart
//! data back: correlation pairs, CDF curves, summaries, histogram bins, grid
//! placements and heatmap colors. Kernel sentinels are passed through as
//! successful responses; only malformed input is an error.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use calibscope_core::{
    CdfCurve, CorrelationResult, DashboardConfig, Direction, Histogram, MAX_HISTOGRAM_BINS,
    MetricSummary, Placement, Snapshot, correlation_matrix, empirical_cdf, histogram, summarize,
};

/// Shared server state.
struct AppState {
    config: DashboardConfig,
}

/// Error body returned with 4xx statuses.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn reject(status: StatusCode, error: impl ToString) -> (StatusCode, Json<ErrorResponse>) {
    let error = error.to_string();
    log::warn!("request rejected ({status}): {error}");
    (
        status,
        Json(ErrorResponse {
            success: false,
            error,
        }),
    )
}

// ---------------------------------------------------------------------------
// Requests / responses
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct StatsRequest {
    values: Vec<f64>,
    /// Overrides the configured threshold for `parameter`.
    threshold: Option<f64>,
    direction: Option<Direction>,
    /// Parameter key used to look up a configured threshold.
    parameter: Option<String>,
}

#[derive(Deserialize)]
struct CorrelationRequest {
    snapshot: Snapshot,
    /// Parameter keys to correlate; all snapshot keys when omitted.
    parameters: Option<Vec<String>>,
    min_samples: Option<usize>,
}

#[derive(Debug, Serialize)]
struct CorrelationResponse {
    parameters: Vec<String>,
    results: Vec<CorrelationResult>,
}

#[derive(Deserialize)]
struct ValuesRequest {
    values: Vec<f64>,
}

#[derive(Serialize)]
struct CdfResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    curve: Option<CdfCurve>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Deserialize)]
struct HistogramRequest {
    values: Vec<f64>,
    bins: Option<usize>,
}

#[derive(Deserialize)]
struct LayoutRequest {
    entities: Vec<String>,
}

#[derive(Serialize)]
struct LayoutResponse {
    grid_size: usize,
    mapped: usize,
    placements: Vec<Placement>,
}

#[derive(Deserialize)]
struct ColorRequest {
    value: f64,
    min: f64,
    max: f64,
}

#[derive(Serialize)]
struct ColorResponse {
    color: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn handle_stats(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StatsRequest>,
) -> Json<MetricSummary> {
    let configured = req
        .parameter
        .as_deref()
        .and_then(|p| state.config.threshold_for(p));
    let threshold = match (req.threshold, configured) {
        (Some(t), _) => Some((
            t,
            req.direction
                .or(configured.map(|c| c.direction))
                .unwrap_or(Direction::HigherIsBetter),
        )),
        (None, Some(c)) => Some((c.threshold, c.direction)),
        (None, None) => None,
    };
    let values: Vec<f64> = req.values.into_iter().filter(|v| v.is_finite()).collect();
    Json(summarize(&values, threshold))
}

async fn handle_correlation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CorrelationRequest>,
) -> ApiResult<CorrelationResponse> {
    let params = req
        .snapshot
        .to_parameter_set()
        .map_err(|e| reject(StatusCode::UNPROCESSABLE_ENTITY, e))?;
    let parameters = req
        .parameters
        .unwrap_or_else(|| req.snapshot.parameter_keys());
    if parameters.len() < 2 {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            "at least two parameters are required",
        ));
    }
    let keys: Vec<&str> = parameters.iter().map(String::as_str).collect();
    let min_samples = req.min_samples.unwrap_or(state.config.min_pair_samples);
    let results = correlation_matrix(&params, &keys, min_samples);
    log::debug!(
        "correlation: {} parameters, {} pairs kept",
        keys.len(),
        results.len()
    );
    Ok(Json(CorrelationResponse {
        parameters,
        results,
    }))
}

async fn handle_cdf(Json(req): Json<ValuesRequest>) -> Json<CdfResponse> {
    match empirical_cdf(&req.values) {
        Some(curve) => Json(CdfResponse {
            success: true,
            curve: Some(curve),
            error: None,
        }),
        None => Json(CdfResponse {
            success: false,
            curve: None,
            error: Some("no data".to_string()),
        }),
    }
}

async fn handle_histogram(Json(req): Json<HistogramRequest>) -> Json<Histogram> {
    let values: Vec<f64> = req.values.into_iter().filter(|v| v.is_finite()).collect();
    let bins = req.bins.unwrap_or(20).clamp(1, MAX_HISTOGRAM_BINS);
    Json(histogram(&values, bins))
}

async fn handle_layout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LayoutRequest>,
) -> Json<LayoutResponse> {
    let topology = &state.config.topology;
    let placements: Vec<Placement> = req.entities.iter().map(|id| topology.place(id)).collect();
    let mapped = placements.iter().filter(|p| p.is_mapped()).count();
    Json(LayoutResponse {
        grid_size: topology.grid_size,
        mapped,
        placements,
    })
}

async fn handle_color(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ColorRequest>,
) -> Json<ColorResponse> {
    let color = state.config.palette.color_for(req.value, req.min, req.max);
    Json(ColorResponse {
        color: color.to_hex(),
    })
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: calibscope_core::VERSION.to_string(),
    })
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let topo = &state.config.topology;
    Json(serde_json::json!({
        "name": "calibscope server",
        "version": calibscope_core::VERSION,
        "topology": {
            "grid_size": topo.grid_size,
            "mux_size": topo.mux_size,
            "region_size": topo.region_size,
        },
        "endpoints": {
            "/": "This API index",
            "/health": "Health check",
            "/api/v1/stats": "POST {values, parameter?, threshold?, direction?} → summary with yield",
            "/api/v1/correlation": "POST {snapshot, parameters?, min_samples?} → pairwise Pearson r",
            "/api/v1/cdf": "POST {values} → empirical CDF curve",
            "/api/v1/histogram": "POST {values, bins?} → equal-width bins (default 20)",
            "/api/v1/layout": "POST {entities} → grid placement per qubit/coupling id",
            "/api/v1/color": "POST {value, min, max} → heatmap color",
        },
    }))
}

/// Build the axum router.
fn build_router(config: DashboardConfig) -> Router {
    let state = Arc::new(AppState { config });

    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/api/v1/stats", post(handle_stats))
        .route("/api/v1/correlation", post(handle_correlation))
        .route("/api/v1/cdf", post(handle_cdf))
        .route("/api/v1/histogram", post(handle_histogram))
        .route("/api/v1/layout", post(handle_layout))
        .route("/api/v1/color", post(handle_color))
        .with_state(state)
}

/// Run the HTTP server until the listener fails.
pub async fn run_server(config: DashboardConfig, host: &str, port: u16) -> std::io::Result<()> {
    let app = build_router(config);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("calibscope server listening on {addr}");
    axum::serve(listener, app).await
}
