use axum::{extract::State, http::StatusCode, Json};
use pairscope_analytics::{AnalysisRequest, AnalysisRow, StationarityReport};
use pairscope_core::Timeframe;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::server::ApiState;

#[derive(Debug, Deserialize)]
pub struct AnalysisParams {
    pub symbol_y: Option<String>,
    pub symbol_x: Option<String>,
    pub timeframe: Option<String>,
    pub rolling_window: Option<usize>,
    pub lookback_minutes: Option<i64>,
}

#[derive(Serialize)]
pub struct AnalysisResponse {
    pub status: &'static str,
    pub metadata: AnalysisMetadata,
    pub timeseries_data: Vec<AnalysisRow>,
}

#[derive(Serialize)]
pub struct AnalysisMetadata {
    pub symbol_y: String,
    pub symbol_x: String,
    pub timeframe: String,
    pub rolling_window: usize,
    pub hedge_ratio: Option<f64>,
    pub stationarity: StationarityReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

#[derive(Serialize)]
pub struct LiveStatsResponse {
    pub status: &'static str,
    pub latest_z_score: Option<f64>,
    pub latest_spread: Option<f64>,
    pub latest_price_y: Option<f64>,
    pub latest_price_x: Option<f64>,
    pub current_time: Option<String>,
}

impl LiveStatsResponse {
    fn no_data() -> Self {
        Self {
            status: "no_data",
            latest_z_score: None,
            latest_spread: None,
            latest_price_y: None,
            latest_price_x: None,
            current_time: None,
        }
    }
}

#[derive(Serialize)]
pub struct SymbolsResponse {
    pub symbols: Vec<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Runs the full pair analysis and returns chart rows plus metadata.
///
/// Omitted parameters fall back to the configured defaults; omitted
/// symbols fall back to the first two configured ones.
///
/// # Errors
/// Returns `StatusCode::BAD_REQUEST` for an unknown timeframe,
/// `StatusCode::NOT_FOUND` when no aligned rows exist for the pair, and
/// `StatusCode::INTERNAL_SERVER_ERROR` when the analysis itself fails.
pub async fn run_analysis(
    State(state): State<Arc<ApiState>>,
    Json(params): Json<AnalysisParams>,
) -> Result<Json<AnalysisResponse>, StatusCode> {
    let (default_y, default_x) = default_pair(&state.symbols);

    let timeframe = match params.timeframe.as_deref() {
        Some(raw) => raw
            .parse::<Timeframe>()
            .map_err(|_| StatusCode::BAD_REQUEST)?,
        None => parse_configured_timeframe(&state.analytics.default_timeframe)?,
    };

    let request = AnalysisRequest {
        symbol_y: params.symbol_y.unwrap_or(default_y),
        symbol_x: params.symbol_x.unwrap_or(default_x),
        timeframe,
        rolling_window: params
            .rolling_window
            .unwrap_or(state.analytics.default_rolling_window),
        lookback_minutes: params
            .lookback_minutes
            .unwrap_or(state.analytics.default_lookback_minutes),
    };

    let analysis = state.analyst.analyze(&request).await.map_err(|e| {
        tracing::error!(
            "Analysis for {}/{} failed: {e:#}",
            request.symbol_y,
            request.symbol_x
        );
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if analysis.rows.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(Json(AnalysisResponse {
        status: "success",
        metadata: AnalysisMetadata {
            symbol_y: analysis.symbol_y,
            symbol_x: analysis.symbol_x,
            timeframe: analysis.timeframe,
            rolling_window: analysis.rolling_window,
            hedge_ratio: analysis.hedge_ratio,
            stationarity: analysis.stationarity,
            diagnostic: analysis.diagnostic,
        },
        timeseries_data: analysis.rows,
    }))
}

/// Latest snapshot for the configured default pair, sized for dashboard
/// polling.
///
/// # Errors
/// Returns `StatusCode::INTERNAL_SERVER_ERROR` if the analysis fails.
pub async fn live_stats(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<LiveStatsResponse>, StatusCode> {
    let (symbol_y, symbol_x) = default_pair(&state.symbols);

    let request = AnalysisRequest {
        symbol_y,
        symbol_x,
        timeframe: parse_configured_timeframe(&state.live_stats.timeframe)?,
        rolling_window: state.live_stats.rolling_window,
        lookback_minutes: state.live_stats.lookback_minutes,
    };

    let analysis = state.analyst.analyze(&request).await.map_err(|e| {
        tracing::error!("Live stats analysis failed: {e:#}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let Some(latest) = analysis.rows.last() else {
        return Ok(Json(LiveStatsResponse::no_data()));
    };

    Ok(Json(LiveStatsResponse {
        status: "live",
        latest_z_score: Some(round_to(latest.z_score, 4)),
        latest_spread: Some(round_to(latest.spread, 4)),
        latest_price_y: Some(round_to(latest.price_y, 2)),
        latest_price_x: Some(round_to(latest.price_x, 2)),
        current_time: Some(latest.open_time.to_rfc3339()),
    }))
}

/// Lists the symbols the service is configured to ingest.
pub async fn list_symbols(State(state): State<Arc<ApiState>>) -> Json<SymbolsResponse> {
    Json(SymbolsResponse {
        symbols: state.symbols.clone(),
    })
}

/// Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Default pair when a request does not name symbols: the first two
/// configured ones.
fn default_pair(symbols: &[String]) -> (String, String) {
    let symbol_y = symbols
        .first()
        .cloned()
        .unwrap_or_else(|| "BTCUSDT".to_string());
    let symbol_x = symbols
        .get(1)
        .cloned()
        .unwrap_or_else(|| "ETHUSDT".to_string());
    (symbol_y, symbol_x)
}

fn parse_configured_timeframe(raw: &str) -> Result<Timeframe, StatusCode> {
    raw.parse::<Timeframe>().map_err(|e| {
        tracing::error!("Configured timeframe is invalid: {e:#}");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
