use crate::handlers;
use axum::{
    routing::{get, post},
    Router,
};
use pairscope_analytics::PairsAnalyst;
use pairscope_core::{AnalyticsConfig, LiveStatsConfig};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state behind every handler.
pub struct ApiState {
    /// Analysis pipeline over stored ticks
    pub analyst: PairsAnalyst,
    /// Symbols the ingest layer is configured for
    pub symbols: Vec<String>,
    /// Defaults applied to analysis requests
    pub analytics: AnalyticsConfig,
    /// Parameters for the low-latency snapshot endpoint
    pub live_stats: LiveStatsConfig,
}

pub struct ApiServer {
    state: Arc<ApiState>,
}

impl ApiServer {
    #[must_use]
    pub fn new(state: ApiState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/api/v1/analysis", post(handlers::run_analysis))
            .route("/api/v1/live_stats", get(handlers::live_stats))
            .route("/api/v1/symbols", get(handlers::list_symbols))
            .route("/health", get(handlers::health))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Starts the web server listening on the specified address.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Web API listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
