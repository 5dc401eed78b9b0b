use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ingest: IngestConfig,
    pub analytics: AnalyticsConfig,
    pub live_stats: LiveStatsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Symbols to ingest, one trade stream per symbol.
    pub symbols: Vec<String>,
    pub ws_base_url: String,
    /// Seconds to wait for collectors to stop before aborting them.
    pub shutdown_grace_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub default_timeframe: String,
    pub default_rolling_window: usize,
    pub default_lookback_minutes: i64,
}

/// Parameters for the low-latency snapshot served at `/api/v1/live_stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveStatsConfig {
    pub timeframe: String,
    pub rolling_window: usize,
    pub lookback_minutes: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/pairscope".to_string(),
                max_connections: 10,
            },
            ingest: IngestConfig {
                symbols: vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()],
                ws_base_url: "wss://fstream.binance.com/ws".to_string(),
                shutdown_grace_secs: 5,
            },
            analytics: AnalyticsConfig {
                default_timeframe: "1m".to_string(),
                default_rolling_window: 60,
                default_lookback_minutes: 720,
            },
            live_stats: LiveStatsConfig {
                timeframe: "1m".to_string(),
                rolling_window: 20,
                lookback_minutes: 10,
            },
        }
    }
}
