//! Shared types for stream collectors.
//!
//! Common configuration, events, and statistics used by the per-symbol
//! trade collectors.

use crate::common::BINANCE_FUTURES_WS;

/// Configuration for a trade stream collector.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Trading pair symbol, lower-cased for the stream path (e.g., "btcusdt")
    pub symbol: String,
    /// WebSocket endpoint base
    pub ws_base_url: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            symbol: "btcusdt".to_string(),
            ws_base_url: BINANCE_FUTURES_WS.to_string(),
        }
    }
}

impl CollectorConfig {
    /// Creates a new collector config for a specific symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into().to_lowercase(),
            ..Default::default()
        }
    }

    /// Sets the WebSocket endpoint base.
    #[must_use]
    pub fn with_ws_base_url(mut self, url: impl Into<String>) -> Self {
        self.ws_base_url = url.into();
        self
    }
}

/// Events emitted by collectors for monitoring.
#[derive(Debug, Clone)]
pub enum CollectorEvent {
    /// Successfully connected to the trade stream
    Connected { source: String },
    /// Disconnected from the trade stream
    Disconnected { source: String, reason: String },
    /// Error occurred during collection
    Error { source: String, error: String },
    /// Heartbeat for health monitoring
    Heartbeat {
        source: String,
        timestamp: chrono::DateTime<chrono::Utc>,
        ticks_stored: u64,
    },
    /// Reconnection attempt
    Reconnecting { source: String, attempt: u32 },
}

/// Statistics for a running collector.
#[derive(Debug, Clone, Default)]
pub struct CollectorStats {
    /// Ticks handed to the sink and acknowledged
    pub ticks_stored: u64,
    /// Messages dropped because they could not be parsed or validated
    pub parse_errors: u64,
    /// Ticks the sink failed to store
    pub store_errors: u64,
    /// Number of reconnections
    pub reconnections: u32,
    /// Time of the last stored tick
    pub last_tick_time: Option<chrono::DateTime<chrono::Utc>>,
}

impl CollectorStats {
    /// Records a successfully stored tick.
    pub fn tick_stored(&mut self) {
        self.ticks_stored += 1;
        self.last_tick_time = Some(chrono::Utc::now());
    }

    /// Records a message dropped at the parse boundary.
    pub fn parse_error(&mut self) {
        self.parse_errors += 1;
    }

    /// Records a failed sink delivery.
    pub fn store_error(&mut self) {
        self.store_errors += 1;
    }

    /// Increments the reconnection count.
    pub fn reconnected(&mut self) {
        self.reconnections += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_config_default() {
        let config = CollectorConfig::default();

        assert_eq!(config.symbol, "btcusdt");
        assert_eq!(config.ws_base_url, BINANCE_FUTURES_WS);
    }

    #[test]
    fn test_collector_config_new_lowercases_symbol() {
        let config = CollectorConfig::new("ETHUSDT");
        assert_eq!(config.symbol, "ethusdt");
    }

    #[test]
    fn test_collector_config_builder() {
        let config = CollectorConfig::new("solusdt").with_ws_base_url("wss://localhost:9443/ws");

        assert_eq!(config.symbol, "solusdt");
        assert_eq!(config.ws_base_url, "wss://localhost:9443/ws");
    }

    #[test]
    fn test_collector_stats_tick_stored() {
        let mut stats = CollectorStats::default();
        assert!(stats.last_tick_time.is_none());

        stats.tick_stored();
        assert_eq!(stats.ticks_stored, 1);
        assert!(stats.last_tick_time.is_some());

        stats.tick_stored();
        assert_eq!(stats.ticks_stored, 2);
    }

    #[test]
    fn test_collector_stats_error_counters_are_separate() {
        let mut stats = CollectorStats::default();

        stats.parse_error();
        stats.parse_error();
        stats.store_error();

        assert_eq!(stats.parse_errors, 2);
        assert_eq!(stats.store_errors, 1);
        assert_eq!(stats.ticks_stored, 0);
    }

    #[test]
    fn test_collector_stats_reconnected() {
        let mut stats = CollectorStats::default();

        stats.reconnected();
        stats.reconnected();
        assert_eq!(stats.reconnections, 2);
    }

    #[test]
    fn test_collector_event_variants() {
        let _connected = CollectorEvent::Connected {
            source: "test".to_string(),
        };

        let _disconnected = CollectorEvent::Disconnected {
            source: "test".to_string(),
            reason: "stream ended".to_string(),
        };

        let _error = CollectorEvent::Error {
            source: "test".to_string(),
            error: "parse error".to_string(),
        };

        let _heartbeat = CollectorEvent::Heartbeat {
            source: "test".to_string(),
            timestamp: chrono::Utc::now(),
            ticks_stored: 100,
        };

        let _reconnecting = CollectorEvent::Reconnecting {
            source: "test".to_string(),
            attempt: 3,
        };
    }
}
