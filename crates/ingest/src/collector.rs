//! Trade stream collector for Binance Futures.
//!
//! Connects to the per-symbol trade WebSocket stream, normalizes each
//! execution into a [`TickRecord`], and hands it to the sink before
//! reading the next message. Malformed messages are dropped and counted;
//! they never terminate the session.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use pairscope_data::TickRecord;
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::Message;

use crate::common;
use crate::sink::TickSink;
use crate::types::{CollectorConfig, CollectorEvent, CollectorStats};

/// Delay before reconnecting after the server drops an established
/// session without a normal close.
pub const RECONNECT_DELAY_CLOSED: Duration = Duration::from_secs(5);
/// Delay before reconnecting after a failed connection attempt.
pub const RECONNECT_DELAY_REFUSED: Duration = Duration::from_secs(10);

/// Binance trade WebSocket message.
///
/// JSON format:
/// ```json
/// {
///   "e": "trade",
///   "E": 1699999999999,
///   "s": "BTCUSDT",
///   "t": 123456789,
///   "p": "42750.50",
///   "q": "0.150",
///   "T": 1699999999998,
///   "m": true
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TradeEvent {
    /// Event type ("trade")
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time (milliseconds)
    #[serde(rename = "E")]
    pub event_time: i64,
    /// Symbol
    #[serde(rename = "s")]
    pub symbol: String,
    /// Trade ID
    #[serde(rename = "t")]
    pub trade_id: i64,
    /// Price
    #[serde(rename = "p")]
    pub price: String,
    /// Quantity
    #[serde(rename = "q")]
    pub quantity: String,
    /// Trade time (milliseconds)
    #[serde(rename = "T")]
    pub trade_time: i64,
    /// Is the buyer the market maker?
    #[serde(rename = "m")]
    pub buyer_is_maker: bool,
}

impl TradeEvent {
    /// True when this message carries a trade execution.
    #[must_use]
    pub fn is_trade(&self) -> bool {
        self.event_type == "trade"
    }

    /// Converts to a normalized tick.
    ///
    /// Returns `None` when price or quantity fail to parse, or when the
    /// values fall outside the valid tick range.
    #[must_use]
    pub fn to_tick(&self) -> Option<TickRecord> {
        let price = Decimal::from_str(&self.price).ok()?;
        let size = Decimal::from_str(&self.quantity).ok()?;

        TickRecord::from_trade(&self.symbol, self.trade_time, price, size)
    }
}

/// How a streaming session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    /// Server closed with a normal close frame; the collector exits.
    CleanClose,
    /// Session dropped without a normal close; reconnect after
    /// [`RECONNECT_DELAY_CLOSED`].
    Lost,
    /// Shutdown was signaled.
    Shutdown,
}

/// Trade stream collector for one symbol.
///
/// Reconnects on failures until a shutdown is signaled or the server
/// closes the stream cleanly.
pub struct TradeCollector {
    /// Configuration
    config: CollectorConfig,
    /// Destination for normalized ticks
    sink: Arc<dyn TickSink>,
    /// Shutdown signal shared across collectors
    shutdown: watch::Receiver<bool>,
    /// Optional event channel for monitoring
    event_tx: Option<mpsc::Sender<CollectorEvent>>,
    /// Statistics
    stats: CollectorStats,
}

impl TradeCollector {
    /// Creates a new trade collector.
    pub fn new(
        config: CollectorConfig,
        sink: Arc<dyn TickSink>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            sink,
            shutdown,
            event_tx: None,
            stats: CollectorStats::default(),
        }
    }

    /// Sets the event channel for monitoring.
    #[must_use]
    pub fn with_event_channel(mut self, tx: mpsc::Sender<CollectorEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Returns a reference to the current statistics.
    pub fn stats(&self) -> &CollectorStats {
        &self.stats
    }

    /// Builds the WebSocket URL for the trade stream.
    pub fn build_ws_url(&self) -> String {
        format!(
            "{}/{}@trade",
            self.config.ws_base_url.trim_end_matches('/'),
            self.config.symbol
        )
    }

    /// Runs the collector until shutdown or a clean server close.
    ///
    /// A lost session reconnects after [`RECONNECT_DELAY_CLOSED`]; a
    /// failed connection attempt after [`RECONNECT_DELAY_REFUSED`].
    ///
    /// # Errors
    /// Currently always returns `Ok`; the `Result` keeps the signature
    /// stable for callers joining collector tasks.
    pub async fn run(&mut self) -> Result<()> {
        let mut reconnect_attempts = 0u32;

        loop {
            if *self.shutdown.borrow() {
                break;
            }

            let delay = match self.collect_stream().await {
                Ok(SessionEnd::CleanClose) => {
                    tracing::info!(
                        "Trade stream for {} closed cleanly, collector exiting",
                        self.config.symbol
                    );
                    break;
                }
                Ok(SessionEnd::Shutdown) => break,
                Ok(SessionEnd::Lost) => RECONNECT_DELAY_CLOSED,
                Err(e) => {
                    tracing::error!("Trade stream error for {}: {}", self.config.symbol, e);
                    self.emit_event(CollectorEvent::Error {
                        source: self.source_name(),
                        error: e.to_string(),
                    })
                    .await;
                    RECONNECT_DELAY_REFUSED
                }
            };

            reconnect_attempts += 1;
            self.stats.reconnected();
            self.emit_event(CollectorEvent::Reconnecting {
                source: self.source_name(),
                attempt: reconnect_attempts,
            })
            .await;
            tracing::info!(
                "Reconnecting {} in {:?} (attempt {})",
                self.config.symbol,
                delay,
                reconnect_attempts
            );

            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                _ = self.shutdown.changed() => {}
            }
        }

        Ok(())
    }

    /// Runs one streaming session and reports how it ended.
    async fn collect_stream(&mut self) -> Result<SessionEnd> {
        let url = self.build_ws_url();
        tracing::info!("Connecting to trade stream: {}", url);

        let mut stream = common::connect_websocket(&url)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        self.emit_event(CollectorEvent::Connected {
            source: self.source_name(),
        })
        .await;

        let mut last_heartbeat = Instant::now();

        let end = loop {
            let message = tokio::select! {
                _ = self.shutdown.changed() => {
                    let _ = stream.close(None).await;
                    break SessionEnd::Shutdown;
                }
                msg = stream.next() => msg,
            };

            let Some(msg) = message else {
                break SessionEnd::Lost;
            };

            match msg {
                Ok(Message::Text(text)) => {
                    self.process_message(&text).await;

                    // Emit heartbeat every 30 seconds
                    if last_heartbeat.elapsed() > Duration::from_secs(30) {
                        self.emit_event(CollectorEvent::Heartbeat {
                            source: self.source_name(),
                            timestamp: chrono::Utc::now(),
                            ticks_stored: self.stats.ticks_stored,
                        })
                        .await;
                        last_heartbeat = Instant::now();
                    }
                }
                Ok(Message::Ping(payload)) => {
                    if stream.send(Message::Pong(payload)).await.is_err() {
                        break SessionEnd::Lost;
                    }
                }
                Ok(Message::Close(frame)) => {
                    let clean = frame
                        .as_ref()
                        .map_or(true, |f| matches!(f.code, CloseCode::Normal | CloseCode::Away));
                    break if clean {
                        SessionEnd::CleanClose
                    } else {
                        SessionEnd::Lost
                    };
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Trade stream read error for {}: {}", self.config.symbol, e);
                    break SessionEnd::Lost;
                }
            }
        };

        let reason = match end {
            SessionEnd::CleanClose => "stream closed",
            SessionEnd::Lost => "connection lost",
            SessionEnd::Shutdown => "shutdown requested",
        };
        self.emit_event(CollectorEvent::Disconnected {
            source: self.source_name(),
            reason: reason.to_string(),
        })
        .await;

        Ok(end)
    }

    /// Normalizes one text frame and delivers it to the sink.
    ///
    /// Parse failures and sink failures are counted and logged; the
    /// session continues either way.
    async fn process_message(&mut self, text: &str) {
        let event: TradeEvent = match serde_json::from_str(text) {
            Ok(event) => event,
            Err(e) => {
                self.stats.parse_error();
                tracing::warn!("Dropping malformed trade message: {}", e);
                return;
            }
        };

        if !event.is_trade() {
            tracing::debug!("Ignoring {} event on trade stream", event.event_type);
            return;
        }

        let Some(tick) = event.to_tick() else {
            self.stats.parse_error();
            tracing::warn!(
                "Dropping trade with unparseable fields: symbol={} price={} qty={}",
                event.symbol,
                event.price,
                event.quantity
            );
            return;
        };

        match self.sink.store_tick(&tick).await {
            Ok(()) => self.stats.tick_stored(),
            Err(e) => {
                self.stats.store_error();
                tracing::warn!("Failed to store tick for {}: {}", tick.symbol, e);
            }
        }
    }

    /// Helper to emit events.
    async fn emit_event(&self, event: CollectorEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event).await;
        }
    }

    /// Returns the source name for logging/events.
    fn source_name(&self) -> String {
        format!("trades:{}", self.config.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{FailingSink, MemorySink};
    use rust_decimal_macros::dec;

    const TRADE_JSON: &str = r#"{
        "e": "trade",
        "E": 1700000000010,
        "s": "BTCUSDT",
        "t": 88,
        "p": "42750.50",
        "q": "0.150",
        "T": 1700000000005,
        "m": false
    }"#;

    fn test_collector(sink: Arc<dyn TickSink>) -> (watch::Sender<bool>, TradeCollector) {
        let (tx, rx) = watch::channel(false);
        let collector = TradeCollector::new(CollectorConfig::new("btcusdt"), sink, rx);
        (tx, collector)
    }

    // =========================================================================
    // TradeEvent Parsing Tests
    // =========================================================================

    #[test]
    fn test_parse_trade_event() {
        let event: TradeEvent = serde_json::from_str(TRADE_JSON).expect("parse failed");

        assert_eq!(event.event_type, "trade");
        assert_eq!(event.symbol, "BTCUSDT");
        assert_eq!(event.trade_id, 88);
        assert_eq!(event.price, "42750.50");
        assert_eq!(event.quantity, "0.150");
        assert_eq!(event.trade_time, 1_700_000_000_005);
        assert!(!event.buyer_is_maker);
        assert!(event.is_trade());
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        let json = r#"{"e": "trade", "s": "BTCUSDT"}"#;
        assert!(serde_json::from_str::<TradeEvent>(json).is_err());
    }

    #[test]
    fn test_to_tick_normalizes_fields() {
        let event: TradeEvent = serde_json::from_str(TRADE_JSON).unwrap();
        let tick = event.to_tick().expect("conversion failed");

        assert_eq!(tick.symbol, "BTCUSDT");
        // Trade time, not event time, with millisecond precision kept.
        assert_eq!(tick.event_time_ms(), 1_700_000_000_005);
        assert_eq!(tick.price, dec!(42750.50));
        assert_eq!(tick.size, dec!(0.150));
    }

    #[test]
    fn test_to_tick_rejects_bad_price() {
        let json = TRADE_JSON.replace("42750.50", "not-a-number");
        let event: TradeEvent = serde_json::from_str(&json).unwrap();
        assert!(event.to_tick().is_none());
    }

    #[test]
    fn test_to_tick_rejects_zero_price() {
        let json = TRADE_JSON.replace("42750.50", "0");
        let event: TradeEvent = serde_json::from_str(&json).unwrap();
        assert!(event.to_tick().is_none());
    }

    // =========================================================================
    // URL Building
    // =========================================================================

    #[test]
    fn test_build_ws_url() {
        let (_tx, collector) = test_collector(Arc::new(MemorySink::new()));
        assert_eq!(
            collector.build_ws_url(),
            "wss://fstream.binance.com/ws/btcusdt@trade"
        );
    }

    #[test]
    fn test_build_ws_url_without_trailing_slash() {
        let (tx, rx) = watch::channel(false);
        let config = CollectorConfig::new("ethusdt").with_ws_base_url("wss://localhost:9443/ws");
        let collector = TradeCollector::new(config, Arc::new(MemorySink::new()), rx);

        assert_eq!(collector.build_ws_url(), "wss://localhost:9443/ws/ethusdt@trade");
        drop(tx);
    }

    // =========================================================================
    // Message Processing
    // =========================================================================

    #[tokio::test]
    async fn test_process_message_stores_tick() {
        let sink = Arc::new(MemorySink::new());
        let (_tx, mut collector) = test_collector(sink.clone());

        collector.process_message(TRADE_JSON).await;

        let ticks = sink.ticks().await;
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].symbol, "BTCUSDT");
        assert_eq!(collector.stats().ticks_stored, 1);
        assert_eq!(collector.stats().parse_errors, 0);
    }

    #[tokio::test]
    async fn test_process_message_drops_garbage() {
        let sink = Arc::new(MemorySink::new());
        let (_tx, mut collector) = test_collector(sink.clone());

        collector.process_message("not json at all").await;

        assert!(sink.ticks().await.is_empty());
        assert_eq!(collector.stats().parse_errors, 1);
        assert_eq!(collector.stats().ticks_stored, 0);
    }

    #[tokio::test]
    async fn test_process_message_filters_non_trade_events() {
        let sink = Arc::new(MemorySink::new());
        let (_tx, mut collector) = test_collector(sink.clone());

        let json = TRADE_JSON.replace("\"trade\"", "\"aggTrade\"");
        collector.process_message(&json).await;

        // Filtered, not an error.
        assert!(sink.ticks().await.is_empty());
        assert_eq!(collector.stats().parse_errors, 0);
    }

    #[tokio::test]
    async fn test_process_message_counts_store_failures() {
        let (_tx, mut collector) = test_collector(Arc::new(FailingSink));

        collector.process_message(TRADE_JSON).await;
        collector.process_message(TRADE_JSON).await;

        assert_eq!(collector.stats().store_errors, 2);
        assert_eq!(collector.stats().ticks_stored, 0);
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    #[tokio::test]
    async fn test_run_exits_when_shutdown_already_signaled() {
        let sink = Arc::new(MemorySink::new());
        let (tx, rx) = watch::channel(true);
        let mut collector =
            TradeCollector::new(CollectorConfig::new("btcusdt"), sink, rx);

        // Must return without attempting a connection.
        collector.run().await.unwrap();
        drop(tx);
    }

    #[test]
    fn test_reconnect_delays_match_policy() {
        assert_eq!(RECONNECT_DELAY_CLOSED, Duration::from_secs(5));
        assert_eq!(RECONNECT_DELAY_REFUSED, Duration::from_secs(10));
    }
}
