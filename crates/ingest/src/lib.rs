//! Live trade stream ingestion from Binance Futures.
//!
//! This crate provides:
//! - Per-symbol WebSocket collectors for the trade stream
//! - A sink trait decoupling collectors from storage
//! - A manager owning collector lifecycles and graceful shutdown

pub mod collector;
pub mod common;
pub mod manager;
pub mod sink;
pub mod types;

pub use collector::{TradeCollector, TradeEvent, RECONNECT_DELAY_CLOSED, RECONNECT_DELAY_REFUSED};
pub use manager::IngestManager;
pub use sink::TickSink;
pub use types::{CollectorConfig, CollectorEvent, CollectorStats};
