//! Lifecycle management for per-symbol collectors.
//!
//! One collector task per configured symbol, all sharing a sink and a
//! shutdown signal. Shutdown is graceful up to a deadline, after which
//! stragglers are aborted.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::collector::TradeCollector;
use crate::sink::TickSink;
use crate::types::CollectorConfig;

/// Owns the collector tasks for all configured symbols.
pub struct IngestManager {
    sink: Arc<dyn TickSink>,
    ws_base_url: String,
    shutdown_grace: Duration,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    handles: Vec<(String, JoinHandle<()>)>,
}

impl IngestManager {
    /// Creates a manager delivering ticks to `sink`.
    #[must_use]
    pub fn new(
        sink: Arc<dyn TickSink>,
        ws_base_url: impl Into<String>,
        shutdown_grace: Duration,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            sink,
            ws_base_url: ws_base_url.into(),
            shutdown_grace,
            shutdown_tx,
            shutdown_rx,
            handles: Vec::new(),
        }
    }

    /// Spawns a collector task for one symbol.
    pub fn spawn(&mut self, symbol: &str) {
        let config = CollectorConfig::new(symbol).with_ws_base_url(self.ws_base_url.clone());
        let task_symbol = config.symbol.clone();
        let mut collector =
            TradeCollector::new(config, Arc::clone(&self.sink), self.shutdown_rx.clone());

        tracing::info!("Starting collector for {}", task_symbol);
        let handle = tokio::spawn(async move {
            if let Err(e) = collector.run().await {
                tracing::error!("Collector for {} stopped with error: {}", task_symbol, e);
            }
        });

        self.handles.push((symbol.to_lowercase(), handle));
    }

    /// Spawns one collector per symbol.
    pub fn spawn_all(&mut self, symbols: &[String]) {
        for symbol in symbols {
            self.spawn(symbol);
        }
    }

    /// Number of collector tasks spawned.
    #[must_use]
    pub fn collector_count(&self) -> usize {
        self.handles.len()
    }

    /// Signals shutdown and waits for collectors to stop.
    ///
    /// Collectors still running once the grace period elapses are
    /// aborted.
    ///
    /// # Errors
    /// Currently always returns `Ok`; panicked collector tasks are
    /// logged, not propagated.
    pub async fn shutdown_all(self) -> Result<()> {
        tracing::info!("Shutting down {} collector(s)", self.handles.len());
        let _ = self.shutdown_tx.send(true);

        let deadline = Instant::now() + self.shutdown_grace;
        for (symbol, mut handle) in self.handles {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match tokio::time::timeout(remaining, &mut handle).await {
                Ok(Ok(())) => tracing::info!("Collector for {} stopped", symbol),
                Ok(Err(e)) => tracing::warn!("Collector task for {} panicked: {}", symbol, e),
                Err(_) => {
                    tracing::warn!(
                        "Collector for {} did not stop within grace period, aborting",
                        symbol
                    );
                    handle.abort();
                }
            }
        }

        Ok(())
    }
}
