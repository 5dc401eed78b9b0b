//! Tick delivery seam between collectors and storage.

use anyhow::Result;
use async_trait::async_trait;
use pairscope_data::{TickRecord, TickRepository};

/// Destination for normalized ticks.
///
/// Collectors hand each tick to the sink before reading the next stream
/// message; there is no internal buffering, so delivery is at-most-once
/// and a failed store is dropped rather than retried.
#[async_trait]
pub trait TickSink: Send + Sync {
    /// Stores one tick.
    ///
    /// # Errors
    /// Returns an error if the tick could not be persisted.
    async fn store_tick(&self, tick: &TickRecord) -> Result<()>;
}

#[async_trait]
impl TickSink for TickRepository {
    async fn store_tick(&self, tick: &TickRecord) -> Result<()> {
        self.insert(tick).await
    }
}

/// In-memory sink for collector tests.
#[cfg(test)]
pub(crate) struct MemorySink {
    ticks: tokio::sync::Mutex<Vec<TickRecord>>,
}

#[cfg(test)]
impl MemorySink {
    pub fn new() -> Self {
        Self {
            ticks: tokio::sync::Mutex::new(Vec::new()),
        }
    }

    pub async fn ticks(&self) -> Vec<TickRecord> {
        self.ticks.lock().await.clone()
    }
}

#[cfg(test)]
#[async_trait]
impl TickSink for MemorySink {
    async fn store_tick(&self, tick: &TickRecord) -> Result<()> {
        self.ticks.lock().await.push(tick.clone());
        Ok(())
    }
}

/// Sink that rejects every tick, for store-error tests.
#[cfg(test)]
pub(crate) struct FailingSink;

#[cfg(test)]
#[async_trait]
impl TickSink for FailingSink {
    async fn store_tick(&self, _tick: &TickRecord) -> Result<()> {
        Err(anyhow::anyhow!("sink unavailable"))
    }
}
