//! Tick-to-bar resampling.
//!
//! Buckets are right-closed and right-labeled: a tick at time `t` belongs
//! to the bar labeled by the smallest interval boundary at or after `t`,
//! and a tick exactly on a boundary closes that bucket. Intervals without
//! ticks produce no bar; there is no forward-fill.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};

use pairscope_core::Timeframe;
use pairscope_data::{Bar, TickRecord, TickRepository};

/// Right-edge label (epoch ms) of the bucket a tick at `event_time_ms`
/// falls in.
#[must_use]
pub fn bucket_label_ms(event_time_ms: i64, timeframe: Timeframe) -> i64 {
    let interval = timeframe.duration_ms();
    if event_time_ms % interval == 0 {
        event_time_ms
    } else {
        (event_time_ms.div_euclid(interval) + 1) * interval
    }
}

/// Aggregates ticks into OHLCV bars.
///
/// The input must be ascending by event time, which is how the
/// repository returns it. Bars come back in the same order. Within a
/// bucket the first tick opens and the last closes; sizes sum into
/// volume.
#[must_use]
pub fn resample_ticks(ticks: &[TickRecord], timeframe: Timeframe) -> Vec<Bar> {
    let mut bars: Vec<Bar> = Vec::new();

    for tick in ticks {
        let label_ms = bucket_label_ms(tick.event_time_ms(), timeframe);
        match bars.last_mut() {
            Some(bar) if bar.open_time.timestamp_millis() == label_ms => {
                bar.update(tick.price, tick.size);
            }
            _ => {
                let open_time =
                    DateTime::from_timestamp_millis(label_ms).unwrap_or_else(Utc::now);
                bars.push(Bar::open_at(
                    &tick.symbol,
                    timeframe,
                    open_time,
                    tick.price,
                    tick.size,
                ));
            }
        }
    }

    bars
}

/// Reads stored ticks and serves them as OHLCV bars.
#[derive(Debug, Clone)]
pub struct Resampler {
    ticks: TickRepository,
}

impl Resampler {
    /// Creates a resampler over the given tick repository.
    #[must_use]
    pub fn new(ticks: TickRepository) -> Self {
        Self { ticks }
    }

    /// Loads ticks for `symbol` over the trailing `lookback` window and
    /// aggregates them into `timeframe` bars.
    ///
    /// An empty tick set yields an empty vec, not an error.
    ///
    /// # Errors
    /// Returns an error if the tick query fails.
    pub async fn aggregate(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: Duration,
    ) -> Result<Vec<Bar>> {
        let symbol = symbol.to_uppercase();
        let since = Utc::now() - lookback;
        let ticks = self.ticks.query_since(&symbol, since).await?;
        Ok(resample_ticks(&ticks, timeframe))
    }
}

// ============================================================
// Tests
// ============================================================
