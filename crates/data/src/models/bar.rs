//! OHLCV bar model.
//!
//! Bars are derived from stored ticks on every query and never persisted.
//! A bar is labeled by the right edge of its interval: the bar at
//! `open_time` covers `(open_time - duration, open_time]`.

use chrono::{DateTime, Utc};
use pairscope_core::Timeframe;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// One OHLCV bar aggregated from ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Instrument symbol
    pub symbol: String,
    /// Aggregation interval
    pub timeframe: Timeframe,
    /// Right-edge label of the interval
    pub open_time: DateTime<Utc>,
    /// First trade price in the interval
    pub open: Decimal,
    /// Highest trade price in the interval
    pub high: Decimal,
    /// Lowest trade price in the interval
    pub low: Decimal,
    /// Last trade price in the interval
    pub close: Decimal,
    /// Sum of trade sizes in the interval
    pub volume: Decimal,
}

impl Bar {
    /// Opens a bar from the first tick of an interval.
    #[must_use]
    pub fn open_at(
        symbol: &str,
        timeframe: Timeframe,
        open_time: DateTime<Utc>,
        price: Decimal,
        size: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            timeframe,
            open_time,
            open: price,
            high: price,
            low: price,
            close: price,
            volume: size,
        }
    }

    /// Folds a subsequent tick of the same interval into the bar.
    ///
    /// Ticks must arrive in event-time order; the close always tracks the
    /// most recent one.
    pub fn update(&mut self, price: Decimal, size: Decimal) {
        if price > self.high {
            self.high = price;
        }
        if price < self.low {
            self.low = price;
        }
        self.close = price;
        self.volume += size;
    }

    /// Returns the close price as `f64` for statistical computation.
    #[must_use]
    pub fn close_f64(&self) -> Option<f64> {
        self.close.to_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample_open_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 31, 0).unwrap()
    }

    #[test]
    fn test_open_at_seeds_all_prices() {
        let bar = Bar::open_at(
            "BTCUSDT",
            Timeframe::OneMinute,
            sample_open_time(),
            dec!(50000),
            dec!(0.5),
        );

        assert_eq!(bar.open, dec!(50000));
        assert_eq!(bar.high, dec!(50000));
        assert_eq!(bar.low, dec!(50000));
        assert_eq!(bar.close, dec!(50000));
        assert_eq!(bar.volume, dec!(0.5));
    }

    #[test]
    fn test_update_tracks_ohlc() {
        let mut bar = Bar::open_at(
            "BTCUSDT",
            Timeframe::OneMinute,
            sample_open_time(),
            dec!(100),
            dec!(1),
        );

        bar.update(dec!(105), dec!(2));
        bar.update(dec!(98), dec!(1));
        bar.update(dec!(101), dec!(3));

        assert_eq!(bar.open, dec!(100));
        assert_eq!(bar.high, dec!(105));
        assert_eq!(bar.low, dec!(98));
        assert_eq!(bar.close, dec!(101));
        assert_eq!(bar.volume, dec!(7));
    }

    #[test]
    fn test_close_f64() {
        let bar = Bar::open_at(
            "ETHUSDT",
            Timeframe::FiveMinutes,
            sample_open_time(),
            dec!(2000.25),
            dec!(1),
        );
        assert_eq!(bar.close_f64(), Some(2000.25));
    }
}
