//! Normalized trade tick model.
//!
//! A tick is the canonical unit flowing through the pipeline: one trade
//! execution reduced to instrument, event time, price, and size. Raw
//! exchange payloads are validated once, at construction, so downstream
//! consumers never see out-of-range values.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single normalized trade tick.
///
/// Event times keep the exchange's millisecond precision verbatim. Two
/// trades of the same instrument in the same millisecond collapse to one
/// row at the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TickRecord {
    /// Instrument symbol, upper-cased (e.g., "BTCUSDT")
    pub symbol: String,
    /// Exchange-reported trade time, millisecond precision
    #[serde(rename = "event_time_ms", with = "chrono::serde::ts_milliseconds")]
    pub event_time: DateTime<Utc>,
    /// Trade price
    pub price: Decimal,
    /// Trade size in base currency
    pub size: Decimal,
}

impl TickRecord {
    /// Creates a tick record, upper-casing the symbol.
    #[must_use]
    pub fn new(symbol: &str, event_time: DateTime<Utc>, price: Decimal, size: Decimal) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            event_time,
            price,
            size,
        }
    }

    /// Builds a tick from raw exchange trade fields.
    ///
    /// This is the validation point for stream data: returns `None` when
    /// the price is not strictly positive, the size is negative, or the
    /// trade time does not map to a valid timestamp.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairscope_data::models::TickRecord;
    /// use rust_decimal_macros::dec;
    ///
    /// let tick = TickRecord::from_trade("btcusdt", 1_700_000_000_000, dec!(50000.5), dec!(0.25))
    ///     .unwrap();
    /// assert_eq!(tick.symbol, "BTCUSDT");
    /// assert_eq!(tick.event_time_ms(), 1_700_000_000_000);
    ///
    /// assert!(TickRecord::from_trade("btcusdt", 1_700_000_000_000, dec!(0), dec!(1)).is_none());
    /// ```
    #[must_use]
    pub fn from_trade(
        symbol: &str,
        trade_time_ms: i64,
        price: Decimal,
        size: Decimal,
    ) -> Option<Self> {
        if price <= Decimal::ZERO || size < Decimal::ZERO {
            return None;
        }
        let event_time = DateTime::from_timestamp_millis(trade_time_ms)?;
        Some(Self::new(symbol, event_time, price, size))
    }

    /// Returns the event time as milliseconds since the Unix epoch.
    #[must_use]
    pub fn event_time_ms(&self) -> i64 {
        self.event_time.timestamp_millis()
    }

    /// Returns the price as `f64` for statistical computation.
    #[must_use]
    pub fn price_f64(&self) -> Option<f64> {
        self.price.to_f64()
    }

    /// Returns the size as `f64`.
    #[must_use]
    pub fn size_f64(&self) -> Option<f64> {
        self.size.to_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
    }

    // ============================================
    // Construction and Normalization
    // ============================================

    #[test]
    fn test_new_uppercases_symbol() {
        let tick = TickRecord::new("ethusdt", sample_timestamp(), dec!(2000), dec!(1));
        assert_eq!(tick.symbol, "ETHUSDT");
    }

    #[test]
    fn test_from_trade_valid() {
        let tick = TickRecord::from_trade("btcusdt", 1_700_000_000_123, dec!(50000.5), dec!(0.25))
            .unwrap();

        assert_eq!(tick.symbol, "BTCUSDT");
        assert_eq!(tick.event_time_ms(), 1_700_000_000_123);
        assert_eq!(tick.price, dec!(50000.5));
        assert_eq!(tick.size, dec!(0.25));
    }

    #[test]
    fn test_from_trade_keeps_millisecond_precision() {
        let tick = TickRecord::from_trade("BTCUSDT", 999, dec!(100), dec!(1)).unwrap();
        assert_eq!(tick.event_time_ms(), 999);
    }

    // ============================================
    // Validation Boundary
    // ============================================

    #[test]
    fn test_from_trade_rejects_non_positive_price() {
        assert!(TickRecord::from_trade("BTCUSDT", 1000, dec!(0), dec!(1)).is_none());
        assert!(TickRecord::from_trade("BTCUSDT", 1000, dec!(-50), dec!(1)).is_none());
    }

    #[test]
    fn test_from_trade_rejects_negative_size() {
        assert!(TickRecord::from_trade("BTCUSDT", 1000, dec!(100), dec!(-0.1)).is_none());
    }

    #[test]
    fn test_from_trade_accepts_zero_size() {
        let tick = TickRecord::from_trade("BTCUSDT", 1000, dec!(100), dec!(0)).unwrap();
        assert_eq!(tick.size, Decimal::ZERO);
    }

    // ============================================
    // Conversions
    // ============================================

    #[test]
    fn test_price_and_size_f64() {
        let tick = TickRecord::new("BTCUSDT", sample_timestamp(), dec!(50000.5), dec!(1.5));
        assert_eq!(tick.price_f64(), Some(50000.5));
        assert_eq!(tick.size_f64(), Some(1.5));
    }

    #[test]
    fn test_serialization_uses_millisecond_timestamps() {
        let tick =
            TickRecord::from_trade("BTCUSDT", 1_700_000_000_123, dec!(100), dec!(1)).unwrap();

        let json = serde_json::to_value(&tick).unwrap();
        assert_eq!(json["event_time_ms"], 1_700_000_000_123_i64);
        assert_eq!(json["symbol"], "BTCUSDT");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let tick = TickRecord::new("BTCUSDT", sample_timestamp(), dec!(50000.50), dec!(1.5));

        let json = serde_json::to_string(&tick).expect("serialization failed");
        let deserialized: TickRecord = serde_json::from_str(&json).expect("deserialization failed");

        assert_eq!(tick, deserialized);
    }
}
