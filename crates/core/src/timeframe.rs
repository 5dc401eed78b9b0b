//! Bar intervals and their string forms.

use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

/// Resampling interval for OHLCV bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    OneSecond,
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    FourHours,
    OneDay,
}

impl Timeframe {
    /// Returns the canonical string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneSecond => "1s",
            Timeframe::OneMinute => "1m",
            Timeframe::FiveMinutes => "5m",
            Timeframe::FifteenMinutes => "15m",
            Timeframe::ThirtyMinutes => "30m",
            Timeframe::OneHour => "1h",
            Timeframe::FourHours => "4h",
            Timeframe::OneDay => "1d",
        }
    }

    /// Returns the interval duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        match self {
            Timeframe::OneSecond => 1_000,
            Timeframe::OneMinute => 60_000,
            Timeframe::FiveMinutes => 300_000,
            Timeframe::FifteenMinutes => 900_000,
            Timeframe::ThirtyMinutes => 1_800_000,
            Timeframe::OneHour => 3_600_000,
            Timeframe::FourHours => 14_400_000,
            Timeframe::OneDay => 86_400_000,
        }
    }

    /// Returns the interval as a chrono duration.
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.duration_ms())
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    /// Parses both the short form ("1m") and the pandas-style spellings
    /// ("1min", "1T") used by older clients.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "1s" => Ok(Timeframe::OneSecond),
            "1m" | "1min" | "1t" => Ok(Timeframe::OneMinute),
            "5m" | "5min" | "5t" => Ok(Timeframe::FiveMinutes),
            "15m" | "15min" | "15t" => Ok(Timeframe::FifteenMinutes),
            "30m" | "30min" | "30t" => Ok(Timeframe::ThirtyMinutes),
            "1h" => Ok(Timeframe::OneHour),
            "4h" => Ok(Timeframe::FourHours),
            "1d" => Ok(Timeframe::OneDay),
            _ => Err(anyhow!(
                "Invalid timeframe: '{}'. Valid: 1s, 1m, 5m, 15m, 30m, 1h, 4h, 1d",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeframe_as_str() {
        assert_eq!(Timeframe::OneMinute.as_str(), "1m");
        assert_eq!(Timeframe::OneHour.as_str(), "1h");
        assert_eq!(Timeframe::OneDay.as_str(), "1d");
    }

    #[test]
    fn timeframe_duration_ms() {
        assert_eq!(Timeframe::OneSecond.duration_ms(), 1_000);
        assert_eq!(Timeframe::OneMinute.duration_ms(), 60_000);
        assert_eq!(Timeframe::FourHours.duration_ms(), 14_400_000);
    }

    #[test]
    fn timeframe_parse_short_form() {
        assert_eq!("1m".parse::<Timeframe>().unwrap(), Timeframe::OneMinute);
        assert_eq!("15M".parse::<Timeframe>().unwrap(), Timeframe::FifteenMinutes);
        assert_eq!("1d".parse::<Timeframe>().unwrap(), Timeframe::OneDay);
    }

    #[test]
    fn timeframe_parse_pandas_aliases() {
        // Older dashboards send pandas resample frequencies.
        assert_eq!("1T".parse::<Timeframe>().unwrap(), Timeframe::OneMinute);
        assert_eq!("5T".parse::<Timeframe>().unwrap(), Timeframe::FiveMinutes);
        assert_eq!("1min".parse::<Timeframe>().unwrap(), Timeframe::OneMinute);
        assert_eq!("30min".parse::<Timeframe>().unwrap(), Timeframe::ThirtyMinutes);
    }

    #[test]
    fn timeframe_parse_rejects_unknown() {
        assert!("2y".parse::<Timeframe>().is_err());
        assert!("".parse::<Timeframe>().is_err());
        assert!("fast".parse::<Timeframe>().is_err());
    }

    #[test]
    fn timeframe_display_matches_as_str() {
        assert_eq!(Timeframe::FiveMinutes.to_string(), "5m");
    }

    #[test]
    fn timeframe_duration_matches_ms() {
        let tf = Timeframe::OneMinute;
        assert_eq!(tf.duration().num_milliseconds(), tf.duration_ms());
    }
}
