//! Analytics for the pairs-trading pipeline.
//!
//! This crate turns stored ticks into OHLCV bars and bar pairs into
//! trading diagnostics:
//!
//! - `resampler`: right-closed tick-to-bar bucketing plus the
//!   repository-backed [`Resampler`]
//! - `rolling`: windowed mean, sample deviation, and correlation
//! - `analyst`: the full pair pipeline (align, hedge regression,
//!   spread, z-score, stationarity)

pub mod analyst;
pub mod resampler;
pub mod rolling;

pub use analyst::{
    analyze_pair, AnalysisRequest, AnalysisRow, PairAnalysis, PairsAnalyst, StationarityReport,
};
pub use resampler::{bucket_label_ms, resample_ticks, Resampler};
pub use rolling::{rolling_correlation, rolling_mean, rolling_std};
