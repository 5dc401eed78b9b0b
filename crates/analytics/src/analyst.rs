//! Pairs-trading analytics over aligned bar series.
//!
//! The pipeline resamples both legs, inner-joins their closes on the bar
//! label, fits a log-price hedge regression, derives the spread and its
//! rolling diagnostics, and tests the spread for stationarity. Degenerate
//! inputs are reported inside the result rather than as errors; `Err` is
//! reserved for storage failures.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::warn;

use pairscope_core::{adf_test, ols, CriticalValues, Timeframe};
use pairscope_data::Bar;

use crate::resampler::Resampler;
use crate::rolling::{rolling_correlation, rolling_mean, rolling_std};

/// Fallback window when the requested one cannot apply to the sample.
const DEFAULT_ROLLING_WINDOW: usize = 60;

/// Minimum spread points for a meaningful stationarity test.
const MIN_ADF_OBSERVATIONS: usize = 20;

/// Parameters for one pair analysis.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Dependent leg (Y) of the hedge regression
    pub symbol_y: String,
    /// Independent leg (X); the hedge ratio prices this leg
    pub symbol_x: String,
    /// Bar interval both legs are resampled to
    pub timeframe: Timeframe,
    /// Window for the rolling mean, std, z-score, and correlation
    pub rolling_window: usize,
    /// How far back to read ticks, in minutes
    pub lookback_minutes: i64,
}

/// One fully-defined point of the analysis timeseries.
///
/// Rows exist only where every rolling statistic is defined, so the
/// first `window - 1` aligned bars never appear here.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRow {
    /// Right-edge bar label the legs were joined on
    pub open_time: DateTime<Utc>,
    pub price_y: f64,
    pub price_x: f64,
    /// Residual of the hedge regression at this point
    pub spread: f64,
    pub z_score: f64,
    pub rolling_mean: f64,
    pub rolling_std: f64,
    pub rolling_corr: f64,
}

/// Outcome of the spread stationarity test.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StationarityReport {
    /// The unit-root test ran to completion.
    Completed {
        statistic: f64,
        p_value: f64,
        lags_used: usize,
        observations: usize,
        critical_values: CriticalValues,
        /// p-value below 0.05
        stationary: bool,
    },
    /// Too few spread points for a meaningful test.
    InsufficientData { observations: usize },
    /// The test regression could not be fit on this spread.
    Failed { message: String },
}

impl StationarityReport {
    /// Whether the test completed and rejected the unit root at 95%.
    #[must_use]
    pub fn is_stationary(&self) -> bool {
        matches!(
            self,
            StationarityReport::Completed {
                stationary: true,
                ..
            }
        )
    }
}

/// Complete result of one pair analysis.
#[derive(Debug, Clone, Serialize)]
pub struct PairAnalysis {
    pub symbol_y: String,
    pub symbol_x: String,
    pub timeframe: String,
    /// Window as requested; the effective one may have been clamped
    pub rolling_window: usize,
    /// Slope of the log-price hedge regression, when the fit succeeded
    pub hedge_ratio: Option<f64>,
    pub stationarity: StationarityReport,
    /// Set when the hedge regression was degenerate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    pub rows: Vec<AnalysisRow>,
}

/// Runs the full pair analysis pipeline against stored ticks.
#[derive(Debug, Clone)]
pub struct PairsAnalyst {
    resampler: Resampler,
}

impl PairsAnalyst {
    /// Creates an analyst over the given resampler.
    #[must_use]
    pub fn new(resampler: Resampler) -> Self {
        Self { resampler }
    }

    /// Resamples both legs over the request lookback and analyzes the
    /// pair.
    ///
    /// # Errors
    /// Returns an error if either tick query fails. Thin or degenerate
    /// data is reported inside the result instead.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<PairAnalysis> {
        let lookback = Duration::minutes(request.lookback_minutes);
        let bars_y = self
            .resampler
            .aggregate(&request.symbol_y, request.timeframe, lookback)
            .await?;
        let bars_x = self
            .resampler
            .aggregate(&request.symbol_x, request.timeframe, lookback)
            .await?;

        Ok(analyze_pair(request, &bars_y, &bars_x))
    }
}

/// Analyzes a pair from already-resampled bars.
///
/// Exposed separately from [`PairsAnalyst::analyze`] so the statistical
/// pipeline is testable without a database.
#[must_use]
pub fn analyze_pair(request: &AnalysisRequest, bars_y: &[Bar], bars_x: &[Bar]) -> PairAnalysis {
    let (open_times, price_y, price_x) = align_closes(bars_y, bars_x);
    let aligned = open_times.len();

    // The hedge regression has two parameters, so fewer than three
    // aligned bars cannot support it.
    if aligned < 3 {
        return PairAnalysis {
            symbol_y: request.symbol_y.clone(),
            symbol_x: request.symbol_x.clone(),
            timeframe: request.timeframe.as_str().to_string(),
            rolling_window: request.rolling_window,
            hedge_ratio: None,
            stationarity: StationarityReport::InsufficientData {
                observations: aligned,
            },
            diagnostic: None,
            rows: Vec::new(),
        };
    }

    let Some((hedge_ratio, spread)) = compute_spread(&price_y, &price_x) else {
        warn!(
            symbol_y = %request.symbol_y,
            symbol_x = %request.symbol_x,
            "hedge regression degenerate, skipping spread analytics"
        );
        return PairAnalysis {
            symbol_y: request.symbol_y.clone(),
            symbol_x: request.symbol_x.clone(),
            timeframe: request.timeframe.as_str().to_string(),
            rolling_window: request.rolling_window,
            hedge_ratio: None,
            stationarity: StationarityReport::InsufficientData { observations: 0 },
            diagnostic: Some(
                "hedge regression failed: singular normal equations \
                 (constant or collinear log prices)"
                    .to_string(),
            ),
            rows: Vec::new(),
        };
    };

    let window = effective_window(request.rolling_window, aligned);
    let means = rolling_mean(&spread, window);
    let stds = rolling_std(&spread, window);
    let corrs = rolling_correlation(&price_y, &price_x, window);

    let mut rows = Vec::with_capacity(aligned.saturating_sub(window.saturating_sub(1)));
    for i in 0..aligned {
        let (Some(mean), Some(std), Some(corr)) = (means[i], stds[i], corrs[i]) else {
            continue;
        };
        // A zero-variance window leaves the z-score undefined.
        if std <= 0.0 {
            continue;
        }
        rows.push(AnalysisRow {
            open_time: open_times[i],
            price_y: price_y[i],
            price_x: price_x[i],
            spread: spread[i],
            z_score: (spread[i] - mean) / std,
            rolling_mean: mean,
            rolling_std: std,
            rolling_corr: corr,
        });
    }

    PairAnalysis {
        symbol_y: request.symbol_y.clone(),
        symbol_x: request.symbol_x.clone(),
        timeframe: request.timeframe.as_str().to_string(),
        rolling_window: request.rolling_window,
        hedge_ratio: Some(hedge_ratio),
        stationarity: stationarity_report(&spread),
        diagnostic: None,
        rows,
    }
}

/// Inner-joins two ascending bar series on their interval label.
///
/// Pairs whose log close would not be finite are skipped so the hedge
/// regression and spread stay defined everywhere downstream.
fn align_closes(bars_y: &[Bar], bars_x: &[Bar]) -> (Vec<DateTime<Utc>>, Vec<f64>, Vec<f64>) {
    let mut open_times = Vec::new();
    let mut price_y = Vec::new();
    let mut price_x = Vec::new();

    let mut iy = 0;
    let mut ix = 0;
    while iy < bars_y.len() && ix < bars_x.len() {
        let ty = bars_y[iy].open_time;
        let tx = bars_x[ix].open_time;
        if ty < tx {
            iy += 1;
        } else if tx < ty {
            ix += 1;
        } else {
            if let (Some(py), Some(px)) = (bars_y[iy].close_f64(), bars_x[ix].close_f64()) {
                if py.ln().is_finite() && px.ln().is_finite() {
                    open_times.push(ty);
                    price_y.push(py);
                    price_x.push(px);
                }
            }
            iy += 1;
            ix += 1;
        }
    }

    (open_times, price_y, price_x)
}

/// Fits `ln(y) = alpha + beta * ln(x)` and returns the hedge ratio
/// (beta) with the per-point residual spread.
fn compute_spread(price_y: &[f64], price_x: &[f64]) -> Option<(f64, Vec<f64>)> {
    let log_y: Vec<f64> = price_y.iter().map(|p| p.ln()).collect();
    let log_x: Vec<f64> = price_x.iter().map(|p| p.ln()).collect();

    let fit = ols(&log_y, &[&log_x])?;
    Some((fit.coefficients[1], fit.residuals))
}

/// Window actually used: the requested one when it fits the sample,
/// otherwise `min(sample, 60)`.
fn effective_window(requested: usize, aligned: usize) -> usize {
    if requested == 0 || requested > aligned {
        aligned.min(DEFAULT_ROLLING_WINDOW)
    } else {
        requested
    }
}

fn stationarity_report(spread: &[f64]) -> StationarityReport {
    if spread.len() < MIN_ADF_OBSERVATIONS {
        return StationarityReport::InsufficientData {
            observations: spread.len(),
        };
    }

    match adf_test(spread, None) {
        Some(result) => StationarityReport::Completed {
            statistic: result.statistic,
            p_value: result.p_value,
            lags_used: result.lags_used,
            observations: result.observations,
            critical_values: result.critical_values,
            stationary: result.is_stationary(),
        },
        None => StationarityReport::Failed {
            message: "unit-root regression could not be fit on this spread".to_string(),
        },
    }
}

// ============================================================
// Tests
// ============================================================
