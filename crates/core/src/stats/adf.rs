//! Augmented Dickey-Fuller unit-root test with constant-only regression.
//!
//! Lag order is chosen by minimizing the Akaike information criterion
//! over candidates fitted on a common sample. Approximate p-values follow
//! MacKinnon (1994); finite-sample critical values follow MacKinnon (2010).

use serde::{Deserialize, Serialize};

use super::normal::standard_normal_cdf;
use super::ols::{ols, OlsFit};

// MacKinnon (1994) response surface for the constant-only tau
// distribution, single series.
const TAU_MAX_C: f64 = 2.74;
const TAU_MIN_C: f64 = -18.83;
const TAU_STAR_C: f64 = -1.61;
const TAU_C_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_C_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

// MacKinnon (2010) finite-sample critical value surfaces, constant
// regression, single series. Evaluated at powers of 1 / nobs.
const TAU_C_2010_1PCT: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
const TAU_C_2010_5PCT: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.040];
const TAU_C_2010_10PCT: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

/// Critical values of the Dickey-Fuller tau distribution at the
/// conventional significance levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalValues {
    #[serde(rename = "1%")]
    pub one_percent: f64,
    #[serde(rename = "5%")]
    pub five_percent: f64,
    #[serde(rename = "10%")]
    pub ten_percent: f64,
}

/// Outcome of an augmented Dickey-Fuller test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdfResult {
    /// Test statistic: the t-value of the lagged level coefficient.
    pub statistic: f64,
    /// Approximate asymptotic p-value.
    pub p_value: f64,
    /// Number of lagged difference terms in the selected regression.
    pub lags_used: usize,
    /// Number of observations in the selected regression.
    pub observations: usize,
    /// Finite-sample critical values for the selected sample size.
    pub critical_values: CriticalValues,
}

impl AdfResult {
    /// True when the unit-root null is rejected at the 5% level.
    #[must_use]
    pub fn is_stationary(&self) -> bool {
        self.p_value < 0.05
    }
}

/// Runs the augmented Dickey-Fuller test on `series`.
///
/// The regression includes a constant. The number of lagged difference
/// terms is selected by AIC from `0..=max_lag`, with all candidates
/// fitted on the sample trimmed to the largest candidate, then the
/// winner refitted on its own full sample. When `max_lag` is `None` the
/// Schwert rule `ceil(12 * (n / 100)^0.25)` is used, capped at
/// `n / 2 - 2`.
///
/// # Arguments
///
/// * `series` - Observations in time order
/// * `max_lag` - Largest candidate lag order, or `None` for the Schwert rule
///
/// # Returns
///
/// `None` when the series is too short or every candidate regression is
/// degenerate (for example a constant series).
#[must_use]
pub fn adf_test(series: &[f64], max_lag: Option<usize>) -> Option<AdfResult> {
    let n = series.len();
    if n < 4 {
        return None;
    }

    let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
    let m = diffs.len();

    let max_lag = match max_lag {
        Some(lag) => lag,
        None => {
            let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
            schwert.min(n / 2 - 2)
        }
    };
    if max_lag >= m {
        return None;
    }

    // Candidates share the sample trimmed to the largest lag so their
    // information criteria are comparable.
    let mut best: Option<(f64, usize)> = None;
    for lag in 0..=max_lag {
        let Some(fit) = fit_adf_regression(series, &diffs, lag, max_lag) else {
            continue;
        };
        match best {
            Some((best_aic, _)) if fit.aic >= best_aic => {}
            _ => best = Some((fit.aic, lag)),
        }
    }
    let (_, best_lag) = best?;

    // Refit the winner on the longest sample its own lag order allows.
    let fit = fit_adf_regression(series, &diffs, best_lag, best_lag)?;
    let statistic = fit.t_statistic(1)?;
    let observations = fit.nobs;

    Some(AdfResult {
        statistic,
        p_value: mackinnon_p_value(statistic),
        lags_used: best_lag,
        observations,
        critical_values: mackinnon_critical_values(observations),
    })
}

/// Fits `diff(y)_t = a + rho * y_(t-1) + sum(phi_i * diff(y)_(t-i))`
/// over the rows that remain after dropping the first `trim` differences.
fn fit_adf_regression(series: &[f64], diffs: &[f64], lag: usize, trim: usize) -> Option<OlsFit> {
    let m = diffs.len();
    if trim >= m || lag > trim {
        return None;
    }

    let dependent = &diffs[trim..];
    let mut columns: Vec<&[f64]> = Vec::with_capacity(lag + 1);
    columns.push(&series[trim..m]);
    for i in 1..=lag {
        columns.push(&diffs[trim - i..m - i]);
    }

    ols(dependent, &columns)
}

/// Approximate p-value for a constant-only Dickey-Fuller statistic,
/// after MacKinnon (1994).
#[must_use]
pub fn mackinnon_p_value(statistic: f64) -> f64 {
    if statistic > TAU_MAX_C {
        return 1.0;
    }
    if statistic < TAU_MIN_C {
        return 0.0;
    }
    let z = if statistic <= TAU_STAR_C {
        polyval(&TAU_C_SMALL_P, statistic)
    } else {
        polyval(&TAU_C_LARGE_P, statistic)
    };
    standard_normal_cdf(z)
}

/// Finite-sample critical values for a constant-only regression with
/// `nobs` observations, after MacKinnon (2010).
#[must_use]
pub fn mackinnon_critical_values(nobs: usize) -> CriticalValues {
    let x = 1.0 / nobs as f64;
    CriticalValues {
        one_percent: polyval(&TAU_C_2010_1PCT, x),
        five_percent: polyval(&TAU_C_2010_5PCT, x),
        ten_percent: polyval(&TAU_C_2010_10PCT, x),
    }
}

/// Evaluates a polynomial with coefficients in ascending order.
fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}
