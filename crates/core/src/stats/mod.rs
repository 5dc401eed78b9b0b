//! Statistical primitives for pairs analysis.
//!
//! Provides ordinary least squares regression, the standard normal CDF,
//! Pearson correlation, and an augmented Dickey-Fuller unit-root test
//! with automatic lag selection. All functions operate on `f64` slices;
//! callers convert from `Decimal` at the analytics boundary.

pub mod adf;
pub mod normal;
pub mod ols;

pub use adf::{adf_test, AdfResult, CriticalValues};
pub use normal::standard_normal_cdf;
pub use ols::{ols, OlsFit};

/// Calculates the Pearson correlation coefficient between two series.
///
/// Returns `None` if the slices differ in length, contain fewer than two
/// points, or either side has zero variance.
#[must_use]
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator < f64::EPSILON {
        return None;
    }

    Some(covariance / denominator)
}
