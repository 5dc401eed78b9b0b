//! Rolling-window statistics over aligned price and spread series.
//!
//! Every function returns one output per input element. Positions before
//! the window has filled are `None`, so a series of length N with window
//! W yields exactly N − W + 1 defined values.

use pairscope_core::pearson_correlation;

/// Rolling mean of `values` over `window` elements.
///
/// Returns all `None` when the window is zero or longer than the series.
#[must_use]
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || window > values.len() {
        return out;
    }

    for (i, chunk) in values.windows(window).enumerate() {
        out[i + window - 1] = Some(chunk.iter().sum::<f64>() / window as f64);
    }
    out
}

/// Rolling sample standard deviation (n − 1 denominator) over `window`
/// elements.
///
/// A sample deviation needs at least two points, so windows shorter than
/// two yield all `None`.
#[must_use]
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window < 2 || window > values.len() {
        return out;
    }

    for (i, chunk) in values.windows(window).enumerate() {
        let mean = chunk.iter().sum::<f64>() / window as f64;
        let variance = chunk
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / (window - 1) as f64;
        out[i + window - 1] = Some(variance.sqrt());
    }
    out
}

/// Rolling Pearson correlation between two equal-length series.
///
/// Windows where either side is constant are `None`, as is the whole
/// output when the lengths disagree.
#[must_use]
pub fn rolling_correlation(x: &[f64], y: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; x.len()];
    if x.len() != y.len() || window < 2 || window > x.len() {
        return out;
    }

    for i in (window - 1)..x.len() {
        let start = i + 1 - window;
        out[i] = pearson_correlation(&x[start..=i], &y[start..=i]);
    }
    out
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_rolling_mean_hand_computed() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let means = rolling_mean(&values, 2);

        assert_eq!(means[0], None);
        assert!((means[1].unwrap() - 1.5).abs() < EPSILON);
        assert!((means[2].unwrap() - 2.5).abs() < EPSILON);
        assert!((means[3].unwrap() - 3.5).abs() < EPSILON);
    }

    #[test]
    fn test_rolling_mean_defined_count() {
        let values: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let means = rolling_mean(&values, 10);

        let defined = means.iter().filter(|m| m.is_some()).count();
        assert_eq!(defined, 50 - 10 + 1);
        assert!(means[..9].iter().all(|m| m.is_none()));
    }

    #[test]
    fn test_rolling_mean_degenerate_windows() {
        let values = [1.0, 2.0, 3.0];
        assert!(rolling_mean(&values, 0).iter().all(|m| m.is_none()));
        assert!(rolling_mean(&values, 4).iter().all(|m| m.is_none()));
        assert!(rolling_mean(&[], 3).is_empty());
    }

    #[test]
    fn test_rolling_std_hand_computed() {
        // Window [1, 2]: mean 1.5, sample variance 0.5.
        let values = [1.0, 2.0, 4.0, 8.0];
        let stds = rolling_std(&values, 2);

        assert_eq!(stds[0], None);
        assert!((stds[1].unwrap() - 0.5_f64.sqrt()).abs() < EPSILON);
        assert!((stds[2].unwrap() - 2.0_f64.sqrt()).abs() < EPSILON);
        assert!((stds[3].unwrap() - 8.0_f64.sqrt()).abs() < EPSILON);
    }

    #[test]
    fn test_rolling_std_constant_window_is_zero() {
        let values = [5.0, 5.0, 5.0, 5.0];
        let stds = rolling_std(&values, 3);

        assert!(stds[2].unwrap().abs() < EPSILON);
        assert!(stds[3].unwrap().abs() < EPSILON);
    }

    #[test]
    fn test_rolling_std_rejects_window_of_one() {
        let values = [1.0, 2.0, 3.0];
        assert!(rolling_std(&values, 1).iter().all(|s| s.is_none()));
    }

    #[test]
    fn test_rolling_correlation_perfect_positive() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        let corr = rolling_correlation(&x, &y, 3);

        assert_eq!(corr[0], None);
        assert_eq!(corr[1], None);
        for c in corr.iter().skip(2) {
            assert!((c.unwrap() - 1.0).abs() < EPSILON, "corr was {c:?}");
        }
    }

    #[test]
    fn test_rolling_correlation_perfect_negative() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [8.0, 6.0, 4.0, 2.0];
        let corr = rolling_correlation(&x, &y, 2);

        assert!((corr[3].unwrap() + 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_rolling_correlation_constant_side_undefined() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [7.0, 7.0, 7.0, 7.0];
        let corr = rolling_correlation(&x, &y, 3);

        assert!(corr.iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_rolling_correlation_length_mismatch() {
        let x = [1.0, 2.0, 3.0];
        let y = [1.0, 2.0];
        assert!(rolling_correlation(&x, &y, 2).iter().all(|c| c.is_none()));
    }
}
