//! Standard normal distribution helpers.

/// Approximates the standard normal cumulative distribution function.
///
/// Uses the Abramowitz and Stegun polynomial approximation (formula
/// 26.2.17), accurate to about 7.5e-8 absolute error. Sufficient for
/// p-value computation in significance testing.
///
/// # Arguments
///
/// * `z` - Standard normal deviate
///
/// # Returns
///
/// P(Z <= z) for Z ~ N(0, 1).
///
/// # Examples
///
/// ```
/// use pairscope_core::stats::standard_normal_cdf;
///
/// let p = standard_normal_cdf(0.0);
/// assert!((p - 0.5).abs() < 1e-7);
/// ```
#[must_use]
pub fn standard_normal_cdf(z: f64) -> f64 {
    if z < -8.0 {
        return 0.0;
    }
    if z > 8.0 {
        return 1.0;
    }

    let b1 = 0.319_381_530;
    let b2 = -0.356_563_782;
    let b3 = 1.781_477_937;
    let b4 = -1.821_255_978;
    let b5 = 1.330_274_429;
    let p = 0.231_641_9;

    let abs_z = z.abs();
    let t = 1.0 / (1.0 + p * abs_z);
    let phi = (-abs_z * abs_z / 2.0).exp() / (2.0 * std::f64::consts::PI).sqrt();
    let poly = b1 * t + b2 * t.powi(2) + b3 * t.powi(3) + b4 * t.powi(4) + b5 * t.powi(5);
    let tail = phi * poly;

    if z >= 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdf_at_zero_is_half() {
        let p = standard_normal_cdf(0.0);
        assert!((p - 0.5).abs() < 1e-7, "p was {p}");
    }

    #[test]
    fn cdf_known_values() {
        // Phi(1.96) ~ 0.975, Phi(-1.96) ~ 0.025
        let upper = standard_normal_cdf(1.96);
        let lower = standard_normal_cdf(-1.96);
        assert!((upper - 0.975).abs() < 1e-3, "upper was {upper}");
        assert!((lower - 0.025).abs() < 1e-3, "lower was {lower}");
    }

    #[test]
    fn cdf_is_symmetric() {
        for z in [0.3, 0.8, 1.5, 2.7] {
            let sum = standard_normal_cdf(z) + standard_normal_cdf(-z);
            assert!((sum - 1.0).abs() < 1e-10, "sum at {z} was {sum}");
        }
    }

    #[test]
    fn cdf_is_monotonic() {
        let mut prev = standard_normal_cdf(-6.0);
        let mut z = -5.5;
        while z <= 6.0 {
            let current = standard_normal_cdf(z);
            assert!(current >= prev, "cdf decreased at z={z}");
            prev = current;
            z += 0.5;
        }
    }

    #[test]
    fn cdf_extreme_tails_saturate() {
        assert!(standard_normal_cdf(-10.0).abs() < f64::EPSILON);
        assert!((standard_normal_cdf(10.0) - 1.0).abs() < f64::EPSILON);
    }
}
