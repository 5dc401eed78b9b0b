//! Ordinary least squares regression via the normal equations.

/// Result of an ordinary least squares fit.
///
/// Coefficient order is intercept first, then one slope per regressor
/// column in the order the columns were passed.
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Estimated coefficients, intercept first.
    pub coefficients: Vec<f64>,
    /// Standard error of each coefficient.
    pub std_errors: Vec<f64>,
    /// Residuals, one per observation.
    pub residuals: Vec<f64>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Number of observations.
    pub nobs: usize,
    /// Gaussian log-likelihood at the fitted parameters.
    pub llf: f64,
    /// Akaike information criterion.
    pub aic: f64,
}

impl OlsFit {
    /// Returns the t-statistic of the coefficient at `index`.
    ///
    /// Returns `None` when the standard error is zero or not finite.
    #[must_use]
    pub fn t_statistic(&self, index: usize) -> Option<f64> {
        let coefficient = self.coefficients.get(index)?;
        let std_error = self.std_errors.get(index)?;
        if !std_error.is_finite() || *std_error <= 0.0 {
            return None;
        }
        Some(coefficient / std_error)
    }
}

/// Fits `y = b0 + b1 * x1 + ... + bk * xk` by ordinary least squares.
///
/// An intercept column is added internally; `regressors` holds only the
/// slope columns. Returns `None` when the inputs are inconsistent, the
/// system is underdetermined, any value is non-finite, or the normal
/// equations are singular (collinear regressors).
///
/// # Arguments
///
/// * `y` - Dependent variable
/// * `regressors` - Regressor columns, each the same length as `y`
///
/// # Examples
///
/// ```
/// use pairscope_core::stats::ols;
///
/// let x = [1.0, 2.0, 3.0, 4.0];
/// let y = [3.1, 5.2, 6.9, 9.1];
/// let fit = ols(&y, &[&x]).unwrap();
/// assert!((fit.coefficients[1] - 2.0).abs() < 0.1);
/// ```
#[must_use]
pub fn ols(y: &[f64], regressors: &[&[f64]]) -> Option<OlsFit> {
    let n = y.len();
    let k = regressors.len() + 1;
    if n <= k {
        return None;
    }
    for column in regressors {
        if column.len() != n {
            return None;
        }
        if column.iter().any(|v| !v.is_finite()) {
            return None;
        }
    }
    if y.iter().any(|v| !v.is_finite()) {
        return None;
    }

    // X'X and X'y with an implicit leading column of ones.
    let value_at = |row: usize, col: usize| -> f64 {
        if col == 0 {
            1.0
        } else {
            regressors[col - 1][row]
        }
    };

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for row in 0..n {
        for i in 0..k {
            let xi = value_at(row, i);
            xty[i] += xi * y[row];
            for j in i..k {
                xtx[i][j] += xi * value_at(row, j);
            }
        }
    }
    for i in 0..k {
        for j in 0..i {
            xtx[i][j] = xtx[j][i];
        }
    }

    let inverse = invert(xtx)?;

    let mut coefficients = vec![0.0; k];
    for i in 0..k {
        for j in 0..k {
            coefficients[i] += inverse[i][j] * xty[j];
        }
    }

    let mut residuals = Vec::with_capacity(n);
    let mut rss = 0.0;
    for row in 0..n {
        let mut fitted = 0.0;
        for (i, coefficient) in coefficients.iter().enumerate() {
            fitted += coefficient * value_at(row, i);
        }
        let residual = y[row] - fitted;
        rss += residual * residual;
        residuals.push(residual);
    }

    let sigma_squared = rss / (n - k) as f64;
    let std_errors = (0..k)
        .map(|i| (sigma_squared * inverse[i][i]).sqrt())
        .collect();

    let n_f = n as f64;
    let llf = -n_f / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (rss / n_f).ln() + 1.0);
    let aic = 2.0 * k as f64 - 2.0 * llf;

    Some(OlsFit {
        coefficients,
        std_errors,
        residuals,
        rss,
        nobs: n,
        llf,
        aic,
    })
}

/// Inverts a square matrix by Gauss-Jordan elimination with partial
/// pivoting. Returns `None` when a pivot vanishes.
fn invert(mut matrix: Vec<Vec<f64>>) -> Option<Vec<Vec<f64>>> {
    let k = matrix.len();
    let mut inverse: Vec<Vec<f64>> = (0..k)
        .map(|i| (0..k).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..k {
        let mut pivot_row = col;
        let mut pivot_magnitude = matrix[col][col].abs();
        for row in (col + 1)..k {
            let magnitude = matrix[row][col].abs();
            if magnitude > pivot_magnitude {
                pivot_magnitude = magnitude;
                pivot_row = row;
            }
        }
        if pivot_magnitude < 1e-12 {
            return None;
        }
        matrix.swap(col, pivot_row);
        inverse.swap(col, pivot_row);

        let pivot = matrix[col][col];
        for j in 0..k {
            matrix[col][j] /= pivot;
            inverse[col][j] /= pivot;
        }
        for row in 0..k {
            if row == col {
                continue;
            }
            let factor = matrix[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..k {
                matrix[row][j] -= factor * matrix[col][j];
                inverse[row][j] -= factor * inverse[col][j];
            }
        }
    }

    Some(inverse)
}
