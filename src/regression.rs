//! Log-log least-squares regression backing the power-law fits.

use crate::error::{FitError, Result};

/// Denominator magnitude below which the regression is considered degenerate.
pub const COLLINEARITY_EPSILON: f64 = 1e-12;

/// Result of an ordinary least-squares fit in log-log space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLogFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LogLogFit {
    /// The power-law scale parameter, `exp(intercept)`.
    pub fn scale(&self) -> f64 {
        self.intercept.exp()
    }
}

/// Fit `ln(v) = slope * ln(t) + intercept` by ordinary least squares.
///
/// Points are `(t, v)` pairs with both coordinates strictly positive.
/// Fails with [`FitError::CollinearInput`] when fewer than two distinct
/// abscissae remain, which covers both too-few-points and numerically
/// degenerate inputs. No rounding happens here; only display layers round.
pub fn fit_log_log(points: &[(f64, f64)]) -> Result<LogLogFit> {
    let n = points.len() as f64;
    let mut sx = 0.0;
    let mut sy = 0.0;
    let mut sxy = 0.0;
    let mut sx2 = 0.0;

    for &(t, v) in points {
        let x = t.ln();
        let y = v.ln();
        sx += x;
        sy += y;
        sxy += x * y;
        sx2 += x * x;
    }

    let denominator = n * sx2 - sx * sx;
    if denominator.abs() < COLLINEARITY_EPSILON {
        return Err(FitError::CollinearInput);
    }

    let slope = (n * sxy - sx * sy) / denominator;
    let intercept = (sy - slope * sx) / n;

    Ok(LogLogFit { slope, intercept })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_points_fit_exactly() {
        // v = 10 * t^-0.5 passes through (4, 5) and (100, 1)
        let points = [(4.0, 5.0), (100.0, 1.0)];
        let fit = fit_log_log(&points).unwrap();
        assert!((fit.slope - (-0.5)).abs() < 1e-9);
        assert!((fit.scale() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_residuals_balance_on_three_points() {
        let points = [(300.0, 4.5), (600.0, 4.25), (900.0, 4.1667)];
        let fit = fit_log_log(&points).unwrap();
        // least squares: residuals in log space must sum to ~0
        let residual_sum: f64 = points
            .iter()
            .map(|&(t, v)| v.ln() - (fit.slope * t.ln() + fit.intercept))
            .sum();
        assert!(residual_sum.abs() < 1e-9);
    }

    #[test]
    fn test_identical_abscissae_are_collinear() {
        let points = [(240.0, 400.0), (240.0, 350.0)];
        assert_eq!(fit_log_log(&points), Err(FitError::CollinearInput));
    }

    #[test]
    fn test_single_point_is_collinear() {
        assert_eq!(fit_log_log(&[(240.0, 400.0)]), Err(FitError::CollinearInput));
    }

    #[test]
    fn test_empty_input_is_collinear() {
        assert_eq!(fit_log_log(&[]), Err(FitError::CollinearInput));
    }
}
