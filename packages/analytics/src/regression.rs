//! Regression of yearly murders on yearly shootings.
//!
//! Fitting is behind the [`RegressionSolver`] trait so callers can swap in
//! a different solver. [`OrdinaryLeastSquares`] is the default: a
//! closed-form simple linear regression with an intercept, with two-sided
//! p-values from Student's t.

use nyc_shootings_analytics_models::{RegressionSummary, YearlyTotals};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::AnalyticsError;

/// Smallest sample count with a positive residual degree of freedom.
pub const MIN_SAMPLES: usize = 3;

/// Fits `y ≈ intercept + slope · x` to paired samples.
pub trait RegressionSolver {
    /// Fits the model to `(x, y)` samples.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError`] if the samples cannot support a fit.
    fn fit(&self, samples: &[(f64, f64)]) -> Result<RegressionSummary, AnalyticsError>;
}

/// `(shootings, murders)` samples, one per year.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn regression_samples(yearly: &[YearlyTotals]) -> Vec<(f64, f64)> {
    yearly
        .iter()
        .map(|y| (y.shootings as f64, y.murders as f64))
        .collect()
}

/// Closed-form ordinary least squares for a single predictor.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdinaryLeastSquares;

impl RegressionSolver for OrdinaryLeastSquares {
    #[allow(clippy::cast_precision_loss, clippy::similar_names)]
    fn fit(&self, samples: &[(f64, f64)]) -> Result<RegressionSummary, AnalyticsError> {
        let n_samples = samples.len();
        if n_samples < MIN_SAMPLES {
            return Err(AnalyticsError::InsufficientData {
                required: MIN_SAMPLES,
                actual: n_samples,
            });
        }
        if samples
            .iter()
            .any(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(AnalyticsError::Degenerate {
                message: "samples must be finite".to_string(),
            });
        }

        let n = n_samples as f64;
        let mean_x = samples.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = samples.iter().map(|(_, y)| y).sum::<f64>() / n;

        let sxx: f64 = samples.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
        let sxy: f64 = samples
            .iter()
            .map(|(x, y)| (x - mean_x) * (y - mean_y))
            .sum();
        let syy: f64 = samples.iter().map(|(_, y)| (y - mean_y).powi(2)).sum();

        if sxx <= f64::EPSILON {
            return Err(AnalyticsError::Degenerate {
                message: "predictor has zero variance".to_string(),
            });
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;

        let ss_res: f64 = samples
            .iter()
            .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
            .sum();

        let degrees_of_freedom = n_samples - 2;
        let df = degrees_of_freedom as f64;
        let residual_variance = ss_res / df;

        // A constant response is explained perfectly by a flat line.
        let r_squared = if syy > 0.0 { 1.0 - ss_res / syy } else { 1.0 };
        let adjusted_r_squared = 1.0 - (1.0 - r_squared) * (n - 1.0) / df;

        let slope_std_error = (residual_variance / sxx).sqrt();
        let intercept_std_error = (residual_variance * (1.0 / n + mean_x.powi(2) / sxx)).sqrt();

        // Residuals at rounding level leave the standard errors at zero, where
        // t-statistics and p-values are undefined.
        let exact = ss_res <= f64::EPSILON * syy;
        if exact {
            log::debug!("Regression fit is exact; t-statistics and p-values are undefined");
        }
        let t_statistic = |estimate: f64, std_error: f64| (!exact).then_some(estimate / std_error);
        let slope_t_statistic = t_statistic(slope, slope_std_error);
        let intercept_t_statistic = t_statistic(intercept, intercept_std_error);

        let t_dist = StudentsT::new(0.0, 1.0, df).map_err(|e| AnalyticsError::Degenerate {
            message: format!("invalid t distribution: {e}"),
        })?;
        let p_value = |t: f64| 2.0 * t_dist.cdf(-t.abs());

        Ok(RegressionSummary {
            slope,
            intercept,
            slope_std_error,
            intercept_std_error,
            slope_t_statistic,
            intercept_t_statistic,
            slope_p_value: slope_t_statistic.map(p_value),
            intercept_p_value: intercept_t_statistic.map(p_value),
            r_squared,
            adjusted_r_squared,
            residual_std_error: residual_variance.sqrt(),
            n_samples,
            degrees_of_freedom,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn recovers_an_exact_line() {
        let samples: Vec<(f64, f64)> = (0..10)
            .map(|i| {
                let x = f64::from(i) * 100.0;
                (x, 2.5 + 0.2 * x)
            })
            .collect();
        let fit = OrdinaryLeastSquares.fit(&samples).unwrap();

        assert!(close(fit.slope, 0.2));
        assert!(close(fit.intercept, 2.5));
        assert!(close(fit.r_squared, 1.0));
        assert!(fit.residual_std_error < 1e-9);
        assert_eq!(fit.n_samples, 10);
        assert_eq!(fit.degrees_of_freedom, 8);
        assert_eq!(fit.slope_p_value, None);
    }

    #[test]
    fn exact_fit_has_no_t_statistics() {
        let fit = OrdinaryLeastSquares
            .fit(&[(1.0, 3.0), (2.0, 5.0), (3.0, 7.0), (4.0, 9.0)])
            .unwrap();

        assert!(close(fit.slope, 2.0));
        assert!(close(fit.slope_std_error, 0.0));
        assert_eq!(fit.slope_t_statistic, None);
        assert_eq!(fit.intercept_t_statistic, None);
        assert_eq!(fit.slope_p_value, None);
        assert_eq!(fit.intercept_p_value, None);

        let json = serde_json::to_value(fit).unwrap();
        assert!(json["slope_t_statistic"].is_null());
        assert!(json["slope"].is_number());
    }

    #[test]
    fn constant_response_is_an_exact_fit() {
        let fit = OrdinaryLeastSquares
            .fit(&[(1.0, 4.0), (2.0, 4.0), (3.0, 4.0)])
            .unwrap();

        assert!(close(fit.slope, 0.0));
        assert!(close(fit.r_squared, 1.0));
        assert_eq!(fit.intercept_t_statistic, None);
    }

    #[test]
    fn matches_hand_computed_fit() {
        // x mean 2, y mean 3; sxx 2, sxy 3, syy 6
        let samples = [(1.0, 1.0), (2.0, 4.0), (3.0, 4.0)];
        let fit = OrdinaryLeastSquares.fit(&samples).unwrap();

        assert!(close(fit.slope, 1.5));
        assert!(close(fit.intercept, 0.0));
        // residuals -0.5, 1.0, -0.5 give ss_res 1.5
        assert!(close(fit.r_squared, 0.75));
        assert!(close(fit.adjusted_r_squared, 0.5));
        assert!(close(fit.residual_std_error, 1.5_f64.sqrt()));
        assert!(close(fit.slope_std_error, 0.75_f64.sqrt()));
        assert!(close(fit.intercept_std_error, 3.5_f64.sqrt()));

        let slope_t = fit.slope_t_statistic.unwrap();
        assert!(close(slope_t, 3.0_f64.sqrt()));
        assert!(close(fit.intercept_t_statistic.unwrap(), 0.0));

        // With one degree of freedom t is Cauchy: P(|T| > sqrt(3)) = 1/3.
        assert!((fit.slope_p_value.unwrap() - 1.0 / 3.0).abs() < 1e-6);
        assert!((fit.intercept_p_value.unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn samples_pair_shootings_with_murders() {
        let yearly = [
            YearlyTotals {
                year: 2006,
                shootings: 2055,
                murders: 445,
            },
            YearlyTotals {
                year: 2007,
                shootings: 1887,
                murders: 0,
            },
        ];
        assert_eq!(
            regression_samples(&yearly),
            vec![(2055.0, 445.0), (1887.0, 0.0)]
        );
    }

    #[test]
    fn too_few_samples() {
        let result = OrdinaryLeastSquares.fit(&[(1.0, 2.0), (2.0, 3.0)]);
        assert!(matches!(
            result,
            Err(AnalyticsError::InsufficientData {
                required: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn constant_predictor_is_degenerate() {
        let result = OrdinaryLeastSquares.fit(&[(5.0, 1.0), (5.0, 2.0), (5.0, 3.0)]);
        assert!(matches!(result, Err(AnalyticsError::Degenerate { .. })));
    }
}
