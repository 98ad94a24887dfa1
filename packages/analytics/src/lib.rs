#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate queries, regression, and table export over normalized
//! shooting incidents.
//!
//! The [`queries`] module computes the small tables handed to plotting
//! tools, [`regression`] fits yearly murders against yearly shootings, and
//! [`export`] writes everything to disk. [`build_report`] runs every query
//! plus the fit in one go.

pub mod export;
pub mod queries;
pub mod regression;

use nyc_shootings_analytics_models::Report;
use nyc_shootings_source_models::Incident;
use regression::RegressionSolver;
use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Too few samples for the requested fit.
    #[error("Insufficient data: need at least {required} samples, got {actual}")]
    InsufficientData {
        /// Minimum sample count.
        required: usize,
        /// Samples supplied.
        actual: usize,
    },

    /// The samples cannot determine a unique fit.
    #[error("Degenerate data: {message}")]
    Degenerate {
        /// Description of what went wrong.
        message: String,
    },

    /// I/O error (file write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Runs every aggregate query and fits yearly murders on yearly shootings.
///
/// A failed fit is logged and reported as `None`; the aggregate tables are
/// still produced.
#[must_use]
pub fn build_report(incidents: &[Incident], solver: &dyn RegressionSolver) -> Report {
    let shootings_murders_by_year = queries::shootings_and_murders_by_year(incidents);
    let samples = regression::regression_samples(&shootings_murders_by_year);

    let regression = match solver.fit(&samples) {
        Ok(fit) => {
            log::info!(
                "Regression: murders = {:.4} + {:.4} * shootings (R² {:.4}, n = {})",
                fit.intercept,
                fit.slope,
                fit.r_squared,
                fit.n_samples,
            );
            if let Some(p) = fit.slope_p_value {
                log::info!("Slope p-value: {p:.4}");
            }
            Some(fit)
        }
        Err(e) => {
            log::warn!("Skipping regression: {e}");
            None
        }
    };

    Report {
        summary: queries::summarize(incidents),
        shootings_by_date: queries::counts_by_date(incidents),
        shootings_by_weekday_time: queries::counts_by_weekday_and_time_of_day(incidents),
        shootings_by_season: queries::counts_by_season(incidents),
        borough_rates: queries::borough_rates(incidents),
        murders_by_date: queries::murders_by_date(incidents),
        shootings_murders_by_year,
        regression,
    }
}
