#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate table rows and regression results.
//!
//! Each aggregate query returns a `Vec` of one of the row types below. Rows
//! serialize flat so they can be written as CSV for plotting tools as well
//! as JSON.

use chrono::NaiveDate;
use nyc_shootings_incident_models::{Borough, DayOfWeek, Season, TimeOfDay};
use serde::{Deserialize, Serialize};

/// Incident rows on one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCount {
    /// Calendar date.
    pub date: NaiveDate,
    /// Number of rows.
    pub count: u64,
}

/// Incident rows in one weekday and time-of-day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayTimeCount {
    /// Day of week.
    pub weekday: DayOfWeek,
    /// Time-of-day bucket.
    pub time_of_day: TimeOfDay,
    /// Number of rows.
    pub count: u64,
}

/// Incident rows in one season, summed over all years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonCount {
    /// Season.
    pub season: Season,
    /// Number of rows.
    pub count: u64,
}

/// Shootings in a borough relative to its population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoroughRate {
    /// Borough.
    pub borough: Borough,
    /// Reference population of the borough.
    pub total_population: u64,
    /// Number of rows in the borough.
    pub incidents_count: u64,
    /// Rows per 1000 residents.
    pub percentage_of_shootings: f64,
}

/// Shootings and murders in one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyTotals {
    /// Calendar year.
    pub year: i32,
    /// Number of rows.
    pub shootings: u64,
    /// Number of rows flagged as murders.
    pub murders: u64,
}

/// Headline figures for a normalized dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Number of rows.
    pub rows: u64,
    /// Number of distinct incident ids.
    pub incidents: u64,
    /// Rows flagged as murders.
    pub murders: u64,
    /// Rows whose borough is unknown.
    pub unknown_borough: u64,
    /// Earliest date, if any rows.
    pub first_date: Option<NaiveDate>,
    /// Latest date, if any rows.
    pub last_date: Option<NaiveDate>,
}

/// Fit of `murders ≈ intercept + slope · shootings`.
///
/// A fit with no residual error has zero standard errors. Its t-statistics
/// and p-values are undefined and reported as `None` (`null` in JSON).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionSummary {
    /// Coefficient of shootings.
    pub slope: f64,
    /// Intercept.
    pub intercept: f64,
    /// Standard error of the slope.
    pub slope_std_error: f64,
    /// Standard error of the intercept.
    pub intercept_std_error: f64,
    /// `slope / slope_std_error`.
    pub slope_t_statistic: Option<f64>,
    /// `intercept / intercept_std_error`.
    pub intercept_t_statistic: Option<f64>,
    /// Two-sided p-value of the slope under Student's t.
    pub slope_p_value: Option<f64>,
    /// Two-sided p-value of the intercept under Student's t.
    pub intercept_p_value: Option<f64>,
    /// Coefficient of determination.
    pub r_squared: f64,
    /// R² adjusted for one predictor.
    pub adjusted_r_squared: f64,
    /// Residual standard error.
    pub residual_std_error: f64,
    /// Number of samples.
    pub n_samples: usize,
    /// Residual degrees of freedom (`n_samples - 2`).
    pub degrees_of_freedom: usize,
}

/// Every aggregate table plus the regression, as handed to plotting tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Headline figures.
    pub summary: DatasetSummary,
    /// Rows per date, most first.
    pub shootings_by_date: Vec<DateCount>,
    /// Rows per weekday and time of day.
    pub shootings_by_weekday_time: Vec<WeekdayTimeCount>,
    /// Rows per season.
    pub shootings_by_season: Vec<SeasonCount>,
    /// Rows per 1000 residents for each known borough.
    pub borough_rates: Vec<BoroughRate>,
    /// Murder rows per date, most first.
    pub murders_by_date: Vec<DateCount>,
    /// Shootings and murders per year.
    pub shootings_murders_by_year: Vec<YearlyTotals>,
    /// Fit of yearly murders on yearly shootings; `None` when there are too
    /// few distinct years to fit.
    pub regression: Option<RegressionSummary>,
}
