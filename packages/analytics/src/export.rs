//! Writes aggregate tables and reports to disk.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use nyc_shootings_analytics_models::Report;
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::AnalyticsError;

/// File name of the combined report.
pub const REPORT_FILE: &str = "report.json";

/// On-disk format of the per-table files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ExportFormat {
    /// One header row followed by one row per record.
    #[default]
    Csv,
    /// A pretty-printed JSON array.
    Json,
}

impl ExportFormat {
    /// File extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Writes `rows` as CSV with a header row taken from the field names.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the file cannot be created or a row cannot
/// be serialized.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), AnalyticsError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `value` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the file cannot be created or the value
/// cannot be serialized.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), AnalyticsError> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

fn write_table<T: Serialize>(
    dir: &Path,
    name: &str,
    rows: &[T],
    format: ExportFormat,
) -> Result<PathBuf, AnalyticsError> {
    let path = dir.join(format!("{name}.{}", format.extension()));
    match format {
        ExportFormat::Csv => write_csv(&path, rows)?,
        ExportFormat::Json => write_json(&path, rows)?,
    }
    log::debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(path)
}

/// Writes one file per aggregate table plus [`REPORT_FILE`] into `dir`,
/// creating it if needed. Returns the written paths.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the directory or any file cannot be
/// written.
pub fn write_report(
    dir: &Path,
    report: &Report,
    format: ExportFormat,
) -> Result<Vec<PathBuf>, AnalyticsError> {
    std::fs::create_dir_all(dir)?;

    let mut written = vec![
        write_table(dir, "shootings_by_date", &report.shootings_by_date, format)?,
        write_table(
            dir,
            "shootings_by_weekday_time",
            &report.shootings_by_weekday_time,
            format,
        )?,
        write_table(
            dir,
            "shootings_by_season",
            &report.shootings_by_season,
            format,
        )?,
        write_table(dir, "borough_rates", &report.borough_rates, format)?,
        write_table(dir, "murders_by_date", &report.murders_by_date, format)?,
        write_table(
            dir,
            "shootings_murders_by_year",
            &report.shootings_murders_by_year,
            format,
        )?,
    ];

    let report_path = dir.join(REPORT_FILE);
    write_json(&report_path, report)?;
    written.push(report_path);

    log::info!("Wrote {} files to {}", written.len(), dir.display());
    Ok(written)
}
