#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shooting dataset definitions, loading, and normalization.
//!
//! A [`dataset::DatasetDefinition`] describes one published export. The
//! [`loader`] reads that export into a raw table and validates its columns,
//! and [`normalize`] turns the raw table into canonical incidents.

pub mod dataset;
pub mod loader;
pub mod normalize;
pub mod parsing;
pub mod progress;
pub mod registry;

/// Errors that can occur while loading or normalizing a dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input does not have the expected column set.
    #[error("Schema error: {message}")]
    Schema {
        /// Required columns that are absent.
        missing: Vec<String>,
        /// Description of what went wrong.
        message: String,
    },

    /// A value could not be parsed with the expected format.
    #[error("Parse error in row {row}, column {column}: '{value}' does not match {expected}")]
    Parse {
        /// 1-based data row in source order.
        row: usize,
        /// Raw column name.
        column: String,
        /// The offending value (empty when missing).
        value: String,
        /// Expected format.
        expected: String,
    },

    /// A required value is missing.
    #[error("Missing value in row {row}, column {column}")]
    MissingValue {
        /// 1-based data row in source order.
        row: usize,
        /// Raw column name.
        column: String,
    },

    /// No embedded dataset definition has this id.
    #[error("Unknown dataset: {id}")]
    UnknownDataset {
        /// The requested id.
        id: String,
    },
}
