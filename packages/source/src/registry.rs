//! Dataset registry: every dataset definition, loaded from embedded TOML.
//!
//! Each `.toml` file in `packages/source/datasets/` is baked into the binary
//! at compile time via [`include_str!`].

use std::path::Path;

use crate::SourceError;
use crate::dataset::{DatasetDefinition, parse_dataset_toml};

/// Identifier of the dataset used when none is requested.
pub const DEFAULT_DATASET_ID: &str = "nypd_shooting_historic";

/// Identifier of the dataset matching the Socrata JSON export.
pub const JSON_DATASET_ID: &str = "nypd_shooting_historic_api";

/// TOML configs embedded at compile time.
const DATASET_TOMLS: &[(&str, &str)] = &[
    (
        "nypd_shooting_historic",
        include_str!("../datasets/nypd_shooting_historic.toml"),
    ),
    (
        "nypd_shooting_historic_api",
        include_str!("../datasets/nypd_shooting_historic_api.toml"),
    ),
];

/// Returns all configured dataset definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (the configs are embedded, so this
/// is caught by the tests below).
#[must_use]
pub fn all_datasets() -> Vec<DatasetDefinition> {
    DATASET_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_dataset_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up a dataset definition by id.
///
/// # Errors
///
/// Returns [`SourceError::UnknownDataset`] if no embedded config has that id.
pub fn find_dataset(id: &str) -> Result<DatasetDefinition, SourceError> {
    all_datasets()
        .into_iter()
        .find(|def| def.id == id)
        .ok_or_else(|| SourceError::UnknownDataset { id: id.to_string() })
}

/// Returns the default (CSV export) dataset definition.
///
/// # Panics
///
/// Panics if the default dataset is missing from the embedded configs.
#[must_use]
pub fn default_dataset() -> DatasetDefinition {
    find_dataset(DEFAULT_DATASET_ID)
        .unwrap_or_else(|e| panic!("default dataset must be embedded: {e}"))
}

/// Picks the dataset definition matching an input file's format: the
/// Socrata JSON export for `.json`, the CSV export otherwise.
///
/// # Errors
///
/// Returns [`SourceError::UnknownDataset`] if the matching config is missing.
pub fn dataset_for_path(path: &Path) -> Result<DatasetDefinition, SourceError> {
    if crate::loader::is_json_path(path) {
        find_dataset(JSON_DATASET_ID)
    } else {
        find_dataset(DEFAULT_DATASET_ID)
    }
}

/// Total number of configured datasets (used in tests).
#[cfg(test)]
const EXPECTED_DATASET_COUNT: usize = 2;
