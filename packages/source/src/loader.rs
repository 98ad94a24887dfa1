//! Reads raw exports into a [`RawTable`] and validates their shape.
//!
//! CSV exports are parsed with the `csv` crate, every cell becoming a JSON
//! string (or `null` when blank). Socrata JSON exports are read as an array
//! of objects whose keys vary per row, so their column set is the union of
//! all keys in first-seen order.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use nyc_shootings_source_models::{RawRecord, RawTable};
use serde_json::Value;

use crate::SourceError;
use crate::dataset::ColumnMapping;
use crate::progress::ProgressCallback;

/// Rows read between progress updates.
const PROGRESS_BATCH: u64 = 1_000;

/// Reads a CSV export with a header row.
///
/// # Errors
///
/// Returns [`SourceError`] if the CSV is malformed or has no header row.
pub fn load_csv<R: Read>(
    reader: R,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<RawTable, SourceError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    if columns.iter().all(String::is_empty) {
        return Err(SourceError::Schema {
            missing: Vec::new(),
            message: "CSV file contains no header row".to_string(),
        });
    }

    let mut records = Vec::new();
    let mut pending: u64 = 0;

    for result in reader.records() {
        let row = result?;

        let mut record = RawRecord::new();
        for (i, column) in columns.iter().enumerate() {
            let value = row.get(i).map(str::trim).unwrap_or_default();
            let value = if value.is_empty() {
                Value::Null
            } else {
                Value::String(value.to_owned())
            };
            record.insert(column.clone(), value);
        }
        records.push(record);

        pending += 1;
        if pending == PROGRESS_BATCH {
            progress.inc(pending);
            pending = 0;
        }
    }
    progress.inc(pending);

    log::info!(
        "Parsed {} records with {} columns from CSV",
        records.len(),
        columns.len()
    );
    progress.finish(format!("loaded {} records", records.len()));

    Ok(RawTable::new(columns, records))
}

/// Reads a JSON array of objects (Socrata export).
///
/// # Errors
///
/// Returns [`SourceError`] if the input is not a JSON array of objects.
pub fn load_json<R: Read>(
    reader: R,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<RawTable, SourceError> {
    let records: Vec<RawRecord> = serde_json::from_reader(reader)?;

    let mut seen = BTreeSet::new();
    let mut columns = Vec::new();
    for record in &records {
        for key in record.keys() {
            if seen.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }
    }

    progress.inc(records.len() as u64);
    log::info!(
        "Parsed {} records with {} columns from JSON",
        records.len(),
        columns.len()
    );
    progress.finish(format!("loaded {} records", records.len()));

    Ok(RawTable::new(columns, records))
}

/// Whether a path names a JSON export.
#[must_use]
pub fn is_json_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Reads an export from disk, as JSON for `.json` files and CSV otherwise.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened or parsed.
pub fn load_path(
    path: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<RawTable, SourceError> {
    log::info!("Loading {}", path.display());
    progress.set_message(format!("Loading {}", path.display()));

    let file = BufReader::new(File::open(path)?);
    if is_json_path(path) {
        load_json(file, progress)
    } else {
        load_csv(file, progress)
    }
}

/// Checks that every column the rename and drop tables expect is present.
///
/// # Errors
///
/// Returns [`SourceError::Schema`] listing every missing column.
pub fn validate_schema(table: &RawTable, columns: &ColumnMapping) -> Result<(), SourceError> {
    let missing: Vec<String> = columns
        .required_columns()
        .filter(|name| !table.has_column(name))
        .map(str::to_owned)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SourceError::Schema {
            message: format!("missing required columns: {}", missing.join(", ")),
            missing,
        })
    }
}
