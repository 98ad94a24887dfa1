//! Shared parsing utilities for raw record values.
//!
//! Raw values arrive as JSON scalars (strings from CSV, strings or numbers
//! from the Socrata export). These helpers turn them into text, dates,
//! times, and flags, and recognize the dataset's sentinel markers.

use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

/// Literal values the dataset uses to mark an unrecorded field.
pub const SENTINELS: &[&str] = &["U", "UNKNOWN"];

/// Returns the trimmed text of a raw value. Nulls, blank strings, arrays and
/// objects yield `None`; numbers and booleans use their JSON text.
#[must_use]
pub fn value_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Text of a raw value, or `None` if it is missing or a sentinel.
#[must_use]
pub fn known_text(value: Option<&Value>) -> Option<String> {
    value_text(value).filter(|text| !SENTINELS.contains(&text.as_str()))
}

/// Parses a date with a `chrono` format string. Time fields in the format
/// are matched but ignored.
#[must_use]
pub fn parse_date(s: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), format).ok()
}

/// Parses a time of day, trying each format in order.
#[must_use]
pub fn parse_time<S: AsRef<str>>(s: &str, formats: &[S]) -> Option<NaiveTime> {
    formats
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(s.trim(), format.as_ref()).ok())
}

/// Parses a boolean-like flag, case-insensitively: `true`/`false`, `Y`/`N`,
/// `YES`/`NO`, `1`/`0`. JSON booleans arrive as their [`value_text`].
#[must_use]
pub fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_uppercase().as_str() {
        "TRUE" | "Y" | "YES" | "1" => Some(true),
        "FALSE" | "N" | "NO" | "0" => Some(false),
        _ => None,
    }
}
