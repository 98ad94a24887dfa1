#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw row types and the canonical normalized incident format.
//!
//! The loader produces a [`RawTable`] of untyped [`RawRecord`]s; the
//! normalizer turns it into [`Incident`]s that use the shared vocabularies in
//! [`nyc_shootings_incident_models`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use nyc_shootings_incident_models::{Borough, DayOfWeek, Observed, TimeOfDay};
use serde::Serialize;

/// One row as delivered by the source: column name to string, number, or
/// null.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// A loaded but not yet normalized dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Column names present in the source, in source order.
    pub columns: Vec<String>,
    /// Rows in file order.
    pub records: Vec<RawRecord>,
}

impl RawTable {
    /// Creates a table from its columns and rows.
    #[must_use]
    pub const fn new(columns: Vec<String>, records: Vec<RawRecord>) -> Self {
        Self { columns, records }
    }

    /// Whether the source exposed a column with this exact name.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A shooting incident normalized to the canonical schema.
///
/// Every categorical field is either a recorded value or `unknown`; only
/// `date` is exempt from sentinel unification, and it is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Incident {
    /// Dense rank of the source incident key, in date/time order of first
    /// occurrence. Rows describing the same incident share an id.
    pub id: u64,
    /// Calendar date of occurrence.
    pub date: NaiveDate,
    /// Day of week of `date`.
    pub weekday: DayOfWeek,
    /// Time-of-day bucket of the occurrence time.
    pub time_of_day: TimeOfDay,
    /// Borough the shooting occurred in.
    pub borough: Observed<Borough>,
    /// Reference population of `borough`.
    pub population: Observed<u64>,
    /// Whether the shooting is counted as a statistical murder.
    pub murder: bool,
    /// Perpetrator age group (e.g. `"18-24"`).
    pub perpetrator_age: Observed<String>,
    /// Perpetrator sex (`"M"` / `"F"`).
    pub perpetrator_sex: Observed<String>,
    /// Perpetrator race.
    pub perpetrator_race: Observed<String>,
    /// Victim age group.
    pub victim_age: Observed<String>,
    /// Victim sex.
    pub victim_sex: Observed<String>,
    /// Victim race.
    pub victim_race: Observed<String>,
    /// Source columns that are neither renamed nor dropped, keyed by their
    /// raw name.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Observed<String>>,
}
