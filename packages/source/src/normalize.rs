//! Normalization of a raw shooting export into [`Incident`]s.
//!
//! The pipeline projects away the drop list, renames columns through the
//! dataset's [`ColumnMapping`], parses the temporal columns, orders rows by
//! date and time, re-identifies incidents by dense rank of their source key,
//! derives weekday, time-of-day and population, and unifies every sentinel
//! into `unknown`. Rows are never added or removed.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr as _;

use chrono::{NaiveDate, NaiveTime, Timelike as _};
use nyc_shootings_incident_models::{Borough, DayOfWeek, Observed, TimeOfDay};
use nyc_shootings_source_models::{Incident, RawRecord, RawTable};

use crate::SourceError;
use crate::dataset::{Column, ColumnMapping, DatasetDefinition, Formats, SentinelPolicy};
use crate::loader::validate_schema;
use crate::parsing::{parse_date, parse_flag, parse_time};

/// Murder flag spellings named in parse errors.
const FLAG_SPELLINGS: &str = "true/false or Y/N";

/// A row whose temporal columns and key have been parsed, awaiting its id.
struct StagedRow<'a> {
    key: String,
    date: NaiveDate,
    time: NaiveTime,
    murder: bool,
    record: &'a RawRecord,
}

/// Normalizes a raw table using a dataset definition's columns and formats.
///
/// # Errors
///
/// See [`normalize`].
pub fn normalize_with(
    table: &RawTable,
    dataset: &DatasetDefinition,
) -> Result<Vec<Incident>, SourceError> {
    normalize(table, &dataset.columns, &dataset.formats)
}

/// Normalizes a raw table into incidents, one per input row.
///
/// Output order is date-major, time-minor, with equal date and time keeping
/// input order. Each incident's `id` is the 1-based position of its source
/// key among distinct keys in that order.
///
/// # Errors
///
/// * [`SourceError::Schema`] if a required column is absent.
/// * [`SourceError::Parse`] if a date, time, or murder flag does not parse.
/// * [`SourceError::MissingValue`] if a row has no incident key.
pub fn normalize(
    table: &RawTable,
    columns: &ColumnMapping,
    formats: &Formats,
) -> Result<Vec<Incident>, SourceError> {
    validate_schema(table, columns)?;

    let passthrough: Vec<&str> = table
        .columns
        .iter()
        .map(String::as_str)
        .filter(|name| !columns.is_dropped(name) && columns.renamed(name).is_none())
        .collect();
    if !passthrough.is_empty() {
        log::debug!(
            "Passing through unmapped columns: {}",
            passthrough.join(", ")
        );
    }

    let mut staged = table
        .records
        .iter()
        .enumerate()
        .map(|(i, record)| stage(i + 1, record, columns, formats))
        .collect::<Result<Vec<_>, _>>()?;

    // Sort by time, then stable-sort by date: date-major, time-minor, input
    // order within equal date and time.
    staged.sort_by_key(|row| row.time);
    staged.sort_by_key(|row| row.date);

    let mut ids: HashMap<&str, u64> = HashMap::new();
    let mut incidents = Vec::with_capacity(staged.len());

    for row in &staged {
        let next_id = ids.len() as u64 + 1;
        let id = *ids.entry(row.key.as_str()).or_insert(next_id);
        incidents.push(build_incident(id, row, columns, &passthrough));
    }

    log::info!(
        "Normalized {} rows into {} distinct incidents",
        incidents.len(),
        ids.len()
    );

    Ok(incidents)
}

/// Parses the columns exempt from sentinel unification: key, date, time,
/// and murder flag. `row` is 1-based.
fn stage<'a>(
    row: usize,
    record: &'a RawRecord,
    columns: &ColumnMapping,
    formats: &Formats,
) -> Result<StagedRow<'a>, SourceError> {
    let Observed::Known(key) = cell(record, columns, Column::IncidentKey) else {
        return Err(SourceError::MissingValue {
            row,
            column: columns.raw_name(Column::IncidentKey).to_string(),
        });
    };

    let date = required_text(row, record, columns, Column::Date, &formats.date)?;
    let date = parse_date(&date, &formats.date)
        .ok_or_else(|| parse_error(row, columns, Column::Date, &date, &formats.date))?;

    let expected_time = formats.time.join(" | ");
    let time = required_text(row, record, columns, Column::Time, &expected_time)?;
    let time = parse_time(&time, formats.time.as_slice())
        .ok_or_else(|| parse_error(row, columns, Column::Time, &time, &expected_time))?;

    let flag = required_text(row, record, columns, Column::Murder, FLAG_SPELLINGS)?;
    let murder = parse_flag(&flag)
        .ok_or_else(|| parse_error(row, columns, Column::Murder, &flag, FLAG_SPELLINGS))?;

    Ok(StagedRow {
        key,
        date,
        time,
        murder,
        record,
    })
}

fn build_incident(
    id: u64,
    row: &StagedRow<'_>,
    columns: &ColumnMapping,
    passthrough: &[&str],
) -> Incident {
    let record = row.record;

    let borough = borough(record, columns);
    let population: Observed<u64> = borough.known().map(|b| b.population()).into();

    let extra: BTreeMap<String, Observed<String>> = passthrough
        .iter()
        .map(|&name| (name.to_string(), SentinelPolicy::Unify.apply(record.get(name))))
        .collect();

    Incident {
        id,
        date: row.date,
        weekday: DayOfWeek::of(row.date),
        time_of_day: TimeOfDay::from_hour(row.time.hour()),
        borough,
        population,
        murder: row.murder,
        perpetrator_age: cell(record, columns, Column::PerpetratorAge),
        perpetrator_sex: cell(record, columns, Column::PerpetratorSex),
        perpetrator_race: cell(record, columns, Column::PerpetratorRace),
        victim_age: cell(record, columns, Column::VictimAge),
        victim_sex: cell(record, columns, Column::VictimSex),
        victim_race: cell(record, columns, Column::VictimRace),
        extra,
    }
}

fn raw<'a>(
    record: &'a RawRecord,
    columns: &ColumnMapping,
    column: Column,
) -> Option<&'a serde_json::Value> {
    record.get(columns.raw_name(column))
}

/// A semantic column's value under its [`SentinelPolicy`].
fn cell(record: &RawRecord, columns: &ColumnMapping, column: Column) -> Observed<String> {
    column.sentinel_policy().apply(raw(record, columns, column))
}

/// Text of a column that must be present. A missing value is reported as a
/// parse failure against `expected`.
fn required_text(
    row: usize,
    record: &RawRecord,
    columns: &ColumnMapping,
    column: Column,
    expected: &str,
) -> Result<String, SourceError> {
    match cell(record, columns, column) {
        Observed::Known(text) => Ok(text),
        Observed::Unknown => Err(parse_error(row, columns, column, "", expected)),
    }
}

fn parse_error(
    row: usize,
    columns: &ColumnMapping,
    column: Column,
    value: &str,
    expected: &str,
) -> SourceError {
    SourceError::Parse {
        row,
        column: columns.raw_name(column).to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

fn borough(record: &RawRecord, columns: &ColumnMapping) -> Observed<Borough> {
    cell(record, columns, Column::Borough).and_then(|name| {
        Borough::from_str(&name).map_or_else(
            |_| {
                log::warn!("Unrecognized borough '{name}', treating as unknown");
                Observed::Unknown
            },
            Observed::Known,
        )
    })
}
