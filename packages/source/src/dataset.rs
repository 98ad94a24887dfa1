//! Config-driven dataset definition.
//!
//! [`DatasetDefinition`] captures everything unique about a published
//! release of the shooting dataset in a serializable config struct: where it
//! comes from, how it is licensed, which raw columns carry which semantic
//! field, which columns are dropped, and how dates and times are written.

use nyc_shootings_incident_models::Observed;
use serde::Deserialize;
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::parsing::{known_text, value_text};

// ── Top-level dataset definition ─────────────────────────────────────────

/// A complete, config-driven dataset definition.
///
/// Loaded from TOML files embedded at compile time.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetDefinition {
    /// Unique identifier (e.g., `"nypd_shooting_historic"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// City the dataset covers.
    pub city: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Human-readable data portal page.
    #[serde(default)]
    pub portal_url: Option<String>,
    /// Where the raw export can be downloaded from. Informational only.
    #[serde(default)]
    pub download_url: Option<String>,
    /// Licensing and usage metadata.
    pub license: LicenseInfo,
    /// Raw column names and the drop list.
    pub columns: ColumnMapping,
    /// Date and time text formats.
    #[serde(default)]
    pub formats: Formats,
}

// ── License metadata ─────────────────────────────────────────────────────

/// Licensing and usage restrictions for a dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct LicenseInfo {
    /// License type identifier (`"public_domain"`, `"open_data"`, ...).
    pub license_type: String,
    /// URL to the terms of use, if available.
    pub tos_url: Option<String>,
    /// Whether attribution is required when using this data.
    pub attribution_required: bool,
    /// Verbatim attribution text to display when required.
    pub attribution_text: Option<String>,
}

// ── Column mapping ───────────────────────────────────────────────────────

/// Semantic columns the normalizer reads from a raw record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Column {
    /// Source incident identifier (de-duplication key).
    IncidentKey,
    /// Occurrence date.
    Date,
    /// Occurrence time of day.
    Time,
    /// Borough name.
    Borough,
    /// Statistical murder flag.
    Murder,
    /// Perpetrator age group.
    PerpetratorAge,
    /// Perpetrator sex.
    PerpetratorSex,
    /// Perpetrator race.
    PerpetratorRace,
    /// Victim age group.
    VictimAge,
    /// Victim sex.
    VictimSex,
    /// Victim race.
    VictimRace,
}

/// What the normalizer does with a sentinel value in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelPolicy {
    /// Sentinels become `"unknown"`.
    Unify,
    /// Not unified; the value is handed through as text for the column's
    /// own parser.
    Exempt,
}

impl SentinelPolicy {
    /// Reads a raw value under this policy. Missing and blank values are
    /// [`Observed::Unknown`] either way.
    #[must_use]
    pub fn apply(self, value: Option<&Value>) -> Observed<String> {
        match self {
            Self::Unify => known_text(value).into(),
            Self::Exempt => value_text(value).into(),
        }
    }
}

impl Column {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::IncidentKey,
            Self::Date,
            Self::Time,
            Self::Borough,
            Self::Murder,
            Self::PerpetratorAge,
            Self::PerpetratorSex,
            Self::PerpetratorRace,
            Self::VictimAge,
            Self::VictimSex,
            Self::VictimRace,
        ]
    }

    /// Sentinel handling for this column. Columns passed through unrenamed
    /// always use [`SentinelPolicy::Unify`].
    #[must_use]
    pub const fn sentinel_policy(self) -> SentinelPolicy {
        match self {
            Self::IncidentKey | Self::Date | Self::Time | Self::Murder => SentinelPolicy::Exempt,
            Self::Borough
            | Self::PerpetratorAge
            | Self::PerpetratorSex
            | Self::PerpetratorRace
            | Self::VictimAge
            | Self::VictimSex
            | Self::VictimRace => SentinelPolicy::Unify,
        }
    }
}

/// Maps raw column names to semantic [`Column`]s, plus the columns to drop.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMapping {
    /// Raw column holding the source incident key.
    pub incident_key: String,
    /// Raw occurrence date column.
    pub date: String,
    /// Raw occurrence time column.
    pub time: String,
    /// Raw borough column.
    pub borough: String,
    /// Raw statistical murder flag column.
    pub murder: String,
    /// Raw perpetrator age group column.
    pub perpetrator_age: String,
    /// Raw perpetrator sex column.
    pub perpetrator_sex: String,
    /// Raw perpetrator race column.
    pub perpetrator_race: String,
    /// Raw victim age group column.
    pub victim_age: String,
    /// Raw victim sex column.
    pub victim_sex: String,
    /// Raw victim race column.
    pub victim_race: String,
    /// Columns that must be present and are dropped.
    #[serde(default)]
    pub drop: Vec<String>,
    /// Columns dropped when present, tolerated when absent.
    #[serde(default)]
    pub drop_if_present: Vec<String>,
}

impl ColumnMapping {
    /// Raw column name for a semantic column.
    #[must_use]
    pub fn raw_name(&self, column: Column) -> &str {
        match column {
            Column::IncidentKey => &self.incident_key,
            Column::Date => &self.date,
            Column::Time => &self.time,
            Column::Borough => &self.borough,
            Column::Murder => &self.murder,
            Column::PerpetratorAge => &self.perpetrator_age,
            Column::PerpetratorSex => &self.perpetrator_sex,
            Column::PerpetratorRace => &self.perpetrator_race,
            Column::VictimAge => &self.victim_age,
            Column::VictimSex => &self.victim_sex,
            Column::VictimRace => &self.victim_race,
        }
    }

    /// The rename table: `(raw name, semantic column)`.
    pub fn renames(&self) -> impl Iterator<Item = (&str, Column)> {
        Column::all()
            .iter()
            .map(move |&column| (self.raw_name(column), column))
    }

    /// Semantic column a raw name is renamed to, if any.
    #[must_use]
    pub fn renamed(&self, raw: &str) -> Option<Column> {
        self.renames()
            .find_map(|(name, column)| (name == raw).then_some(column))
    }

    /// Whether a raw column is dropped during projection.
    #[must_use]
    pub fn is_dropped(&self, raw: &str) -> bool {
        self.drop
            .iter()
            .chain(&self.drop_if_present)
            .any(|c| c == raw)
    }

    /// Every column a raw table must carry: rename sources and the
    /// mandatory drop list.
    pub fn required_columns(&self) -> impl Iterator<Item = &str> {
        self.renames()
            .map(|(name, _)| name)
            .chain(self.drop.iter().map(String::as_str))
    }
}

// ── Formats ──────────────────────────────────────────────────────────────

/// Text formats of the temporal columns, in `chrono` strftime syntax.
#[derive(Debug, Clone, Deserialize)]
pub struct Formats {
    /// Occurrence date format.
    #[serde(default = "default_date_format")]
    pub date: String,
    /// Occurrence time formats, tried in order.
    #[serde(default = "default_time_formats")]
    pub time: Vec<String>,
}

fn default_date_format() -> String {
    "%m/%d/%Y".to_string()
}

fn default_time_formats() -> Vec<String> {
    vec!["%H:%M:%S".to_string(), "%H:%M".to_string()]
}

impl Default for Formats {
    fn default() -> Self {
        Self {
            date: default_date_format(),
            time: default_time_formats(),
        }
    }
}

/// Parses a [`DatasetDefinition`] from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or missing required fields.
pub fn parse_dataset_toml(toml_str: &str) -> Result<DatasetDefinition, String> {
    toml::de::from_str(toml_str).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn historic() -> DatasetDefinition {
        parse_dataset_toml(include_str!("../datasets/nypd_shooting_historic.toml")).unwrap()
    }

    #[test]
    fn parses_historic_toml() {
        let def = historic();
        assert_eq!(def.id, "nypd_shooting_historic");
        assert_eq!(def.city, "New York");
        assert_eq!(def.state, "NY");
        assert_eq!(def.formats.date, "%m/%d/%Y");
        assert_eq!(def.columns.raw_name(Column::Borough), "BORO");
    }

    #[test]
    fn rename_table_is_one_to_one() {
        let def = historic();
        let mut raw: Vec<&str> = def.columns.renames().map(|(name, _)| name).collect();
        raw.sort_unstable();
        raw.dedup();
        assert_eq!(raw.len(), Column::all().len());
    }

    #[test]
    fn renamed_and_dropped_columns_are_disjoint() {
        let def = historic();
        for (name, _) in def.columns.renames() {
            assert!(
                !def.columns.is_dropped(name),
                "{name} is both renamed and dropped"
            );
        }
        assert_eq!(def.columns.renamed("OCCUR_TIME"), Some(Column::Time));
        assert_eq!(def.columns.renamed("Latitude"), None);
        assert!(def.columns.is_dropped("Latitude"));
        assert!(def.columns.is_dropped("LOC_CLASSFCTN_DESC"));
    }

    #[test]
    fn only_temporal_key_and_flag_columns_are_exempt() {
        let exempt: Vec<Column> = Column::all()
            .iter()
            .copied()
            .filter(|c| c.sentinel_policy() == SentinelPolicy::Exempt)
            .collect();
        assert_eq!(
            exempt,
            vec![
                Column::IncidentKey,
                Column::Date,
                Column::Time,
                Column::Murder,
            ]
        );
    }

    #[test]
    fn policy_decides_sentinel_handling() {
        let sentinel = json!("UNKNOWN");
        let unified = SentinelPolicy::Unify.apply(Some(&sentinel));
        let exempt = SentinelPolicy::Exempt.apply(Some(&sentinel));

        assert_eq!(unified, Observed::Unknown);
        assert_eq!(exempt, Observed::Known("UNKNOWN".to_string()));
        assert_eq!(SentinelPolicy::Exempt.apply(None), Observed::Unknown);

        let sex = SentinelPolicy::Unify.apply(Some(&json!("M")));
        assert_eq!(sex.to_string(), "M");
    }

    #[test]
    fn formats_default_when_omitted() {
        let toml_str = r#"
            id = "t"
            name = "T"
            city = "New York"
            state = "NY"

            [license]
            license_type = "public_domain"
            attribution_required = false

            [columns]
            incident_key = "K"
            date = "D"
            time = "T"
            borough = "B"
            murder = "M"
            perpetrator_age = "PA"
            perpetrator_sex = "PS"
            perpetrator_race = "PR"
            victim_age = "VA"
            victim_sex = "VS"
            victim_race = "VR"
        "#;
        let def = parse_dataset_toml(toml_str).unwrap();
        assert_eq!(def.formats.time, vec!["%H:%M:%S", "%H:%M"]);
        assert!(def.columns.drop.is_empty());
        assert_eq!(def.columns.required_columns().count(), 11);
    }
}
