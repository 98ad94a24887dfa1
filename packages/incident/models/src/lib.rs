#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Category types shared by every stage of the shooting-incident pipeline.
//!
//! This crate defines the fixed vocabularies a normalized incident is
//! described with: the five boroughs and their reference populations, day
//! of week, time-of-day buckets, and seasons. It also defines [`Observed`],
//! the "known value or `unknown`" wrapper every categorical column
//! normalizes into.

use std::fmt;

use chrono::{Datelike as _, NaiveDate, Weekday};
use serde::{Deserialize, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

/// Literal every missing or sentinel value is unified to.
pub const UNKNOWN: &str = "unknown";

/// Year the borough population figures refer to.
pub const POPULATION_REFERENCE_YEAR: i32 = 2022;

/// A categorical value that is either known or explicitly `unknown`.
///
/// `Unknown` displays and serializes as the literal string `"unknown"`, so
/// downstream tables never see a raw null or sentinel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Observed<T> {
    /// A recorded value.
    Known(T),
    /// Missing, or recorded with a sentinel.
    Unknown,
}

impl<T> Observed<T> {
    /// Returns the known value, if any.
    #[must_use]
    pub const fn known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unknown => None,
        }
    }

    /// Returns `true` for [`Observed::Unknown`].
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Chains a fallible lookup on the known value.
    #[must_use]
    pub fn and_then<U, F: FnOnce(T) -> Observed<U>>(self, f: F) -> Observed<U> {
        match self {
            Self::Known(value) => f(value),
            Self::Unknown => Observed::Unknown,
        }
    }
}

impl<T> From<Option<T>> for Observed<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unknown, Self::Known)
    }
}

impl<T: fmt::Display> fmt::Display for Observed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(value) => value.fmt(f),
            Self::Unknown => f.write_str(UNKNOWN),
        }
    }
}

impl<T: Serialize> Serialize for Observed<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(value) => value.serialize(serializer),
            Self::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

/// The five boroughs of New York City.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Borough {
    /// The Bronx
    Bronx,
    /// Brooklyn (Kings County)
    Brooklyn,
    /// Manhattan (New York County)
    Manhattan,
    /// Queens
    Queens,
    /// Staten Island (Richmond County)
    #[serde(rename = "STATEN ISLAND")]
    #[strum(serialize = "STATEN ISLAND")]
    StatenIsland,
}

impl Borough {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Bronx,
            Self::Brooklyn,
            Self::Manhattan,
            Self::Queens,
            Self::StatenIsland,
        ]
    }

    /// Resident population as of [`POPULATION_REFERENCE_YEAR`].
    #[must_use]
    pub const fn population(self) -> u64 {
        match self {
            Self::Bronx => 1_424_948,
            Self::Brooklyn => 2_641_052,
            Self::Manhattan => 1_576_876,
            Self::Queens => 2_331_143,
            Self::StatenIsland => 493_494,
        }
    }
}

/// Day of the week, ordered Monday first as the plots lay it out.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum DayOfWeek {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl DayOfWeek {
    /// Returns all variants in plot order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
            Self::Sunday,
        ]
    }

    /// Day of week a calendar date falls on.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

/// Coarse six-hour partition of the 24-hour clock.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TimeOfDay {
    /// `[0, 6)`
    Midnight,
    /// `[6, 12)`
    Morning,
    /// `[12, 18)`
    Afternoon,
    /// `[18, 24)`
    Evening,
}

impl TimeOfDay {
    /// Returns all variants in plot order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Midnight,
            Self::Morning,
            Self::Afternoon,
            Self::Evening,
        ]
    }

    /// Bucket for an hour of the day. Any hour not below 18 is evening;
    /// a parsed time never yields an hour above 23.
    #[must_use]
    pub const fn from_hour(hour: u32) -> Self {
        match hour {
            0..6 => Self::Midnight,
            6..12 => Self::Morning,
            12..18 => Self::Afternoon,
            _ => Self::Evening,
        }
    }
}

/// Meteorological season of a calendar month.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Season {
    /// December, January, February
    Winter,
    /// March, April, May
    Spring,
    /// June, July, August
    Summer,
    /// September, October, November
    Fall,
}

impl Season {
    /// Returns all variants in plot order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Winter, Self::Spring, Self::Summer, Self::Fall]
    }

    /// Season of a 1-based month number.
    #[must_use]
    pub const fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Self::Winter,
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            _ => Self::Fall,
        }
    }

    /// Season a calendar date falls in.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self::from_month(date.month())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn population_lookup_is_exact() {
        assert_eq!(Borough::Bronx.population(), 1_424_948);
        assert_eq!(Borough::Brooklyn.population(), 2_641_052);
        assert_eq!(Borough::Manhattan.population(), 1_576_876);
        assert_eq!(Borough::Queens.population(), 2_331_143);
        assert_eq!(Borough::StatenIsland.population(), 493_494);
    }

    #[test]
    fn parses_borough_names() {
        assert_eq!(Borough::from_str("BRONX").unwrap(), Borough::Bronx);
        assert_eq!(
            Borough::from_str("STATEN ISLAND").unwrap(),
            Borough::StatenIsland
        );
        assert_eq!(Borough::from_str("Queens").unwrap(), Borough::Queens);
        assert!(Borough::from_str("NEWARK").is_err());
        assert_eq!(Borough::StatenIsland.to_string(), "STATEN ISLAND");
    }

    #[test]
    fn time_of_day_partition_is_total() {
        for hour in 0..24 {
            let expected = if hour < 6 {
                TimeOfDay::Midnight
            } else if hour < 12 {
                TimeOfDay::Morning
            } else if hour < 18 {
                TimeOfDay::Afternoon
            } else {
                TimeOfDay::Evening
            };
            assert_eq!(TimeOfDay::from_hour(hour), expected, "hour {hour}");
        }
        assert_eq!(TimeOfDay::Midnight.to_string(), "midnight");
    }

    #[test]
    fn season_covers_every_month() {
        let seasons: Vec<Season> = (1..=12).map(Season::from_month).collect();
        assert_eq!(
            seasons,
            vec![
                Season::Winter,
                Season::Winter,
                Season::Spring,
                Season::Spring,
                Season::Spring,
                Season::Summer,
                Season::Summer,
                Season::Summer,
                Season::Fall,
                Season::Fall,
                Season::Fall,
                Season::Winter,
            ]
        );
    }

    #[test]
    fn weekday_from_date() {
        let date = NaiveDate::from_ymd_opt(2020, 7, 5).unwrap();
        assert_eq!(DayOfWeek::of(date), DayOfWeek::Sunday);
        assert_eq!(DayOfWeek::of(date).to_string(), "Sunday");
    }

    #[test]
    fn observed_unknown_serializes_as_literal() {
        let unknown: Observed<u64> = Observed::Unknown;
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"unknown\"");
        assert_eq!(
            serde_json::to_string(&Observed::Known(493_494_u64)).unwrap(),
            "493494"
        );
        assert_eq!(unknown.to_string(), "unknown");
    }
}
