//! Aggregate queries over normalized incidents.
//!
//! Every query is a pure read of an immutable incident slice and returns a
//! small table in the order plotting tools expect. Counts are of rows, so an
//! incident reported on several rows is counted once per row.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike as _, NaiveDate};
use nyc_shootings_analytics_models::{
    BoroughRate, DatasetSummary, DateCount, SeasonCount, WeekdayTimeCount, YearlyTotals,
};
use nyc_shootings_incident_models::{Borough, DayOfWeek, Observed, Season, TimeOfDay};
use nyc_shootings_source_models::Incident;

/// Counts items per key, keyed in ascending order.
fn count_by<'a, K: Ord, F: Fn(&Incident) -> K>(
    incidents: impl IntoIterator<Item = &'a Incident>,
    key: F,
) -> BTreeMap<K, u64> {
    let mut counts = BTreeMap::new();
    for incident in incidents {
        *counts.entry(key(incident)).or_insert(0) += 1;
    }
    counts
}

/// Date counts, most first. Equal counts keep ascending date order.
fn dates_by_count_desc(counts: BTreeMap<NaiveDate, u64>) -> Vec<DateCount> {
    let mut rows: Vec<DateCount> = counts
        .into_iter()
        .map(|(date, count)| DateCount { date, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Rows per calendar date, sorted by count descending; ties stay in
/// ascending date order.
#[must_use]
pub fn counts_by_date(incidents: &[Incident]) -> Vec<DateCount> {
    dates_by_count_desc(count_by(incidents, |i| i.date))
}

/// Rows per (weekday, time of day), walking [`DayOfWeek::all`] and then
/// [`TimeOfDay::all`]. Only combinations that occur are returned.
#[must_use]
pub fn counts_by_weekday_and_time_of_day(incidents: &[Incident]) -> Vec<WeekdayTimeCount> {
    let counts = count_by(incidents, |i| (i.weekday, i.time_of_day));

    DayOfWeek::all()
        .iter()
        .flat_map(|&weekday| TimeOfDay::all().iter().map(move |&time| (weekday, time)))
        .filter_map(|(weekday, time_of_day)| {
            let count = *counts.get(&(weekday, time_of_day))?;
            Some(WeekdayTimeCount {
                weekday,
                time_of_day,
                count,
            })
        })
        .collect()
}

/// Rows per season of the occurrence month, in [`Season::all`] order.
/// Seasons without rows are left out.
#[must_use]
pub fn counts_by_season(incidents: &[Incident]) -> Vec<SeasonCount> {
    let counts = count_by(incidents, |i| Season::of(i.date));

    Season::all()
        .iter()
        .filter_map(|&season| {
            counts
                .get(&season)
                .map(|&count| SeasonCount { season, count })
        })
        .collect()
}

/// Rows per 1000 residents of each borough with at least one row, in
/// [`Borough::all`] order.
///
/// Rows with an unknown borough have no population to divide by and are
/// left out.
#[must_use]
pub fn borough_rates(incidents: &[Incident]) -> Vec<BoroughRate> {
    let counts = count_by(incidents, |i| i.borough.clone());

    if let Some(unknown) = counts.get(&Observed::Unknown) {
        log::debug!("Excluding {unknown} rows with unknown borough from borough rates");
    }

    Borough::all()
        .iter()
        .filter_map(|&borough| {
            counts
                .get(&Observed::Known(borough))
                .map(|&count| rate(borough, count))
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn rate(borough: Borough, incidents_count: u64) -> BoroughRate {
    let total_population = borough.population();
    BoroughRate {
        borough,
        total_population,
        incidents_count,
        percentage_of_shootings: incidents_count as f64 * 1000.0 / total_population as f64,
    }
}

/// Murder rows per calendar date, sorted by count descending; ties stay in
/// ascending date order.
#[must_use]
pub fn murders_by_date(incidents: &[Incident]) -> Vec<DateCount> {
    dates_by_count_desc(count_by(incidents.iter().filter(|i| i.murder), |i| i.date))
}

/// Shootings and murders per year, ascending. Every year with a shooting
/// appears; years without murders report zero.
#[must_use]
pub fn shootings_and_murders_by_year(incidents: &[Incident]) -> Vec<YearlyTotals> {
    let shootings = count_by(incidents, |i| i.date.year());
    let murders = count_by(incidents.iter().filter(|i| i.murder), |i| i.date.year());

    shootings
        .into_iter()
        .map(|(year, shootings)| YearlyTotals {
            year,
            shootings,
            murders: murders.get(&year).copied().unwrap_or(0),
        })
        .collect()
}

/// Headline figures for a normalized dataset.
#[must_use]
pub fn summarize(incidents: &[Incident]) -> DatasetSummary {
    let ids: BTreeSet<u64> = incidents.iter().map(|i| i.id).collect();

    DatasetSummary {
        rows: incidents.len() as u64,
        incidents: ids.len() as u64,
        murders: incidents.iter().filter(|i| i.murder).count() as u64,
        unknown_borough: incidents.iter().filter(|i| i.borough.is_unknown()).count() as u64,
        first_date: incidents.iter().map(|i| i.date).min(),
        last_date: incidents.iter().map(|i| i.date).max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn incident(
        id: u64,
        date: NaiveDate,
        hour: u32,
        borough: Option<Borough>,
        murder: bool,
    ) -> Incident {
        let borough: Observed<Borough> = borough.into();
        Incident {
            id,
            date,
            weekday: DayOfWeek::of(date),
            time_of_day: TimeOfDay::from_hour(hour),
            population: borough.known().map(|b| b.population()).into(),
            borough,
            murder,
            perpetrator_age: Observed::Unknown,
            perpetrator_sex: Observed::Unknown,
            perpetrator_race: Observed::Unknown,
            victim_age: Observed::Unknown,
            victim_sex: Observed::Unknown,
            victim_race: Observed::Unknown,
            extra: BTreeMap::new(),
        }
    }

    fn sample() -> Vec<Incident> {
        vec![
            incident(1, date(2019, 1, 1), 3, Some(Borough::Queens), false),
            incident(2, date(2020, 7, 5), 23, Some(Borough::Bronx), true),
            incident(2, date(2020, 7, 5), 23, Some(Borough::Bronx), true),
            incident(3, date(2020, 7, 6), 14, Some(Borough::Bronx), false),
            incident(4, date(2021, 3, 1), 8, None, false),
            incident(5, date(2021, 12, 24), 19, Some(Borough::StatenIsland), true),
        ]
    }

    #[test]
    fn counts_by_date_descending_with_date_tie_break() {
        let rows = counts_by_date(&sample());
        assert_eq!(
            rows,
            vec![
                DateCount {
                    date: date(2020, 7, 5),
                    count: 2,
                },
                DateCount {
                    date: date(2019, 1, 1),
                    count: 1,
                },
                DateCount {
                    date: date(2020, 7, 6),
                    count: 1,
                },
                DateCount {
                    date: date(2021, 3, 1),
                    count: 1,
                },
                DateCount {
                    date: date(2021, 12, 24),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn weekday_time_cells_follow_plot_order() {
        let rows = counts_by_weekday_and_time_of_day(&sample());
        let cells: Vec<(DayOfWeek, TimeOfDay, u64)> = rows
            .iter()
            .map(|r| (r.weekday, r.time_of_day, r.count))
            .collect();
        assert_eq!(
            cells,
            vec![
                (DayOfWeek::Monday, TimeOfDay::Morning, 1),
                (DayOfWeek::Monday, TimeOfDay::Afternoon, 1),
                (DayOfWeek::Tuesday, TimeOfDay::Midnight, 1),
                (DayOfWeek::Friday, TimeOfDay::Evening, 1),
                (DayOfWeek::Sunday, TimeOfDay::Evening, 2),
            ]
        );
        let total: u64 = rows.iter().map(|r| r.count).sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn full_weekday_time_grid_follows_category_order() {
        let monday = date(2024, 1, 1);
        let incidents: Vec<Incident> = (0..28_u32)
            .map(|i| {
                let day = monday + chrono::Days::new(u64::from(i / 4));
                incident(u64::from(i), day, (i % 4) * 6, None, false)
            })
            .rev()
            .collect();

        let rows = counts_by_weekday_and_time_of_day(&incidents);
        let cells: Vec<(DayOfWeek, TimeOfDay)> = rows
            .iter()
            .map(|r| (r.weekday, r.time_of_day))
            .collect();
        let expected: Vec<(DayOfWeek, TimeOfDay)> = DayOfWeek::all()
            .iter()
            .flat_map(|&d| TimeOfDay::all().iter().map(move |&t| (d, t)))
            .collect();
        assert_eq!(cells, expected);
    }

    #[test]
    fn seasons_from_month() {
        let rows = counts_by_season(&sample());
        assert_eq!(
            rows,
            vec![
                SeasonCount {
                    season: Season::Winter,
                    count: 2,
                },
                SeasonCount {
                    season: Season::Spring,
                    count: 1,
                },
                SeasonCount {
                    season: Season::Summer,
                    count: 3,
                },
            ]
        );
    }

    #[test]
    fn borough_rates_exclude_unknown() {
        let rows = borough_rates(&sample());
        let boroughs: Vec<Borough> = rows.iter().map(|r| r.borough).collect();
        assert_eq!(
            boroughs,
            vec![Borough::Bronx, Borough::Queens, Borough::StatenIsland]
        );

        let bronx = &rows[0];
        assert_eq!(bronx.total_population, 1_424_948);
        assert_eq!(bronx.incidents_count, 3);
        let expected = 3.0 * 1000.0 / 1_424_948.0;
        assert!((bronx.percentage_of_shootings - expected).abs() < 1e-12);
    }

    #[test]
    fn murders_by_date_only_counts_murders() {
        let rows = murders_by_date(&sample());
        assert_eq!(
            rows,
            vec![
                DateCount {
                    date: date(2020, 7, 5),
                    count: 2,
                },
                DateCount {
                    date: date(2021, 12, 24),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn yearly_totals_fill_missing_murders_with_zero() {
        let rows = shootings_and_murders_by_year(&sample());
        assert_eq!(
            rows,
            vec![
                YearlyTotals {
                    year: 2019,
                    shootings: 1,
                    murders: 0,
                },
                YearlyTotals {
                    year: 2020,
                    shootings: 3,
                    murders: 2,
                },
                YearlyTotals {
                    year: 2021,
                    shootings: 2,
                    murders: 1,
                },
            ]
        );
    }

    #[test]
    fn summary_counts_distinct_ids() {
        let summary = summarize(&sample());
        assert_eq!(summary.rows, 6);
        assert_eq!(summary.incidents, 5);
        assert_eq!(summary.murders, 3);
        assert_eq!(summary.unknown_borough, 1);
        assert_eq!(summary.first_date, Some(date(2019, 1, 1)));
        assert_eq!(summary.last_date, Some(date(2021, 12, 24)));
    }

    #[test]
    fn empty_input_gives_empty_tables() {
        assert!(counts_by_date(&[]).is_empty());
        assert!(borough_rates(&[]).is_empty());
        assert!(shootings_and_murders_by_year(&[]).is_empty());
        assert_eq!(summarize(&[]).first_date, None);
    }
}
