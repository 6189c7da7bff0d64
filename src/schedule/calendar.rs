//! Presentation helpers for trip date ranges.

use chrono::NaiveDate;
use serde::Serialize;

use super::span::DateSpan;

/// Something spanning calendar days, such as a trip.
pub trait Dated {
    fn dates(&self) -> DateSpan;
}

impl Dated for DateSpan {
    fn dates(&self) -> DateSpan {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tense {
    Past,
    Upcoming,
}

/// A trip is past once its last day is before `today`; a trip ending today
/// is still upcoming.
pub fn tense_of(dates: &DateSpan, today: NaiveDate) -> Tense {
    if dates.end() < today {
        Tense::Past
    } else {
        Tense::Upcoming
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripsByTense<T> {
    pub past: Vec<T>,
    pub upcoming: Vec<T>,
}

/// Splits `trips` into past and upcoming relative to `today`, preserving
/// their order within each group.
pub fn categorize_trips<T: Dated>(trips: Vec<T>, today: NaiveDate) -> TripsByTense<T> {
    let (past, upcoming): (Vec<T>, Vec<T>) = trips
        .into_iter()
        .partition(|trip| tense_of(&trip.dates(), today) == Tense::Past);
    TripsByTense { past, upcoming }
}

/// Length label in days: the day difference between both ends, so a
/// weekend from Saturday to Sunday is "1 day".
pub fn duration_label(dates: &DateSpan) -> String {
    let days = dates.nights();
    if days > 1 {
        format!("{days} days")
    } else {
        format!("{days} day")
    }
}

/// Short range label such as `"Jun 2 - Jun 5"`.
pub fn format_date_range(dates: &DateSpan) -> String {
    format!(
        "{} - {}",
        dates.start().format("%b %-d"),
        dates.end().format("%b %-d")
    )
}
