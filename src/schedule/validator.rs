//! Stop scheduling rules.
//!
//! A stop must sit inside its trip's dates and must not overlap any other
//! stop of the same trip. Stops may be back-to-back: one stop's last day
//! can be the next stop's first day.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::normalize::CalendarDay;
use super::span::{days_overlap, DateSpan};

pub const NAME_REQUIRED: &str = "name required";
pub const START_DATE_REQUIRED: &str = "start date required";
pub const END_DATE_REQUIRED: &str = "end date required";
pub const END_BEFORE_START: &str = "end date must be after start date";
pub const START_OUTSIDE_TRIP: &str = "start date must be within trip dates";
pub const END_OUTSIDE_TRIP: &str = "end date must be within trip dates";
pub const STOP_OVERLAPS: &str = "a stop already exists on these dates";

/// A stop already on the schedule.
pub trait Scheduled {
    fn stop_id(&self) -> i64;
    fn span(&self) -> DateSpan;
}

/// Minimal scheduled stop, for callers that only hold ids and dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledStop {
    pub id: i64,
    pub span: DateSpan,
}

impl Scheduled for ScheduledStop {
    fn stop_id(&self) -> i64 {
        self.id
    }

    fn span(&self) -> DateSpan {
        self.span
    }
}

/// Raw form input for a stop. Dates are `None` until the user picks them.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopCandidate<'a> {
    pub name: &'a str,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl<'a> StopCandidate<'a> {
    pub fn new(
        name: &'a str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Self {
        Self { name, start, end }
    }

    /// The candidate's calendar span, if both dates are set and in order.
    pub fn span(&self) -> Option<DateSpan> {
        DateSpan::new(self.start?, self.end?)
    }
}

/// Per-field outcome of validating a stop form.
///
/// Each slot holds at most one message. The candidate is admissible iff
/// every slot is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopFieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_date: Option<&'static str>,
}

impl StopFieldErrors {
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    pub fn start_date(&self) -> Option<&'static str> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<&'static str> {
        self.end_date
    }

    pub fn is_admissible(&self) -> bool {
        self.name.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }

    /// `Ok(())` when admissible, otherwise the errors themselves.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_admissible() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Decides whether a stop fits into a trip's schedule.
///
/// The validator is a pure function of its inputs: it borrows the existing
/// stops, never mutates them, and can be shared freely across threads.
///
/// Rules run top to bottom and every rule runs. When more than one rule
/// blames the same field, the later rule's message is the one reported:
///
/// 1. name non-empty after trimming
/// 2. start date set
/// 3. end date set
/// 4. start not after end (raw values, time of day included)
/// 5. both days inside the trip, when the trip's dates are known
/// 6. no overlap with any other stop, see [`DateSpan::overlaps`]
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tripflow::schedule::{DateSpan, ScheduledStop, StopCandidate, StopScheduleValidator};
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
/// let trip = DateSpan::new(day(1), day(10));
/// let existing = [ScheduledStop { id: 1, span: DateSpan::new(day(2), day(5)).unwrap() }];
///
/// let validator = StopScheduleValidator::new(trip, &existing);
/// let back_to_back = StopCandidate::new(
///     "Lyon",
///     day(5).and_hms_opt(0, 0, 0),
///     day(8).and_hms_opt(0, 0, 0),
/// );
/// assert!(validator.validate(&back_to_back).is_admissible());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StopScheduleValidator<'a, S> {
    trip: Option<DateSpan>,
    existing: &'a [S],
    editing: Option<i64>,
}

impl<'a, S: Scheduled> StopScheduleValidator<'a, S> {
    pub fn new(trip: Option<DateSpan>, existing: &'a [S]) -> Self {
        Self {
            trip,
            existing,
            editing: None,
        }
    }

    /// Validates an edit in place: the stop with `stop_id` is ignored when
    /// checking for overlaps.
    pub fn editing(mut self, stop_id: i64) -> Self {
        self.editing = Some(stop_id);
        self
    }

    pub fn validate(&self, candidate: &StopCandidate<'_>) -> StopFieldErrors {
        let dates = candidate.start.zip(candidate.end);

        let inverted = dates.is_some_and(|(start, end)| start > end);

        let (starts_before_trip, ends_after_trip) = match (dates, self.trip) {
            (Some((start, end)), Some(trip)) => (
                start.calendar_day() < trip.start(),
                end.calendar_day() > trip.end(),
            ),
            _ => (false, false),
        };

        let overlaps = dates.is_some_and(|(start, end)| self.overlaps_any(start, end));

        StopFieldErrors {
            name: last_applicable([(candidate.name.trim().is_empty(), NAME_REQUIRED)]),
            start_date: last_applicable([
                (candidate.start.is_none(), START_DATE_REQUIRED),
                (starts_before_trip, START_OUTSIDE_TRIP),
                (overlaps, STOP_OVERLAPS),
            ]),
            end_date: last_applicable([
                (candidate.end.is_none(), END_DATE_REQUIRED),
                (inverted, END_BEFORE_START),
                (ends_after_trip, END_OUTSIDE_TRIP),
            ]),
        }
    }

    fn overlaps_any(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        let (start, end) = (start.calendar_day(), end.calendar_day());
        self.existing
            .iter()
            .filter(|stop| Some(stop.stop_id()) != self.editing)
            .any(|stop| days_overlap(start, end, &stop.span()))
    }
}

/// Message of the last rule in `rules` that applies.
fn last_applicable<const N: usize>(rules: [(bool, &'static str); N]) -> Option<&'static str> {
    rules
        .into_iter()
        .rev()
        .find_map(|(applies, message)| applies.then_some(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn at(s: &str) -> Option<NaiveDateTime> {
        date(s).and_hms_opt(0, 0, 0)
    }

    fn june_trip() -> Option<DateSpan> {
        DateSpan::new(date("2024-06-01"), date("2024-06-10"))
    }

    fn stop(id: i64, start: &str, end: &str) -> ScheduledStop {
        ScheduledStop {
            id,
            span: DateSpan::new(date(start), date(end)).unwrap(),
        }
    }

    #[test]
    fn empty_trip_accepts_stop_inside_dates() {
        let none: [ScheduledStop; 0] = [];
        let errors = StopScheduleValidator::new(june_trip(), &none).validate(
            &StopCandidate::new("Paris", at("2024-06-02"), at("2024-06-05")),
        );
        assert!(errors.is_admissible());
        assert_eq!(errors, StopFieldErrors::default());
    }

    #[test]
    fn start_before_trip_is_blamed_on_start() {
        let none: [ScheduledStop; 0] = [];
        let errors = StopScheduleValidator::new(june_trip(), &none).validate(
            &StopCandidate::new("Paris", at("2024-05-30"), at("2024-06-05")),
        );
        assert_eq!(errors.start_date(), Some(START_OUTSIDE_TRIP));
        assert_eq!(errors.end_date(), None);
        assert_eq!(errors.name(), None);
    }

    #[test]
    fn end_after_trip_is_blamed_on_end() {
        let none: [ScheduledStop; 0] = [];
        let errors = StopScheduleValidator::new(june_trip(), &none).validate(
            &StopCandidate::new("Nice", at("2024-06-08"), at("2024-06-11")),
        );
        assert_eq!(errors.start_date(), None);
        assert_eq!(errors.end_date(), Some(END_OUTSIDE_TRIP));
    }

    #[test]
    fn trip_boundaries_are_inclusive() {
        let none: [ScheduledStop; 0] = [];
        let errors = StopScheduleValidator::new(june_trip(), &none).validate(
            &StopCandidate::new("Whole trip", at("2024-06-01"), at("2024-06-10")),
        );
        assert!(errors.is_admissible());
    }

    #[test]
    fn time_of_day_on_the_last_trip_day_is_ignored() {
        let none: [ScheduledStop; 0] = [];
        let late = date("2024-06-10").and_hms_opt(23, 30, 0);
        let errors = StopScheduleValidator::new(june_trip(), &none)
            .validate(&StopCandidate::new("Late", at("2024-06-09"), late));
        assert!(errors.is_admissible());
    }

    #[test]
    fn mid_range_overlap_is_blamed_on_start() {
        let existing = [stop(1, "2024-06-02", "2024-06-05")];
        let errors = StopScheduleValidator::new(june_trip(), &existing).validate(
            &StopCandidate::new("Lyon", at("2024-06-04"), at("2024-06-07")),
        );
        assert_eq!(errors.start_date(), Some(STOP_OVERLAPS));
        assert_eq!(errors.end_date(), None);
    }

    #[test]
    fn back_to_back_stops_are_allowed() {
        let existing = [stop(1, "2024-06-02", "2024-06-05")];
        let validator = StopScheduleValidator::new(june_trip(), &existing);
        let after = StopCandidate::new("Lyon", at("2024-06-05"), at("2024-06-08"));
        let before = StopCandidate::new("Lille", at("2024-06-01"), at("2024-06-02"));
        assert!(validator.validate(&after).is_admissible());
        assert!(validator.validate(&before).is_admissible());
    }

    #[test]
    fn identical_dates_overlap() {
        let existing = [stop(1, "2024-06-02", "2024-06-05")];
        let errors = StopScheduleValidator::new(june_trip(), &existing).validate(
            &StopCandidate::new("Twin", at("2024-06-02"), at("2024-06-05")),
        );
        assert_eq!(errors.start_date(), Some(STOP_OVERLAPS));
    }

    #[test]
    fn candidate_inside_existing_overlaps() {
        let existing = [stop(1, "2024-06-02", "2024-06-08")];
        let errors = StopScheduleValidator::new(june_trip(), &existing).validate(
            &StopCandidate::new("Inner", at("2024-06-03"), at("2024-06-05")),
        );
        assert_eq!(errors.start_date(), Some(STOP_OVERLAPS));
    }

    #[test]
    fn candidate_covering_existing_overlaps() {
        let existing = [stop(1, "2024-06-04", "2024-06-05")];
        let errors = StopScheduleValidator::new(june_trip(), &existing).validate(
            &StopCandidate::new("Outer", at("2024-06-02"), at("2024-06-08")),
        );
        assert_eq!(errors.start_date(), Some(STOP_OVERLAPS));
    }

    #[test]
    fn whitespace_name_is_required() {
        let none: [ScheduledStop; 0] = [];
        let errors = StopScheduleValidator::new(june_trip(), &none).validate(
            &StopCandidate::new("  ", at("2024-06-02"), at("2024-06-05")),
        );
        assert_eq!(errors.name(), Some(NAME_REQUIRED));
        assert_eq!(errors.start_date(), None);
        assert_eq!(errors.end_date(), None);
        assert!(!errors.is_admissible());
    }

    #[test]
    fn inverted_dates_are_blamed_on_end() {
        let none: [ScheduledStop; 0] = [];
        let errors = StopScheduleValidator::new(june_trip(), &none).validate(
            &StopCandidate::new("Back", at("2024-06-08"), at("2024-06-03")),
        );
        assert_eq!(errors.end_date(), Some(END_BEFORE_START));
        assert_eq!(errors.start_date(), None);
    }

    #[test]
    fn inverted_time_on_one_day_counts_as_inverted() {
        let none: [ScheduledStop; 0] = [];
        let day = date("2024-06-04");
        let errors = StopScheduleValidator::new(june_trip(), &none).validate(
            &StopCandidate::new("Day trip", day.and_hms_opt(18, 0, 0), day.and_hms_opt(9, 0, 0)),
        );
        assert_eq!(errors.end_date(), Some(END_BEFORE_START));
    }

    #[test]
    fn missing_dates_skip_date_rules() {
        let existing = [stop(1, "2024-06-02", "2024-06-05")];
        let validator = StopScheduleValidator::new(june_trip(), &existing);

        let errors = validator.validate(&StopCandidate::new("Paris", None, None));
        assert_eq!(errors.start_date(), Some(START_DATE_REQUIRED));
        assert_eq!(errors.end_date(), Some(END_DATE_REQUIRED));

        // Half-filled forms never reach the bounds or overlap checks.
        let errors = validator.validate(&StopCandidate::new("Paris", at("2024-05-01"), None));
        assert_eq!(errors.start_date(), None);
        assert_eq!(errors.end_date(), Some(END_DATE_REQUIRED));

        let errors = validator.validate(&StopCandidate::new("", None, at("2024-06-04")));
        assert_eq!(errors.name(), Some(NAME_REQUIRED));
        assert_eq!(errors.start_date(), Some(START_DATE_REQUIRED));
        assert_eq!(errors.end_date(), None);
    }

    #[test]
    fn later_rules_win_the_slot() {
        // Inverted and past the trip end: the bounds rule runs later.
        let none: [ScheduledStop; 0] = [];
        let errors = StopScheduleValidator::new(june_trip(), &none).validate(
            &StopCandidate::new("Far", at("2024-06-14"), at("2024-06-12")),
        );
        assert_eq!(errors.end_date(), Some(END_OUTSIDE_TRIP));

        // Before the trip and over an existing stop: overlap runs later.
        let existing = [stop(1, "2024-05-20", "2024-06-04")];
        let errors = StopScheduleValidator::new(june_trip(), &existing).validate(
            &StopCandidate::new("Early", at("2024-05-25"), at("2024-06-03")),
        );
        assert_eq!(errors.start_date(), Some(STOP_OVERLAPS));
    }

    #[test]
    fn unknown_trip_bounds_skip_the_bounds_rule() {
        let existing = [stop(1, "2024-06-02", "2024-06-05")];
        let validator = StopScheduleValidator::new(None, &existing);
        let outside = StopCandidate::new("Anywhere", at("2023-01-01"), at("2023-01-03"));
        assert!(validator.validate(&outside).is_admissible());

        let clash = StopCandidate::new("Clash", at("2024-06-03"), at("2024-06-04"));
        assert_eq!(validator.validate(&clash).start_date(), Some(STOP_OVERLAPS));
    }

    #[test]
    fn editing_ignores_the_stop_itself() {
        let existing = [
            stop(1, "2024-06-02", "2024-06-05"),
            stop(2, "2024-06-05", "2024-06-08"),
        ];
        let moved = StopCandidate::new("Paris", at("2024-06-02"), at("2024-06-04"));

        let creating = StopScheduleValidator::new(june_trip(), &existing);
        assert_eq!(creating.validate(&moved).start_date(), Some(STOP_OVERLAPS));

        let editing = StopScheduleValidator::new(june_trip(), &existing).editing(1);
        assert!(editing.validate(&moved).is_admissible());

        let stretched = StopCandidate::new("Paris", at("2024-06-02"), at("2024-06-06"));
        assert_eq!(editing.validate(&stretched).start_date(), Some(STOP_OVERLAPS));
    }

    #[test]
    fn one_day_stop_beside_a_longer_one_depends_on_order() {
        // Adding the single day after the longer stop: it only touches.
        let existing = [stop(1, "2024-06-04", "2024-06-06")];
        let errors = StopScheduleValidator::new(june_trip(), &existing).validate(
            &StopCandidate::new("Day", at("2024-06-04"), at("2024-06-04")),
        );
        assert!(errors.is_admissible());

        // Adding the longer stop after the single day: it covers it.
        let existing = [stop(1, "2024-06-04", "2024-06-04")];
        let errors = StopScheduleValidator::new(june_trip(), &existing).validate(
            &StopCandidate::new("Long", at("2024-06-04"), at("2024-06-06")),
        );
        assert_eq!(errors.start_date(), Some(STOP_OVERLAPS));
    }

    #[test]
    fn errors_serialize_as_form_slots() {
        let none: [ScheduledStop; 0] = [];
        let errors = StopScheduleValidator::new(june_trip(), &none)
            .validate(&StopCandidate::new("", None, at("2024-06-04")));
        let json = serde_json::to_value(errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "name required",
                "startDate": "start date required",
            })
        );
    }

    #[test]
    fn into_result_matches_admissibility() {
        assert_eq!(StopFieldErrors::default().into_result(), Ok(()));
        let none: [ScheduledStop; 0] = [];
        let errors = StopScheduleValidator::new(june_trip(), &none)
            .validate(&StopCandidate::new("x", None, None));
        assert_eq!(errors.into_result(), Err(errors));
    }

    /// Requests as (offset from trip start, length in days, time noise in minutes).
    fn arb_requests() -> impl Strategy<Value = Vec<(i64, i64, i64)>> {
        prop::collection::vec((-3i64..25, 1i64..6, 0i64..1440), 0..30)
    }

    proptest! {
        #[test]
        fn admitted_stops_respect_trip_and_each_other(requests in arb_requests()) {
            let trip = DateSpan::new(date("2024-06-01"), date("2024-06-20")).unwrap();
            let mut admitted: Vec<ScheduledStop> = Vec::new();

            for (i, (offset, len, noise)) in requests.into_iter().enumerate() {
                let start = trip.start().and_hms_opt(0, 0, 0).unwrap()
                    + Duration::days(offset)
                    + Duration::minutes(noise);
                let end = start + Duration::days(len);
                let errors = StopScheduleValidator::new(Some(trip), &admitted)
                    .validate(&StopCandidate::new("stop", Some(start), Some(end)));
                if errors.is_admissible() {
                    let span = DateSpan::new(start, end).unwrap();
                    admitted.push(ScheduledStop { id: i as i64, span });
                }
            }

            for (i, a) in admitted.iter().enumerate() {
                prop_assert!(trip.contains(&a.span));
                for b in &admitted[i + 1..] {
                    let shared = (0..=a.span.nights())
                        .map(|n| a.span.start() + Duration::days(n))
                        .filter(|day| b.span.contains_day(*day))
                        .count();
                    prop_assert!(shared <= 1, "{:?} and {:?} share {} days", a, b, shared);
                }
            }
        }

        #[test]
        fn unchanged_stops_revalidate_cleanly(requests in arb_requests()) {
            let trip = DateSpan::new(date("2024-06-01"), date("2024-06-20")).unwrap();
            let mut admitted: Vec<ScheduledStop> = Vec::new();

            for (i, (offset, len, _)) in requests.into_iter().enumerate() {
                let start = trip.start() + Duration::days(offset);
                let candidate = StopCandidate::new(
                    "stop",
                    start.and_hms_opt(0, 0, 0),
                    (start + Duration::days(len)).and_hms_opt(0, 0, 0),
                );
                let validator = StopScheduleValidator::new(Some(trip), &admitted);
                if validator.validate(&candidate).is_admissible() {
                    let span = candidate.span().unwrap();
                    admitted.push(ScheduledStop { id: i as i64, span });
                }
            }

            for stop in &admitted {
                let candidate = StopCandidate::new(
                    "stop",
                    stop.span.start().and_hms_opt(0, 0, 0),
                    stop.span.end().and_hms_opt(0, 0, 0),
                );
                let errors = StopScheduleValidator::new(Some(trip), &admitted)
                    .editing(stop.id)
                    .validate(&candidate);
                prop_assert!(errors.is_admissible(), "{:?} -> {:?}", stop, errors);
            }
        }
    }
}
