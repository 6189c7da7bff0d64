//! Inclusive calendar-day ranges.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::normalize::CalendarDay;

/// An inclusive range of calendar days `[start, end]`.
///
/// # Invariants
/// `start` is always less than or equal to `end`. A one-day span has
/// `start == end`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateSpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateSpan {
    /// Creates a span if `start <= end`, after reducing both ends to their
    /// calendar day.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use tripflow::schedule::DateSpan;
    ///
    /// let june = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
    /// assert!(DateSpan::new(june(1), june(10)).is_some());
    /// assert!(DateSpan::new(june(10), june(1)).is_none());
    /// ```
    pub fn new(start: impl CalendarDay, end: impl CalendarDay) -> Option<Self> {
        let start = start.calendar_day();
        let end = end.calendar_day();
        (start <= end).then_some(Self { start, end })
    }

    /// Creates a span without checking the ordering in release builds.
    pub fn new_unchecked(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start <= end, "DateSpan: start must not be after end");
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns `true` if `day` falls inside the span, ends included.
    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Returns `true` if `other` lies entirely within this span.
    pub fn contains(&self, other: &DateSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns `true` if `self` and `other` share more than a boundary day.
    ///
    /// A span overlaps `other` when its start or its end falls strictly
    /// inside `other`, or when it covers `other` completely. Back-to-back
    /// spans (`self.end == other.start` or `self.start == other.end`) do not
    /// overlap. Coverage uses `<=`/`>=`, so identical spans always overlap.
    ///
    /// The check is not symmetric for one-day spans on a boundary: a one-day
    /// `self` on `other`'s first day passes, while a longer `self` starting
    /// on a one-day `other` covers it.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use tripflow::schedule::DateSpan;
    ///
    /// let june = |a, b| {
    ///     DateSpan::new(
    ///         NaiveDate::from_ymd_opt(2024, 6, a).unwrap(),
    ///         NaiveDate::from_ymd_opt(2024, 6, b).unwrap(),
    ///     )
    ///     .unwrap()
    /// };
    /// assert!(june(4, 7).overlaps(&june(2, 5)));
    /// assert!(!june(5, 8).overlaps(&june(2, 5)));
    /// assert!(june(2, 5).overlaps(&june(2, 5)));
    /// ```
    pub fn overlaps(&self, other: &DateSpan) -> bool {
        days_overlap(self.start, self.end, other)
    }

    /// Number of days between the two ends; zero for a one-day span.
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// The overlap rule on a raw pair of days, which may be out of order.
pub(crate) fn days_overlap(start: NaiveDate, end: NaiveDate, other: &DateSpan) -> bool {
    let strictly_inside = |day: NaiveDate| other.start < day && day < other.end;
    strictly_inside(start)
        || strictly_inside(end)
        || (start <= other.start && end >= other.end)
}

impl fmt::Debug for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DateSpan({} ..= {})", self.start, self.end)
    }
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
