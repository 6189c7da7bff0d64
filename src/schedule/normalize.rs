//! Calendar-day normalization.
//!
//! Form inputs arrive as date-times carrying whatever time of day the picker
//! happened to stamp on them. Scheduling only cares about the calendar day,
//! so every comparison goes through these helpers first.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Formats accepted for naive (offset-free) form values, tried in order.
const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Anything that sits on a calendar day.
///
/// Zoned values report the day in their own zone. No conversion to UTC
/// happens, so a late-evening local timestamp stays on its local day.
pub trait CalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

/// Strips the time of day, keeping the calendar day as-is.
///
/// ```
/// use chrono::NaiveDate;
/// use tripflow::schedule::normalize_date;
///
/// let noisy = NaiveDate::from_ymd_opt(2024, 6, 2)
///     .unwrap()
///     .and_hms_milli_opt(17, 45, 12, 250)
///     .unwrap();
/// let day = normalize_date(noisy);
/// assert_eq!(day.to_string(), "2024-06-02 00:00:00");
/// assert_eq!(normalize_date(day), day);
/// ```
pub fn normalize_date(value: NaiveDateTime) -> NaiveDateTime {
    value.date().and_time(NaiveTime::MIN)
}

/// Error returned when a form date cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date {input:?}: expected YYYY-MM-DD or an ISO 8601 date-time")]
pub struct DateParseError {
    input: String,
}

/// Reads a raw form date.
///
/// Blank input is an unset field, not an error. Offsets on RFC 3339 values
/// are dropped and the wall-clock reading is kept.
pub fn parse_form_date(raw: &str) -> Result<Option<NaiveDateTime>, DateParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(zoned) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(zoned.naive_local()));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Some(value));
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|day| Some(day.and_time(NaiveTime::MIN)))
        .map_err(|_| DateParseError {
            input: trimmed.to_string(),
        })
}

/// Like [`parse_form_date`] for fields that may be absent entirely.
pub fn parse_optional_form_date(
    raw: Option<&str>,
) -> Result<Option<NaiveDateTime>, DateParseError> {
    match raw {
        Some(raw) => parse_form_date(raw),
        None => Ok(None),
    }
}
