//! Trip form rules.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::span::DateSpan;
use super::validator::{END_BEFORE_START, END_DATE_REQUIRED, START_DATE_REQUIRED};

pub const TITLE_REQUIRED: &str = "title required";

/// Per-field outcome of validating a trip form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripFieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_date: Option<&'static str>,
}

impl TripFieldErrors {
    pub fn title(&self) -> Option<&'static str> {
        self.title
    }

    pub fn start_date(&self) -> Option<&'static str> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<&'static str> {
        self.end_date
    }

    pub fn is_admissible(&self) -> bool {
        self.title.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }
}

/// Checks a trip form and, when it passes, returns the trip's calendar span.
///
/// This is where the `start_date <= end_date` invariant of a trip is
/// enforced; the stop validator assumes it.
pub fn validate_trip(
    title: &str,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Result<DateSpan, TripFieldErrors> {
    let inverted = matches!((start, end), (Some(start), Some(end)) if start > end);

    let errors = TripFieldErrors {
        title: title.trim().is_empty().then_some(TITLE_REQUIRED),
        start_date: start.is_none().then_some(START_DATE_REQUIRED),
        end_date: if inverted {
            Some(END_BEFORE_START)
        } else {
            end.is_none().then_some(END_DATE_REQUIRED)
        },
    };

    match (errors.is_admissible(), start.zip(end).and_then(|(s, e)| DateSpan::new(s, e))) {
        (true, Some(span)) => Ok(span),
        _ => Err(errors),
    }
}
