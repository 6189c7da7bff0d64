//! Stop scheduling.
//!
//! Everything in here is pure: no I/O, no clock, no shared state. Callers
//! load a trip and its stops, run the validator, and only persist when the
//! result is admissible.

mod calendar;
mod normalize;
mod span;
mod trip;
mod validator;

pub use calendar::{
    categorize_trips, duration_label, format_date_range, tense_of, Dated, Tense, TripsByTense,
};
pub use normalize::{
    normalize_date, parse_form_date, parse_optional_form_date, CalendarDay, DateParseError,
};
pub use span::DateSpan;
pub use trip::{validate_trip, TripFieldErrors, TITLE_REQUIRED};
pub use validator::{
    Scheduled, ScheduledStop, StopCandidate, StopFieldErrors, StopScheduleValidator,
    END_BEFORE_START, END_DATE_REQUIRED, END_OUTSIDE_TRIP, NAME_REQUIRED, START_DATE_REQUIRED,
    START_OUTSIDE_TRIP, STOP_OVERLAPS,
};
