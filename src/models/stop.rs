use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::schedule::{DateSpan, Scheduled, StopCandidate};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Stop {
    pub id: i64,
    pub trip_id: i64,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
    pub image_uri: Option<String>,
    pub notes: Option<String>,
    pub order_index: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Scheduled for Stop {
    fn stop_id(&self) -> i64 {
        self.id
    }

    fn span(&self) -> DateSpan {
        DateSpan::new_unchecked(self.start_date, self.end_date)
    }
}

/// A validated stop ready to be written.
#[derive(Debug, Clone)]
pub struct StopDraft {
    pub name: String,
    pub dates: DateSpan,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    pub image_uri: Option<String>,
    pub notes: Option<String>,
}

/// What the user typed into the stop form, dates already parsed.
#[derive(Debug, Clone, Default)]
pub struct StopInput {
    pub name: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    pub image_uri: Option<String>,
    pub notes: Option<String>,
}

impl StopInput {
    pub fn candidate(&self) -> StopCandidate<'_> {
        StopCandidate::new(&self.name, self.start, self.end)
    }

    /// Turns admissible input into a draft. `dates` is the span the
    /// validator accepted.
    pub fn into_draft(self, dates: DateSpan) -> StopDraft {
        StopDraft {
            name: self.name.trim().to_string(),
            dates,
            latitude: self.latitude,
            longitude: self.longitude,
            description: normalize_optional(self.description),
            image_uri: normalize_optional(self.image_uri),
            notes: normalize_optional(self.notes),
        }
    }
}

pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
