use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::stop::normalize_optional;
use crate::schedule::{DateSpan, Dated};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub image_uri: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dated for Trip {
    fn dates(&self) -> DateSpan {
        DateSpan::new_unchecked(self.start_date, self.end_date)
    }
}

/// A validated trip ready to be written.
#[derive(Debug, Clone)]
pub struct TripDraft {
    pub title: String,
    pub dates: DateSpan,
    pub image_uri: Option<String>,
    pub notes: Option<String>,
}

/// What the user typed into the trip form, dates already parsed.
#[derive(Debug, Clone, Default)]
pub struct TripInput {
    pub title: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub image_uri: Option<String>,
    pub notes: Option<String>,
}

impl TripInput {
    pub fn into_draft(self, dates: DateSpan) -> TripDraft {
        TripDraft {
            title: self.title.trim().to_string(),
            dates,
            image_uri: normalize_optional(self.image_uri),
            notes: normalize_optional(self.notes),
        }
    }
}
