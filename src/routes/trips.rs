use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    models::{Stop, Trip, TripInput},
    owner::CurrentOwner,
    schedule::{
        categorize_trips, duration_label, format_date_range, parse_optional_form_date, tense_of,
        Dated, Tense,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips", get(trips_list).post(trip_create))
        .route(
            "/trips/:id",
            get(trip_detail).put(trip_update).delete(trip_delete),
        )
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TripForm {
    pub title: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub image_uri: Option<String>,
    pub notes: Option<String>,
}

impl TripForm {
    pub fn into_input(self) -> Result<TripInput, AppError> {
        Ok(TripInput {
            start: parse_optional_form_date(self.start_date.as_deref())?,
            end: parse_optional_form_date(self.end_date.as_deref())?,
            title: self.title,
            image_uri: self.image_uri,
            notes: self.notes,
        })
    }
}

#[derive(Serialize)]
struct TripView {
    #[serde(flatten)]
    trip: Trip,
    tense: Tense,
    duration: String,
    date_range: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stops: Option<Vec<Stop>>,
}

impl TripView {
    fn new(trip: Trip, today: NaiveDate, stops: Option<Vec<Stop>>) -> Self {
        let dates = trip.dates();
        Self {
            tense: tense_of(&dates, today),
            duration: duration_label(&dates),
            date_range: format_date_range(&dates),
            trip,
            stops,
        }
    }
}

#[derive(Serialize)]
struct TripsListView {
    past: Vec<TripView>,
    upcoming: Vec<TripView>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn trips_list(
    State(state): State<AppState>,
    CurrentOwner(owner_id): CurrentOwner,
) -> Result<Json<TripsListView>, AppError> {
    let trips = state.itinerary.trips().list_by_owner(owner_id).await?;
    let today = today();
    let grouped = categorize_trips(trips, today);
    let view = |trip: Trip| TripView::new(trip, today, None);
    Ok(Json(TripsListView {
        past: grouped.past.into_iter().map(view).collect(),
        upcoming: grouped.upcoming.into_iter().map(view).collect(),
    }))
}

async fn trip_create(
    State(state): State<AppState>,
    CurrentOwner(owner_id): CurrentOwner,
    Json(form): Json<TripForm>,
) -> Result<impl IntoResponse, AppError> {
    let trip = state
        .itinerary
        .create_trip(owner_id, form.into_input()?)
        .await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

async fn trip_detail(
    State(state): State<AppState>,
    CurrentOwner(owner_id): CurrentOwner,
    Path(trip_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let (trip, stops) = state.itinerary.trip_with_stops(owner_id, trip_id).await?;
    Ok(Json(TripView::new(trip, today(), Some(stops))))
}

async fn trip_update(
    State(state): State<AppState>,
    CurrentOwner(owner_id): CurrentOwner,
    Path(trip_id): Path<i64>,
    Json(form): Json<TripForm>,
) -> Result<Json<Trip>, AppError> {
    let trip = state
        .itinerary
        .update_trip(owner_id, trip_id, form.into_input()?)
        .await?;
    Ok(Json(trip))
}

async fn trip_delete(
    State(state): State<AppState>,
    CurrentOwner(owner_id): CurrentOwner,
    Path(trip_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.itinerary.remove_trip(owner_id, trip_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
