use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    models::{Stop, StopInput},
    owner::CurrentOwner,
    schedule::{parse_optional_form_date, StopFieldErrors},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips/:id/stops", get(stops_list).post(stop_create))
        .route("/trips/:id/stops/check", post(stop_check))
        .route("/stops/:id", put(stop_update).delete(stop_delete))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StopForm {
    pub name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    pub image_uri: Option<String>,
    pub notes: Option<String>,
}

impl StopForm {
    pub fn into_input(self) -> Result<StopInput, AppError> {
        Ok(StopInput {
            start: parse_optional_form_date(self.start_date.as_deref())?,
            end: parse_optional_form_date(self.end_date.as_deref())?,
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            description: self.description,
            image_uri: self.image_uri,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct CheckQuery {
    editing: Option<i64>,
}

#[derive(Serialize)]
struct CheckView {
    admissible: bool,
    errors: StopFieldErrors,
}

async fn stops_list(
    State(state): State<AppState>,
    CurrentOwner(owner_id): CurrentOwner,
    Path(trip_id): Path<i64>,
) -> Result<Json<Vec<Stop>>, AppError> {
    let (_, stops) = state.itinerary.trip_with_stops(owner_id, trip_id).await?;
    Ok(Json(stops))
}

async fn stop_create(
    State(state): State<AppState>,
    CurrentOwner(owner_id): CurrentOwner,
    Path(trip_id): Path<i64>,
    Json(form): Json<StopForm>,
) -> Result<impl IntoResponse, AppError> {
    let stop = state
        .itinerary
        .add_stop(owner_id, trip_id, form.into_input()?)
        .await?;
    Ok((StatusCode::CREATED, Json(stop)))
}

async fn stop_check(
    State(state): State<AppState>,
    CurrentOwner(owner_id): CurrentOwner,
    Path(trip_id): Path<i64>,
    Query(query): Query<CheckQuery>,
    Json(form): Json<StopForm>,
) -> Result<Json<CheckView>, AppError> {
    let input = form.into_input()?;
    let errors = state
        .itinerary
        .check_stop(owner_id, trip_id, &input, query.editing)
        .await?;
    Ok(Json(CheckView {
        admissible: errors.is_admissible(),
        errors,
    }))
}

async fn stop_update(
    State(state): State<AppState>,
    CurrentOwner(owner_id): CurrentOwner,
    Path(stop_id): Path<i64>,
    Json(form): Json<StopForm>,
) -> Result<Json<Stop>, AppError> {
    let stop = state
        .itinerary
        .edit_stop(owner_id, stop_id, form.into_input()?)
        .await?;
    Ok(Json(stop))
}

async fn stop_delete(
    State(state): State<AppState>,
    CurrentOwner(owner_id): CurrentOwner,
    Path(stop_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.itinerary.remove_stop(owner_id, stop_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
