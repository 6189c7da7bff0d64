use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::schedule::{DateParseError, StopFieldErrors, TripFieldErrors};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error(transparent)]
    InvalidDate(#[from] DateParseError),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid trip: {0:?}")]
    InvalidTrip(TripFieldErrors),
    #[error("invalid stop: {0:?}")]
    InvalidStop(StopFieldErrors),
    #[error("not found")]
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidTrip(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "errors": errors })))
                    .into_response()
            }
            AppError::InvalidStop(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "errors": errors })))
                    .into_response()
            }
            AppError::InvalidDate(_) | AppError::BadRequest(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": self.to_string() })),
            )
                .into_response(),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": self.to_string() })),
            )
                .into_response(),
            AppError::Config(_)
            | AppError::Io(_)
            | AppError::Database(_)
            | AppError::Migrate(_)
            | AppError::Other(_) => {
                error!("request failed: {self:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "could not save your changes" })),
                )
                    .into_response()
            }
        }
    }
}
