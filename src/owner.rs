use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

pub const OWNER_HEADER: &str = "x-owner-id";

/// The owner whose trips a request works on.
///
/// This only scopes queries; whoever sits in front of the API is trusted to
/// have authenticated the caller and set the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentOwner(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentOwner
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(OWNER_HEADER)
            .ok_or_else(|| AppError::BadRequest(format!("missing {OWNER_HEADER} header")))?;
        raw.to_str()
            .ok()
            .and_then(|value| value.trim().parse().ok())
            .map(Self)
            .ok_or_else(|| AppError::BadRequest(format!("invalid {OWNER_HEADER} header")))
    }
}
