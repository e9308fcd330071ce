/*
 * Responsibility
 * - Take the `{drink_id}` path segment and parse it into the internal i64 id
 * - Anything that is not a positive integer is a 400, not a 404
 */
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrinkId(pub i64);

fn parse_drink_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(AppError::BadRequest("invalid drink id"))
}

impl<S> FromRequestParts<S> for DrinkId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest("invalid drink id"))?;

        parse_drink_id(&raw).map(Self)
    }
}
