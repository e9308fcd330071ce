use axum::http::{HeaderMap, header::AUTHORIZATION};

use crate::services::auth::error::{AuthError, AuthResult};

/// Pulls the raw token out of `Authorization: Bearer <token>`.
///
/// The header must hold exactly two whitespace-separated parts and the scheme is
/// compared case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(AuthError::missing_header)?;

    let raw = value.to_str().map_err(|_| AuthError::not_bearer())?;

    let mut parts = raw.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::not_bearer()),
    }
}
