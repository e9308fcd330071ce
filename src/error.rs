/*
 * Responsibility
 * - App-wide AppError
 * - IntoResponse: HTTP status + `{ success: false, error, message }` body
 * - Converts AuthError / RepoError so handlers can just use `?`
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: String,
    // Only authorization failures carry a machine-readable code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

#[derive(Debug, Error)]
pub enum AppError {
    // Passed through untouched from the verifier/enforcer.
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("bad request: {0}")]
    BadRequest(&'static str),
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("unprocessable: {0}")]
    Unprocessable(String),
    #[error("request timeout")]
    Timeout,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn unprocessable(reason: impl Into<String>) -> Self {
        Self::Unprocessable(reason.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(err) => err.status(),
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (message, code) = match &self {
            AppError::Auth(err) => (err.to_string(), Some(err.code())),
            AppError::BadRequest(_) => ("bad request".to_string(), None),
            AppError::NotFound { .. } => ("resource not found".to_string(), None),
            AppError::MethodNotAllowed => ("Method Not Allowed".to_string(), None),
            AppError::Unprocessable(reason) => {
                tracing::debug!(reason = %reason, "unprocessable request");
                ("unprocessable".to_string(), None)
            }
            AppError::Timeout => ("request timeout".to_string(), None),
            AppError::Internal => ("internal server error".to_string(), None),
        };

        let body = ErrorResponse {
            success: false,
            error: status.as_u16(),
            message,
            code,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict(field) => {
                AppError::unprocessable(format!("{field} is already taken"))
            }
            RepoError::Db(err) => {
                tracing::error!(error = %err, "database failure");
                AppError::Internal
            }
            RepoError::Corrupt(reason) => {
                tracing::error!(reason = %reason, "stored drink could not be decoded");
                AppError::Internal
            }
        }
    }
}
