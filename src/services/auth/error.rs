//! Authorization failures raised by the token verifier and the permission enforcer.
//!
//! Every variant is terminal for the request: it carries the HTTP status and the
//! machine-readable `code` that `AppError` renders at the boundary.
use axum::http::StatusCode;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Missing or malformed bearer token, or no usable signing key.
    #[error("{description}")]
    InvalidHeader {
        status: StatusCode,
        description: &'static str,
    },
    #[error("Token expired")]
    TokenExpired,
    /// Audience/issuer mismatch, or the token carries no permission set.
    #[error("{description}")]
    InvalidClaims {
        status: StatusCode,
        description: &'static str,
    },
    /// Token is valid but does not grant the route's permission.
    #[error("Permission not found.")]
    Unauthorized,
}

impl AuthError {
    pub fn missing_header() -> Self {
        Self::InvalidHeader {
            status: StatusCode::UNAUTHORIZED,
            description: "Authorization header is expected",
        }
    }

    pub fn not_bearer() -> Self {
        Self::InvalidHeader {
            status: StatusCode::UNAUTHORIZED,
            description: "Authorization header must be bearer token",
        }
    }

    pub fn unparsable_token() -> Self {
        Self::InvalidHeader {
            status: StatusCode::UNAUTHORIZED,
            description: "Unable to parse authentication token",
        }
    }

    pub fn missing_key_id() -> Self {
        Self::InvalidHeader {
            status: StatusCode::UNAUTHORIZED,
            description: "Authorization malformed.",
        }
    }

    pub fn key_not_found() -> Self {
        Self::InvalidHeader {
            status: StatusCode::BAD_REQUEST,
            description: "Unable to find the appropriate key",
        }
    }

    pub fn verification_failed() -> Self {
        Self::InvalidHeader {
            status: StatusCode::BAD_REQUEST,
            description: "Unable to parse authentication token",
        }
    }

    pub fn incorrect_claims() -> Self {
        Self::InvalidClaims {
            status: StatusCode::UNAUTHORIZED,
            description: "Incorrect claims. Please, check the audience and issuer.",
        }
    }

    pub fn missing_permissions() -> Self {
        Self::InvalidClaims {
            status: StatusCode::BAD_REQUEST,
            description: "Permissions not included in JWT.",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidHeader { status, .. } | Self::InvalidClaims { status, .. } => *status,
            Self::TokenExpired => StatusCode::UNAUTHORIZED,
            Self::Unauthorized => StatusCode::FORBIDDEN,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidHeader { .. } => "invalid_header",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims { .. } => "invalid_claims",
            Self::Unauthorized => "unauthorized",
        }
    }
}
