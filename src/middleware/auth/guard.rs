//! Per-route permission guard.
//!
//! Every protected route runs the same pipeline before its handler:
//! bearer header -> token verification -> permission check.
//! On success the verified identity lands in request extensions as `AuthCtx`,
//! which handlers pick up through `AuthCtxExtractor`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{TokenVerifier, check_permission};
use crate::state::AppState;

#[derive(Clone)]
pub struct PermissionGuard {
    verifier: Arc<TokenVerifier>,
    permission: &'static str,
}

impl PermissionGuard {
    pub fn new(verifier: Arc<TokenVerifier>, permission: &'static str) -> Self {
        Self {
            verifier,
            permission,
        }
    }
}

/// Wrap `method_router` so its handlers only run for callers holding `permission`.
///
/// `route_layer` keeps the guard off the 405 fallback: an unsupported method
/// answers 405 without asking for a token first.
pub fn require(
    method_router: MethodRouter<AppState>,
    verifier: Arc<TokenVerifier>,
    permission: &'static str,
) -> MethodRouter<AppState> {
    let guard = PermissionGuard::new(verifier, permission);
    method_router.route_layer(middleware::from_fn_with_state(guard, permission_middleware))
}

async fn permission_middleware(
    State(guard): State<PermissionGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = match guard.verifier.verify(req.headers()).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                error = %err,
                code = err.code(),
                method = %req.method(),
                path = %req.uri().path(),
                "access token rejected"
            );
            return Err(err.into());
        }
    };

    if let Err(err) = check_permission(&claims, guard.permission) {
        tracing::warn!(
            error = %err,
            subject = %claims.sub,
            required = guard.permission,
            "permission check failed"
        );
        return Err(err.into());
    }

    tracing::debug!(
        subject = %claims.sub,
        permission = guard.permission,
        expires_at = ?claims.expires_at(),
        "access granted"
    );
    req.extensions_mut().insert(AuthCtx::from(claims));

    Ok(next.run(req).await)
}
