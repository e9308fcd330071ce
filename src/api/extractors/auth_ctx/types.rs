/*
 * Responsibility
 * - The authenticated context handlers get to see
 * - The permission guard verifies the token and stores this in request extensions
 */
use std::collections::BTreeSet;

use crate::services::auth::Claims;

/// Context attached to a request that passed the permission guard.
///
/// - `subject` is the identity provider's user id (`sub`)
/// - `permissions` is the granted set, for introspection only; the guard already decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub subject: String,
    pub permissions: BTreeSet<String>,
}

impl From<Claims> for AuthCtx {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            permissions: claims.permissions.unwrap_or_default(),
        }
    }
}
