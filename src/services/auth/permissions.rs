use crate::services::auth::claims::Claims;
use crate::services::auth::error::{AuthError, AuthResult};

pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
pub const POST_DRINKS: &str = "post:drinks";
pub const PATCH_DRINKS: &str = "patch:drinks";
pub const DELETE_DRINKS: &str = "delete:drinks";

/// Allows the request only when `claims` grants `required`.
///
/// Pure: no I/O, same answer for the same inputs.
pub fn check_permission(claims: &Claims, required: &str) -> AuthResult<()> {
    if claims.permissions.is_none() {
        return Err(AuthError::missing_permissions());
    }

    if claims.has_permission(required) {
        Ok(())
    } else {
        Err(AuthError::Unauthorized)
    }
}
