/*
 * Responsibility
 * - URL structure of the drinks API
 * - Which permission each protected route requires
 * - JSON 404 / 405 fallbacks so every error shares the same envelope
 */
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::{
    api::handlers::{
        drinks::{create_drink, delete_drink, get_drinks_detail, list_drinks, update_drink},
        health::health,
    },
    error::AppError,
    middleware::auth::require,
    services::auth::permissions::{DELETE_DRINKS, GET_DRINKS_DETAIL, PATCH_DRINKS, POST_DRINKS},
    state::AppState,
};

pub fn routes(state: &AppState) -> Router<AppState> {
    let verifier = &state.verifier;

    Router::new()
        .route("/health", get(health))
        // Same path, different guards: axum merges the method routers.
        .route("/drinks", get(list_drinks))
        .route(
            "/drinks",
            require(post(create_drink), verifier.clone(), POST_DRINKS),
        )
        .route(
            "/drinks-detail",
            require(get(get_drinks_detail), verifier.clone(), GET_DRINKS_DETAIL),
        )
        .route(
            "/drinks/{drink_id}",
            require(patch(update_drink), verifier.clone(), PATCH_DRINKS),
        )
        .route(
            "/drinks/{drink_id}",
            require(delete(delete_drink), verifier.clone(), DELETE_DRINKS),
        )
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}

async fn not_found() -> AppError {
    AppError::not_found("route")
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
