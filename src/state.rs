/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - drinks: DrinkRepo, verifier: TokenVerifier
 * - Cloned per request, so everything inside is behind Arc
 */
use std::sync::Arc;

use crate::repos::DrinkRepo;
use crate::services::auth::TokenVerifier;

#[derive(Clone)]
pub struct AppState {
    pub drinks: Arc<dyn DrinkRepo>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(drinks: Arc<dyn DrinkRepo>, verifier: Arc<TokenVerifier>) -> Self {
        Self { drinks, verifier }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}
