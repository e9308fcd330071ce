/// Factory: build the `TokenVerifier` (JWKS-backed) from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::TokenVerifier;
use crate::services::auth::keys::JwksKeyProvider;

pub fn build_token_verifier(config: &Config) -> Result<Arc<TokenVerifier>, AppError> {
    let keys = JwksKeyProvider::from_config(&config.auth).map_err(|err| {
        tracing::error!(error = %err, "failed to build JWKS client");
        AppError::Internal
    })?;

    tracing::debug!(url = %keys.url(), "JWKS key provider ready");

    Ok(Arc::new(TokenVerifier::new(&config.auth, Arc::new(keys))))
}
