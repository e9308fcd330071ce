//! Unit-test helpers: the shared token fixtures plus ready-made verifier wiring.
use std::sync::Arc;

use jsonwebtoken::jwk::JwkSet;

use super::claims::{Audience, Claims};
use super::config::AuthConfig;
use super::keys::LocalKeyProvider;
use super::verifier::TokenVerifier;

#[path = "../../../tests/common/tokens.rs"]
mod tokens;

pub use tokens::*;

pub fn auth_config() -> AuthConfig {
    AuthConfig::new(DOMAIN, AUDIENCE).expect("auth config")
}

pub fn jwk_set() -> JwkSet {
    serde_json::from_str(JWKS_JSON).expect("jwks fixture")
}

pub fn rogue_jwk_set() -> JwkSet {
    serde_json::from_str(ROGUE_JWKS_JSON).expect("rogue jwks fixture")
}

pub fn verifier() -> TokenVerifier {
    TokenVerifier::new(
        &auth_config(),
        Arc::new(LocalKeyProvider::from_jwk_set(&jwk_set())),
    )
}
