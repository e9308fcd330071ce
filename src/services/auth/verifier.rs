use std::fmt;
use std::sync::Arc;

use axum::http::HeaderMap;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, Validation, decode, decode_header};
use serde::Deserialize;

use crate::services::auth::bearer::bearer_token;
use crate::services::auth::claims::Claims;
use crate::services::auth::config::AuthConfig;
use crate::services::auth::error::{AuthError, AuthResult};
use crate::services::auth::keys::KeyProvider;

/// Verifies Auth0-issued access tokens against the identity provider's signing keys.
#[derive(Clone)]
pub struct TokenVerifier {
    keys: Arc<dyn KeyProvider>,
    validation: Validation,
    leeway_seconds: i64,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig, keys: Arc<dyn KeyProvider>) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = config.algorithms.clone();
        validation.set_issuer(&[config.issuer()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = config.leeway_seconds;

        Self {
            keys,
            validation,
            leeway_seconds: i64::try_from(config.leeway_seconds).unwrap_or(i64::MAX),
        }
    }

    pub fn key_provider(&self) -> Arc<dyn KeyProvider> {
        self.keys.clone()
    }

    /// Reads the bearer token from `headers` and verifies it.
    pub async fn verify(&self, headers: &HeaderMap) -> AuthResult<Claims> {
        let token = bearer_token(headers)?;
        self.verify_token(token).await
    }

    pub async fn verify_token(&self, token: &str) -> AuthResult<Claims> {
        let header = decode_header(token).map_err(|err| {
            tracing::debug!(error = %err, "undecodable token header");
            AuthError::unparsable_token()
        })?;

        let kid = header.kid.ok_or_else(AuthError::missing_key_id)?;

        let key = self.keys.decoding_key(&kid).await.map_err(|err| {
            tracing::warn!(kid = %kid, error = %err, "signing key lookup failed");
            AuthError::key_not_found()
        })?;

        let claims = match decode::<Claims>(token, &key, &self.validation) {
            Ok(data) => data.claims,
            Err(err) => {
                let classified = self.classify(token, err.kind());
                tracing::debug!(kid = %kid, error = %err, code = classified.code(), "token failed validation");
                return Err(classified);
            }
        };

        // exp is exclusive: a token is dead at its expiry second
        if is_expired(claims.exp, self.leeway_seconds) {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }

    fn classify(&self, token: &str, kind: &ErrorKind) -> AuthError {
        match kind {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::incorrect_claims(),
            ErrorKind::MissingRequiredClaim(claim) if matches!(claim.as_str(), "aud" | "iss") => {
                AuthError::incorrect_claims()
            }
            // Expiry is reported ahead of a bad signature.
            ErrorKind::InvalidSignature
                if unverified_exp(token).is_some_and(|exp| is_expired(exp, self.leeway_seconds)) =>
            {
                AuthError::TokenExpired
            }
            _ => AuthError::verification_failed(),
        }
    }
}

fn is_expired(exp: i64, leeway_seconds: i64) -> bool {
    Utc::now().timestamp() >= exp.saturating_add(leeway_seconds)
}

#[derive(Deserialize)]
struct ExpiryOnly {
    exp: i64,
}

/// Reads `exp` from the payload segment without checking the signature.
fn unverified_exp(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice::<ExpiryOnly>(&bytes)
        .ok()
        .map(|claims| claims.exp)
}
