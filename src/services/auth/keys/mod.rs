//! Signing-key lookup for access-token verification.
//!
//! The verifier only sees [`KeyProvider`]; where keys come from (the identity
//! provider's JWKS endpoint, a fixed set for tests) is decided when the app is wired.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub mod jwks;
pub mod local;

pub use jwks::JwksKeyProvider;
pub use local::LocalKeyProvider;

#[derive(Debug, Error)]
pub enum KeySetError {
    #[error("no signing key registered for kid '{0}'")]
    UnknownKeyId(String),
    #[error("failed to fetch JWKS: {0}")]
    Fetch(String),
    #[error("timed out fetching JWKS from {0}")]
    Timeout(String),
    #[error("failed to parse JWKS response: {0}")]
    Decode(String),
    #[error("JWKS from {0} has no usable keys")]
    NoUsableKeys(String),
}

#[async_trait]
pub trait KeyProvider: Send + Sync {
    /// Returns the verification key published under `kid`.
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, KeySetError>;

    /// Reloads the key set from its source. Returns the number of usable keys.
    async fn refresh(&self) -> Result<usize, KeySetError>;
}

/// Immutable snapshot of usable verification keys, indexed by `kid`.
#[derive(Clone, Default)]
pub struct KeySet {
    keys: HashMap<String, DecodingKey>,
}

impl KeySet {
    /// Keeps every entry that has a `kid` and converts into a decoding key; the rest are
    /// skipped with a warning so one odd entry cannot take the whole set down.
    pub fn from_jwk_set(set: &JwkSet) -> Self {
        let mut keys = HashMap::with_capacity(set.keys.len());
        for jwk in &set.keys {
            insert_jwk(&mut keys, jwk);
        }

        Self { keys }
    }

    /// Same as [`KeySet::from_jwk_set`], but over raw JWKS entries: an entry whose
    /// key type or parameters are not understood is skipped instead of failing the set.
    pub fn from_entries(entries: &[Value]) -> Self {
        let mut keys = HashMap::with_capacity(entries.len());

        for entry in entries {
            match Jwk::deserialize(entry) {
                Ok(jwk) => insert_jwk(&mut keys, &jwk),
                Err(err) => {
                    let kid = entry.get("kid").and_then(Value::as_str).unwrap_or("-");
                    tracing::warn!(kid, error = %err, "skipping unrecognised JWKS entry");
                }
            }
        }

        Self { keys }
    }

    pub fn get(&self, kid: &str) -> Option<&DecodingKey> {
        self.keys.get(kid)
    }

    #[cfg(test)]
    pub fn contains(&self, kid: &str) -> bool {
        self.keys.contains_key(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn insert_jwk(keys: &mut HashMap<String, DecodingKey>, jwk: &Jwk) {
    let Some(kid) = jwk.common.key_id.clone() else {
        tracing::warn!("skipping JWKS entry without kid");
        return;
    };

    match DecodingKey::from_jwk(jwk) {
        Ok(key) => {
            keys.insert(kid, key);
        }
        Err(err) => {
            tracing::warn!(kid = %kid, error = %err, "skipping unusable JWKS entry");
        }
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // key ids only, never key material
        let mut kids: Vec<&str> = self.keys.keys().map(String::as_str).collect();
        kids.sort_unstable();
        f.debug_struct("KeySet").field("kids", &kids).finish()
    }
}

/// Refreshes `provider` every `period` until the returned task is aborted.
pub fn spawn_periodic_refresh(provider: Arc<dyn KeyProvider>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick fires immediately; startup already loaded the keys
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match provider.refresh().await {
                Ok(count) => tracing::debug!(count, "scheduled JWKS refresh"),
                Err(err) => tracing::warn!(error = %err, "scheduled JWKS refresh failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::test_support;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn key_set_indexes_by_kid() {
        let set = KeySet::from_jwk_set(&test_support::jwk_set());
        assert_eq!(set.len(), 1);
        assert!(set.contains(test_support::KID));
        assert!(set.get("other").is_none());
        assert!(format!("{set:?}").contains(test_support::KID));
    }

    #[test]
    fn entries_without_kid_are_skipped() {
        let mut jwks: serde_json::Value =
            serde_json::from_str(test_support::JWKS_JSON).expect("fixture");
        jwks["keys"][0]
            .as_object_mut()
            .expect("object")
            .remove("kid");
        let set: JwkSet = serde_json::from_value(jwks).expect("jwks");

        assert!(KeySet::from_jwk_set(&set).is_empty());
    }

    #[test]
    fn unrecognised_entries_do_not_hide_valid_keys() {
        let mut jwks: serde_json::Value =
            serde_json::from_str(test_support::JWKS_JSON).expect("fixture");
        let entries = jwks["keys"].as_array_mut().expect("keys");
        entries.insert(
            0,
            serde_json::json!({"kty": "AKP", "kid": "pq-key", "alg": "ML-DSA-65", "pub": "AAAA"}),
        );
        entries.push(serde_json::json!({"kty": "RSA", "kid": "broken", "n": 42}));

        let set = KeySet::from_entries(entries);

        assert_eq!(set.len(), 1);
        assert!(set.contains(test_support::KID));
        assert!(!set.contains("pq-key"));
    }

    struct CountingProvider {
        refreshes: AtomicUsize,
    }

    #[async_trait]
    impl KeyProvider for CountingProvider {
        async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, KeySetError> {
            Err(KeySetError::UnknownKeyId(kid.to_string()))
        }

        async fn refresh(&self) -> Result<usize, KeySetError> {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_refresh_skips_the_immediate_tick() {
        let provider = Arc::new(CountingProvider {
            refreshes: AtomicUsize::new(0),
        });
        let handle = spawn_periodic_refresh(provider.clone(), Duration::from_secs(60));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(provider.refreshes.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(provider.refreshes.load(Ordering::SeqCst), 2);

        handle.abort();
    }
}
