use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use jsonwebtoken::DecodingKey;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::Instant;
use url::Url;

use super::{KeyProvider, KeySet, KeySetError};
use crate::services::auth::AuthConfig;

/// JWKS document with its entries left undecoded; see [`KeySet::from_entries`].
#[derive(Deserialize)]
struct JwksDocument {
    keys: Vec<Value>,
}

/// Key provider backed by the identity provider's published JWKS document.
///
/// Readers load the current [`KeySet`] snapshot without locking. A refresh builds a
/// whole new snapshot and swaps it in, so a reader sees either the old set or the new
/// one. Fetches triggered by an unknown `kid` are single-flighted and rate limited.
pub struct JwksKeyProvider {
    client: Client,
    url: Url,
    snapshot: ArcSwap<KeySet>,
    min_refetch: Duration,
    // guards fetches; holds when the last one started
    last_fetch: Mutex<Option<Instant>>,
}

impl JwksKeyProvider {
    pub fn new(url: Url, fetch_timeout: Duration, min_refetch: Duration) -> Result<Self, KeySetError> {
        let client = Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|err| KeySetError::Fetch(err.to_string()))?;

        Ok(Self::with_client(client, url, min_refetch))
    }

    fn with_client(client: Client, url: Url, min_refetch: Duration) -> Self {
        Self {
            client,
            url,
            snapshot: ArcSwap::from_pointee(KeySet::default()),
            min_refetch,
            last_fetch: Mutex::new(None),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, KeySetError> {
        Self::new(
            config.jwks_url.clone(),
            config.jwks_fetch_timeout,
            config.jwks_min_refetch,
        )
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    #[cfg(test)]
    fn snapshot(&self) -> Arc<KeySet> {
        self.snapshot.load_full()
    }

    async fn fetch(&self) -> Result<KeySet, KeySetError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        if !response.status().is_success() {
            return Err(KeySetError::Fetch(format!(
                "HTTP {} from {}",
                response.status(),
                self.url
            )));
        }

        let body: JwksDocument = response.json().await.map_err(|err| {
            if err.is_timeout() {
                KeySetError::Timeout(self.url.to_string())
            } else {
                KeySetError::Decode(err.to_string())
            }
        })?;

        Ok(KeySet::from_entries(&body.keys))
    }

    fn transport_error(&self, err: reqwest::Error) -> KeySetError {
        if err.is_timeout() {
            KeySetError::Timeout(self.url.to_string())
        } else {
            KeySetError::Fetch(err.to_string())
        }
    }

    async fn fetch_and_swap(&self, last_fetch: &mut Option<Instant>) -> Result<usize, KeySetError> {
        // stamp before fetching so a failing endpoint is rate limited as well
        *last_fetch = Some(Instant::now());

        let keys = self.fetch().await?;
        if keys.is_empty() {
            // keep serving the previous snapshot
            return Err(KeySetError::NoUsableKeys(self.url.to_string()));
        }
        let count = keys.len();
        self.snapshot.store(Arc::new(keys));
        tracing::info!(url = %self.url, count, "loaded JWKS");
        Ok(count)
    }
}

#[async_trait]
impl KeyProvider for JwksKeyProvider {
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, KeySetError> {
        if let Some(key) = self.snapshot.load().get(kid) {
            return Ok(key.clone());
        }

        let mut last_fetch = self.last_fetch.lock().await;

        // someone else may have refreshed while we waited for the lock
        if let Some(key) = self.snapshot.load().get(kid) {
            return Ok(key.clone());
        }

        if let Some(at) = *last_fetch
            && at.elapsed() < self.min_refetch
        {
            tracing::debug!(kid, "unknown kid; JWKS refetch suppressed");
            return Err(KeySetError::UnknownKeyId(kid.to_string()));
        }

        tracing::debug!(kid, "unknown kid; refetching JWKS");
        self.fetch_and_swap(&mut last_fetch).await?;

        self.snapshot
            .load()
            .get(kid)
            .cloned()
            .ok_or_else(|| KeySetError::UnknownKeyId(kid.to_string()))
    }

    async fn refresh(&self) -> Result<usize, KeySetError> {
        let mut last_fetch = self.last_fetch.lock().await;
        self.fetch_and_swap(&mut last_fetch).await
    }
}
