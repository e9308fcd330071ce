use arc_swap::ArcSwap;
use async_trait::async_trait;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::JwkSet;

use super::{KeyProvider, KeySet, KeySetError};

/// Key provider over a key set held in memory (pinned keys, tests).
pub struct LocalKeyProvider {
    keys: ArcSwap<KeySet>,
}

impl LocalKeyProvider {
    pub fn new(keys: KeySet) -> Self {
        Self {
            keys: ArcSwap::from_pointee(keys),
        }
    }

    pub fn from_jwk_set(set: &JwkSet) -> Self {
        Self::new(KeySet::from_jwk_set(set))
    }

    /// Replaces the whole set; in-flight lookups keep the snapshot they loaded.
    #[cfg(test)]
    pub fn replace(&self, keys: KeySet) {
        self.keys.store(keys.into());
    }
}

#[async_trait]
impl KeyProvider for LocalKeyProvider {
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, KeySetError> {
        self.keys
            .load()
            .get(kid)
            .cloned()
            .ok_or_else(|| KeySetError::UnknownKeyId(kid.to_string()))
    }

    async fn refresh(&self) -> Result<usize, KeySetError> {
        Ok(self.keys.load().len())
    }
}
