use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::CacheSettings;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// In-process TTL cache for rendered responses.
///
/// Backs the public profile listing, which is read far more often than
/// profiles change. Entries expire on their own; mutations invalidate
/// eagerly so a fresh listing shows up immediately.
pub struct ResponseCache {
    cache: moka::future::Cache<String, Vec<u8>>,
}

impl ResponseCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(
            settings.capacity.unwrap_or(1000),
            settings.ttl_secs.unwrap_or(60),
        )
    }

    /// Get a cached value, or None on a miss.
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        match self.cache.get(key).await {
            Some(bytes) => {
                tracing::trace!("Cache hit: {}", key);
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Ok(None)
            }
        }
    }

    /// Store a value under a key.
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.cache.insert(key.to_string(), bytes).await;

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Drop a single key.
    pub async fn invalidate(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for the public profile listing
    pub fn profile_listing() -> String {
        "profiles:listing".to_string()
    }

    /// Key for a single profile with images
    pub fn profile(id: i32) -> String {
        format!("profile:{id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_invalidate_roundtrip() {
        tokio_test::block_on(async {
            let cache = ResponseCache::new(10, 60);

            cache.set("k", &vec!["a".to_string()]).await.unwrap();
            let hit: Option<Vec<String>> = cache.get("k").await.unwrap();
            assert_eq!(hit, Some(vec!["a".to_string()]));

            cache.invalidate("k").await;
            let miss: Option<Vec<String>> = cache.get("k").await.unwrap();
            assert!(miss.is_none());
        });
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::profile_listing(), "profiles:listing");
        assert_eq!(CacheKey::profile(7), "profile:7");
    }
}
