//! # Redis Cache Store
//!
//! [`CacheStore`] backed by Redis. Values are stored as JSON with `SET EX`,
//! so expiry is handled by Redis itself.

use crate::domain::entities::CachedValue;
use crate::infrastructure::cache::traits::{CacheError, CacheResult, CacheStore};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::fmt;

/// Redis implementation of [`CacheStore`].
#[derive(Clone)]
pub struct RedisCacheStore {
    connection: ConnectionManager,
    key_prefix: String,
}

impl RedisCacheStore {
    /// Connects to `url` and namespaces every key under `key_prefix`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if the URL is invalid or the server
    /// cannot be reached.
    pub async fn connect(url: &str, key_prefix: impl Into<String>) -> CacheResult<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| CacheError::connection(format!("invalid redis url: {e}")))?;
        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::connection(e.to_string()))?;

        Ok(Self {
            connection,
            key_prefix: key_prefix.into(),
        })
    }

    /// Returns the key prefix.
    #[inline]
    #[must_use]
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    fn redis_key(&self, key: &str) -> String {
        namespaced(&self.key_prefix, key)
    }
}

fn namespaced(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}:{key}")
    }
}

impl fmt::Debug for RedisCacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCacheStore")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> CacheResult<Option<CachedValue>> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection
            .get(self.redis_key(key))
            .await
            .map_err(|e| CacheError::backend(e.to_string()))?;

        raw.map(|json| serde_json::from_str(&json).map_err(CacheError::from))
            .transpose()
    }

    async fn set(&self, key: &str, value: &CachedValue, ttl_seconds: u64) -> CacheResult<()> {
        let json = serde_json::to_string(value)?;
        let mut connection = self.connection.clone();
        connection
            .set_ex::<_, _, ()>(self.redis_key(key), json, ttl_seconds.max(1))
            .await
            .map_err(|e| CacheError::backend(e.to_string()))
    }
}
