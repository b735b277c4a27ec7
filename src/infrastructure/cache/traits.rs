//! # Cache Store Trait
//!
//! Port definition for the key/value store backing both cache tiers.
//!
//! Callers in the application layer never propagate a [`CacheError`]:
//! a failing store degrades to live provider calls.
//!
//! # Examples
//!
//! ```ignore
//! use remit_quotes::infrastructure::cache::traits::CacheStore;
//!
//! async fn warm(store: &impl CacheStore, value: &CachedValue) {
//!     if let Err(e) = store.set("quote:WISE:US:IN:USD:INR:1000.00", value, 60).await {
//!         tracing::warn!(error = %e, "cache write failed");
//!     }
//! }
//! ```

use crate::domain::entities::CachedValue;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for cache operations.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The backend could not be reached.
    #[error("Cache connection error: {0}")]
    Connection(String),

    /// A value could not be encoded or decoded.
    #[error("Cache serialization error: {0}")]
    Serialization(String),

    /// The backend rejected the command.
    #[error("Cache backend error: {0}")]
    Backend(String),
}

impl CacheError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Creates a backend error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key/value store with per-entry TTL.
///
/// Implementations must tolerate concurrent reads and writes from many
/// dispatch tasks. Writes are last-writer-wins.
#[async_trait]
pub trait CacheStore: Send + Sync + fmt::Debug {
    /// Reads a value. Expired entries are reported as absent.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the backend fails or the value cannot be decoded.
    async fn get(&self, key: &str) -> CacheResult<Option<CachedValue>>;

    /// Writes a value that expires after `ttl_seconds`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the backend fails or the value cannot be encoded.
    async fn set(&self, key: &str, value: &CachedValue, ttl_seconds: u64) -> CacheResult<()>;
}
