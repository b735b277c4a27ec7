//! # Cache Entry
//!
//! Values stored by the two cache tiers and the entry wrapper used by
//! in-process stores.

use crate::domain::entities::quote_result::QuoteResult;
use crate::domain::value_objects::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// A value held in the cache.
///
/// Per-provider entries hold a single [`QuoteResult`] (success or failure);
/// aggregate entries hold a ranked list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CachedValue {
    /// One provider outcome.
    Quote(QuoteResult),
    /// A ranked list of successful quotes.
    Ranked(Vec<QuoteResult>),
}

impl CachedValue {
    /// Returns the provider outcome, if this is a per-provider value.
    #[must_use]
    pub fn into_quote(self) -> Option<QuoteResult> {
        match self {
            Self::Quote(quote) => Some(quote),
            Self::Ranked(_) => None,
        }
    }

    /// Returns the ranked list, if this is an aggregate value.
    #[must_use]
    pub fn into_ranked(self) -> Option<Vec<QuoteResult>> {
        match self {
            Self::Ranked(quotes) => Some(quotes),
            Self::Quote(_) => None,
        }
    }
}

/// A stored value with its time-to-live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    key: String,
    value: CachedValue,
    ttl_seconds: u64,
    created_at: Timestamp,
}

impl CacheEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(key: impl Into<String>, value: CachedValue, ttl_seconds: u64) -> Self {
        Self::with_created_at(key, value, ttl_seconds, Timestamp::now())
    }

    /// Creates an entry with an explicit creation time.
    #[must_use]
    pub fn with_created_at(
        key: impl Into<String>,
        value: CachedValue,
        ttl_seconds: u64,
        created_at: Timestamp,
    ) -> Self {
        Self {
            key: key.into(),
            value,
            ttl_seconds,
            created_at,
        }
    }

    /// Returns the key.
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the stored value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &CachedValue {
        &self.value
    }

    /// Returns the time-to-live in seconds.
    #[inline]
    #[must_use]
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Returns when the entry was written.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the entry stops being served, `None` if beyond the
    /// representable range.
    #[must_use]
    pub fn expires_at(&self) -> Option<Timestamp> {
        i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(|ttl| self.created_at.checked_add_secs(ttl))
    }

    /// Returns true once the TTL has elapsed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at().is_some_and(|at| at.is_expired())
    }
}
