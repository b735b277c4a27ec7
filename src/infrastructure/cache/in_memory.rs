//! # In-Memory Cache Store
//!
//! [`CacheStore`] backed by a `DashMap`, used as the default backend and as
//! the test double for call-count assertions.

use crate::domain::entities::{CacheEntry, CachedValue};
use crate::infrastructure::cache::traits::{CacheResult, CacheStore};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of store activity counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of `get` calls.
    pub reads: u64,
    /// Number of `get` calls that returned a live entry.
    pub hits: u64,
    /// Number of `set` calls.
    pub writes: u64,
}

#[derive(Debug, Default)]
struct Counters {
    reads: AtomicU64,
    hits: AtomicU64,
    writes: AtomicU64,
}

/// In-memory implementation of [`CacheStore`].
///
/// Entries expire passively: an expired entry is dropped when it is next
/// read, or in bulk by [`InMemoryCacheStore::purge_expired`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryCacheStore {
    entries: Arc<DashMap<String, CacheEntry>>,
    counters: Arc<Counters>,
}

impl InMemoryCacheStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the raw entry for a key, expired or not.
    #[must_use]
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before.saturating_sub(self.entries.len())
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Returns the activity counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            reads: self.counters.reads.load(Ordering::Relaxed),
            hits: self.counters.hits.load(Ordering::Relaxed),
            writes: self.counters.writes.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> CacheResult<Option<CachedValue>> {
        self.counters.reads.fetch_add(1, Ordering::Relaxed);

        // The read guard must be released before `remove_if` takes the shard lock.
        let found = self
            .entries
            .get(key)
            .map(|entry| (entry.is_expired(), entry.value().value().clone()));

        match found {
            Some((false, value)) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(value))
            }
            Some((true, _)) => {
                self.entries.remove_if(key, |_, entry| entry.is_expired());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &CachedValue, ttl_seconds: u64) -> CacheResult<()> {
        self.counters.writes.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(
            key.to_string(),
            CacheEntry::new(key, value.clone(), ttl_seconds),
        );
        Ok(())
    }
}
