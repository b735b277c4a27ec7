//! # Cache Stores
//!
//! - [`InMemoryCacheStore`] - process-local, `DashMap` based
//! - [`RedisCacheStore`] - shared, expiry delegated to Redis

pub mod in_memory;
pub mod redis_store;
pub mod traits;

pub use crate::domain::entities::{CacheEntry, CachedValue};
pub use in_memory::{CacheStats, InMemoryCacheStore};
pub use redis_store::RedisCacheStore;
pub use traits::{CacheError, CacheResult, CacheStore};
