//! # Aggregate Cache
//!
//! One cached, ranked answer per distinct aggregate request, layered over
//! [`AggregatorEngine`].
//!
//! A hit returns the stored list without contacting any provider. A miss
//! dispatches with per-provider caching disabled, ranks by `best_rate` and
//! stores the list only when at least one provider succeeded. Caller
//! filters are not part of the key and are not applied here.

use crate::application::error::ApplicationResult;
use crate::application::services::aggregator::AggregatorEngine;
use crate::application::services::cache_policy::{AggregateKey, jittered_ttl};
use crate::domain::entities::{CachedValue, QuoteRequest, QuoteResult};
use crate::domain::value_objects::SortPolicy;
use crate::infrastructure::cache::CacheStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default TTL for aggregate entries (1h).
pub const DEFAULT_AGGREGATE_TTL_SECS: u64 = 3_600;

/// Default jitter bound for aggregate entries.
pub const DEFAULT_AGGREGATE_JITTER_SECS: u64 = 60;

/// TTL defaults for aggregate entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCacheConfig {
    /// TTL used when the caller passes none.
    pub default_ttl_secs: u64,
    /// Jitter bound applied to every aggregate TTL.
    pub jitter_secs: u64,
}

impl Default for AggregateCacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: DEFAULT_AGGREGATE_TTL_SECS,
            jitter_secs: DEFAULT_AGGREGATE_JITTER_SECS,
        }
    }
}

/// Coarse cache in front of the aggregator engine.
#[derive(Debug, Clone)]
pub struct AggregateQuoteCache {
    engine: AggregatorEngine,
    cache: Arc<dyn CacheStore>,
    config: AggregateCacheConfig,
}

impl AggregateQuoteCache {
    /// Creates the wrapper.
    #[must_use]
    pub fn new(
        engine: AggregatorEngine,
        cache: Arc<dyn CacheStore>,
        config: AggregateCacheConfig,
    ) -> Self {
        Self {
            engine,
            cache,
            config,
        }
    }

    /// Returns the wrapped engine.
    #[must_use]
    pub fn engine(&self) -> &AggregatorEngine {
        &self.engine
    }

    /// Returns the ranked quotes for a request, from cache when possible.
    ///
    /// `ttl_secs` overrides the configured base TTL; jitter still applies.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the engine rejects its
    /// default options. Cache failures are logged and treated as misses.
    pub async fn get_or_compute(
        &self,
        request: &QuoteRequest,
        ttl_secs: Option<u64>,
    ) -> ApplicationResult<Vec<QuoteResult>> {
        let key = AggregateKey::for_request(request).to_string();

        match self.cache.get(&key).await {
            Ok(Some(CachedValue::Ranked(quotes))) => {
                debug!(%key, count = quotes.len(), "aggregate cache hit");
                return Ok(quotes);
            }
            Ok(Some(CachedValue::Quote(_))) => {
                warn!(%key, "unexpected single quote under aggregate key");
            }
            Ok(None) => debug!(%key, "aggregate cache miss"),
            Err(e) => warn!(%key, error = %e, "aggregate cache read failed"),
        }

        let options = self
            .engine
            .default_options()
            .with_cache(false)
            .sort_by(SortPolicy::BestRate.as_str());
        let aggregate = self.engine.dispatch(request, &options).await?;
        let success = aggregate.success();
        let batch_id = aggregate.batch_id();
        let ranked = aggregate.into_results();

        if success {
            let ttl = jittered_ttl(
                ttl_secs.unwrap_or(self.config.default_ttl_secs),
                self.config.jitter_secs,
            );
            match self
                .cache
                .set(&key, &CachedValue::Ranked(ranked.clone()), ttl)
                .await
            {
                Ok(()) => info!(%key, %batch_id, ttl, "aggregate cached"),
                Err(e) => warn!(%key, error = %e, "aggregate cache write failed"),
            }
        } else {
            debug!(%key, %batch_id, "no successful quote, aggregate not cached");
        }

        Ok(ranked)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::application::services::aggregator::tests::{
        Behavior, StubProvider, registry, usd_inr,
    };
    use crate::infrastructure::cache::{CacheError, CacheResult, InMemoryCacheStore};
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    fn wrapper(
        providers: &[Arc<StubProvider>],
        cache: Arc<dyn CacheStore>,
    ) -> AggregateQuoteCache {
        let engine = AggregatorEngine::with_defaults(registry(providers), Some(Arc::clone(&cache)));
        AggregateQuoteCache::new(engine, cache, AggregateCacheConfig::default())
    }

    #[tokio::test]
    async fn hit_contacts_no_provider() {
        let cache = Arc::new(InMemoryCacheStore::new());
        let providers = [
            StubProvider::new("alpha", Behavior::Quote(830)),
            StubProvider::new("beta", Behavior::Quote(835)),
        ];
        let wrapper = wrapper(&providers, cache.clone());

        let first = wrapper.get_or_compute(&usd_inr("1000"), None).await.unwrap();
        let second = wrapper.get_or_compute(&usd_inr("1000.0"), None).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first[0].exchange_rate(), Some(Decimal::new(835, 1)));
        assert_eq!(providers[0].calls(), 1);
        assert_eq!(providers[1].calls(), 1);
    }

    #[tokio::test]
    async fn miss_skips_provider_tier() {
        let cache = Arc::new(InMemoryCacheStore::new());
        let providers = [StubProvider::new("alpha", Behavior::Quote(830))];
        let wrapper = wrapper(&providers, cache.clone());

        wrapper.get_or_compute(&usd_inr("10"), None).await.unwrap();

        assert_eq!(cache.len(), 1);
        assert!(cache.entry("quote:ALPHA:US:IN:USD:INR:10.00").is_none());
        let entry = cache.entry("aggregate:USD:IN:10.00:INR").unwrap();
        assert!((3_540..=3_660).contains(&entry.ttl_seconds()));
    }

    #[tokio::test]
    async fn caller_ttl_overrides_default() {
        let cache = Arc::new(InMemoryCacheStore::new());
        let providers = [StubProvider::new("alpha", Behavior::Quote(830))];
        let wrapper = wrapper(&providers, cache.clone());

        wrapper.get_or_compute(&usd_inr("10"), Some(600)).await.unwrap();

        let entry = cache.entry("aggregate:USD:IN:10.00:INR").unwrap();
        assert!((540..=660).contains(&entry.ttl_seconds()));
    }

    #[tokio::test]
    async fn all_failures_are_not_cached() {
        let cache = Arc::new(InMemoryCacheStore::new());
        let providers = [StubProvider::new("alpha", Behavior::Fail)];
        let wrapper = wrapper(&providers, cache.clone());

        let first = wrapper.get_or_compute(&usd_inr("10"), None).await.unwrap();
        wrapper.get_or_compute(&usd_inr("10"), None).await.unwrap();

        assert!(first.is_empty());
        assert!(cache.is_empty());
        assert_eq!(providers[0].calls(), 2);
    }

    #[derive(Debug)]
    struct BrokenCache;

    #[async_trait]
    impl CacheStore for BrokenCache {
        async fn get(&self, _key: &str) -> CacheResult<Option<CachedValue>> {
            Err(CacheError::connection("connection refused"))
        }

        async fn set(&self, _key: &str, _value: &CachedValue, _ttl_seconds: u64) -> CacheResult<()> {
            Err(CacheError::connection("connection refused"))
        }
    }

    #[tokio::test]
    async fn cache_errors_degrade_to_live_calls() {
        let providers = [StubProvider::new("alpha", Behavior::Quote(830))];
        let wrapper = wrapper(&providers, Arc::new(BrokenCache));

        let quotes = wrapper.get_or_compute(&usd_inr("10"), None).await.unwrap();
        wrapper.get_or_compute(&usd_inr("10"), None).await.unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(providers[0].calls(), 2);
    }
}
