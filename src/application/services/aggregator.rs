//! # Aggregator Engine
//!
//! Fans a [`QuoteRequest`] out to every selected provider and collects the
//! outcomes into an [`AggregateResult`].
//!
//! Each provider runs as its own task on a [`JoinSet`], gated by a semaphore
//! sized `min(max_workers, provider_count)`. Collection stops at a deadline
//! fixed when the batch is submitted. Tasks still running at that point are
//! detached rather than aborted: their answers are dropped for this batch
//! but still land in the per-provider cache.
//!
//! A provider can fail in three ways (error, panic, deadline) and each one
//! becomes a failed [`QuoteResult`]. Nothing a provider does can fail the
//! batch.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::cache_policy::{TtlPolicy, provider_cache_key};
use crate::application::services::provider_registry::ProviderRegistry;
use crate::application::services::quote_filter::QuoteFilters;
use crate::application::services::ranking_strategy::rank_quotes;
use crate::domain::entities::{AggregateResult, CachedValue, QuoteRequest, QuoteResult};
use crate::domain::value_objects::{FailureKind, ProviderId};
use crate::infrastructure::cache::CacheStore;
use crate::infrastructure::providers::params::{ParameterMapping, ProviderParams};
use crate::infrastructure::providers::traits::QuoteProvider;
use futures::FutureExt;
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default dispatch deadline in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default worker pool size.
pub const DEFAULT_MAX_WORKERS: usize = 10;

/// Engine-wide defaults for dispatch options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Deadline for collecting answers, in milliseconds.
    pub timeout_ms: u64,
    /// Upper bound on concurrently running provider calls.
    pub max_workers: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}

impl AggregationConfig {
    /// Creates a configuration with the given deadline.
    #[must_use]
    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            ..Default::default()
        }
    }

    /// Sets the worker pool size.
    #[must_use]
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Returns the deadline as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Per-call execution options.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Providers to skip.
    pub excluded: HashSet<ProviderId>,
    /// Upper bound on concurrently running provider calls.
    pub max_workers: usize,
    /// Deadline for collecting answers, measured from submission.
    pub timeout: Duration,
    /// Whether to read and write per-provider cache entries.
    pub use_cache: bool,
    /// Constraints applied to successful quotes.
    pub filters: QuoteFilters,
    /// Sort policy name; unknown names keep arrival order.
    pub sort_by: Option<String>,
    /// Truncates the ranked list.
    pub max_results: Option<usize>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self::from_config(&AggregationConfig::default())
    }
}

impl DispatchOptions {
    /// Creates options from engine defaults.
    #[must_use]
    pub fn from_config(config: &AggregationConfig) -> Self {
        Self {
            excluded: HashSet::new(),
            max_workers: config.max_workers,
            timeout: config.timeout(),
            use_cache: true,
            filters: QuoteFilters::default(),
            sort_by: None,
            max_results: None,
        }
    }

    /// Skips a provider.
    #[must_use]
    pub fn exclude(mut self, provider_id: impl Into<ProviderId>) -> Self {
        self.excluded.insert(provider_id.into());
        self
    }

    /// Sets the worker pool size.
    #[must_use]
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Sets the collection deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables the per-provider cache.
    #[must_use]
    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// Sets the filters.
    #[must_use]
    pub fn with_filters(mut self, filters: QuoteFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Sets the sort policy name.
    #[must_use]
    pub fn sort_by(mut self, policy: impl Into<String>) -> Self {
        self.sort_by = Some(policy.into());
        self
    }

    /// Truncates the ranked list to `max_results` entries.
    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// One provider's outcome and whether it was served from cache.
#[derive(Debug)]
struct Outcome {
    result: QuoteResult,
    cached: bool,
}

/// Everything a dispatch task needs, owned so the task can outlive the batch.
struct ProviderJob {
    provider: Arc<dyn QuoteProvider>,
    params: ProviderParams,
    cache_key: String,
    cache: Option<Arc<dyn CacheStore>>,
    ttl_policy: TtlPolicy,
    semaphore: Arc<Semaphore>,
}

impl ProviderJob {
    async fn run(self) -> Outcome {
        let provider_id = self.provider.provider_id().clone();
        let Ok(_permit) = Arc::clone(&self.semaphore).acquire_owned().await else {
            return Outcome {
                result: QuoteResult::failure(provider_id, FailureKind::Provider, "worker pool closed"),
                cached: false,
            };
        };

        if let Some(result) = self.read_cache().await {
            return Outcome {
                result,
                cached: true,
            };
        }

        let result = match AssertUnwindSafe(self.provider.get_quote(&self.params))
            .catch_unwind()
            .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!(provider = %provider_id, error = %e, "provider call failed");
                QuoteResult::failure(provider_id, FailureKind::Provider, e.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(provider = %provider_id, %message, "provider call panicked");
                QuoteResult::failure(provider_id, FailureKind::Panicked, message)
            }
        };

        self.write_cache(&result).await;
        Outcome {
            result,
            cached: false,
        }
    }

    async fn read_cache(&self) -> Option<QuoteResult> {
        let cache = self.cache.as_ref()?;
        match cache.get(&self.cache_key).await {
            Ok(Some(CachedValue::Quote(result))) => {
                debug!(key = %self.cache_key, "provider cache hit");
                Some(result)
            }
            Ok(Some(CachedValue::Ranked(_))) => {
                warn!(key = %self.cache_key, "unexpected ranked value under provider key");
                None
            }
            Ok(None) => {
                debug!(key = %self.cache_key, "provider cache miss");
                None
            }
            Err(e) => {
                warn!(key = %self.cache_key, error = %e, "provider cache read failed");
                None
            }
        }
    }

    async fn write_cache(&self, result: &QuoteResult) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };
        let ttl = if result.is_success() {
            self.ttl_policy.success_ttl()
        } else {
            self.ttl_policy.failure_ttl()
        };
        if let Err(e) = cache
            .set(&self.cache_key, &CachedValue::Quote(result.clone()), ttl)
            .await
        {
            warn!(key = %self.cache_key, error = %e, "provider cache write failed");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("provider panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("provider panicked: {message}")
    } else {
        "provider panicked".to_string()
    }
}

/// Concurrent quote dispatcher.
#[derive(Debug, Clone)]
pub struct AggregatorEngine {
    registry: Arc<ProviderRegistry>,
    cache: Option<Arc<dyn CacheStore>>,
    mapping: Arc<ParameterMapping>,
    ttl_policy: TtlPolicy,
    config: AggregationConfig,
}

impl AggregatorEngine {
    /// Creates an engine.
    ///
    /// With `cache` set to `None` the per-provider cache is never consulted,
    /// whatever the dispatch options say.
    #[must_use]
    pub fn new(
        registry: Arc<ProviderRegistry>,
        cache: Option<Arc<dyn CacheStore>>,
        mapping: Arc<ParameterMapping>,
        ttl_policy: TtlPolicy,
        config: AggregationConfig,
    ) -> Self {
        Self {
            registry,
            cache,
            mapping,
            ttl_policy,
            config,
        }
    }

    /// Creates an engine with default mapping, TTLs and configuration.
    #[must_use]
    pub fn with_defaults(registry: Arc<ProviderRegistry>, cache: Option<Arc<dyn CacheStore>>) -> Self {
        Self::new(
            registry,
            cache,
            Arc::new(ParameterMapping::default()),
            TtlPolicy::default(),
            AggregationConfig::default(),
        )
    }

    /// Returns dispatch options seeded from the engine configuration.
    #[must_use]
    pub fn default_options(&self) -> DispatchOptions {
        DispatchOptions::from_config(&self.config)
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Returns the provider registry.
    #[must_use]
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Returns the cache store, if any.
    #[must_use]
    pub fn cache(&self) -> Option<&Arc<dyn CacheStore>> {
        self.cache.as_ref()
    }

    /// Calls every selected provider concurrently and collects their outcomes.
    ///
    /// `all_results` holds one entry per selected provider in registry
    /// order. `results` holds the successful ones after filtering, sorting
    /// and truncation. With no selectable provider the result is empty and
    /// unsuccessful.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if `max_workers` is zero.
    pub async fn dispatch(
        &self,
        request: &QuoteRequest,
        options: &DispatchOptions,
    ) -> ApplicationResult<AggregateResult> {
        let started = Instant::now();
        // An unrepresentable deadline means waiting for every provider.
        let deadline = started.checked_add(options.timeout);
        let batch_id = Uuid::new_v4();

        if options.max_workers == 0 {
            return Err(ApplicationError::configuration(
                "max_workers must be at least 1",
            ));
        }

        let providers = self.registry.select(&options.excluded);
        if providers.is_empty() {
            info!(%batch_id, %request, "no providers selected");
            return Ok(AggregateResult::empty(batch_id, started.elapsed()));
        }

        let workers = options.max_workers.min(providers.len());
        let semaphore = Arc::new(Semaphore::new(workers));
        let cache = if options.use_cache {
            self.cache.clone()
        } else {
            None
        };

        let mut tasks = JoinSet::new();
        let mut task_slots = HashMap::with_capacity(providers.len());
        for (index, provider) in providers.iter().enumerate() {
            let job = ProviderJob {
                params: self.mapping.resolve(provider.provider_id(), request),
                cache_key: provider_cache_key(provider.provider_id(), request),
                provider: Arc::clone(provider),
                cache: cache.clone(),
                ttl_policy: self.ttl_policy,
                semaphore: Arc::clone(&semaphore),
            };
            let handle = tasks.spawn(async move { (index, job.run().await) });
            task_slots.insert(handle.id(), index);
        }

        let mut outcomes: Vec<Option<Outcome>> = providers.iter().map(|_| None).collect();
        loop {
            let joined = match deadline {
                Some(deadline) => timeout_at(deadline, tasks.join_next_with_id()).await,
                None => Ok(tasks.join_next_with_id().await),
            };
            match joined {
                Ok(Some(Ok((_, (index, outcome))))) => {
                    if let Some(slot) = outcomes.get_mut(index) {
                        *slot = Some(outcome);
                    }
                }
                Ok(Some(Err(join_error))) => {
                    let index = task_slots.get(&join_error.id()).copied();
                    let slot = index.and_then(|i| outcomes.get_mut(i).zip(providers.get(i)));
                    if let Some((slot, provider)) = slot {
                        warn!(provider = %provider.provider_id(), error = %join_error, "dispatch task failed");
                        *slot = Some(Outcome {
                            result: QuoteResult::failure(
                                provider.provider_id().clone(),
                                FailureKind::Panicked,
                                join_error.to_string(),
                            ),
                            cached: false,
                        });
                    }
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        %batch_id,
                        pending = tasks.len(),
                        timeout_ms = u64::try_from(options.timeout.as_millis()).unwrap_or(u64::MAX),
                        "dispatch deadline reached"
                    );
                    tasks.detach_all();
                    break;
                }
            }
        }

        let mut cache_hits = 0;
        let all_results: Vec<QuoteResult> = providers
            .iter()
            .zip(outcomes)
            .map(|(provider, outcome)| match outcome {
                Some(outcome) => {
                    if outcome.cached {
                        cache_hits += 1;
                    }
                    outcome.result.with_request_context(request)
                }
                None => QuoteResult::timed_out(provider.provider_id().clone(), options.timeout)
                    .with_request_context(request),
            })
            .collect();

        let successes: Vec<QuoteResult> = all_results
            .iter()
            .filter(|r| r.is_success())
            .cloned()
            .collect();
        let mut results = rank_quotes(successes, &options.filters, options.sort_by.as_deref());
        if let Some(max) = options.max_results {
            results.truncate(max);
        }

        let aggregate =
            AggregateResult::new(batch_id, results, all_results, cache_hits, started.elapsed());
        info!(
            %batch_id,
            %request,
            providers_called = aggregate.providers_called(),
            successful_providers = aggregate.successful_providers(),
            cache_hits = aggregate.cache_hits(),
            execution_time_ms = aggregate.execution_time_ms(),
            "dispatch complete"
        );
        Ok(aggregate)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::value_objects::CurrencyCode;
    use crate::infrastructure::cache::InMemoryCacheStore;
    use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
    use crate::infrastructure::providers::params::CanonicalParam;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, Copy)]
    pub(crate) enum Behavior {
        Quote(i64),
        Fail,
        Panic,
        Sleep(u64, i64),
    }

    /// Concurrent calls across every provider sharing it.
    #[derive(Debug, Default)]
    pub(crate) struct Gauge {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    /// Provider double with a call counter.
    #[derive(Debug)]
    pub(crate) struct StubProvider {
        id: ProviderId,
        behavior: Behavior,
        calls: AtomicUsize,
        gauge: Arc<Gauge>,
    }

    impl StubProvider {
        pub(crate) fn new(id: &str, behavior: Behavior) -> Arc<Self> {
            Self::with_gauge(id, behavior, Arc::new(Gauge::default()))
        }

        fn with_gauge(id: &str, behavior: Behavior, gauge: Arc<Gauge>) -> Arc<Self> {
            Arc::new(Self {
                id: ProviderId::new(id),
                behavior,
                calls: AtomicUsize::new(0),
                gauge,
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn quote(&self, params: &ProviderParams, tenths: i64) -> QuoteResult {
            QuoteResult::builder(
                self.id.clone(),
                params.decimal(CanonicalParam::Amount.as_str()).unwrap(),
                CurrencyCode::parse(params.get("source_currency").unwrap()).unwrap(),
                CurrencyCode::parse(params.get("dest_currency").unwrap()).unwrap(),
                Decimal::new(tenths, 1),
            )
            .fee(Decimal::ONE)
            .delivery_time_minutes(60)
            .build()
            .unwrap()
        }
    }

    #[async_trait]
    impl QuoteProvider for StubProvider {
        fn provider_id(&self) -> &ProviderId {
            &self.id
        }

        async fn get_quote(&self, params: &ProviderParams) -> ProviderResult<QuoteResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Quote(tenths) => Ok(self.quote(params, tenths)),
                Behavior::Fail => Err(ProviderError::connection("HTTP 503")),
                Behavior::Panic => panic!("scraper blew up"),
                Behavior::Sleep(ms, tenths) => {
                    let now = self.gauge.current.fetch_add(1, Ordering::SeqCst) + 1;
                    self.gauge.peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    self.gauge.current.fetch_sub(1, Ordering::SeqCst);
                    Ok(self.quote(params, tenths))
                }
            }
        }
    }

    pub(crate) fn usd_inr(amount: &str) -> QuoteRequest {
        QuoteRequest::parse("US", "IN", "USD", "INR", amount).unwrap()
    }

    pub(crate) fn registry(providers: &[Arc<StubProvider>]) -> Arc<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();
        for provider in providers {
            registry.register(Arc::clone(provider) as Arc<dyn QuoteProvider>).unwrap();
        }
        Arc::new(registry)
    }

    fn engine(providers: &[Arc<StubProvider>], cache: Option<Arc<InMemoryCacheStore>>) -> AggregatorEngine {
        AggregatorEngine::with_defaults(
            registry(providers),
            cache.map(|c| c as Arc<dyn CacheStore>),
        )
    }

    #[tokio::test]
    async fn partial_failure_is_isolated() {
        let providers = [
            StubProvider::new("alpha", Behavior::Quote(830)),
            StubProvider::new("beta", Behavior::Quote(835)),
            StubProvider::new("gamma", Behavior::Panic),
        ];
        let engine = engine(&providers, None);
        let options = engine.default_options().sort_by("best_rate");

        let result = engine.dispatch(&usd_inr("1000"), &options).await.unwrap();

        assert!(result.success());
        assert_eq!(result.providers_called(), 3);
        assert_eq!(result.successful_providers(), 2);
        assert_eq!(result.all_results().len(), 3);
        assert_eq!(result.results().len(), 2);
        assert_eq!(result.results()[0].exchange_rate(), Some(Decimal::new(835, 1)));
        assert_eq!(result.results()[1].exchange_rate(), Some(Decimal::new(830, 1)));

        let failed = &result.all_results()[2];
        assert!(!failed.is_success());
        assert_eq!(failed.failure_kind(), Some(FailureKind::Panicked));
        assert!(failed.error_message().unwrap().contains("scraper blew up"));
        assert_eq!(failed.send_amount(), Some(Decimal::from(1000)));
    }

    #[tokio::test]
    async fn provider_error_becomes_failed_quote() {
        let providers = [
            StubProvider::new("alpha", Behavior::Fail),
            StubProvider::new("beta", Behavior::Quote(800)),
        ];
        let engine = engine(&providers, None);

        let result = engine
            .dispatch(&usd_inr("50"), &engine.default_options())
            .await
            .unwrap();

        let failed = &result.all_results()[0];
        assert_eq!(failed.failure_kind(), Some(FailureKind::Provider));
        assert!(failed.error_message().unwrap().contains("HTTP 503"));
        assert_eq!(result.results().len(), 1);
    }

    #[tokio::test]
    async fn zero_providers_is_unsuccessful_not_an_error() {
        let engine = engine(&[], None);
        let result = engine
            .dispatch(&usd_inr("100"), &engine.default_options())
            .await
            .unwrap();

        assert!(!result.success());
        assert_eq!(result.providers_called(), 0);
        assert!(result.all_results().is_empty());
    }

    #[tokio::test]
    async fn excluding_every_provider_is_unsuccessful() {
        let providers = [StubProvider::new("alpha", Behavior::Quote(800))];
        let engine = engine(&providers, None);
        let options = engine.default_options().exclude("alpha");

        let result = engine.dispatch(&usd_inr("100"), &options).await.unwrap();

        assert!(!result.success());
        assert_eq!(result.providers_called(), 0);
        assert_eq!(providers[0].calls(), 0);
    }

    #[tokio::test]
    async fn exclusions_and_cache_keys_ignore_case() {
        let cache = Arc::new(InMemoryCacheStore::new());
        let providers = [
            StubProvider::new("wise", Behavior::Quote(830)),
            StubProvider::new("xoom", Behavior::Quote(820)),
        ];
        let engine = engine(&providers, Some(Arc::clone(&cache)));
        let options = engine.default_options().exclude("Wise");

        let result = engine.dispatch(&usd_inr("100"), &options).await.unwrap();

        assert_eq!(result.providers_called(), 1);
        assert_eq!(providers[0].calls(), 0);
        assert_eq!(result.all_results()[0].provider_id().as_str(), "xoom");
        assert!(cache.entry("quote:WISE:US:IN:USD:INR:100.00").is_none());
        assert!(cache.entry("quote:XOOM:US:IN:USD:INR:100.00").is_some());
    }

    #[tokio::test]
    async fn zero_workers_is_rejected() {
        let providers = [StubProvider::new("alpha", Behavior::Quote(800))];
        let engine = engine(&providers, None);
        let options = engine.default_options().with_max_workers(0);

        let err = engine.dispatch(&usd_inr("100"), &options).await.unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(providers[0].calls(), 0);
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let providers = [
            StubProvider::new("fast", Behavior::Quote(800)),
            StubProvider::new("slow", Behavior::Sleep(5_000, 900)),
        ];
        let engine = engine(&providers, None);
        let options = engine
            .default_options()
            .with_timeout(Duration::from_millis(100));

        let started = std::time::Instant::now();
        let result = engine.dispatch(&usd_inr("100"), &options).await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(result.all_results().len(), 2);
        assert_eq!(result.results().len(), 1);
        let timed_out = &result.all_results()[1];
        assert_eq!(timed_out.failure_kind(), Some(FailureKind::Timeout));
        assert!(timed_out.error_message().unwrap().contains("100ms"));
    }

    #[tokio::test]
    async fn unbounded_timeout_waits_for_every_provider() {
        let providers = [
            StubProvider::new("fast", Behavior::Quote(800)),
            StubProvider::new("slow", Behavior::Sleep(50, 900)),
        ];
        let engine = engine(&providers, None);
        let options = engine.default_options().with_timeout(Duration::MAX);

        let result = engine.dispatch(&usd_inr("100"), &options).await.unwrap();

        assert_eq!(result.successful_providers(), 2);
        assert!(result.all_results().iter().all(QuoteResult::is_success));
    }

    #[tokio::test]
    async fn worker_pool_bounds_concurrency() {
        let gauge = Arc::new(Gauge::default());
        let providers: Vec<Arc<StubProvider>> = (0..6)
            .map(|i| StubProvider::with_gauge(&format!("p{i}"), Behavior::Sleep(30, 800), Arc::clone(&gauge)))
            .collect();
        let engine = engine(&providers, None);
        let options = engine.default_options().with_max_workers(2);

        let result = engine.dispatch(&usd_inr("100"), &options).await.unwrap();

        assert_eq!(result.successful_providers(), 6);
        let peak = gauge.peak.load(Ordering::SeqCst);
        assert!((1..=2).contains(&peak));
    }

    #[tokio::test]
    async fn cache_hit_skips_live_call() {
        let cache = Arc::new(InMemoryCacheStore::new());
        let providers = [StubProvider::new("alpha", Behavior::Quote(830))];
        let engine = engine(&providers, Some(Arc::clone(&cache)));
        let options = engine.default_options();

        let first = engine.dispatch(&usd_inr("1000"), &options).await.unwrap();
        let second = engine.dispatch(&usd_inr("1000.00"), &options).await.unwrap();

        assert_eq!(providers[0].calls(), 1);
        assert_eq!(first.cache_hits(), 0);
        assert_eq!(second.cache_hits(), 1);
        assert_eq!(second.results()[0].exchange_rate(), Some(Decimal::new(830, 1)));

        let entry = cache.entry("quote:ALPHA:US:IN:USD:INR:1000.00").unwrap();
        assert!((86_340..=86_460).contains(&entry.ttl_seconds()));
    }

    #[tokio::test]
    async fn failures_are_negatively_cached() {
        let cache = Arc::new(InMemoryCacheStore::new());
        let providers = [StubProvider::new("alpha", Behavior::Fail)];
        let engine = engine(&providers, Some(Arc::clone(&cache)));
        let options = engine.default_options();

        engine.dispatch(&usd_inr("10"), &options).await.unwrap();
        let second = engine.dispatch(&usd_inr("10"), &options).await.unwrap();

        assert_eq!(providers[0].calls(), 1);
        assert_eq!(second.cache_hits(), 1);
        assert!(!second.success());
        let entry = cache.entry("quote:ALPHA:US:IN:USD:INR:10.00").unwrap();
        assert_eq!(entry.ttl_seconds(), 300);
    }

    #[tokio::test]
    async fn disabled_cache_is_not_touched() {
        let cache = Arc::new(InMemoryCacheStore::new());
        let providers = [StubProvider::new("alpha", Behavior::Quote(830))];
        let engine = engine(&providers, Some(Arc::clone(&cache)));
        let options = engine.default_options().with_cache(false);

        engine.dispatch(&usd_inr("10"), &options).await.unwrap();
        engine.dispatch(&usd_inr("10"), &options).await.unwrap();

        assert_eq!(providers[0].calls(), 2);
        assert_eq!(cache.stats().reads, 0);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn late_answer_still_warms_cache() {
        let cache = Arc::new(InMemoryCacheStore::new());
        let providers = [StubProvider::new("slow", Behavior::Sleep(150, 820))];
        let engine = engine(&providers, Some(Arc::clone(&cache)));
        let options = engine
            .default_options()
            .with_timeout(Duration::from_millis(20));

        let result = engine.dispatch(&usd_inr("10"), &options).await.unwrap();
        assert!(!result.success());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(cache.entry("quote:SLOW:US:IN:USD:INR:10.00").is_some());
    }

    #[tokio::test]
    async fn filters_sort_and_truncate() {
        let providers = [
            StubProvider::new("a", Behavior::Quote(810)),
            StubProvider::new("b", Behavior::Quote(830)),
            StubProvider::new("c", Behavior::Quote(820)),
        ];
        let engine = engine(&providers, None);
        let options = engine
            .default_options()
            .with_filters(QuoteFilters::new().with_predicate(|q| q.provider_id().as_str() != "b"))
            .sort_by("best_rate")
            .with_max_results(1);

        let result = engine.dispatch(&usd_inr("100"), &options).await.unwrap();

        assert_eq!(result.successful_providers(), 3);
        assert_eq!(result.results().len(), 1);
        assert_eq!(result.results()[0].provider_id().as_str(), "c");
    }

    #[tokio::test]
    async fn mapped_parameters_reach_provider() {
        #[derive(Debug)]
        struct Echo(ProviderId);

        #[async_trait]
        impl QuoteProvider for Echo {
            fn provider_id(&self) -> &ProviderId {
                &self.0
            }

            async fn get_quote(&self, params: &ProviderParams) -> ProviderResult<QuoteResult> {
                let amount = params.decimal("sendAmount")?;
                Ok(QuoteResult::builder(
                    self.0.clone(),
                    amount,
                    CurrencyCode::parse("USD").unwrap(),
                    CurrencyCode::parse("INR").unwrap(),
                    Decimal::ONE,
                )
                .build()
                .unwrap())
            }
        }

        let registry = ProviderRegistry::new()
            .with_provider(Arc::new(Echo(ProviderId::new("echo"))))
            .unwrap();
        let mapping = ParameterMapping::new().with_name("echo", CanonicalParam::Amount, "sendAmount");
        let engine = AggregatorEngine::new(
            Arc::new(registry),
            None,
            Arc::new(mapping),
            TtlPolicy::default(),
            AggregationConfig::default(),
        );

        let result = engine
            .dispatch(&usd_inr("42.5"), &engine.default_options())
            .await
            .unwrap();
        assert_eq!(result.results()[0].send_amount(), Some(Decimal::new(425, 1)));
    }

    #[test]
    fn config_builder() {
        let config = AggregationConfig::with_timeout(5_000).with_max_workers(4);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.max_workers, 4);

        let options = DispatchOptions::from_config(&config);
        assert_eq!(options.max_workers, 4);
        assert!(options.use_cache);
        assert!(options.sort_by.is_none());
    }
}
