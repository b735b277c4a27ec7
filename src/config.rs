//! # Settings
//!
//! Layered configuration resolved once at startup.
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. an optional file (TOML, YAML or JSON, by extension)
//! 3. environment variables such as `REMIT__AGGREGATOR__TIMEOUT_MS`
//!
//! A `.env` file in the working directory is loaded before the environment
//! is read.

use crate::application::error::{ApplicationResult, InfrastructureError};
use crate::application::services::aggregate_cache::{
    AggregateCacheConfig, DEFAULT_AGGREGATE_JITTER_SECS, DEFAULT_AGGREGATE_TTL_SECS,
};
use crate::application::services::aggregator::{
    AggregationConfig, DEFAULT_MAX_WORKERS, DEFAULT_TIMEOUT_MS,
};
use crate::application::services::cache_policy::{
    DEFAULT_FAILURE_TTL_SECS, DEFAULT_SUCCESS_JITTER_SECS, DEFAULT_SUCCESS_TTL_SECS, TtlPolicy,
};
use crate::application::services::provider_registry::ProviderRegistry;
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::cache::{CacheStore, InMemoryCacheStore, RedisCacheStore};
use crate::infrastructure::providers::params::{CanonicalParam, ParameterMapping};
use crate::infrastructure::providers::JsonApiProvider;
use crate::infrastructure::telemetry::LoggingSettings;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "REMIT";

/// Separator between nested keys in environment overrides.
pub const ENV_SEPARATOR: &str = "__";

/// Aggregator defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorSettings {
    /// Dispatch deadline in milliseconds.
    pub timeout_ms: u64,
    /// Worker pool size.
    pub max_workers: usize,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}

/// Cache backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local map.
    #[default]
    Memory,
    /// Shared Redis instance.
    Redis,
}

/// Cache backend and TTLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Backend to use.
    pub backend: CacheBackend,
    /// Redis URL, required for the Redis backend.
    pub redis_url: Option<String>,
    /// Prefix prepended to every Redis key.
    pub key_prefix: String,
    /// Base TTL of a successful provider quote.
    pub provider_ttl_secs: u64,
    /// Jitter bound of a successful provider quote.
    pub provider_jitter_secs: u64,
    /// TTL of a failed provider call.
    pub failure_ttl_secs: u64,
    /// Base TTL of an aggregate entry.
    pub aggregate_ttl_secs: u64,
    /// Jitter bound of an aggregate entry.
    pub aggregate_jitter_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            redis_url: None,
            key_prefix: "remit".to_string(),
            provider_ttl_secs: DEFAULT_SUCCESS_TTL_SECS,
            provider_jitter_secs: DEFAULT_SUCCESS_JITTER_SECS,
            failure_ttl_secs: DEFAULT_FAILURE_TTL_SECS,
            aggregate_ttl_secs: DEFAULT_AGGREGATE_TTL_SECS,
            aggregate_jitter_secs: DEFAULT_AGGREGATE_JITTER_SECS,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_provider_timeout_ms() -> u64 {
    crate::infrastructure::providers::json_api::DEFAULT_TIMEOUT_MS
}

/// One JSON/REST provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Provider id.
    pub id: String,
    /// Quote endpoint URL.
    pub endpoint: String,
    /// Disabled providers are not registered.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Per-request HTTP timeout in milliseconds.
    #[serde(default = "default_provider_timeout_ms")]
    pub timeout_ms: u64,
    /// Provider-specific names for canonical parameters.
    #[serde(default)]
    pub params: HashMap<CanonicalParam, String>,
}

/// Root settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Aggregator defaults.
    pub aggregator: AggregatorSettings,
    /// Cache backend and TTLs.
    pub cache: CacheSettings,
    /// Logging.
    pub logging: LoggingSettings,
    /// Configured providers.
    pub providers: Vec<ProviderSettings>,
}

impl Settings {
    /// Loads settings from defaults, an optional file and the environment.
    ///
    /// # Errors
    ///
    /// Returns `InfrastructureError::Configuration` if a source cannot be
    /// read, a value has the wrong type, or the result fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, InfrastructureError> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns `InfrastructureError::Configuration` naming the first problem.
    pub fn validate(&self) -> Result<(), InfrastructureError> {
        if self.aggregator.max_workers == 0 {
            return Err(InfrastructureError::configuration(
                "aggregator.max_workers must be at least 1",
            ));
        }
        if self.cache.backend == CacheBackend::Redis && self.cache.redis_url.is_none() {
            return Err(InfrastructureError::configuration(
                "cache.redis_url is required for the redis backend",
            ));
        }
        for provider in &self.providers {
            if provider.id.trim().is_empty() {
                return Err(InfrastructureError::configuration("provider id is empty"));
            }
            if provider.endpoint.trim().is_empty() {
                return Err(InfrastructureError::configuration(format!(
                    "provider `{}` has no endpoint",
                    provider.id
                )));
            }
        }
        Ok(())
    }

    /// Returns the engine defaults.
    #[must_use]
    pub fn aggregation_config(&self) -> AggregationConfig {
        AggregationConfig::with_timeout(self.aggregator.timeout_ms)
            .with_max_workers(self.aggregator.max_workers)
    }

    /// Returns the per-provider TTL policy.
    #[must_use]
    pub fn ttl_policy(&self) -> TtlPolicy {
        TtlPolicy {
            success_base_secs: self.cache.provider_ttl_secs,
            success_jitter_secs: self.cache.provider_jitter_secs,
            failure_secs: self.cache.failure_ttl_secs,
        }
    }

    /// Returns the aggregate cache TTLs.
    #[must_use]
    pub fn aggregate_cache_config(&self) -> AggregateCacheConfig {
        AggregateCacheConfig {
            default_ttl_secs: self.cache.aggregate_ttl_secs,
            jitter_secs: self.cache.aggregate_jitter_secs,
        }
    }

    /// Collects the parameter renames of every provider.
    #[must_use]
    pub fn parameter_mapping(&self) -> ParameterMapping {
        self.providers
            .iter()
            .fold(ParameterMapping::new(), |mapping, provider| {
                mapping.with_provider(ProviderId::new(&provider.id), provider.params.clone())
            })
    }

    /// Builds a registry holding every enabled provider.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` for a duplicate id, or
    /// `ApplicationError::Provider` if an HTTP client cannot be built.
    pub fn build_registry(&self) -> ApplicationResult<ProviderRegistry> {
        let mapping = self.parameter_mapping();
        let mut registry = ProviderRegistry::new();
        for provider in self.providers.iter().filter(|p| p.enabled) {
            let adapter = JsonApiProvider::new(
                ProviderId::new(&provider.id),
                provider.endpoint.clone(),
                provider.timeout_ms,
                mapping.clone(),
            )?;
            registry.register(Arc::new(adapter))?;
        }
        info!(providers = registry.len(), "provider registry built");
        Ok(registry)
    }

    /// Connects the configured cache backend.
    ///
    /// # Errors
    ///
    /// Returns `InfrastructureError::Configuration` if the Redis URL is
    /// missing, or `InfrastructureError::Cache` if Redis is unreachable.
    pub async fn build_cache(&self) -> Result<Arc<dyn CacheStore>, InfrastructureError> {
        match self.cache.backend {
            CacheBackend::Memory => Ok(Arc::new(InMemoryCacheStore::new())),
            CacheBackend::Redis => {
                let url = self.cache.redis_url.as_deref().ok_or_else(|| {
                    InfrastructureError::configuration("cache.redis_url is not set")
                })?;
                let store = RedisCacheStore::connect(url, self.cache.key_prefix.clone()).await?;
                info!(prefix = %self.cache.key_prefix, "connected to redis cache");
                Ok(Arc::new(store))
            }
        }
    }
}
