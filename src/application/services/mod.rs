//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`AggregatorEngine`]: Concurrent fan-out to providers
//! - [`AggregateQuoteCache`]: One cached ranked answer per request
//! - [`RankingStrategy`]: Sort policies over successful quotes
//! - [`QuoteFilters`]: Fee, delivery time and custom constraints
//! - [`ProviderRegistry`]: The providers an engine dispatches to

pub mod aggregate_cache;
pub mod aggregator;
pub mod cache_policy;
pub mod provider_registry;
pub mod quote_filter;
pub mod ranking_strategy;

pub use aggregate_cache::{AggregateCacheConfig, AggregateQuoteCache};
pub use aggregator::{AggregationConfig, AggregatorEngine, DispatchOptions};
pub use cache_policy::{AggregateKey, TtlPolicy, jittered_ttl, provider_cache_key};
pub use provider_registry::ProviderRegistry;
pub use quote_filter::{QuoteFilters, QuotePredicate};
pub use ranking_strategy::{
    BestRateStrategy, BestValueStrategy, FastestTimeStrategy, LowestFeeStrategy,
    RankingStrategy, rank_quotes, strategy_for,
};
