//! # Domain Entities
//!
//! - [`QuoteRequest`]: Corridor and amount to be priced
//! - [`QuoteResult`]: Standardized per-provider outcome
//! - [`AggregateResult`]: Outcome of one dispatch batch
//! - [`CacheEntry`]: A cached [`CachedValue`] with its TTL

pub mod aggregate_result;
pub mod cache_entry;
pub mod quote_request;
pub mod quote_result;

pub use aggregate_result::AggregateResult;
pub use cache_entry::{CacheEntry, CachedValue};
pub use quote_request::QuoteRequest;
pub use quote_result::{QuoteResult, QuoteResultBuilder};
