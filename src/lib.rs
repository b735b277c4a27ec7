//! # remit-quotes
//!
//! Remittance quote aggregation: send one corridor and amount to many
//! providers concurrently, collect what comes back before a deadline, then
//! filter and rank the successful quotes.
//!
//! ## Layers
//!
//! - [`domain`]: corridors, amounts, quotes and batch outcomes
//! - [`application`]: the dispatch engine, ranking, filters and both cache tiers
//! - [`infrastructure`]: provider adapters, cache backends, tracing setup
//! - [`config`]: layered settings
//!
//! ## Example
//!
//! ```no_run
//! use remit_quotes::application::services::{AggregatorEngine, ProviderRegistry};
//! use remit_quotes::domain::entities::QuoteRequest;
//! use remit_quotes::infrastructure::cache::InMemoryCacheStore;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = AggregatorEngine::with_defaults(
//!     Arc::new(ProviderRegistry::new()),
//!     Some(Arc::new(InMemoryCacheStore::new())),
//! );
//! let request = QuoteRequest::parse("US", "IN", "USD", "INR", "1000")?;
//! let options = engine.default_options().sort_by("best_rate");
//! let result = engine.dispatch(&request, &options).await?;
//! println!("{} of {} providers answered", result.successful_providers(), result.providers_called());
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
