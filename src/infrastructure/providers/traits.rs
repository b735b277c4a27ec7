//! # Quote Provider Trait
//!
//! Port definition for provider integrations.
//!
//! Every backend (REST API, scraped page, partner feed) implements
//! [`QuoteProvider`]. The aggregator only ever sees this one capability.
//!
//! # Examples
//!
//! ```ignore
//! use remit_quotes::infrastructure::providers::traits::QuoteProvider;
//!
//! #[derive(Debug)]
//! struct MyProvider { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl QuoteProvider for MyProvider {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::entities::QuoteResult;
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::providers::error::ProviderResult;
use crate::infrastructure::providers::params::ProviderParams;
use async_trait::async_trait;
use std::fmt;

/// Trait implemented by every quote backend.
///
/// # Error Handling
///
/// Implementations should report failures either as
/// `Err(ProviderError)` or as a failed [`QuoteResult`]. The engine also
/// survives panics, but adapters should not rely on that.
#[async_trait]
pub trait QuoteProvider: Send + Sync + fmt::Debug {
    /// Returns the provider id.
    fn provider_id(&self) -> &ProviderId;

    /// Produces a quote for the given provider-specific parameters.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Timeout` - Request timed out
    /// - `ProviderError::UnsupportedCorridor` - Corridor not served
    /// - `ProviderError::Protocol` - Response could not be parsed
    async fn get_quote(&self, params: &ProviderParams) -> ProviderResult<QuoteResult>;
}
