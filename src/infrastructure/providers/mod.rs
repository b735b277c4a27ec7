//! # Quote Providers
//!
//! Provider port and adapters.
//!
//! - [`traits::QuoteProvider`] - the single capability every backend implements
//! - [`params`] - canonical parameters and the per-provider name table
//! - [`json_api::JsonApiProvider`] - generic JSON-over-HTTP adapter

pub mod error;
pub mod http_client;
pub mod json_api;
pub mod params;
pub mod traits;

pub use error::{ProviderError, ProviderResult};
pub use json_api::JsonApiProvider;
pub use params::{CanonicalParam, ParameterMapping, ProviderParams};
pub use traits::QuoteProvider;
