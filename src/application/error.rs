//! # Application Errors
//!
//! Error types for the application layer.
//!
//! Provider and cache failures never surface here during a dispatch: they
//! become failed quotes or are logged and swallowed. What remains is
//! invalid input, invalid options and startup wiring problems.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Configuration(String)               - Invalid request or dispatch options
//! ├── Domain(DomainError)                 - Invalid amount, code or quote
//! ├── Infrastructure(InfrastructureError) - Settings or cache backend setup
//! └── Provider(ProviderError)             - Adapter construction failures
//! ```
//!
//! # Examples
//!
//! ```
//! use remit_quotes::application::error::{ApplicationError, InfrastructureError};
//!
//! let err = ApplicationError::configuration("max_workers must be at least 1");
//! assert!(err.is_configuration());
//!
//! let infra_err = InfrastructureError::cache("redis timeout");
//! let app_err: ApplicationError = infra_err.into();
//! assert!(app_err.to_string().contains("cache"));
//! ```

use crate::domain::errors::DomainError;
use crate::infrastructure::cache::CacheError;
use crate::infrastructure::providers::error::ProviderError;
use thiserror::Error;

/// Infrastructure layer error.
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// Cache backend error.
    #[error("cache error: {0}")]
    Cache(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl InfrastructureError {
    /// Creates a cache error.
    #[must_use]
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Cache(_))
    }
}

impl From<CacheError> for InfrastructureError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Serialization(message) => Self::Serialization(message),
            other => Self::Cache(other.to_string()),
        }
    }
}

impl From<config::ConfigError> for InfrastructureError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Invalid request or dispatch options, reported before any dispatch.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Domain error from input validation.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Infrastructure error from external systems.
    #[error("infrastructure error: {0}")]
    Infrastructure(#[from] InfrastructureError),

    /// Provider adapter error.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl ApplicationError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true if the request or options were rejected.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Domain(_))
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Infrastructure(e) => e.is_retryable(),
            Self::Provider(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
