//! # Domain Errors
//!
//! Error types raised when a domain invariant is violated.
//!
//! # Examples
//!
//! ```
//! use remit_quotes::domain::errors::DomainError;
//!
//! let err = DomainError::InvalidAmount("amount must be positive".to_string());
//! assert!(err.to_string().contains("positive"));
//! ```

use thiserror::Error;

/// Error type for domain validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Send amount is zero, negative or otherwise unusable.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Country code is not a two-letter ISO code.
    #[error("invalid country code: {0}")]
    InvalidCountryCode(String),

    /// Currency code is not a three-letter ISO code.
    #[error("invalid currency code: {0}")]
    InvalidCurrencyCode(String),

    /// Provider identifier is empty.
    #[error("invalid provider id: {0}")]
    InvalidProviderId(String),

    /// A quote could not be constructed without breaking its invariants.
    #[error("invalid quote: {0}")]
    InvalidQuote(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
