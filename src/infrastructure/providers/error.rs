//! # Provider Errors
//!
//! Error types for provider quote calls.
//!
//! A `ProviderError` never leaves a dispatch task: the engine converts it
//! into a failed [`QuoteResult`](crate::domain::entities::QuoteResult).
//!
//! # Examples
//!
//! ```
//! use remit_quotes::infrastructure::providers::error::ProviderError;
//!
//! let error = ProviderError::timeout("request timed out after 5000ms");
//! assert!(error.is_retryable());
//!
//! let error = ProviderError::unsupported_corridor("US->KP");
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Error type for provider operations.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Request timed out.
    #[error("provider timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Network or connection error, including 5xx responses.
    #[error("provider connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("provider rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
    },

    /// The provider rejected the request parameters.
    #[error("provider invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// Credentials were rejected.
    #[error("provider authentication failed: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// The provider does not serve this corridor.
    #[error("provider does not support corridor: {corridor}")]
    UnsupportedCorridor {
        /// Corridor description.
        corridor: String,
    },

    /// Response could not be parsed or had an unexpected shape.
    #[error("provider protocol error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// Internal adapter error.
    #[error("provider internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl ProviderError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates an unsupported corridor error.
    #[must_use]
    pub fn unsupported_corridor(corridor: impl Into<String>) -> Self {
        Self::UnsupportedCorridor {
            corridor: corridor.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error is transient and may succeed on retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Connection { .. } | Self::RateLimited { .. }
        )
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(ProviderError::timeout("t").is_retryable());
        assert!(ProviderError::connection("c").is_retryable());
        assert!(ProviderError::rate_limited("r").is_retryable());
    }

    #[test]
    fn permanent_errors_are_not_retryable() {
        assert!(!ProviderError::invalid_request("bad").is_retryable());
        assert!(!ProviderError::protocol("json").is_retryable());
        assert!(!ProviderError::unsupported_corridor("US->XX").is_retryable());
    }

    #[test]
    fn display_format() {
        let error = ProviderError::unsupported_corridor("US/USD->CU/CUP");
        assert_eq!(
            error.to_string(),
            "provider does not support corridor: US/USD->CU/CUP"
        );
    }
}
