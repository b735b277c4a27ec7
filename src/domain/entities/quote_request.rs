//! # Quote Request
//!
//! The corridor and amount a caller wants priced.

use crate::domain::errors::DomainResult;
use crate::domain::value_objects::{Corridor, SendAmount};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A request to price one amount through one corridor.
///
/// Execution options (exclusions, workers, deadline, caching, filters,
/// sort policy) travel separately so the same request can be dispatched
/// with different options.
///
/// # Examples
///
/// ```
/// use remit_quotes::domain::entities::quote_request::QuoteRequest;
///
/// let request = QuoteRequest::parse("us", "in", "usd", "inr", "1000").unwrap();
/// assert_eq!(request.corridor().dest_currency().as_str(), "INR");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteRequest {
    corridor: Corridor,
    amount: SendAmount,
}

impl QuoteRequest {
    /// Creates a request from validated parts.
    #[must_use]
    pub fn new(corridor: Corridor, amount: SendAmount) -> Self {
        Self { corridor, amount }
    }

    /// Parses a request from raw codes and amount text.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` for invalid codes or a non-positive amount.
    pub fn parse(
        source_country: &str,
        dest_country: &str,
        source_currency: &str,
        dest_currency: &str,
        amount: &str,
    ) -> DomainResult<Self> {
        Ok(Self::new(
            Corridor::parse(source_country, dest_country, source_currency, dest_currency)?,
            SendAmount::parse(amount)?,
        ))
    }

    /// Returns the corridor.
    #[inline]
    #[must_use]
    pub fn corridor(&self) -> &Corridor {
        &self.corridor
    }

    /// Returns the send amount.
    #[inline]
    #[must_use]
    pub fn amount(&self) -> SendAmount {
        self.amount
    }
}

impl fmt::Display for QuoteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.corridor)
    }
}
