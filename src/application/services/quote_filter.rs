//! # Quote Filters
//!
//! Caller-supplied constraints applied to successful quotes before ranking.
//!
//! Filters run in a fixed order: the custom predicate, then the delivery
//! time ceiling, then the fee ceiling. Once a ceiling is set, quotes with
//! no value for that field are dropped.

use crate::domain::entities::QuoteResult;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

/// Custom predicate over a quote.
#[derive(Clone)]
pub struct QuotePredicate(Arc<dyn Fn(&QuoteResult) -> bool + Send + Sync>);

impl QuotePredicate {
    /// Wraps a closure.
    #[must_use]
    pub fn new(predicate: impl Fn(&QuoteResult) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    /// Returns true if the quote is kept.
    #[must_use]
    pub fn matches(&self, quote: &QuoteResult) -> bool {
        (self.0)(quote)
    }
}

impl fmt::Debug for QuotePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("QuotePredicate(..)")
    }
}

/// Optional constraints on the ranked output.
#[derive(Debug, Clone, Default)]
pub struct QuoteFilters {
    max_fee: Option<Decimal>,
    max_delivery_minutes: Option<u32>,
    predicate: Option<QuotePredicate>,
}

impl QuoteFilters {
    /// Creates an empty filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only quotes with `fee <= max_fee`.
    #[must_use]
    pub fn with_max_fee(mut self, max_fee: Decimal) -> Self {
        self.max_fee = Some(max_fee);
        self
    }

    /// Keeps only quotes delivering within `minutes`.
    #[must_use]
    pub fn with_max_delivery_minutes(mut self, minutes: u32) -> Self {
        self.max_delivery_minutes = Some(minutes);
        self
    }

    /// Keeps only quotes matching `predicate`.
    #[must_use]
    pub fn with_predicate(
        mut self,
        predicate: impl Fn(&QuoteResult) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Some(QuotePredicate::new(predicate));
        self
    }

    /// Returns the fee ceiling.
    #[inline]
    #[must_use]
    pub fn max_fee(&self) -> Option<Decimal> {
        self.max_fee
    }

    /// Returns the delivery time ceiling in minutes.
    #[inline]
    #[must_use]
    pub fn max_delivery_minutes(&self) -> Option<u32> {
        self.max_delivery_minutes
    }

    /// Returns true if no constraint is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max_fee.is_none() && self.max_delivery_minutes.is_none() && self.predicate.is_none()
    }

    /// Applies every constraint, preserving input order.
    #[must_use]
    pub fn apply(&self, mut quotes: Vec<QuoteResult>) -> Vec<QuoteResult> {
        if let Some(predicate) = &self.predicate {
            quotes.retain(|quote| predicate.matches(quote));
        }
        if let Some(ceiling) = self.max_delivery_minutes {
            quotes.retain(|quote| {
                quote
                    .delivery_time_minutes()
                    .is_some_and(|minutes| minutes <= ceiling)
            });
        }
        if let Some(ceiling) = self.max_fee {
            quotes.retain(|quote| quote.fee().is_some_and(|fee| fee <= ceiling));
        }
        quotes
    }
}
