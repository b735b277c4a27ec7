//! # Aggregate Result
//!
//! Outcome of one dispatch across every selected provider.

use crate::domain::entities::quote_result::QuoteResult;
use crate::domain::value_objects::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Immutable result of a fan-out/fan-in batch.
///
/// `results` holds the successful quotes after filtering and ranking;
/// `all_results` holds one outcome per dispatched provider, in registry
/// order. Counts are derived from `all_results` at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    batch_id: Uuid,
    success: bool,
    results: Vec<QuoteResult>,
    all_results: Vec<QuoteResult>,
    providers_called: usize,
    successful_providers: usize,
    cache_hits: usize,
    execution_time_ms: u64,
    timestamp: Timestamp,
}

impl AggregateResult {
    /// Creates a result from ranked successes and every provider outcome.
    #[must_use]
    pub fn new(
        batch_id: Uuid,
        results: Vec<QuoteResult>,
        all_results: Vec<QuoteResult>,
        cache_hits: usize,
        execution_time: Duration,
    ) -> Self {
        let successful_providers = all_results.iter().filter(|r| r.is_success()).count();
        Self {
            batch_id,
            success: successful_providers > 0,
            results,
            providers_called: all_results.len(),
            all_results,
            successful_providers,
            cache_hits,
            execution_time_ms: u64::try_from(execution_time.as_millis()).unwrap_or(u64::MAX),
            timestamp: Timestamp::now(),
        }
    }

    /// Creates the result returned when no provider was eligible.
    #[must_use]
    pub fn empty(batch_id: Uuid, execution_time: Duration) -> Self {
        Self::new(batch_id, Vec::new(), Vec::new(), 0, execution_time)
    }

    /// Returns the batch id used for log correlation.
    #[inline]
    #[must_use]
    pub fn batch_id(&self) -> Uuid {
        self.batch_id
    }

    /// Returns true if at least one provider answered successfully.
    #[inline]
    #[must_use]
    pub fn success(&self) -> bool {
        self.success
    }

    /// Returns the ranked successful quotes.
    #[must_use]
    pub fn results(&self) -> &[QuoteResult] {
        &self.results
    }

    /// Consumes the result, returning the ranked successful quotes.
    #[must_use]
    pub fn into_results(self) -> Vec<QuoteResult> {
        self.results
    }

    /// Returns every provider outcome.
    #[must_use]
    pub fn all_results(&self) -> &[QuoteResult] {
        &self.all_results
    }

    /// Returns how many providers were dispatched.
    #[inline]
    #[must_use]
    pub fn providers_called(&self) -> usize {
        self.providers_called
    }

    /// Returns how many providers answered successfully.
    #[inline]
    #[must_use]
    pub fn successful_providers(&self) -> usize {
        self.successful_providers
    }

    /// Returns how many outcomes were served from the per-provider cache.
    #[inline]
    #[must_use]
    pub fn cache_hits(&self) -> usize {
        self.cache_hits
    }

    /// Returns the wall-clock time spent in the batch.
    #[inline]
    #[must_use]
    pub fn execution_time_ms(&self) -> u64 {
        self.execution_time_ms
    }

    /// Returns when the result was assembled.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Returns the top-ranked quote, if any.
    #[must_use]
    pub fn best_quote(&self) -> Option<&QuoteResult> {
        self.results.first()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{CurrencyCode, FailureKind, ProviderId};
    use rust_decimal::Decimal;

    fn ok(id: &str) -> QuoteResult {
        QuoteResult::builder(
            ProviderId::new(id),
            Decimal::from(100),
            CurrencyCode::parse("USD").unwrap(),
            CurrencyCode::parse("PHP").unwrap(),
            Decimal::from(56),
        )
        .build()
        .unwrap()
    }

    #[test]
    fn counts_are_derived() {
        let failed = QuoteResult::failure(ProviderId::new("c"), FailureKind::Provider, "down");
        let all = vec![ok("a"), ok("b"), failed];
        let result = AggregateResult::new(
            Uuid::new_v4(),
            vec![ok("a"), ok("b")],
            all,
            1,
            Duration::from_millis(42),
        );

        assert!(result.success());
        assert_eq!(result.providers_called(), 3);
        assert_eq!(result.successful_providers(), 2);
        assert_eq!(result.cache_hits(), 1);
        assert_eq!(result.execution_time_ms(), 42);
        assert_eq!(result.best_quote().unwrap().provider_id().as_str(), "a");
    }

    #[test]
    fn empty_is_unsuccessful() {
        let result = AggregateResult::empty(Uuid::new_v4(), Duration::ZERO);
        assert!(!result.success());
        assert_eq!(result.providers_called(), 0);
        assert!(result.all_results().is_empty());
        assert!(result.best_quote().is_none());
    }

    #[test]
    fn all_failures_is_unsuccessful() {
        let failed = QuoteResult::failure(ProviderId::new("c"), FailureKind::Timeout, "late");
        let result = AggregateResult::new(Uuid::new_v4(), vec![], vec![failed], 0, Duration::ZERO);
        assert!(!result.success());
        assert_eq!(result.successful_providers(), 0);
    }
}
