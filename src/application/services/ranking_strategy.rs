//! # Ranking Strategy
//!
//! Strategies for ordering successful quotes.
//!
//! This module provides the [`RankingStrategy`] trait and one implementation
//! per [`SortPolicy`]. Every strategy is a stable sort: quotes that compare
//! equal keep their input order, and quotes missing the sort field go last.
//!
//! # Examples
//!
//! ```ignore
//! use remit_quotes::application::services::ranking_strategy::rank_quotes;
//!
//! let ranked = rank_quotes(quotes, &QuoteFilters::new(), Some("best_rate"));
//! ```

use crate::application::services::quote_filter::QuoteFilters;
use crate::domain::entities::QuoteResult;
use crate::domain::value_objects::SortPolicy;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Trait for ranking strategies.
pub trait RankingStrategy: Send + Sync + fmt::Debug {
    /// Orders quotes best first.
    fn rank(&self, quotes: Vec<QuoteResult>) -> Vec<QuoteResult>;

    /// Returns the policy name of this strategy.
    fn name(&self) -> &'static str;
}

/// Compares two optional keys, placing `None` after every `Some`.
fn missing_last<T: Ord>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn sorted_by_key<T: Ord>(
    mut quotes: Vec<QuoteResult>,
    key: impl Fn(&QuoteResult) -> Option<T>,
    descending: bool,
) -> Vec<QuoteResult> {
    quotes.sort_by(|a, b| missing_last(key(a), key(b), descending));
    quotes
}

/// Highest exchange rate first. A zero rate counts as missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestRateStrategy;

impl RankingStrategy for BestRateStrategy {
    fn rank(&self, quotes: Vec<QuoteResult>) -> Vec<QuoteResult> {
        sorted_by_key(
            quotes,
            |q| q.exchange_rate().filter(|rate| !rate.is_zero()),
            true,
        )
    }

    fn name(&self) -> &'static str {
        SortPolicy::BestRate.as_str()
    }
}

/// Lowest fee first.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowestFeeStrategy;

impl RankingStrategy for LowestFeeStrategy {
    fn rank(&self, quotes: Vec<QuoteResult>) -> Vec<QuoteResult> {
        sorted_by_key(quotes, QuoteResult::fee, false)
    }

    fn name(&self) -> &'static str {
        SortPolicy::LowestFee.as_str()
    }
}

/// Shortest delivery estimate first.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastestTimeStrategy;

impl RankingStrategy for FastestTimeStrategy {
    fn rank(&self, quotes: Vec<QuoteResult>) -> Vec<QuoteResult> {
        sorted_by_key(quotes, QuoteResult::delivery_time_minutes, false)
    }

    fn name(&self) -> &'static str {
        SortPolicy::FastestTime.as_str()
    }
}

/// Highest composite score first, see [`best_value_score`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BestValueStrategy;

impl RankingStrategy for BestValueStrategy {
    fn rank(&self, quotes: Vec<QuoteResult>) -> Vec<QuoteResult> {
        sorted_by_key(quotes, best_value_score, true)
    }

    fn name(&self) -> &'static str {
        SortPolicy::BestValue.as_str()
    }
}

/// Composite score used by [`BestValueStrategy`]:
///
/// `0.5 * rate + 0.3 * (100 - fee * 10) + 0.2 * (100 - min(100, minutes / 30))`
///
/// The time term is clamped, the fee term is not, so a large fee can push
/// the score below zero. Missing rate or fee count as zero; a missing
/// delivery estimate takes the clamped maximum. Returns `None` on overflow.
#[must_use]
pub fn best_value_score(quote: &QuoteResult) -> Option<Decimal> {
    let rate = quote.exchange_rate().unwrap_or(Decimal::ZERO);
    let fee = quote.fee().unwrap_or(Decimal::ZERO);
    let time = match quote.delivery_time_minutes() {
        Some(minutes) => Decimal::from(minutes)
            .checked_div(Decimal::from(30))?
            .min(Decimal::ONE_HUNDRED),
        None => Decimal::ONE_HUNDRED,
    };

    let rate_term = rate.checked_mul(Decimal::new(5, 1))?;
    let fee_term = Decimal::ONE_HUNDRED
        .checked_sub(fee.checked_mul(Decimal::TEN)?)?
        .checked_mul(Decimal::new(3, 1))?;
    let time_term = Decimal::ONE_HUNDRED
        .checked_sub(time)?
        .checked_mul(Decimal::new(2, 1))?;

    rate_term.checked_add(fee_term)?.checked_add(time_term)
}

/// Returns the strategy implementing a policy.
#[must_use]
pub fn strategy_for(policy: SortPolicy) -> Arc<dyn RankingStrategy> {
    match policy {
        SortPolicy::BestRate => Arc::new(BestRateStrategy),
        SortPolicy::LowestFee => Arc::new(LowestFeeStrategy),
        SortPolicy::FastestTime => Arc::new(FastestTimeStrategy),
        SortPolicy::BestValue => Arc::new(BestValueStrategy),
    }
}

/// Filters then sorts successful quotes.
///
/// With no policy name, or one that is not recognized, the filtered quotes
/// keep their input order.
#[must_use]
pub fn rank_quotes(
    quotes: Vec<QuoteResult>,
    filters: &QuoteFilters,
    sort_by: Option<&str>,
) -> Vec<QuoteResult> {
    let filtered = filters.apply(quotes);
    match sort_by {
        Some(name) => match SortPolicy::from_name(name) {
            Some(policy) => strategy_for(policy).rank(filtered),
            None => {
                tracing::debug!(sort_by = name, "unknown sort policy, keeping input order");
                filtered
            }
        },
        None => filtered,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{CurrencyCode, ProviderId};
    use proptest::prelude::*;

    fn quote(id: &str, rate: Decimal, fee: Option<Decimal>, minutes: Option<u32>) -> QuoteResult {
        QuoteResult::builder(
            ProviderId::new(id),
            Decimal::from(1000),
            CurrencyCode::parse("USD").unwrap(),
            CurrencyCode::parse("INR").unwrap(),
            rate,
        )
        .maybe_fee(fee)
        .maybe_delivery_time_minutes(minutes)
        .build()
        .unwrap()
    }

    fn ids(quotes: &[QuoteResult]) -> Vec<&str> {
        quotes.iter().map(|q| q.provider_id().as_str()).collect()
    }

    fn sample() -> Vec<QuoteResult> {
        vec![
            quote("a", Decimal::new(830, 1), Some(Decimal::new(499, 2)), Some(60)),
            quote("b", Decimal::new(835, 1), None, Some(2880)),
            quote("c", Decimal::ZERO, Some(Decimal::ZERO), None),
            quote("d", Decimal::new(832, 1), Some(Decimal::from(2)), Some(10)),
        ]
    }

    #[test]
    fn best_rate_descending_zero_last() {
        let ranked = BestRateStrategy.rank(sample());
        assert_eq!(ids(&ranked), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn lowest_fee_ascending_missing_last() {
        let ranked = LowestFeeStrategy.rank(sample());
        assert_eq!(ids(&ranked), vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn fastest_time_ascending_missing_last() {
        let ranked = FastestTimeStrategy.rank(sample());
        assert_eq!(ids(&ranked), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn best_value_score_formula() {
        // 0.5*80 + 0.3*(100 - 20) + 0.2*(100 - 2) = 40 + 24 + 19.6
        let q = quote("a", Decimal::from(80), Some(Decimal::from(2)), Some(60));
        assert_eq!(best_value_score(&q), Some(Decimal::new(836, 1)));
    }

    #[test]
    fn best_value_fee_term_is_unclamped() {
        // 0.5*80 + 0.3*(100 - 2000) + 0.2*(100 - 0) = 40 - 570 + 20
        let q = quote("a", Decimal::from(80), Some(Decimal::from(200)), Some(0));
        assert_eq!(best_value_score(&q), Some(Decimal::from(-510)));
    }

    #[test]
    fn best_value_time_term_is_clamped() {
        let slow = quote("a", Decimal::from(80), None, Some(100_000));
        let unknown = quote("b", Decimal::from(80), None, None);
        assert_eq!(best_value_score(&slow), best_value_score(&unknown));
        // 0.5*80 + 0.3*100 + 0
        assert_eq!(best_value_score(&unknown), Some(Decimal::from(70)));
    }

    #[test]
    fn best_value_prefers_cheap_fast_quotes() {
        let ranked = BestValueStrategy.rank(vec![
            quote("pricey", Decimal::from(83), Some(Decimal::from(15)), Some(60)),
            quote("cheap", Decimal::from(82), Some(Decimal::ONE), Some(60)),
        ]);
        assert_eq!(ids(&ranked), vec!["cheap", "pricey"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let ranked = BestRateStrategy.rank(vec![
            quote("first", Decimal::from(80), None, None),
            quote("second", Decimal::from(80), None, None),
        ]);
        assert_eq!(ids(&ranked), vec!["first", "second"]);
    }

    #[test]
    fn unknown_or_missing_policy_keeps_order() {
        let filters = QuoteFilters::new();
        assert_eq!(ids(&rank_quotes(sample(), &filters, None)), vec!["a", "b", "c", "d"]);
        assert_eq!(
            ids(&rank_quotes(sample(), &filters, Some("cheapest"))),
            vec!["a", "b", "c", "d"]
        );
    }

    #[test]
    fn rank_quotes_filters_before_sorting() {
        let filters = QuoteFilters::new().with_max_fee(Decimal::from(3));
        let ranked = rank_quotes(sample(), &filters, Some("best_rate"));
        assert_eq!(ids(&ranked), vec!["d", "c"]);
    }

    #[test]
    fn strategy_names_match_policies() {
        for policy in SortPolicy::ALL {
            assert_eq!(strategy_for(policy).name(), policy.as_str());
        }
    }

    fn arb_quote() -> impl Strategy<Value = QuoteResult> {
        (
            0i64..100_000,
            prop::option::of(0i64..5_000),
            prop::option::of(0u32..10_000),
        )
            .prop_map(|(rate, fee, minutes)| {
                quote(
                    "p",
                    Decimal::new(rate, 3),
                    fee.map(|f| Decimal::new(f, 2)),
                    minutes,
                )
            })
    }

    proptest! {
        #[test]
        fn best_rate_is_non_increasing(quotes in prop::collection::vec(arb_quote(), 0..30)) {
            let ranked = BestRateStrategy.rank(quotes);
            let rates: Vec<Decimal> = ranked
                .iter()
                .filter_map(|q| q.exchange_rate())
                .filter(|r| !r.is_zero())
                .collect();
            for pair in rates.windows(2) {
                prop_assert!(pair[0] >= pair[1]);
            }
        }

        #[test]
        fn lowest_fee_is_non_decreasing_with_missing_last(
            quotes in prop::collection::vec(arb_quote(), 0..30)
        ) {
            let ranked = LowestFeeStrategy.rank(quotes);
            let first_missing = ranked.iter().position(|q| q.fee().is_none()).unwrap_or(ranked.len());
            prop_assert!(ranked[first_missing..].iter().all(|q| q.fee().is_none()));
            for pair in ranked[..first_missing].windows(2) {
                prop_assert!(pair[0].fee().unwrap() <= pair[1].fee().unwrap());
            }
        }

        #[test]
        fn ranking_is_a_permutation(quotes in prop::collection::vec(arb_quote(), 0..30)) {
            for policy in SortPolicy::ALL {
                let ranked = strategy_for(policy).rank(quotes.clone());
                prop_assert_eq!(ranked.len(), quotes.len());
            }
        }
    }
}
