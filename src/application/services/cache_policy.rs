//! # Cache Key & TTL Policy
//!
//! Deterministic cache keys for both tiers and jittered expirations.
//!
//! Keys embed the amount in its canonical form (trailing zeros dropped,
//! at least two decimals), so `100`, `100.0` and `100.00` share one entry
//! while `100.004` gets its own.
//!
//! # Examples
//!
//! ```
//! use remit_quotes::application::services::cache_policy::{jittered_ttl, provider_cache_key};
//! use remit_quotes::domain::entities::QuoteRequest;
//! use remit_quotes::domain::value_objects::ProviderId;
//!
//! let request = QuoteRequest::parse("US", "IN", "USD", "INR", "100").unwrap();
//! assert_eq!(
//!     provider_cache_key(&ProviderId::new("wise"), &request),
//!     "quote:WISE:US:IN:USD:INR:100.00"
//! );
//!
//! let ttl = jittered_ttl(3600, 60);
//! assert!((3540..=3660).contains(&ttl));
//! ```

use crate::domain::entities::QuoteRequest;
use crate::domain::value_objects::{CountryCode, CurrencyCode, ProviderId, SendAmount};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound for every computed TTL.
pub const MIN_TTL_SECS: u64 = 1;

/// Default TTL for a successful provider quote (24h).
pub const DEFAULT_SUCCESS_TTL_SECS: u64 = 86_400;

/// Default jitter bound for successful provider quotes.
pub const DEFAULT_SUCCESS_JITTER_SECS: u64 = 60;

/// Default TTL for a failed provider call (negative cache).
pub const DEFAULT_FAILURE_TTL_SECS: u64 = 300;

/// Returns the per-provider cache key for a request.
#[must_use]
pub fn provider_cache_key(provider_id: &ProviderId, request: &QuoteRequest) -> String {
    let corridor = request.corridor();
    format!(
        "quote:{}:{}:{}:{}:{}:{}",
        provider_id.cache_form(),
        corridor.source_country(),
        corridor.dest_country(),
        corridor.source_currency(),
        corridor.dest_currency(),
        request.amount().canonical()
    )
}

/// Key of one aggregate cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregateKey {
    send_currency: CurrencyCode,
    receive_country: CountryCode,
    amount: SendAmount,
    receive_currency: Option<CurrencyCode>,
}

impl AggregateKey {
    /// Creates a key.
    #[must_use]
    pub fn new(
        send_currency: CurrencyCode,
        receive_country: CountryCode,
        amount: SendAmount,
        receive_currency: Option<CurrencyCode>,
    ) -> Self {
        Self {
            send_currency,
            receive_country,
            amount,
            receive_currency,
        }
    }

    /// Derives the key for a request, including the receive currency.
    #[must_use]
    pub fn for_request(request: &QuoteRequest) -> Self {
        let corridor = request.corridor();
        Self::new(
            corridor.source_currency().clone(),
            corridor.dest_country().clone(),
            request.amount(),
            Some(corridor.dest_currency().clone()),
        )
    }
}

impl fmt::Display for AggregateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "aggregate:{}:{}:{}",
            self.send_currency,
            self.receive_country,
            self.amount.canonical()
        )?;
        if let Some(currency) = &self.receive_currency {
            write!(f, ":{currency}")?;
        }
        Ok(())
    }
}

/// Returns `base` shifted by a uniform offset in `[-jitter_max, +jitter_max]`,
/// never below [`MIN_TTL_SECS`].
#[must_use]
pub fn jittered_ttl(base: u64, jitter_max: u64) -> u64 {
    let base = i64::try_from(base).unwrap_or(i64::MAX);
    let jitter = i64::try_from(jitter_max).unwrap_or(i64::MAX);
    let offset = rand::random_range(-jitter..=jitter);
    let ttl = base.saturating_add(offset);
    u64::try_from(ttl).map_or(MIN_TTL_SECS, |ttl| ttl.max(MIN_TTL_SECS))
}

/// TTLs for per-provider entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlPolicy {
    /// Base TTL for successful quotes.
    pub success_base_secs: u64,
    /// Jitter bound for successful quotes.
    pub success_jitter_secs: u64,
    /// Fixed TTL for failures.
    pub failure_secs: u64,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            success_base_secs: DEFAULT_SUCCESS_TTL_SECS,
            success_jitter_secs: DEFAULT_SUCCESS_JITTER_SECS,
            failure_secs: DEFAULT_FAILURE_TTL_SECS,
        }
    }
}

impl TtlPolicy {
    /// Returns a jittered TTL for a successful quote.
    #[must_use]
    pub fn success_ttl(&self) -> u64 {
        jittered_ttl(self.success_base_secs, self.success_jitter_secs)
    }

    /// Returns the TTL for a failed call.
    #[must_use]
    pub fn failure_ttl(&self) -> u64 {
        self.failure_secs.max(MIN_TTL_SECS)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn request(amount: &str) -> QuoteRequest {
        QuoteRequest::parse("us", "in", "usd", "inr", amount).unwrap()
    }

    #[test]
    fn provider_key_is_normalized() {
        let id = ProviderId::new("Remitly");
        assert_eq!(
            provider_cache_key(&id, &request("100")),
            "quote:REMITLY:US:IN:USD:INR:100.00"
        );
        assert_eq!(
            provider_cache_key(&id, &request("100")),
            provider_cache_key(&id, &request("100.0"))
        );
        assert_ne!(
            provider_cache_key(&id, &request("100")),
            provider_cache_key(&id, &request("100.01"))
        );
        assert_eq!(
            provider_cache_key(&id, &request("100.004")),
            "quote:REMITLY:US:IN:USD:INR:100.004"
        );
    }

    #[test]
    fn provider_key_differs_per_provider() {
        let req = request("250");
        assert_ne!(
            provider_cache_key(&ProviderId::new("wise"), &req),
            provider_cache_key(&ProviderId::new("xoom"), &req)
        );
    }

    #[test]
    fn aggregate_key_format() {
        let key = AggregateKey::for_request(&request("1000.0"));
        assert_eq!(key.to_string(), "aggregate:USD:IN:1000.00:INR");

        let without_currency = AggregateKey::new(
            CurrencyCode::parse("USD").unwrap(),
            CountryCode::parse("MX").unwrap(),
            SendAmount::parse("50").unwrap(),
            None,
        );
        assert_eq!(without_currency.to_string(), "aggregate:USD:MX:50.00");
    }

    #[test]
    fn ttl_floor_is_one_second() {
        assert_eq!(jittered_ttl(0, 0), 1);
        for _ in 0..100 {
            assert!(jittered_ttl(5, 60) >= 1);
        }
    }

    #[test]
    fn zero_jitter_is_exact() {
        assert_eq!(jittered_ttl(300, 0), 300);
    }

    #[test]
    fn default_policy() {
        let policy = TtlPolicy::default();
        assert_eq!(policy.failure_ttl(), 300);
        let ttl = policy.success_ttl();
        assert!((86_340..=86_460).contains(&ttl));
    }

    proptest! {
        #[test]
        fn jitter_stays_in_bounds(_seed in any::<u8>()) {
            let ttl = jittered_ttl(3600, 60);
            prop_assert!((3540..=3660).contains(&ttl));
        }

        #[test]
        fn ttl_never_below_floor(base in 0u64..200, jitter in 0u64..200) {
            prop_assert!(jittered_ttl(base, jitter) >= MIN_TTL_SECS);
        }
    }
}
