//! # Quote Result Entity
//!
//! The standardized outcome of one provider call.
//!
//! A [`QuoteResult`] is either a success carrying an exchange rate and a
//! destination amount, or a failure carrying a non-empty error message and a
//! [`FailureKind`]. Fields are private so the two shapes cannot be mixed.
//!
//! # Examples
//!
//! ```
//! use remit_quotes::domain::entities::quote_result::QuoteResult;
//! use remit_quotes::domain::value_objects::{CurrencyCode, FailureKind, ProviderId};
//! use rust_decimal::Decimal;
//!
//! let quote = QuoteResult::builder(
//!     ProviderId::new("wise"),
//!     Decimal::from(1000),
//!     CurrencyCode::parse("USD").unwrap(),
//!     CurrencyCode::parse("INR").unwrap(),
//!     Decimal::new(835, 1),
//! )
//! .fee(Decimal::new(499, 2))
//! .delivery_time_minutes(60)
//! .build()
//! .unwrap();
//! assert!(quote.is_success());
//! assert!(quote.destination_amount().is_some());
//!
//! let failed = QuoteResult::failure(ProviderId::new("xoom"), FailureKind::Provider, "HTTP 503");
//! assert!(!failed.is_success());
//! assert_eq!(failed.error_message(), Some("HTTP 503"));
//! ```

use crate::domain::entities::quote_request::QuoteRequest;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{CurrencyCode, FailureKind, ProviderId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const UNKNOWN_ERROR: &str = "unknown provider error";

/// Standardized quote outcome for a single provider.
///
/// # Invariants
///
/// - `success == true` implies `exchange_rate` and `destination_amount` are set
/// - `success == false` implies `error_message` is set and non-empty
///
/// Deserialization checks the same invariants, so a cached or decoded
/// quote cannot break them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuoteResultRecord")]
pub struct QuoteResult {
    provider_id: ProviderId,
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure_kind: Option<FailureKind>,
    send_amount: Option<Decimal>,
    source_currency: Option<CurrencyCode>,
    destination_amount: Option<Decimal>,
    destination_currency: Option<CurrencyCode>,
    exchange_rate: Option<Decimal>,
    fee: Option<Decimal>,
    payment_method: Option<String>,
    delivery_method: Option<String>,
    delivery_time_minutes: Option<u32>,
    timestamp: Timestamp,
}

impl QuoteResult {
    /// Starts building a successful quote.
    #[must_use]
    pub fn builder(
        provider_id: ProviderId,
        send_amount: Decimal,
        source_currency: CurrencyCode,
        destination_currency: CurrencyCode,
        exchange_rate: Decimal,
    ) -> QuoteResultBuilder {
        QuoteResultBuilder::new(
            provider_id,
            send_amount,
            source_currency,
            destination_currency,
            exchange_rate,
        )
    }

    /// Creates a failed outcome.
    ///
    /// A blank message is replaced so the failure invariant always holds.
    #[must_use]
    pub fn failure(provider_id: ProviderId, kind: FailureKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        };

        Self {
            provider_id,
            success: false,
            error_message: Some(message),
            failure_kind: Some(kind),
            send_amount: None,
            source_currency: None,
            destination_amount: None,
            destination_currency: None,
            exchange_rate: None,
            fee: None,
            payment_method: None,
            delivery_method: None,
            delivery_time_minutes: None,
            timestamp: Timestamp::now(),
        }
    }

    /// Creates the failure recorded for a provider that missed the dispatch deadline.
    #[must_use]
    pub fn timed_out(provider_id: ProviderId, deadline: Duration) -> Self {
        Self::failure(
            provider_id,
            FailureKind::Timeout,
            format!("no response within {}ms", deadline.as_millis()),
        )
    }

    /// Fills in the request context (amount and currencies) that a failure lacks.
    #[must_use]
    pub fn with_request_context(mut self, request: &QuoteRequest) -> Self {
        let corridor = request.corridor();
        self.send_amount.get_or_insert(request.amount().get());
        self.source_currency
            .get_or_insert_with(|| corridor.source_currency().clone());
        self.destination_currency
            .get_or_insert_with(|| corridor.dest_currency().clone());
        self
    }

    /// Returns the provider id.
    #[inline]
    #[must_use]
    pub fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    /// Returns true for a successful quote.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Returns the error message of a failure.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Returns the failure classification.
    #[inline]
    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure_kind
    }

    /// Returns the amount sent.
    #[inline]
    #[must_use]
    pub fn send_amount(&self) -> Option<Decimal> {
        self.send_amount
    }

    /// Returns the source currency.
    #[must_use]
    pub fn source_currency(&self) -> Option<&CurrencyCode> {
        self.source_currency.as_ref()
    }

    /// Returns the amount received.
    #[inline]
    #[must_use]
    pub fn destination_amount(&self) -> Option<Decimal> {
        self.destination_amount
    }

    /// Returns the destination currency.
    #[must_use]
    pub fn destination_currency(&self) -> Option<&CurrencyCode> {
        self.destination_currency.as_ref()
    }

    /// Returns the exchange rate.
    #[inline]
    #[must_use]
    pub fn exchange_rate(&self) -> Option<Decimal> {
        self.exchange_rate
    }

    /// Returns the fee, in source currency.
    #[inline]
    #[must_use]
    pub fn fee(&self) -> Option<Decimal> {
        self.fee
    }

    /// Returns the payment method.
    #[must_use]
    pub fn payment_method(&self) -> Option<&str> {
        self.payment_method.as_deref()
    }

    /// Returns the delivery method.
    #[must_use]
    pub fn delivery_method(&self) -> Option<&str> {
        self.delivery_method.as_deref()
    }

    /// Returns the estimated delivery time in minutes.
    #[inline]
    #[must_use]
    pub fn delivery_time_minutes(&self) -> Option<u32> {
        self.delivery_time_minutes
    }

    /// Returns when the outcome was produced.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// Wire shape of [`QuoteResult`], validated on the way in.
#[derive(Deserialize)]
struct QuoteResultRecord {
    provider_id: ProviderId,
    success: bool,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    failure_kind: Option<FailureKind>,
    #[serde(default)]
    send_amount: Option<Decimal>,
    #[serde(default)]
    source_currency: Option<CurrencyCode>,
    #[serde(default)]
    destination_amount: Option<Decimal>,
    #[serde(default)]
    destination_currency: Option<CurrencyCode>,
    #[serde(default)]
    exchange_rate: Option<Decimal>,
    #[serde(default)]
    fee: Option<Decimal>,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default)]
    delivery_method: Option<String>,
    #[serde(default)]
    delivery_time_minutes: Option<u32>,
    timestamp: Timestamp,
}

impl TryFrom<QuoteResultRecord> for QuoteResult {
    type Error = DomainError;

    fn try_from(record: QuoteResultRecord) -> DomainResult<Self> {
        let invalid = |reason: &str| {
            DomainError::InvalidQuote(format!("{}: {reason}", record.provider_id))
        };

        if record.success {
            if record.exchange_rate.is_none() || record.destination_amount.is_none() {
                return Err(invalid("successful quote without rate or destination amount"));
            }
            if record.error_message.is_some() || record.failure_kind.is_some() {
                return Err(invalid("successful quote carries an error"));
            }
            if record.exchange_rate.is_some_and(|rate| rate < Decimal::ZERO) {
                return Err(invalid("exchange rate must not be negative"));
            }
            if record.fee.is_some_and(|fee| fee < Decimal::ZERO) {
                return Err(invalid("fee must not be negative"));
            }
            if record.send_amount.is_some_and(|amount| amount <= Decimal::ZERO) {
                return Err(invalid("send amount must be positive"));
            }
        } else if record
            .error_message
            .as_deref()
            .is_none_or(|message| message.trim().is_empty())
        {
            return Err(invalid("failed quote without an error message"));
        }

        Ok(Self {
            provider_id: record.provider_id,
            success: record.success,
            error_message: record.error_message,
            failure_kind: record.failure_kind,
            send_amount: record.send_amount,
            source_currency: record.source_currency,
            destination_amount: record.destination_amount,
            destination_currency: record.destination_currency,
            exchange_rate: record.exchange_rate,
            fee: record.fee,
            payment_method: record.payment_method,
            delivery_method: record.delivery_method,
            delivery_time_minutes: record.delivery_time_minutes,
            timestamp: record.timestamp,
        })
    }
}

impl fmt::Display for QuoteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.success, self.exchange_rate) {
            (true, Some(rate)) => write!(f, "QuoteResult({} rate={})", self.provider_id, rate),
            _ => write!(
                f,
                "QuoteResult({} failed: {})",
                self.provider_id,
                self.error_message.as_deref().unwrap_or(UNKNOWN_ERROR)
            ),
        }
    }
}

/// Builder for successful [`QuoteResult`]s.
#[derive(Debug, Clone)]
pub struct QuoteResultBuilder {
    provider_id: ProviderId,
    send_amount: Decimal,
    source_currency: CurrencyCode,
    destination_currency: CurrencyCode,
    exchange_rate: Decimal,
    destination_amount: Option<Decimal>,
    fee: Option<Decimal>,
    payment_method: Option<String>,
    delivery_method: Option<String>,
    delivery_time_minutes: Option<u32>,
    timestamp: Option<Timestamp>,
}

impl QuoteResultBuilder {
    /// Creates a builder with the mandatory fields.
    #[must_use]
    pub fn new(
        provider_id: ProviderId,
        send_amount: Decimal,
        source_currency: CurrencyCode,
        destination_currency: CurrencyCode,
        exchange_rate: Decimal,
    ) -> Self {
        Self {
            provider_id,
            send_amount,
            source_currency,
            destination_currency,
            exchange_rate,
            destination_amount: None,
            fee: None,
            payment_method: None,
            delivery_method: None,
            delivery_time_minutes: None,
            timestamp: None,
        }
    }

    /// Sets the destination amount quoted by the provider.
    #[must_use]
    pub fn destination_amount(mut self, amount: Decimal) -> Self {
        self.destination_amount = Some(amount);
        self
    }

    /// Sets the fee.
    #[must_use]
    pub fn fee(mut self, fee: Decimal) -> Self {
        self.fee = Some(fee);
        self
    }

    /// Sets the fee if one is known.
    #[must_use]
    pub fn maybe_fee(mut self, fee: Option<Decimal>) -> Self {
        self.fee = fee;
        self
    }

    /// Sets the payment method.
    #[must_use]
    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    /// Sets the delivery method.
    #[must_use]
    pub fn delivery_method(mut self, method: impl Into<String>) -> Self {
        self.delivery_method = Some(method.into());
        self
    }

    /// Sets the delivery estimate in minutes.
    #[must_use]
    pub fn delivery_time_minutes(mut self, minutes: u32) -> Self {
        self.delivery_time_minutes = Some(minutes);
        self
    }

    /// Sets the delivery estimate if one is known.
    #[must_use]
    pub fn maybe_delivery_time_minutes(mut self, minutes: Option<u32>) -> Self {
        self.delivery_time_minutes = minutes;
        self
    }

    /// Overrides the quote timestamp.
    #[must_use]
    pub fn timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Builds the quote.
    ///
    /// When no destination amount was given it is derived as
    /// `(send_amount - fee) * exchange_rate`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuote` if the send amount is not positive,
    /// the rate or fee is negative, or the derived destination amount
    /// overflows.
    pub fn build(self) -> DomainResult<QuoteResult> {
        if self.send_amount <= Decimal::ZERO {
            return Err(DomainError::InvalidQuote(format!(
                "send amount must be positive, got {}",
                self.send_amount
            )));
        }
        if self.exchange_rate < Decimal::ZERO {
            return Err(DomainError::InvalidQuote(format!(
                "exchange rate must not be negative, got {}",
                self.exchange_rate
            )));
        }
        if let Some(fee) = self.fee.filter(|fee| *fee < Decimal::ZERO) {
            return Err(DomainError::InvalidQuote(format!(
                "fee must not be negative, got {fee}"
            )));
        }

        let destination_amount = match self.destination_amount {
            Some(amount) => amount,
            None => self
                .send_amount
                .checked_sub(self.fee.unwrap_or(Decimal::ZERO))
                .and_then(|net| net.checked_mul(self.exchange_rate))
                .ok_or_else(|| {
                    DomainError::InvalidQuote("destination amount overflow".to_string())
                })?,
        };

        Ok(QuoteResult {
            provider_id: self.provider_id,
            success: true,
            error_message: None,
            failure_kind: None,
            send_amount: Some(self.send_amount),
            source_currency: Some(self.source_currency),
            destination_amount: Some(destination_amount),
            destination_currency: Some(self.destination_currency),
            exchange_rate: Some(self.exchange_rate),
            fee: self.fee,
            payment_method: self.payment_method,
            delivery_method: self.delivery_method,
            delivery_time_minutes: self.delivery_time_minutes,
            timestamp: self.timestamp.unwrap_or_else(Timestamp::now),
        })
    }
}
