//! # JSON API Provider
//!
//! Generic adapter for providers exposing a quote endpoint over HTTP.
//!
//! The mapped parameters are sent as a query string and the response body
//! is expected to look like:
//!
//! ```json
//! {
//!   "exchange_rate": "83.25",
//!   "fee": "4.99",
//!   "destination_amount": "82834.58",
//!   "payment_method": "bank_transfer",
//!   "delivery_method": "bank_deposit",
//!   "delivery_time_minutes": 120
//! }
//! ```
//!
//! Only `exchange_rate` is required. A body carrying an `error` string is
//! reported as a failed quote.

use crate::domain::entities::QuoteResult;
use crate::domain::value_objects::{CurrencyCode, FailureKind, ProviderId};
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::params::{CanonicalParam, ParameterMapping, ProviderParams};
use crate::infrastructure::providers::traits::QuoteProvider;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Deserialize)]
struct QuoteBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    exchange_rate: Option<Decimal>,
    #[serde(default)]
    fee: Option<Decimal>,
    #[serde(default)]
    destination_amount: Option<Decimal>,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default)]
    delivery_method: Option<String>,
    #[serde(default)]
    delivery_time_minutes: Option<u32>,
}

/// Provider adapter for a JSON quote endpoint.
#[derive(Debug, Clone)]
pub struct JsonApiProvider {
    provider_id: ProviderId,
    endpoint: String,
    client: HttpClient,
    mapping: ParameterMapping,
}

impl JsonApiProvider {
    /// Creates an adapter for `endpoint`.
    ///
    /// `mapping` must be the same table the engine resolves parameters
    /// with, so the adapter can read the amount and currencies back.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the HTTP client cannot be built.
    pub fn new(
        provider_id: ProviderId,
        endpoint: impl Into<String>,
        timeout_ms: u64,
        mapping: ParameterMapping,
    ) -> ProviderResult<Self> {
        Ok(Self {
            provider_id,
            endpoint: endpoint.into(),
            client: HttpClient::new(timeout_ms)?,
            mapping,
        })
    }

    /// Returns the configured endpoint.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn param<'a>(&self, params: &'a ProviderParams, param: CanonicalParam) -> ProviderResult<&'a str> {
        params.require(self.mapping.name_for(&self.provider_id, param))
    }

    fn currency(&self, params: &ProviderParams, param: CanonicalParam) -> ProviderResult<CurrencyCode> {
        CurrencyCode::parse(self.param(params, param)?)
            .map_err(|e| ProviderError::invalid_request(e.to_string()))
    }

    fn parse_body(&self, params: &ProviderParams, body: QuoteBody) -> ProviderResult<QuoteResult> {
        if let Some(message) = body.error {
            return Ok(QuoteResult::failure(
                self.provider_id.clone(),
                FailureKind::Provider,
                message,
            ));
        }

        let rate = body
            .exchange_rate
            .ok_or_else(|| ProviderError::protocol("response is missing `exchange_rate`"))?;
        let amount = params.decimal(self.mapping.name_for(&self.provider_id, CanonicalParam::Amount))?;

        let mut builder = QuoteResult::builder(
            self.provider_id.clone(),
            amount,
            self.currency(params, CanonicalParam::SourceCurrency)?,
            self.currency(params, CanonicalParam::DestCurrency)?,
            rate,
        )
        .maybe_fee(body.fee)
        .maybe_delivery_time_minutes(body.delivery_time_minutes);

        if let Some(destination_amount) = body.destination_amount {
            builder = builder.destination_amount(destination_amount);
        }
        if let Some(method) = body.payment_method {
            builder = builder.payment_method(method);
        }
        if let Some(method) = body.delivery_method {
            builder = builder.delivery_method(method);
        }

        builder
            .build()
            .map_err(|e| ProviderError::protocol(e.to_string()))
    }
}

#[async_trait]
impl QuoteProvider for JsonApiProvider {
    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    async fn get_quote(&self, params: &ProviderParams) -> ProviderResult<QuoteResult> {
        let query: Vec<(&str, &str)> = params.iter().collect();
        let body: QuoteBody = self.client.get_with_params(&self.endpoint, &query).await?;
        self.parse_body(params, body)
    }
}
