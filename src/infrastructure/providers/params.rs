//! # Provider Parameters
//!
//! Canonical request parameters and the static table that renames them per
//! provider.
//!
//! Providers all answer the same question but spell their inputs
//! differently (`amount`, `send_amount`, `sourceAmount`, ...). Instead of
//! inspecting call signatures at runtime, each provider's names are listed
//! in a [`ParameterMapping`] built at startup.
//!
//! # Examples
//!
//! ```
//! use remit_quotes::domain::entities::QuoteRequest;
//! use remit_quotes::domain::value_objects::ProviderId;
//! use remit_quotes::infrastructure::providers::params::{CanonicalParam, ParameterMapping};
//!
//! let mapping = ParameterMapping::new()
//!     .with_name("wise", CanonicalParam::Amount, "sourceAmount")
//!     .with_name("wise", CanonicalParam::SourceCurrency, "sourceCurrency");
//!
//! let request = QuoteRequest::parse("US", "IN", "USD", "INR", "1000").unwrap();
//! let params = mapping.resolve(&ProviderId::new("wise"), &request);
//! assert_eq!(params.get("sourceAmount"), Some("1000"));
//! assert_eq!(params.get("dest_country"), Some("IN"));
//! ```

use crate::domain::entities::QuoteRequest;
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Provider-independent request parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalParam {
    /// Send amount.
    Amount,
    /// Source country code.
    SourceCountry,
    /// Destination country code.
    DestCountry,
    /// Source currency code.
    SourceCurrency,
    /// Destination currency code.
    DestCurrency,
}

impl CanonicalParam {
    /// All canonical parameters.
    pub const ALL: [Self; 5] = [
        Self::Amount,
        Self::SourceCountry,
        Self::DestCountry,
        Self::SourceCurrency,
        Self::DestCurrency,
    ];

    /// Returns the canonical name, used when a provider has no override.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::SourceCountry => "source_country",
            Self::DestCountry => "dest_country",
            Self::SourceCurrency => "source_currency",
            Self::DestCurrency => "dest_currency",
        }
    }

    fn value_of(&self, request: &QuoteRequest) -> String {
        let corridor = request.corridor();
        match self {
            Self::Amount => request.amount().plain(),
            Self::SourceCountry => corridor.source_country().to_string(),
            Self::DestCountry => corridor.dest_country().to_string(),
            Self::SourceCurrency => corridor.source_currency().to_string(),
            Self::DestCurrency => corridor.dest_currency().to_string(),
        }
    }
}

impl fmt::Display for CanonicalParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named parameters handed to a provider call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderParams(BTreeMap<String, String>);

impl ProviderParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Returns a parameter value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns a parameter value, failing if absent.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidRequest` if the parameter is missing.
    pub fn require(&self, name: &str) -> ProviderResult<&str> {
        self.get(name)
            .ok_or_else(|| ProviderError::invalid_request(format!("missing parameter `{name}`")))
    }

    /// Returns a parameter parsed as a decimal.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidRequest` if the parameter is missing
    /// or not a decimal.
    pub fn decimal(&self, name: &str) -> ProviderResult<Decimal> {
        let raw = self.require(name)?;
        Decimal::from_str(raw).map_err(|e| {
            ProviderError::invalid_request(format!("parameter `{name}` is not a decimal: {e}"))
        })
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Static `{provider_id -> {canonical_param -> provider_param_name}}` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterMapping {
    names: HashMap<ProviderId, HashMap<CanonicalParam, String>>,
}

impl ParameterMapping {
    /// Creates an empty mapping; every provider receives canonical names.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one renamed parameter for a provider.
    #[must_use]
    pub fn with_name(
        mut self,
        provider_id: impl Into<ProviderId>,
        param: CanonicalParam,
        name: impl Into<String>,
    ) -> Self {
        self.insert(provider_id.into(), param, name);
        self
    }

    /// Replaces every renamed parameter of a provider.
    #[must_use]
    pub fn with_provider(
        mut self,
        provider_id: ProviderId,
        names: HashMap<CanonicalParam, String>,
    ) -> Self {
        self.names.insert(provider_id, names);
        self
    }

    /// Adds one renamed parameter for a provider.
    pub fn insert(&mut self, provider_id: ProviderId, param: CanonicalParam, name: impl Into<String>) {
        self.names
            .entry(provider_id)
            .or_default()
            .insert(param, name.into());
    }

    /// Returns the name a provider expects for a canonical parameter.
    #[must_use]
    pub fn name_for(&self, provider_id: &ProviderId, param: CanonicalParam) -> &str {
        self.names
            .get(provider_id)
            .and_then(|names| names.get(&param))
            .map_or(param.as_str(), String::as_str)
    }

    /// Builds the provider-specific parameters for a request.
    #[must_use]
    pub fn resolve(&self, provider_id: &ProviderId, request: &QuoteRequest) -> ProviderParams {
        let mut params = ProviderParams::new();
        for param in CanonicalParam::ALL {
            params.insert(self.name_for(provider_id, param), param.value_of(request));
        }
        params
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request() -> QuoteRequest {
        QuoteRequest::parse("US", "MX", "USD", "MXN", "250.00").unwrap()
    }

    #[test]
    fn unmapped_provider_gets_canonical_names() {
        let params = ParameterMapping::new().resolve(&ProviderId::new("xoom"), &request());
        assert_eq!(params.len(), 5);
        assert_eq!(params.get("amount"), Some("250"));
        assert_eq!(params.get("source_country"), Some("US"));
        assert_eq!(params.get("dest_currency"), Some("MXN"));
    }

    #[test]
    fn mapped_names_replace_canonical_ones() {
        let mapping = ParameterMapping::new()
            .with_name("remitly", CanonicalParam::Amount, "send_amount")
            .with_name("remitly", CanonicalParam::DestCountry, "receive_country");
        let params = mapping.resolve(&ProviderId::new("remitly"), &request());

        assert_eq!(params.get("send_amount"), Some("250"));
        assert_eq!(params.get("receive_country"), Some("MX"));
        assert!(params.get("amount").is_none());
        assert_eq!(params.get("source_currency"), Some("USD"));
    }

    #[test]
    fn mapping_is_per_provider() {
        let mapping = ParameterMapping::new().with_name("a", CanonicalParam::Amount, "amt");
        assert_eq!(mapping.name_for(&ProviderId::new("a"), CanonicalParam::Amount), "amt");
        assert_eq!(
            mapping.name_for(&ProviderId::new("b"), CanonicalParam::Amount),
            "amount"
        );
    }

    #[test]
    fn decimal_accessor() {
        let params = ParameterMapping::new().resolve(&ProviderId::new("x"), &request());
        assert_eq!(params.decimal("amount").unwrap(), Decimal::from(250));
        assert!(params.decimal("source_country").is_err());
        assert!(matches!(
            params.require("nope"),
            Err(ProviderError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn mapping_deserializes_from_config_shape() {
        let json = r#"{"wise": {"amount": "sourceAmount", "dest_currency": "targetCurrency"}}"#;
        let mapping: ParameterMapping = serde_json::from_str(json).unwrap();
        let id = ProviderId::new("wise");
        assert_eq!(mapping.name_for(&id, CanonicalParam::Amount), "sourceAmount");
        assert_eq!(
            mapping.name_for(&id, CanonicalParam::DestCurrency),
            "targetCurrency"
        );
    }
}
