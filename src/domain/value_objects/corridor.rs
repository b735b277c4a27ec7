//! # Corridor Value Objects
//!
//! Normalized country and currency codes and the [`Corridor`] they form.
//!
//! Codes are upper-cased and validated on construction so that every
//! downstream consumer (provider parameters, cache keys) sees one canonical
//! spelling.
//!
//! # Examples
//!
//! ```
//! use remit_quotes::domain::value_objects::corridor::Corridor;
//!
//! let corridor = Corridor::parse("us", "in", "usd", "inr").unwrap();
//! assert_eq!(corridor.to_string(), "US/USD->IN/INR");
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

fn normalize_alpha(raw: &str, len: usize) -> Option<String> {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() == len && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code)
    } else {
        None
    }
}

/// Two-letter ISO 3166 country code, upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Parses and normalizes a country code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCountryCode` unless the input is exactly
    /// two ASCII letters after trimming.
    pub fn parse(raw: impl AsRef<str>) -> DomainResult<Self> {
        normalize_alpha(raw.as_ref(), 2)
            .map(Self)
            .ok_or_else(|| DomainError::InvalidCountryCode(raw.as_ref().to_string()))
    }

    /// Returns the code as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CountryCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Three-letter ISO 4217 currency code, upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses and normalizes a currency code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCurrencyCode` unless the input is exactly
    /// three ASCII letters after trimming.
    pub fn parse(raw: impl AsRef<str>) -> DomainResult<Self> {
        normalize_alpha(raw.as_ref(), 3)
            .map(Self)
            .ok_or_else(|| DomainError::InvalidCurrencyCode(raw.as_ref().to_string()))
    }

    /// Returns the code as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A remittance route: source country/currency to destination country/currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Corridor {
    source_country: CountryCode,
    dest_country: CountryCode,
    source_currency: CurrencyCode,
    dest_currency: CurrencyCode,
}

impl Corridor {
    /// Creates a corridor from already-validated codes.
    #[must_use]
    pub fn new(
        source_country: CountryCode,
        dest_country: CountryCode,
        source_currency: CurrencyCode,
        dest_currency: CurrencyCode,
    ) -> Self {
        Self {
            source_country,
            dest_country,
            source_currency,
            dest_currency,
        }
    }

    /// Parses a corridor from raw codes.
    ///
    /// # Errors
    ///
    /// Returns the first country or currency code validation error.
    pub fn parse(
        source_country: &str,
        dest_country: &str,
        source_currency: &str,
        dest_currency: &str,
    ) -> DomainResult<Self> {
        Ok(Self::new(
            CountryCode::parse(source_country)?,
            CountryCode::parse(dest_country)?,
            CurrencyCode::parse(source_currency)?,
            CurrencyCode::parse(dest_currency)?,
        ))
    }

    /// Returns the source country.
    #[inline]
    #[must_use]
    pub fn source_country(&self) -> &CountryCode {
        &self.source_country
    }

    /// Returns the destination country.
    #[inline]
    #[must_use]
    pub fn dest_country(&self) -> &CountryCode {
        &self.dest_country
    }

    /// Returns the source currency.
    #[inline]
    #[must_use]
    pub fn source_currency(&self) -> &CurrencyCode {
        &self.source_currency
    }

    /// Returns the destination currency.
    #[inline]
    #[must_use]
    pub fn dest_currency(&self) -> &CurrencyCode {
        &self.dest_currency
    }
}

impl fmt::Display for Corridor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}->{}/{}",
            self.source_country, self.source_currency, self.dest_country, self.dest_currency
        )
    }
}
