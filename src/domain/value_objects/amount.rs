//! # Send Amount
//!
//! Exact decimal amount being sent through a corridor.

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum number of fractional digits in the canonical amount form.
pub const CANONICAL_SCALE: u32 = 2;

/// A strictly positive send amount.
///
/// # Examples
///
/// ```
/// use remit_quotes::domain::value_objects::SendAmount;
///
/// let a = SendAmount::parse("100").unwrap();
/// let b = SendAmount::parse("100.0").unwrap();
/// assert_eq!(a.canonical(), b.canonical());
/// assert_eq!(a.canonical(), "100.00");
/// assert_ne!(a.canonical(), SendAmount::parse("100.004").unwrap().canonical());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct SendAmount(Decimal);

impl SendAmount {
    /// Creates an amount from a decimal.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if the value is zero or negative.
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value <= Decimal::ZERO {
            return Err(DomainError::InvalidAmount(format!(
                "amount must be positive, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Parses an amount from text.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if the text is not a decimal or
    /// the value is not positive.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let value = Decimal::from_str(raw.trim())
            .map_err(|e| DomainError::InvalidAmount(format!("{raw}: {e}")))?;
        Self::new(value)
    }

    /// Returns the underlying decimal.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Decimal {
        self.0
    }

    /// Returns the textual form used in cache keys.
    ///
    /// Trailing zeros are dropped and the result is padded to at least two
    /// decimals, so `100`, `100.0` and `100.000` agree while `100.004` keeps
    /// its own key.
    #[must_use]
    pub fn canonical(&self) -> String {
        let mut value = self.0.normalize();
        if value.scale() < CANONICAL_SCALE {
            value.rescale(CANONICAL_SCALE);
        }
        value.to_string()
    }

    /// Returns the shortest textual form, used when handing the amount to providers.
    #[must_use]
    pub fn plain(&self) -> String {
        self.0.normalize().to_string()
    }
}

impl TryFrom<Decimal> for SendAmount {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SendAmount> for Decimal {
    fn from(amount: SendAmount) -> Self {
        amount.0
    }
}

impl fmt::Display for SendAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
