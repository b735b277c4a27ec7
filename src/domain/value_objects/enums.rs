//! # Domain Enums
//!
//! Sort policies and failure classifications.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named ordering applied to successful quotes.
///
/// Policies are selected by name; an unknown name is not an error and
/// simply leaves the input order untouched.
///
/// # Examples
///
/// ```
/// use remit_quotes::domain::value_objects::SortPolicy;
///
/// assert_eq!(SortPolicy::from_name("best_rate"), Some(SortPolicy::BestRate));
/// assert_eq!(SortPolicy::from_name("cheapest"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortPolicy {
    /// Highest exchange rate first.
    BestRate,
    /// Lowest fee first.
    LowestFee,
    /// Shortest delivery time first.
    FastestTime,
    /// Highest composite rate/fee/time score first.
    BestValue,
}

impl SortPolicy {
    /// All policies, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::BestRate,
        Self::LowestFee,
        Self::FastestTime,
        Self::BestValue,
    ];

    /// Resolves a policy from its wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str() == name.trim())
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BestRate => "best_rate",
            Self::LowestFee => "lowest_fee",
            Self::FastestTime => "fastest_time",
            Self::BestValue => "best_value",
        }
    }
}

impl fmt::Display for SortPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a provider outcome is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The provider reported an error (HTTP, parse, unsupported corridor).
    Provider,
    /// The provider did not answer before the dispatch deadline.
    Timeout,
    /// The provider task panicked or was torn down.
    Panicked,
}

impl FailureKind {
    /// Returns true for deadline expiry.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider => write!(f, "provider"),
            Self::Timeout => write!(f, "timeout"),
            Self::Panicked => write!(f, "panicked"),
        }
    }
}
