//! # Identifiers
//!
//! String-based identifier for quote providers.

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of a quote provider (e.g. `"wise"`, `"remitly"`).
///
/// The id keeps the spelling it was created with, but equality, hashing
/// and ordering ignore case, so `wise` and `WISE` name the same provider
/// and share one cache key (see [`ProviderId::cache_form`]).
///
/// # Examples
///
/// ```
/// use remit_quotes::domain::value_objects::ProviderId;
///
/// let id = ProviderId::new("wise");
/// assert_eq!(id.as_str(), "wise");
/// assert_eq!(id.cache_form(), "WISE");
/// assert_eq!(id, ProviderId::new("Wise"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    /// Creates a provider id without validation.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a provider id, rejecting blank input.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidProviderId` if the trimmed id is empty.
    pub fn parse(id: impl AsRef<str>) -> DomainResult<Self> {
        let trimmed = id.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidProviderId(
                "provider id must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the upper-cased form used in cache keys.
    #[must_use]
    pub fn cache_form(&self) -> String {
        self.0.to_uppercase()
    }

    fn folded(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars().flat_map(char::to_uppercase)
    }
}

impl PartialEq for ProviderId {
    fn eq(&self, other: &Self) -> bool {
        self.folded().eq(other.folded())
    }
}

impl Eq for ProviderId {}

impl Hash for ProviderId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.folded() {
            c.hash(state);
        }
        state.write_u8(0xff);
    }
}

impl PartialOrd for ProviderId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProviderId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(other.folded())
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
