//! # Timestamp Value Object
//!
//! UTC instant stamped on quotes, batch results and cache entries.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp, serialized as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Shifts the timestamp by `secs` (negative moves it back).
    ///
    /// Returns `None` if the result is outside chrono's range.
    #[must_use]
    pub fn checked_add_secs(&self, secs: i64) -> Option<Self> {
        Duration::try_seconds(secs)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Self)
    }

    /// Same as [`Self::checked_add_secs`], clamping to `self` on overflow.
    #[must_use]
    pub fn add_secs(&self, secs: i64) -> Self {
        self.checked_add_secs(secs).unwrap_or(*self)
    }

    /// Returns true if this instant has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.0 <= Utc::now()
    }

    /// Returns the underlying `DateTime`.
    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn shifting() {
        let ts = Timestamp::from(Utc.timestamp_opt(1_000, 0).unwrap());
        assert_eq!(ts.add_secs(60).as_datetime().timestamp(), 1_060);
        assert_eq!(ts.add_secs(-60).as_datetime().timestamp(), 940);
        assert!(ts.checked_add_secs(i64::MAX).is_none());
        assert_eq!(ts.add_secs(i64::MAX), ts);
    }

    #[test]
    fn expiry() {
        assert!(Timestamp::now().add_secs(-1).is_expired());
        assert!(!Timestamp::now().add_secs(3_600).is_expired());
    }

    #[test]
    fn serializes_as_rfc3339() {
        let ts = Timestamp::from(Utc.timestamp_millis_opt(1_704_067_200_123).unwrap());
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.contains("2024-01-01T00:00:00.123"));
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, back);
    }
}
