//! Common time-related types
//!
//! This module contains the timestamp type stamped onto resource metadata.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

/// Timestamp is a wrapper around DateTime<Utc> representing a timestamp in RFC3339 format.
///
/// Timestamps on API objects are always in RFC3339 format and UTC,
/// for example: "2024-01-15T10:00:00Z"
#[derive(Clone, Debug, Eq)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// Creates a new Timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Creates a new Timestamp from an RFC3339 formatted string.
    ///
    /// Returns an error if the string is not a valid RFC3339 timestamp.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc)))
    }

    /// Returns the timestamp as an RFC3339 formatted string with 'Z' suffix for UTC.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    }

    /// Returns a reference to the inner DateTime<Utc>.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Consumes the Timestamp and returns the inner DateTime<Utc>.
    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }

    /// Returns the current time as a Timestamp.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Adds a `std::time::Duration` to the timestamp.
    pub fn add(&self, d: std::time::Duration) -> Self {
        Self(self.0 + d)
    }

    /// Returns the `TimeDelta` elapsed since this timestamp.
    pub fn since(&self) -> TimeDelta {
        Self::now().0 - self.0
    }
}

impl Deref for Timestamp {
    type Target = DateTime<Utc>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<DateTime<Utc>> for Timestamp {
    fn as_ref(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl TryFrom<&str> for Timestamp {
    type Error = chrono::ParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::from_str(s)
    }
}

impl TryFrom<String> for Timestamp {
    type Error = chrono::ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_str(&s)
    }
}

// Custom serde serialization - serialize as RFC3339 string with 'Z' suffix for UTC
impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
            .serialize(serializer)
    }
}

// Custom serde deserialization - deserialize from RFC3339 string
impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| Timestamp(dt.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self(DateTime::UNIX_EPOCH)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        )
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Hash for Timestamp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.timestamp().hash(state);
        self.0.timestamp_subsec_nanos().hash(state);
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339_roundtrip() {
        let ts = Timestamp::from_str("2024-01-15T10:00:00Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-15T10:00:00Z");

        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2024-01-15T10:00:00Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, back);
    }

    #[test]
    fn test_ordering() {
        let a = Timestamp::from_str("2024-01-15T10:00:00Z").unwrap();
        let b = Timestamp::from_str("2024-01-15T10:00:01Z").unwrap();
        assert!(a < b);
    }
}
