//! Core type definitions for IgniteHub identifiers and timestamps.
//!
//! This module defines the fundamental ID types used throughout the crate.
//! Record identifiers are plain strings on the wire: the marketplace data
//! predates this crate and carries human-assigned ids ("startup-001",
//! "demo-user") alongside generated ones. Newly generated ids use UUID v7
//! for time-ordering.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Record identifier.
///
/// Identifies a single record within a collection. Stored and serialized
/// as a bare string so legacy ids survive round-trips unchanged.
///
/// # Example
/// ```
/// use ignitedb::RecordId;
///
/// let id = RecordId::generate();
/// println!("Created record: {}", id);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Creates a RecordId from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a fresh RecordId backed by a UUID v7 (time-ordered).
    #[inline]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Returns the record ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque user identifier.
///
/// The crate doesn't handle authentication - the consumer provides user IDs.
/// This allows integration with any auth system (OAuth, API keys, etc.).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Creates a new UserId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a fresh UserId backed by a UUID v7 (time-ordered).
    #[inline]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Returns the user ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Unix timestamp in milliseconds.
///
/// Using i64 allows representing dates far into the future and past.
/// Millisecond precision matches the timestamps already embedded in
/// legacy marketplace records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Milliseconds in one day.
    pub const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

    /// Creates a timestamp for the current moment.
    ///
    /// If the system clock is before the Unix epoch (should never happen
    /// in practice), returns a timestamp of 0 (epoch) rather than panicking.
    #[inline]
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self(duration.as_millis() as i64)
    }

    /// Creates a timestamp from Unix milliseconds.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as Unix milliseconds.
    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Returns this timestamp shifted forward by the given number of days.
    ///
    /// Saturates instead of wrapping on overflow. Used for expiry windows
    /// (subscription periods, purchase pack validity).
    #[inline]
    pub const fn plus_days(&self, days: i64) -> Self {
        Self(self.0.saturating_add(days.saturating_mul(Self::DAY_MILLIS)))
    }

    /// Returns true if this timestamp lies strictly before `other`.
    #[inline]
    pub const fn is_before(&self, other: Timestamp) -> bool {
        self.0 < other.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw record payload: a JSON object with arbitrary fields.
///
/// Untyped reads and the migration layer operate on this shape so fields
/// unknown to the current code survive a load/save cycle intact.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;
