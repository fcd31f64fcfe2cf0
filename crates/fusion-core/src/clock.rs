// crates/fusion-core/src/clock.rs
// ============================================================================
// Module: Explicit Timestamp Model
// Description: Caller-supplied RFC 3339 timestamps for governance records.
// Purpose: Keep digest and lockfile generation replayable and byte-stable.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Governance outputs embed explicit time values so regeneration from the
//! same inputs produces byte-identical artifacts. The core never reads
//! wall-clock time; hosts supply a [`Timestamp`] at every generation
//! boundary. On the wire a timestamp is an RFC 3339 / ISO-8601 string.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Canonical timestamp embedded in digests, lockfiles, and attestations.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads
///   wall-clock time.
/// - Serializes as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(#[serde(with = "time::serde::rfc3339")] OffsetDateTime);

impl Timestamp {
    /// The Unix epoch, useful as a neutral timestamp for pure comparisons.
    pub const UNIX_EPOCH: Self = Self(OffsetDateTime::UNIX_EPOCH);

    /// Creates a timestamp from an explicit datetime.
    #[must_use]
    pub const fn from_datetime(datetime: OffsetDateTime) -> Self {
        Self(datetime)
    }

    /// Creates a timestamp from whole seconds since the Unix epoch.
    #[must_use]
    pub fn from_unix_seconds(seconds: i64) -> Option<Self> {
        OffsetDateTime::from_unix_timestamp(seconds).ok().map(Self)
    }

    /// Parses an RFC 3339 timestamp string.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        OffsetDateTime::parse(input, &Rfc3339).ok().map(Self)
    }

    /// Returns the wrapped datetime.
    #[must_use]
    pub const fn as_datetime(self) -> OffsetDateTime {
        self.0
    }

    /// Formats the timestamp as an RFC 3339 string.
    #[must_use]
    pub fn to_rfc3339(self) -> String {
        self.0.format(&Rfc3339).unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

#[cfg(test)]
mod tests;
