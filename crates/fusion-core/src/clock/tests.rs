// crates/fusion-core/src/clock/tests.rs
// ============================================================================
// Module: Timestamp Unit Tests
// Description: RFC 3339 round trips and explicit-time invariants.
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only fixtures use unwraps for clarity."
)]

use super::Timestamp;

#[test]
fn epoch_formats_as_rfc3339() {
    assert_eq!(Timestamp::UNIX_EPOCH.to_rfc3339(), "1970-01-01T00:00:00Z");
}

#[test]
fn parse_round_trips() {
    let stamp = Timestamp::parse("2026-03-01T12:30:00Z").expect("parse");
    assert_eq!(stamp.to_rfc3339(), "2026-03-01T12:30:00Z");
}

#[test]
fn from_unix_seconds_matches_parse() {
    let from_seconds = Timestamp::from_unix_seconds(1_767_225_600).expect("from seconds");
    let parsed = Timestamp::parse("2026-01-01T00:00:00Z").expect("parse");
    assert_eq!(from_seconds, parsed);
}

#[test]
fn serde_uses_rfc3339_strings() {
    let stamp = Timestamp::parse("2026-03-01T12:30:00Z").expect("parse");
    let encoded = serde_json::to_string(&stamp).expect("serialize");
    assert_eq!(encoded, "\"2026-03-01T12:30:00Z\"");
    let decoded: Timestamp = serde_json::from_str(&encoded).expect("deserialize");
    assert_eq!(decoded, stamp);
}

#[test]
fn invalid_input_parses_to_none() {
    assert!(Timestamp::parse("not-a-timestamp").is_none());
    assert!(Timestamp::from_unix_seconds(i64::MAX).is_none());
}
