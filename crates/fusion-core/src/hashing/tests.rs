// crates/fusion-core/src/hashing/tests.rs
// ============================================================================
// Module: Content Hashing Unit Tests
// Description: Golden SHA-256 values, determinism, and prefix handling.
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only fixtures use unwraps for clarity."
)]

use serde_json::json;

use super::hash_canonical_json;
use super::prefixed_digest;
use super::sha256_hex;
use super::strip_digest_prefix;

#[test]
fn golden_hash_empty_input() {
    // SHA-256 of the empty string.
    assert_eq!(
        sha256_hex(b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn golden_hash_empty_object() {
    // SHA-256 of "{}".
    let digest = hash_canonical_json(&json!({})).expect("hash");
    assert_eq!(digest, "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a");
}

#[test]
fn digest_is_lowercase_hex_64() {
    let digest = sha256_hex(b"capability");
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
}

#[test]
fn key_order_does_not_change_digest() {
    let a = hash_canonical_json(&json!({"x": 1, "y": 2})).expect("hash a");
    let b = hash_canonical_json(&json!({"y": 2, "x": 1})).expect("hash b");
    assert_eq!(a, b);
}

#[test]
fn hash_is_deterministic_across_calls() {
    let value = json!({"a": [1, 2, 3], "b": {"nested": true}});
    let first = hash_canonical_json(&value).expect("first");
    let second = hash_canonical_json(&value).expect("second");
    assert_eq!(first, second);
}

#[test]
fn prefix_round_trip() {
    let digest = sha256_hex(b"seal");
    let sealed = prefixed_digest(&digest);
    assert!(sealed.starts_with("sha256:"));
    assert_eq!(strip_digest_prefix(&sealed), digest);
    assert_eq!(strip_digest_prefix(&digest), digest);
}
