// crates/fusion-core/tests/canonical_properties.rs
// ============================================================================
// Module: Canonicalization Property Tests
// Description: Property-based checks for canonical JSON and content hashing.
// ============================================================================
//! ## Overview
//! Verifies that canonical encoding is insensitive to object key insertion
//! order and that equal canonical bytes imply equal digests, over generated
//! JSON values.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use fusion_core::canonical_json_string;
use fusion_core::hash_canonical_json;
use proptest::prelude::*;
use serde_json::Map;
use serde_json::Value;

/// Strategy producing shallow JSON leaves.
fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

/// Strategy producing nested JSON values with bounded depth.
fn json_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 32, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0 .. 6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0 .. 6).prop_map(|entries| {
                Value::Object(entries.into_iter().collect::<Map<String, Value>>())
            }),
        ]
    })
}

proptest! {
    #[test]
    fn canonical_is_insensitive_to_key_order(value in json_value()) {
        let permuted = permute(&value);
        let lhs = canonical_json_string(&value).expect("canonical lhs");
        let rhs = canonical_json_string(&permuted).expect("canonical rhs");
        prop_assert_eq!(lhs, rhs);
    }

    #[test]
    fn equal_canonical_bytes_imply_equal_digests(value in json_value()) {
        let lhs = hash_canonical_json(&value).expect("digest lhs");
        let rhs = hash_canonical_json(&permute(&value)).expect("digest rhs");
        prop_assert_eq!(lhs, rhs);
    }

    #[test]
    fn digest_is_hex_64(value in json_value()) {
        let digest = hash_canonical_json(&value).expect("digest");
        prop_assert_eq!(digest.len(), 64);
        prop_assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
    }
}

/// Rebuilds a value with object keys inserted in reverse order.
fn permute(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(permute).collect()),
        Value::Object(entries) => {
            let mut reversed = Map::new();
            for (key, entry) in entries.iter().rev() {
                reversed.insert(key.clone(), permute(entry));
            }
            Value::Object(reversed)
        }
        other => other.clone(),
    }
}
