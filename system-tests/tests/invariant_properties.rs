// system-tests/tests/invariant_properties.rs
// ============================================================================
// Module: Governance Invariant Tests
// Description: Quantified invariants over the governance pipeline.
// ============================================================================
//! ## Overview
//! Asserts the cross-crate invariants: diff identity, digest/canonical
//! equivalence, lockfile self-consistency, subset drift, entitlement
//! severity symmetry, canonical key-permutation stability, the SHA-256
//! fixed point, and XML safety under hostile content.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only fixtures use unwraps and panic-based assertions for clarity."
)]

use fusion_contract::materialize_contract;
use fusion_core::ChangeSeverity;
use fusion_core::Timestamp;
use fusion_core::canonical_json_string;
use fusion_core::hash_canonical_json;
use fusion_core::sha256_hex;
use fusion_diff::diff_contracts;
use fusion_diff::format_deltas_as_xml;
use fusion_digest::digest_contract;
use fusion_lockfile::LockfileOptions;
use fusion_lockfile::check_lockfile;
use fusion_lockfile::generate_lockfile;
use fusion_lockfile::parse_lockfile;
use fusion_lockfile::serialize_lockfile;
use system_tests::fixtures::baseline_contracts;
use system_tests::fixtures::projects_tool;
use system_tests::fixtures::users_tool;

/// Fixed timestamp shared by the invariant tests.
fn stamp() -> Timestamp {
    Timestamp::parse("2026-05-01T00:00:00Z").expect("timestamp")
}

#[test]
fn every_fixture_contract_diffs_empty_against_itself() {
    for contract in baseline_contracts().values() {
        let result = diff_contracts(contract, contract).expect("diff");
        assert!(result.deltas.is_empty());
        assert_eq!(result.max_severity, ChangeSeverity::Cosmetic);
        assert!(result.is_backwards_compatible);
        assert!(!result.digest_changed);
    }
}

#[test]
fn digests_agree_exactly_when_canonical_encodings_agree() {
    let first = materialize_contract(&users_tool()).expect("first");
    let second = materialize_contract(&users_tool()).expect("second");
    let third = materialize_contract(&projects_tool("v1")).expect("third");

    assert_eq!(
        canonical_json_string(&first).expect("canonical first"),
        canonical_json_string(&second).expect("canonical second"),
    );
    assert_eq!(
        digest_contract(&first, stamp()).expect("digest first").digest,
        digest_contract(&second, stamp()).expect("digest second").digest,
    );

    assert_ne!(
        canonical_json_string(&first).expect("canonical first"),
        canonical_json_string(&third).expect("canonical third"),
    );
    assert_ne!(
        digest_contract(&first, stamp()).expect("digest first").digest,
        digest_contract(&third, stamp()).expect("digest third").digest,
    );
}

#[test]
fn a_generated_lockfile_always_checks_clean_against_its_inputs() {
    let contracts = baseline_contracts();
    let lockfile =
        generate_lockfile("demo", &contracts, "1.4.0", stamp(), &LockfileOptions::default())
            .expect("generate");
    let check = check_lockfile(&lockfile, &contracts, &LockfileOptions::default()).expect("check");
    assert!(check.ok);
}

#[test]
fn a_subset_lockfile_reports_exactly_the_missing_names_as_added() {
    let full = baseline_contracts();
    let mut subset = full.clone();
    subset.remove("users");
    let lockfile =
        generate_lockfile("demo", &subset, "1.4.0", stamp(), &LockfileOptions::default())
            .expect("generate");
    let check = check_lockfile(&lockfile, &full, &LockfileOptions::default()).expect("check");
    assert!(!check.ok);
    assert_eq!(check.added, vec!["users"]);
    assert!(check.removed.is_empty());
    assert!(check.changed.is_empty());
}

#[test]
fn every_entitlement_gain_breaks_and_every_loss_is_safe() {
    let baseline = materialize_contract(&users_tool()).expect("baseline");
    let sources = [
        ("filesystem", "const data = await readFile(path);"),
        ("network", "const body = await fetch(url);"),
        ("subprocess", "spawn('ls');"),
        ("crypto", "const digest = createHash('sha256');"),
        ("codeEvaluation", "eval('x')"),
    ];
    for (field, source) in sources {
        let mut capability = users_tool();
        capability.handler_source = Some(source.to_string());
        let entitled = materialize_contract(&capability).expect("entitled");

        let gained = diff_contracts(&baseline, &entitled).expect("gain diff");
        let gain_delta = gained
            .deltas
            .iter()
            .find(|delta| delta.field == field)
            .unwrap_or_else(|| panic!("no gain delta for {field}"));
        assert_eq!(gain_delta.severity, ChangeSeverity::Breaking);

        let lost = diff_contracts(&entitled, &baseline).expect("loss diff");
        let loss_delta = lost
            .deltas
            .iter()
            .find(|delta| delta.field == field)
            .unwrap_or_else(|| panic!("no loss delta for {field}"));
        assert_eq!(loss_delta.severity, ChangeSeverity::Safe);
    }
}

#[test]
fn canonical_encoding_is_stable_under_key_permutation() {
    let ordered = serde_json::json!({"a": 1, "b": {"c": 2, "d": [1, 2]}});
    let permuted = serde_json::json!({"b": {"d": [1, 2], "c": 2}, "a": 1});
    assert_eq!(
        canonical_json_string(&ordered).expect("ordered"),
        canonical_json_string(&permuted).expect("permuted"),
    );
    assert_eq!(
        hash_canonical_json(&ordered).expect("ordered digest"),
        hash_canonical_json(&permuted).expect("permuted digest"),
    );
}

#[test]
fn sha256_fixed_point_for_the_empty_string() {
    assert_eq!(
        sha256_hex(b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn lockfile_serialization_round_trips_the_integrity_digest() {
    let lockfile = generate_lockfile(
        "demo",
        &baseline_contracts(),
        "1.4.0",
        stamp(),
        &LockfileOptions::default(),
    )
    .expect("generate");
    let text = serialize_lockfile(&lockfile).expect("serialize");
    let parsed = parse_lockfile(&text).expect("parse");
    assert_eq!(parsed.integrity_digest, lockfile.integrity_digest);
}

#[test]
fn delta_xml_never_carries_raw_script_tags() {
    let mut hostile = users_tool();
    hostile.description = Some(String::from("<script>alert('x')</script>"));
    hostile.tags.push(String::from("<script>"));
    let before = materialize_contract(&users_tool()).expect("before");
    let after = materialize_contract(&hostile).expect("after");
    let diff = diff_contracts(&before, &after).expect("diff");
    assert!(!diff.deltas.is_empty());
    let xml = format_deltas_as_xml(&diff.deltas);
    assert!(!xml.contains("<script>"));
    assert!(xml.contains("&lt;script&gt;"));
}

#[test]
fn subprocess_source_sets_exactly_the_subprocess_flag() {
    let mut capability = users_tool();
    capability.handler_source = Some(String::from("exec('make build');"));
    let contract = materialize_contract(&capability).expect("contract");
    assert!(contract.entitlements.subprocess);
    assert!(!contract.entitlements.filesystem);
    assert!(!contract.entitlements.network);
    assert!(!contract.entitlements.crypto);
    assert!(!contract.entitlements.code_evaluation);
}
