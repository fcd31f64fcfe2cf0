// system-tests/tests/governance_scenarios.rs
// ============================================================================
// Module: Governance Scenario Tests
// Description: End-to-end scenarios over the full governance pipeline.
// ============================================================================
//! ## Overview
//! Exercises the documented end-to-end scenarios: additive action changes,
//! entitlement gains, lockfile regeneration stability, drift detection,
//! attestation pin mismatches, and code-evaluation detection.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only fixtures use unwraps and panic-based assertions for clarity."
)]

use fusion_attest::AttestError;
use fusion_attest::PinOptions;
use fusion_attest::SignerChoice;
use fusion_attest::verify_capability_pin;
use fusion_contract::materialize_contract;
use fusion_core::ChangeSeverity;
use fusion_core::Timestamp;
use fusion_diff::diff_contracts;
use fusion_digest::digest_server;
use fusion_lockfile::LockfileOptions;
use fusion_lockfile::check_lockfile;
use fusion_lockfile::generate_lockfile;
use fusion_lockfile::serialize_lockfile;
use fusion_scanner::DeclaredClaims;
use fusion_scanner::EntitlementCategory;
use fusion_scanner::scan_and_validate;
use system_tests::fixtures::baseline_contracts;
use system_tests::fixtures::projects_tool;
use system_tests::fixtures::users_tool;

/// Fixed timestamp shared by the scenarios.
fn stamp() -> Timestamp {
    Timestamp::parse("2026-05-01T00:00:00Z").expect("timestamp")
}

#[test]
fn adding_an_action_is_safe() {
    let before = materialize_contract(&users_tool()).expect("before");
    let mut extended = users_tool();
    extended.actions.push(fusion_contract::ActionMetadata {
        key: String::from("update"),
        description: Some(String::from("update action")),
        destructive: false,
        idempotent: true,
        read_only: false,
        required_fields: vec![String::from("workspace"), String::from("id")],
        presenter_name: None,
        input_schema: None,
        has_middleware: false,
    });
    let after = materialize_contract(&extended).expect("after");

    let diff = diff_contracts(&before, &after).expect("diff");
    assert_eq!(diff.max_severity, ChangeSeverity::Safe);
    assert!(diff.is_backwards_compatible);
    assert_eq!(diff.deltas.len(), 1);
    assert!(diff.deltas[0].description.contains("added"));
}

#[test]
fn gaining_the_filesystem_entitlement_is_breaking() {
    let before = materialize_contract(&users_tool()).expect("before");
    let mut gained = users_tool();
    gained.handler_source = Some(String::from("await writeFile(path, payload);"));
    let after = materialize_contract(&gained).expect("after");
    assert!(after.entitlements.filesystem);

    let diff = diff_contracts(&before, &after).expect("diff");
    assert_eq!(diff.deltas.len(), 1);
    assert_eq!(diff.deltas[0].field, "filesystem");
    assert_eq!(diff.deltas[0].severity, ChangeSeverity::Breaking);
    assert!(!diff.is_backwards_compatible);
}

#[test]
fn lockfile_is_stable_under_regeneration() {
    let contracts = baseline_contracts();
    let first = generate_lockfile("demo", &contracts, "1.4.0", stamp(), &LockfileOptions::default())
        .expect("first");
    let second =
        generate_lockfile("demo", &contracts, "1.4.0", stamp(), &LockfileOptions::default())
            .expect("second");
    assert_eq!(first.integrity_digest, second.integrity_digest);
    assert_eq!(
        serialize_lockfile(&first).expect("serialize first"),
        serialize_lockfile(&second).expect("serialize second"),
    );
}

#[test]
fn drift_is_detected_with_a_stale_message() {
    let mut baseline = baseline_contracts();
    baseline.remove("users");
    let lockfile =
        generate_lockfile("demo", &baseline, "1.4.0", stamp(), &LockfileOptions::default())
            .expect("generate");

    // Current surface: projects with a modified egress schema, plus a new
    // tasks tool.
    let mut current = std::collections::BTreeMap::new();
    current.insert(
        String::from("projects"),
        materialize_contract(&projects_tool("v2")).expect("projects v2"),
    );
    let mut tasks = projects_tool("v1");
    tasks.name = String::from("tasks");
    current.insert(String::from("tasks"), materialize_contract(&tasks).expect("tasks"));

    let check = check_lockfile(&lockfile, &current, &LockfileOptions::default()).expect("check");
    assert!(!check.ok);
    assert!(check.message.contains("stale"));
    assert_eq!(check.added, vec!["tasks"]);
    assert_eq!(check.changed, vec!["projects"]);
    assert_eq!(check.removed, Vec::<String>::new());
    assert_eq!(check.unchanged, Vec::<String>::new());
}

#[test]
fn attestation_pin_mismatch_throws_with_the_full_result() {
    let contracts = baseline_contracts();
    let digest = digest_server(&contracts, stamp()).expect("digest");
    let options = PinOptions {
        signer: SignerChoice::Hmac,
        secret: Some(b"deploy-secret"),
        expected_digest: "b",
        fail_on_mismatch: true,
        attested_at: stamp(),
    };
    let err = verify_capability_pin(&digest, &options).unwrap_err();
    let AttestError::PinMismatch {
        attestation,
    } = err
    else {
        panic!("expected pin mismatch");
    };
    assert!(!attestation.valid);
    assert!(attestation.error.as_deref().expect("error").contains("does not match"));
    assert_eq!(attestation.computed_digest, digest.digest);
}

#[test]
fn code_evaluation_is_detected_and_unsafe() {
    let report = scan_and_validate("eval('x')", &DeclaredClaims::default());
    assert!(report.entitlements.code_evaluation);
    assert!(report.matches.iter().any(|hit| {
        hit.category == EntitlementCategory::CodeEvaluation && hit.identifier == "eval"
    }));
    let violation = report
        .violations
        .iter()
        .find(|violation| violation.description.contains("unbounded"))
        .expect("unbounded violation");
    assert_eq!(violation.category, EntitlementCategory::CodeEvaluation);
    assert!(!report.safe);
}
