// system-tests/tests/governance_pipeline.rs
// ============================================================================
// Module: Governance Pipeline Tests
// Description: Full builder-to-artifact flow across every governance crate.
// ============================================================================
//! ## Overview
//! Drives one server through the whole pipeline: materialization, digests,
//! lockfile generation and storage, attestation, drift diffing, error
//! enrichment, manifest projection, and observer wrapping.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only fixtures use unwraps and panic-based assertions for clarity."
)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use fusion_attest::AttestOptions;
use fusion_attest::attest_server_digest;
use fusion_attest::build_trust_capability;
use fusion_attest::verify_attestation;
use fusion_contract::compile_contracts;
use fusion_contract::materialize_contract;
use fusion_core::Timestamp;
use fusion_core::prefixed_digest;
use fusion_diff::diff_contracts;
use fusion_diff::format_diff_report;
use fusion_digest::compare_server_digests;
use fusion_digest::digest_server;
use fusion_heal::HealingConfig;
use fusion_heal::enrich_validation_error;
use fusion_lockfile::LockfileOptions;
use fusion_lockfile::check_lockfile;
use fusion_lockfile::generate_lockfile;
use fusion_lockfile::read_lockfile;
use fusion_lockfile::write_lockfile;
use fusion_manifest::build_manifest;
use fusion_manifest::filter_tools;
use fusion_observe::GovernanceObserver;
use system_tests::fixtures::projects_tool;
use system_tests::fixtures::summarize_prompt;
use system_tests::fixtures::users_tool;

/// Fixed timestamp shared by the pipeline.
fn stamp() -> Timestamp {
    Timestamp::parse("2026-05-01T00:00:00Z").expect("timestamp")
}

#[test]
fn full_pipeline_from_builders_to_sealed_artifacts() {
    // Materialize the server surface.
    let users = users_tool();
    let projects = projects_tool("v1");
    let contracts = compile_contracts(&[&users, &projects]).expect("compile");
    assert_eq!(contracts.len(), 2);

    // Digest and attest it.
    let server_digest = digest_server(&contracts, stamp()).expect("digest");
    let attestation = attest_server_digest(
        &server_digest,
        &AttestOptions::hmac(b"deploy-secret", stamp()),
    )
    .expect("attest");
    assert!(attestation.valid);
    let signature = attestation.signature.clone().expect("signature");
    let verified = verify_attestation(
        &server_digest,
        &signature,
        &AttestOptions::hmac(b"deploy-secret", stamp()),
    )
    .expect("verify");
    assert!(verified.valid);
    let trust = build_trust_capability(&attestation, server_digest.tools.len());
    assert_eq!(trust.tool_count, 2);
    assert!(trust.verified);

    // Seal the lockfile, round-trip it through disk, and check freshness.
    let prompt = summarize_prompt();
    let options = LockfileOptions {
        prompts: vec![&prompt],
    };
    let lockfile =
        generate_lockfile("demo", &contracts, "1.4.0", stamp(), &options).expect("lockfile");
    let dir = tempfile::tempdir().expect("tempdir");
    write_lockfile(dir.path(), &lockfile).expect("write");
    let cached = read_lockfile(dir.path()).expect("read");
    let check = check_lockfile(&cached, &contracts, &options).expect("check");
    assert!(check.ok);
    assert_eq!(check.unchanged, vec!["projects", "users"]);
    assert_eq!(check.unchanged_prompts, vec!["summarize"]);

    // Drift the egress schema and observe the cascade.
    let drifted_projects =
        materialize_contract(&projects_tool("v2")).expect("drifted projects");
    let mut drifted = contracts.clone();
    drifted.insert(String::from("projects"), drifted_projects.clone());

    let drifted_digest = digest_server(&drifted, stamp()).expect("drifted digest");
    let comparison = compare_server_digests(&server_digest, &drifted_digest);
    assert!(comparison.server_digest_changed);
    assert_eq!(comparison.changed, vec!["projects"]);
    assert_eq!(comparison.unchanged, vec!["users"]);

    let check = check_lockfile(&cached, &drifted, &options).expect("drift check");
    assert!(!check.ok);
    assert!(check.message.contains("stale"));
    assert_eq!(check.changed, vec!["projects"]);

    // Diff the drifted tool and enrich a validation error with it.
    let baseline_projects = contracts.get("projects").expect("baseline projects");
    let diff = diff_contracts(baseline_projects, &drifted_projects).expect("diff");
    assert!(diff.digest_changed);
    assert!(!diff.is_backwards_compatible);
    let report = format_diff_report(&diff);
    assert!(report.starts_with("[projects]"));

    let mut active = BTreeMap::new();
    active.insert(String::from("projects"), diff);
    let healing = HealingConfig {
        active_deltas: active,
        include_all_severities: false,
        max_deltas_per_error: None,
    };
    let enriched = enrich_validation_error(
        "<validation_error>unknown egress field</validation_error>",
        "projects",
        "list",
        &healing,
    );
    assert!(enriched.injected);
    assert!(enriched.enriched_error.contains("behavioral contract"));
    assert!(enriched.enriched_error.contains("<contract_changes>"));

    // The sealed integrity digest matches the recomputed aggregate when the
    // prompt set is unchanged.
    assert!(cached.integrity_digest.starts_with("sha256:"));
    let plain_digest = digest_server(&contracts, stamp()).expect("plain digest");
    assert_ne!(prefixed_digest(&plain_digest.digest), cached.integrity_digest);

    // Project the manifest and hand out filtered copies.
    let manifest = build_manifest("demo", "1.4.0", &[&users, &projects]);
    let allowed: BTreeSet<String> = [String::from("projects")].into();
    let filtered = filter_tools(&manifest, &allowed);
    assert_eq!(filtered.capabilities.tools.len(), 1);
    assert_eq!(manifest.capabilities.tools.len(), 2);
}

#[test]
fn observer_wraps_pipeline_operations() {
    let observer = GovernanceObserver::spans_only();
    let contracts = observer
        .observe("contracts.compile", "materialize the demo server", || {
            let users = users_tool();
            let projects = projects_tool("v1");
            compile_contracts(&[&users, &projects])
        })
        .expect("contracts");
    let digest = observer
        .observe("digest.server", "digest the demo server", || {
            digest_server(&contracts, stamp())
        })
        .expect("digest");
    assert_eq!(digest.tools.len(), 2);
}

#[test]
fn lockfile_without_prompts_seals_the_plain_server_digest() {
    let users = users_tool();
    let projects = projects_tool("v1");
    let contracts = compile_contracts(&[&users, &projects]).expect("compile");
    let lockfile =
        generate_lockfile("demo", &contracts, "1.4.0", stamp(), &LockfileOptions::default())
            .expect("lockfile");
    let digest = digest_server(&contracts, stamp()).expect("digest");
    assert_eq!(lockfile.integrity_digest, prefixed_digest(&digest.digest));
}
