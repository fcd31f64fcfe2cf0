// crates/fusion-contract/tests/materializer.rs
// ============================================================================
// Module: Contract Materializer Tests
// Description: Determinism, normalization, and fingerprinting behavior.
// ============================================================================
//! ## Overview
//! Exercises contract materialization end to end: sorted collections,
//! schema digests, system-rule fingerprints, topology extraction, token
//! economics, and handler-source entitlement scanning.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only fixtures use unwraps for clarity."
)]

use fusion_contract::ActionMetadata;
use fusion_contract::BehaviorSurface;
use fusion_contract::GuardrailSurface;
use fusion_contract::PresenterSurface;
use fusion_contract::StaticToolCapability;
use fusion_contract::SystemRuleSet;
use fusion_contract::compile_contracts;
use fusion_contract::materialize_contract;
use fusion_core::InflationRisk;
use fusion_core::canonical_json_string;
use serde_json::json;

/// Builds a representative tool capability with two actions and a presenter.
fn users_capability() -> StaticToolCapability {
    StaticToolCapability {
        name: String::from("users"),
        description: Some(String::from("Manage workspace users.")),
        tags: vec![String::from("write"), String::from("admin"), String::from("admin")],
        input_schema: json!({
            "type": "object",
            "properties": {"action": {"type": "string"}}
        }),
        actions: vec![
            ActionMetadata {
                key: String::from("list"),
                description: Some(String::from("List users.")),
                destructive: false,
                idempotent: true,
                read_only: true,
                required_fields: vec![String::from("workspace"), String::from("workspace")],
                presenter_name: Some(String::from("user_table")),
                input_schema: Some(json!({"type": "object"})),
                has_middleware: false,
            },
            ActionMetadata {
                key: String::from("delete"),
                description: None,
                destructive: true,
                idempotent: true,
                read_only: false,
                required_fields: vec![String::from("id")],
                presenter_name: None,
                input_schema: None,
                has_middleware: true,
            },
        ],
        behavior: BehaviorSurface {
            presenters: vec![PresenterSurface {
                name: String::from("user_table"),
                egress_schema: Some(json!({
                    "type": "object",
                    "properties": {"id": {}, "name": {}, "email": {}}
                })),
                system_rules: SystemRuleSet::Static(vec![String::from(
                    "Never surface email addresses to untrusted agents.",
                )]),
                suggested_tools: vec![String::from("projects"), String::from("audit")],
                embedded: false,
                unbounded_collection: false,
            }],
            guardrails: GuardrailSurface {
                agent_limit_max: Some(50),
                egress_max_bytes: None,
            },
            middleware_chain: vec![String::from("auth"), String::from("rate-limit")],
            state_sync_descriptor: None,
            concurrency_descriptor: None,
        },
        handler_source: None,
    }
}

#[test]
fn materialization_is_deterministic() {
    let capability = users_capability();
    let first = materialize_contract(&capability).expect("first run");
    let second = materialize_contract(&capability).expect("second run");
    assert_eq!(first, second);
    assert_eq!(
        canonical_json_string(&first).expect("canonical first"),
        canonical_json_string(&second).expect("canonical second"),
    );
}

#[test]
fn tags_and_required_fields_are_sorted_and_deduplicated() {
    let contract = materialize_contract(&users_capability()).expect("materialize");
    assert_eq!(contract.surface.tags, vec!["admin", "write"]);
    let list = contract.surface.actions.get("list").expect("list action");
    assert_eq!(list.required_fields, vec!["workspace"]);
}

#[test]
fn actions_are_keyed_and_sorted_by_name() {
    let contract = materialize_contract(&users_capability()).expect("materialize");
    let keys: Vec<&String> = contract.surface.actions.keys().collect();
    assert_eq!(keys, vec!["delete", "list"]);
}

#[test]
fn schema_digests_are_hex_64() {
    let contract = materialize_contract(&users_capability()).expect("materialize");
    assert_eq!(contract.surface.input_schema_digest.len(), 64);
    let list = contract.surface.actions.get("list").expect("list action");
    assert_eq!(list.input_schema_digest.as_ref().expect("action digest").len(), 64);
    let delete = contract.surface.actions.get("delete").expect("delete action");
    assert!(delete.input_schema_digest.is_none());
}

#[test]
fn static_rules_fingerprint_carries_static_prefix() {
    let contract = materialize_contract(&users_capability()).expect("materialize");
    assert!(contract.behavior.system_rules_fingerprint.starts_with("static:"));
}

#[test]
fn dynamic_rules_degrade_the_fingerprint() {
    let mut capability = users_capability();
    capability.behavior.presenters[0].system_rules =
        SystemRuleSet::Dynamic(String::from("rules built per request"));
    let contract = materialize_contract(&capability).expect("materialize");
    assert!(contract.behavior.system_rules_fingerprint.starts_with("dynamic:"));
}

#[test]
fn affordance_topology_is_sorted() {
    let contract = materialize_contract(&users_capability()).expect("materialize");
    assert_eq!(contract.behavior.affordance_topology, vec!["audit", "projects"]);
}

#[test]
fn token_economics_reflect_presenter_schema() {
    let contract = materialize_contract(&users_capability()).expect("materialize");
    assert_eq!(contract.token_economics.schema_field_count, 3);
    assert!(!contract.token_economics.unbounded_collection);
    assert_eq!(contract.token_economics.inflation_risk, InflationRisk::Low);
    // "email" + "id" + "name" -> 2 + 1 + 2 estimated tokens.
    assert_eq!(contract.token_economics.base_overhead_tokens, 5);
}

#[test]
fn handler_source_populates_entitlements() {
    let mut capability = users_capability();
    capability.handler_source = Some(String::from("const body = await fetch(url);"));
    let contract = materialize_contract(&capability).expect("materialize");
    assert!(contract.entitlements.network);
    assert!(!contract.entitlements.filesystem);
    assert_eq!(contract.entitlements.raw.len(), 1);
}

#[test]
fn missing_handler_source_yields_empty_entitlements() {
    let contract = materialize_contract(&users_capability()).expect("materialize");
    assert!(!contract.entitlements.network);
    assert!(contract.entitlements.raw.is_empty());
}

#[test]
fn compile_contracts_sorts_by_name_and_rejects_duplicates() {
    let users = users_capability();
    let mut projects = users_capability();
    projects.name = String::from("projects");
    let contracts =
        compile_contracts(&[&users, &projects]).expect("compile");
    let names: Vec<&String> = contracts.keys().collect();
    assert_eq!(names, vec!["projects", "users"]);

    let duplicate = users_capability();
    let err = compile_contracts(&[&users, &duplicate]).unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn modified_builder_produces_a_distinct_contract() {
    let baseline = materialize_contract(&users_capability()).expect("baseline");
    let mut changed = users_capability();
    changed.behavior.guardrails.agent_limit_max = Some(10);
    let modified = materialize_contract(&changed).expect("modified");
    assert_ne!(baseline, modified);
}
