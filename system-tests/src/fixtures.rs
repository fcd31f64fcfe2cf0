// system-tests/src/fixtures.rs
// ============================================================================
// Module: Scenario Fixtures
// Description: Deterministic capabilities for governance scenario tests.
// Purpose: Build representative tools, prompts, and contract maps.
// Dependencies: fusion-contract, serde_json
// ============================================================================

//! ## Overview
//! The fixtures model a small task-management server: a `users` tool with
//! list/create/delete actions and a table presenter, a `projects` tool with
//! an egress presenter, and a `summarize` prompt. Builders are plain data,
//! so every derived contract, digest, and lockfile is reproducible.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use fusion_contract::ActionMetadata;
use fusion_contract::BehaviorSurface;
use fusion_contract::GuardrailSurface;
use fusion_contract::PresenterSurface;
use fusion_contract::StaticPromptCapability;
use fusion_contract::StaticToolCapability;
use fusion_contract::SystemRuleSet;
use fusion_contract::ToolContract;
use fusion_contract::materialize_contract;
use serde_json::json;

// ============================================================================
// SECTION: Action Builders
// ============================================================================

/// Builds one action metadata record.
fn action(key: &str, read_only: bool, destructive: bool, required: &[&str]) -> ActionMetadata {
    ActionMetadata {
        key: key.to_string(),
        description: Some(format!("{key} action")),
        destructive,
        idempotent: !destructive,
        read_only,
        required_fields: required.iter().map(ToString::to_string).collect(),
        presenter_name: read_only.then(|| String::from("record_table")),
        input_schema: Some(json!({
            "type": "object",
            "properties": {"workspace": {"type": "string"}}
        })),
        has_middleware: false,
    }
}

// ============================================================================
// SECTION: Tool Fixtures
// ============================================================================

/// Builds the `users` tool with list, create, and delete actions.
#[must_use]
pub fn users_tool() -> StaticToolCapability {
    StaticToolCapability {
        name: String::from("users"),
        description: Some(String::from("Manage workspace users.")),
        tags: vec![String::from("admin")],
        input_schema: json!({
            "type": "object",
            "properties": {"action": {"type": "string"}}
        }),
        actions: vec![
            action("list", true, false, &["workspace"]),
            action("create", false, false, &["workspace", "email"]),
            action("delete", false, true, &["workspace", "id"]),
        ],
        behavior: BehaviorSurface {
            presenters: vec![PresenterSurface {
                name: String::from("record_table"),
                egress_schema: Some(json!({
                    "type": "object",
                    "properties": {"id": {}, "name": {}, "email": {}}
                })),
                system_rules: SystemRuleSet::Static(vec![String::from(
                    "Summarize rows; never dump full records.",
                )]),
                suggested_tools: vec![String::from("projects")],
                embedded: false,
                unbounded_collection: false,
            }],
            guardrails: GuardrailSurface {
                agent_limit_max: Some(50),
                egress_max_bytes: Some(65_536),
            },
            middleware_chain: vec![String::from("auth")],
            state_sync_descriptor: None,
            concurrency_descriptor: None,
        },
        handler_source: None,
    }
}

/// Builds the `projects` tool; `egress_marker` perturbs the egress schema.
#[must_use]
pub fn projects_tool(egress_marker: &str) -> StaticToolCapability {
    StaticToolCapability {
        name: String::from("projects"),
        description: Some(String::from("Browse projects.")),
        tags: vec![String::from("core")],
        input_schema: json!({
            "type": "object",
            "properties": {"action": {"type": "string"}}
        }),
        actions: vec![action("list", true, false, &["workspace"])],
        behavior: BehaviorSurface {
            presenters: vec![PresenterSurface {
                name: String::from("project_table"),
                egress_schema: Some(json!({
                    "type": "object",
                    "properties": {"id": {}, "title": {}, "marker": egress_marker}
                })),
                system_rules: SystemRuleSet::Static(Vec::new()),
                suggested_tools: Vec::new(),
                embedded: false,
                unbounded_collection: false,
            }],
            guardrails: GuardrailSurface {
                agent_limit_max: Some(25),
                egress_max_bytes: None,
            },
            middleware_chain: Vec::new(),
            state_sync_descriptor: None,
            concurrency_descriptor: None,
        },
        handler_source: None,
    }
}

// ============================================================================
// SECTION: Prompt Fixtures
// ============================================================================

/// Builds the `summarize` prompt.
#[must_use]
pub fn summarize_prompt() -> StaticPromptCapability {
    StaticPromptCapability {
        name: String::from("summarize"),
        title: Some(String::from("Summarize Workspace")),
        description: Some(String::from("Summarize the workspace state.")),
        tags: vec![String::from("core")],
        arguments: Vec::new(),
        has_middleware: false,
        hydration_timeout: Some(5_000),
    }
}

// ============================================================================
// SECTION: Contract Maps
// ============================================================================

/// Materializes the baseline contract map: `users` plus `projects`.
///
/// # Panics
///
/// Panics when a fixture fails to materialize; fixtures are static, so
/// this indicates a bug in the pipeline under test.
#[must_use]
#[allow(clippy::panic, reason = "Fixture materialization failures are test bugs.")]
pub fn baseline_contracts() -> BTreeMap<String, ToolContract> {
    let users = users_tool();
    let projects = projects_tool("v1");
    let mut map = BTreeMap::new();
    for capability in [&users, &projects] {
        match materialize_contract(capability) {
            Ok(contract) => {
                map.insert(contract.surface.name.clone(), contract);
            }
            Err(err) => panic!("fixture failed to materialize: {err}"),
        }
    }
    map
}
