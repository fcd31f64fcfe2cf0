// crates/fusion-contract/src/types.rs
// ============================================================================
// Module: Contract Types
// Description: Normalized shapes for tool contracts and their sub-records.
// Purpose: Provide the digestable wire model shared by digest, diff, and lock.
// Dependencies: fusion-core, fusion-scanner, serde
// ============================================================================

//! ## Overview
//! These records are the canonical projection of a tool's behavioral
//! surface. They serialize with camelCase keys, matching the sealed lockfile
//! format, and every collection is sorted at materialization so canonical
//! encodings are stable. A contract is deeply immutable after
//! materialization: any modification produces a distinct value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use fusion_core::InflationRisk;
use fusion_scanner::EntitlementSet;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Tool Contract
// ============================================================================

/// Immutable projection of one tool's full behavioral surface.
///
/// # Invariants
/// - Produced only by materialization; never mutated afterwards.
/// - All nested collections are sorted, so canonical encodings of equal
///   contracts are byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolContract {
    /// Agent-facing surface: identity, schema digest, actions.
    pub surface: SurfaceContract,
    /// Behavioral fingerprints: egress, guardrails, middleware, topology.
    pub behavior: BehaviorContract,
    /// Static token economics profile.
    pub token_economics: TokenEconomics,
    /// Statically inferred entitlements.
    pub entitlements: EntitlementSet,
}

// ============================================================================
// SECTION: Surface
// ============================================================================

/// Agent-facing surface of a tool.
///
/// # Invariants
/// - `name` is unique per server.
/// - `tags` is sorted and deduplicated.
/// - `input_schema_digest` is the hex-64 digest of the canonical input
///   schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceContract {
    /// Tool name, unique per server.
    pub name: String,
    /// Tool description when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sorted, deduplicated tag set.
    pub tags: Vec<String>,
    /// Digest of the canonical tool input schema.
    pub input_schema_digest: String,
    /// Actions keyed by action name, sorted by key.
    pub actions: BTreeMap<String, ActionContract>,
}

/// One callable action on a tool.
///
/// # Invariants
/// - `required_fields` is sorted and deduplicated.
/// - `input_schema_digest` is present when the action declares its own
///   input schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionContract {
    /// Action description when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Action may destroy data.
    pub destructive: bool,
    /// Action is idempotent.
    pub idempotent: bool,
    /// Action never mutates state.
    pub read_only: bool,
    /// Sorted list of required input fields.
    pub required_fields: Vec<String>,
    /// Presenter rendering the action's egress when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presenter_name: Option<String>,
    /// Digest of the per-action input schema when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_schema_digest: Option<String>,
    /// Action has middleware attached.
    pub has_middleware: bool,
}

// ============================================================================
// SECTION: Behavior
// ============================================================================

/// Behavioral fingerprints of a tool.
///
/// # Invariants
/// - `system_rules_fingerprint` carries a `static:` prefix when every rule
///   is a constant literal, `dynamic:` otherwise.
/// - `affordance_topology` and `embedded_presenters` are sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorContract {
    /// Digest over the combined presenter egress schema digests, when any.
    pub egress_schema_digest: Option<String>,
    /// Fingerprint of the presenter system rules.
    pub system_rules_fingerprint: String,
    /// Cognitive guardrails limiting egress volume.
    pub cognitive_guardrails: CognitiveGuardrails,
    /// Middleware chain in declaration order.
    pub middleware_chain: Vec<String>,
    /// Fingerprint of the state-sync descriptor, when any.
    pub state_sync_fingerprint: Option<String>,
    /// Fingerprint of the concurrency descriptor, when any.
    pub concurrency_fingerprint: Option<String>,
    /// Sorted names of tools this one suggests as next actions.
    pub affordance_topology: Vec<String>,
    /// Sorted names of presenters embedded in egress.
    pub embedded_presenters: Vec<String>,
}

/// Egress-volume guardrails declared by a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CognitiveGuardrails {
    /// Maximum records surfaced to agents, when capped.
    pub agent_limit_max: Option<u32>,
    /// Maximum egress bytes, when capped.
    pub egress_max_bytes: Option<u64>,
}

// ============================================================================
// SECTION: Token Economics
// ============================================================================

/// Static token economics profile of a tool's egress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenEconomics {
    /// Distinct top-level egress schema fields.
    pub schema_field_count: u32,
    /// Egress may grow without a declared bound.
    pub unbounded_collection: bool,
    /// Estimated per-record token overhead.
    pub base_overhead_tokens: u32,
    /// Inflation risk tier.
    pub inflation_risk: InflationRisk,
}
