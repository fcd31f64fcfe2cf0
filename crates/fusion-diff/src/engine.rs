// crates/fusion-diff/src/engine.rs
// ============================================================================
// Module: Diff Engine
// Description: Field-by-field structural walk of two tool contracts.
// Purpose: Emit classified deltas per the governance severity tables.
// Dependencies: fusion-contract, fusion-core, fusion-digest, serde_json
// ============================================================================

//! ## Overview
//! Each contract section is walked by a dedicated pass; every observed
//! change appends exactly one delta whose severity comes from the
//! classification tables: identity, schema, and entitlement gains break;
//! middleware, guardrails, fingerprints, and topology are risky; additive
//! surface and lost entitlements are safe; descriptions and removed tags
//! are cosmetic. Escalating inflation risk breaks, de-escalating is safe.

// ============================================================================
// SECTION: Imports
// ============================================================================

use fusion_contract::ActionContract;
use fusion_contract::BehaviorContract;
use fusion_contract::SurfaceContract;
use fusion_contract::TokenEconomics;
use fusion_contract::ToolContract;
use fusion_core::ChangeSeverity;
use fusion_core::Timestamp;
use fusion_digest::DigestError;
use fusion_digest::digest_contract;
use fusion_scanner::EntitlementFlags;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::delta::ContractDelta;
use crate::delta::ContractDiffResult;
use crate::delta::DeltaCategory;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while diffing contracts.
#[derive(Debug, Error)]
pub enum DiffError {
    /// A contract could not be digested for the digest-changed flag.
    #[error(transparent)]
    Digest(#[from] DigestError),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Diffs two observations of one tool's contract.
///
/// # Errors
///
/// Returns [`DiffError`] when either contract cannot be digested.
pub fn diff_contracts(
    before: &ToolContract,
    after: &ToolContract,
) -> Result<ContractDiffResult, DiffError> {
    let mut deltas = Vec::new();
    diff_surface(&before.surface, &after.surface, &mut deltas);
    diff_behavior(&before.behavior, &after.behavior, &mut deltas);
    diff_economics(&before.token_economics, &after.token_economics, &mut deltas);
    diff_entitlements(&before.entitlements.flags(), &after.entitlements.flags(), &mut deltas);

    deltas.sort_by(|lhs, rhs| {
        rhs.severity
            .cmp(&lhs.severity)
            .then(lhs.category.cmp(&rhs.category))
            .then(lhs.field.cmp(&rhs.field))
    });

    let max_severity =
        deltas.iter().map(|delta| delta.severity).max().unwrap_or(ChangeSeverity::Cosmetic);
    let digest_changed = digest_contract(before, Timestamp::UNIX_EPOCH)?.digest
        != digest_contract(after, Timestamp::UNIX_EPOCH)?.digest;

    Ok(ContractDiffResult {
        tool_name: after.surface.name.clone(),
        deltas,
        max_severity,
        digest_changed,
        is_backwards_compatible: max_severity.is_backwards_compatible(),
    })
}

// ============================================================================
// SECTION: Delta Helpers
// ============================================================================

/// Builds one delta with JSON-projected before/after values.
fn push_delta<B: Serialize, A: Serialize>(
    deltas: &mut Vec<ContractDelta>,
    category: DeltaCategory,
    field: &str,
    severity: ChangeSeverity,
    description: String,
    before: &B,
    after: &A,
) {
    deltas.push(ContractDelta {
        category,
        field: field.to_string(),
        severity,
        description,
        before: project(before),
        after: project(after),
    });
}

/// Projects a value into JSON, dropping it when not representable.
fn project<T: Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok().filter(|projected| !projected.is_null())
}

// ============================================================================
// SECTION: Surface Walk
// ============================================================================

/// Walks the agent-facing surface.
fn diff_surface(before: &SurfaceContract, after: &SurfaceContract, deltas: &mut Vec<ContractDelta>) {
    if before.name != after.name {
        push_delta(
            deltas,
            DeltaCategory::Surface,
            "name",
            ChangeSeverity::Breaking,
            format!("tool renamed from \"{}\" to \"{}\"", before.name, after.name),
            &before.name,
            &after.name,
        );
    }
    if before.input_schema_digest != after.input_schema_digest {
        push_delta(
            deltas,
            DeltaCategory::Surface,
            "inputSchemaDigest",
            ChangeSeverity::Breaking,
            String::from("tool input schema changed"),
            &before.input_schema_digest,
            &after.input_schema_digest,
        );
    }
    if before.description != after.description {
        push_delta(
            deltas,
            DeltaCategory::Surface,
            "description",
            ChangeSeverity::Cosmetic,
            String::from("tool description changed"),
            &before.description,
            &after.description,
        );
    }
    for tag in &after.tags {
        if !before.tags.contains(tag) {
            push_delta(
                deltas,
                DeltaCategory::Surface,
                "tags",
                ChangeSeverity::Safe,
                format!("tag \"{tag}\" added"),
                &None::<String>,
                tag,
            );
        }
    }
    for tag in &before.tags {
        if !after.tags.contains(tag) {
            push_delta(
                deltas,
                DeltaCategory::Surface,
                "tags",
                ChangeSeverity::Cosmetic,
                format!("tag \"{tag}\" removed"),
                tag,
                &None::<String>,
            );
        }
    }
    diff_actions(before, after, deltas);
}

/// Walks the action map: additions, removals, and retained-action fields.
fn diff_actions(before: &SurfaceContract, after: &SurfaceContract, deltas: &mut Vec<ContractDelta>) {
    for (key, action) in &after.actions {
        match before.actions.get(key) {
            None => push_delta(
                deltas,
                DeltaCategory::Surface,
                &format!("actions.{key}"),
                ChangeSeverity::Safe,
                format!("action \"{key}\" added"),
                &None::<String>,
                action,
            ),
            Some(previous) => diff_retained_action(key, previous, action, deltas),
        }
    }
    for (key, action) in &before.actions {
        if !after.actions.contains_key(key) {
            push_delta(
                deltas,
                DeltaCategory::Surface,
                &format!("actions.{key}"),
                ChangeSeverity::Breaking,
                format!("action \"{key}\" removed"),
                action,
                &None::<String>,
            );
        }
    }
}

/// Walks one action retained across both observations.
fn diff_retained_action(
    key: &str,
    before: &ActionContract,
    after: &ActionContract,
    deltas: &mut Vec<ContractDelta>,
) {
    if before.destructive != after.destructive {
        let severity = if after.destructive {
            ChangeSeverity::Breaking
        } else {
            ChangeSeverity::Safe
        };
        let verb = if after.destructive { "became" } else { "is no longer" };
        push_delta(
            deltas,
            DeltaCategory::Surface,
            &format!("actions.{key}.destructive"),
            severity,
            format!("action \"{key}\" {verb} destructive"),
            &before.destructive,
            &after.destructive,
        );
    }
    if before.read_only != after.read_only {
        let severity =
            if after.read_only { ChangeSeverity::Safe } else { ChangeSeverity::Breaking };
        let description = if after.read_only {
            format!("action \"{key}\" became read-only")
        } else {
            format!("action \"{key}\" lost its read-only guarantee")
        };
        push_delta(
            deltas,
            DeltaCategory::Surface,
            &format!("actions.{key}.readOnly"),
            severity,
            description,
            &before.read_only,
            &after.read_only,
        );
    }
    if before.idempotent != after.idempotent {
        let severity = if after.idempotent { ChangeSeverity::Safe } else { ChangeSeverity::Risky };
        let verb = if after.idempotent { "became" } else { "is no longer" };
        push_delta(
            deltas,
            DeltaCategory::Surface,
            &format!("actions.{key}.idempotent"),
            severity,
            format!("action \"{key}\" {verb} idempotent"),
            &before.idempotent,
            &after.idempotent,
        );
    }
    for field in &after.required_fields {
        if !before.required_fields.contains(field) {
            push_delta(
                deltas,
                DeltaCategory::Surface,
                &format!("actions.{key}.requiredFields"),
                ChangeSeverity::Breaking,
                format!("action \"{key}\" now requires field \"{field}\""),
                &None::<String>,
                field,
            );
        }
    }
    for field in &before.required_fields {
        if !after.required_fields.contains(field) {
            push_delta(
                deltas,
                DeltaCategory::Surface,
                &format!("actions.{key}.requiredFields"),
                ChangeSeverity::Safe,
                format!("action \"{key}\" no longer requires field \"{field}\""),
                field,
                &None::<String>,
            );
        }
    }
    if before.input_schema_digest != after.input_schema_digest {
        push_delta(
            deltas,
            DeltaCategory::Surface,
            &format!("actions.{key}.inputSchemaDigest"),
            ChangeSeverity::Breaking,
            format!("action \"{key}\" input schema changed"),
            &before.input_schema_digest,
            &after.input_schema_digest,
        );
    }
    if before.presenter_name != after.presenter_name {
        push_delta(
            deltas,
            DeltaCategory::Surface,
            &format!("actions.{key}.presenterName"),
            ChangeSeverity::Risky,
            format!("action \"{key}\" presenter changed"),
            &before.presenter_name,
            &after.presenter_name,
        );
    }
    if before.has_middleware != after.has_middleware {
        let verb = if after.has_middleware { "gained" } else { "lost" };
        push_delta(
            deltas,
            DeltaCategory::Surface,
            &format!("actions.{key}.hasMiddleware"),
            ChangeSeverity::Risky,
            format!("action \"{key}\" {verb} middleware"),
            &before.has_middleware,
            &after.has_middleware,
        );
    }
}

// ============================================================================
// SECTION: Behavior Walk
// ============================================================================

/// Walks behavioral fingerprints, guardrails, middleware, and topology.
fn diff_behavior(
    before: &BehaviorContract,
    after: &BehaviorContract,
    deltas: &mut Vec<ContractDelta>,
) {
    if before.egress_schema_digest != after.egress_schema_digest {
        push_delta(
            deltas,
            DeltaCategory::BehaviorEgress,
            "egressSchemaDigest",
            ChangeSeverity::Breaking,
            String::from("egress schema changed"),
            &before.egress_schema_digest,
            &after.egress_schema_digest,
        );
    }
    if before.system_rules_fingerprint != after.system_rules_fingerprint {
        push_delta(
            deltas,
            DeltaCategory::BehaviorEgress,
            "systemRulesFingerprint",
            ChangeSeverity::Risky,
            String::from("presenter system rules changed"),
            &before.system_rules_fingerprint,
            &after.system_rules_fingerprint,
        );
    }
    diff_guardrails(before, after, deltas);
    if before.middleware_chain != after.middleware_chain {
        push_delta(
            deltas,
            DeltaCategory::BehaviorMiddleware,
            "middlewareChain",
            ChangeSeverity::Risky,
            String::from("middleware chain changed"),
            &before.middleware_chain,
            &after.middleware_chain,
        );
    }
    if before.state_sync_fingerprint != after.state_sync_fingerprint {
        push_delta(
            deltas,
            DeltaCategory::BehaviorMiddleware,
            "stateSyncFingerprint",
            ChangeSeverity::Risky,
            String::from("state-sync behavior changed"),
            &before.state_sync_fingerprint,
            &after.state_sync_fingerprint,
        );
    }
    if before.concurrency_fingerprint != after.concurrency_fingerprint {
        push_delta(
            deltas,
            DeltaCategory::BehaviorMiddleware,
            "concurrencyFingerprint",
            ChangeSeverity::Risky,
            String::from("concurrency behavior changed"),
            &before.concurrency_fingerprint,
            &after.concurrency_fingerprint,
        );
    }
    if before.affordance_topology != after.affordance_topology {
        push_delta(
            deltas,
            DeltaCategory::BehaviorTopology,
            "affordanceTopology",
            ChangeSeverity::Risky,
            String::from("affordance topology changed"),
            &before.affordance_topology,
            &after.affordance_topology,
        );
    }
    if before.embedded_presenters != after.embedded_presenters {
        push_delta(
            deltas,
            DeltaCategory::BehaviorTopology,
            "embeddedPresenters",
            ChangeSeverity::Risky,
            String::from("embedded presenters changed"),
            &before.embedded_presenters,
            &after.embedded_presenters,
        );
    }
}

/// Walks the cognitive guardrails.
fn diff_guardrails(
    before: &BehaviorContract,
    after: &BehaviorContract,
    deltas: &mut Vec<ContractDelta>,
) {
    let before_bytes = before.cognitive_guardrails.egress_max_bytes;
    let after_bytes = after.cognitive_guardrails.egress_max_bytes;
    if before_bytes != after_bytes {
        let (severity, description) = match (before_bytes, after_bytes) {
            (Some(_), None) => (ChangeSeverity::Risky, "egress byte cap removed"),
            (None, Some(_)) => (ChangeSeverity::Risky, "egress byte cap introduced"),
            (Some(old), Some(new)) if new < old => {
                (ChangeSeverity::Risky, "egress byte cap tightened")
            }
            _ => (ChangeSeverity::Safe, "egress byte cap relaxed"),
        };
        push_delta(
            deltas,
            DeltaCategory::BehaviorGuardrails,
            "egressMaxBytes",
            severity,
            description.to_string(),
            &before_bytes,
            &after_bytes,
        );
    }

    let before_limit = before.cognitive_guardrails.agent_limit_max;
    let after_limit = after.cognitive_guardrails.agent_limit_max;
    if before_limit != after_limit {
        let tighter = match (before_limit, after_limit) {
            (None, Some(_)) => true,
            (Some(old), Some(new)) => new < old,
            _ => false,
        };
        let (severity, description) = if tighter {
            (ChangeSeverity::Risky, "agent collection limit tightened")
        } else {
            (ChangeSeverity::Safe, "agent collection limit relaxed")
        };
        push_delta(
            deltas,
            DeltaCategory::BehaviorGuardrails,
            "agentLimitMax",
            severity,
            description.to_string(),
            &before_limit,
            &after_limit,
        );
    }
}

// ============================================================================
// SECTION: Token Economics Walk
// ============================================================================

/// Walks the token economics record.
fn diff_economics(
    before: &TokenEconomics,
    after: &TokenEconomics,
    deltas: &mut Vec<ContractDelta>,
) {
    if before.inflation_risk != after.inflation_risk {
        let escalated = after.inflation_risk > before.inflation_risk;
        let severity = if escalated { ChangeSeverity::Breaking } else { ChangeSeverity::Safe };
        let direction = if escalated { "escalated" } else { "de-escalated" };
        push_delta(
            deltas,
            DeltaCategory::TokenEconomics,
            "inflationRisk",
            severity,
            format!(
                "inflation risk {direction} from {} to {}",
                before.inflation_risk, after.inflation_risk
            ),
            &before.inflation_risk,
            &after.inflation_risk,
        );
    }
    if before.unbounded_collection != after.unbounded_collection {
        let severity = if after.unbounded_collection {
            ChangeSeverity::Breaking
        } else {
            ChangeSeverity::Safe
        };
        let description = if after.unbounded_collection {
            "egress collection became unbounded"
        } else {
            "egress collection gained a bound"
        };
        push_delta(
            deltas,
            DeltaCategory::TokenEconomics,
            "unboundedCollection",
            severity,
            description.to_string(),
            &before.unbounded_collection,
            &after.unbounded_collection,
        );
    }
    if before.schema_field_count != after.schema_field_count {
        push_delta(
            deltas,
            DeltaCategory::TokenEconomics,
            "schemaFieldCount",
            ChangeSeverity::Cosmetic,
            String::from("egress schema field count changed"),
            &before.schema_field_count,
            &after.schema_field_count,
        );
    }
    if before.base_overhead_tokens != after.base_overhead_tokens {
        push_delta(
            deltas,
            DeltaCategory::TokenEconomics,
            "baseOverheadTokens",
            ChangeSeverity::Cosmetic,
            String::from("base token overhead estimate changed"),
            &before.base_overhead_tokens,
            &after.base_overhead_tokens,
        );
    }
}

// ============================================================================
// SECTION: Entitlements Walk
// ============================================================================

/// Walks the five entitlement flags.
fn diff_entitlements(
    before: &EntitlementFlags,
    after: &EntitlementFlags,
    deltas: &mut Vec<ContractDelta>,
) {
    let flags = [
        ("filesystem", before.filesystem, after.filesystem, "filesystem"),
        ("network", before.network, after.network, "network"),
        ("subprocess", before.subprocess, after.subprocess, "subprocess"),
        ("crypto", before.crypto, after.crypto, "crypto"),
        ("codeEvaluation", before.code_evaluation, after.code_evaluation, "code evaluation"),
    ];
    for (field, was, now, label) in flags {
        if was == now {
            continue;
        }
        let (severity, description) = if now {
            let description = if field == "codeEvaluation" {
                format!("tool gained the {label} entitlement; blast radius is unbounded")
            } else {
                format!("tool gained the {label} entitlement")
            };
            (ChangeSeverity::Breaking, description)
        } else {
            (ChangeSeverity::Safe, format!("tool lost the {label} entitlement"))
        };
        push_delta(deltas, DeltaCategory::Entitlements, field, severity, description, &was, &now);
    }
}
