// crates/fusion-contract/src/materialize.rs
// ============================================================================
// Module: Contract Materializer
// Description: Projects a tool builder's public surface into a ToolContract.
// Purpose: Produce the normalized, digestable contract value for governance.
// Dependencies: fusion-core, fusion-scanner, serde_json, crate::{capability,
//               economics, types}
// ============================================================================

//! ## Overview
//! Materialization distills everything governance needs from a builder:
//! schema digests, sorted action contracts, behavior fingerprints, a token
//! economics profile, and scanned entitlements. The pipeline is pure and
//! deterministic: two runs over the same builder produce byte-equal
//! contracts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use fusion_core::CanonicalError;
use fusion_core::hash_canonical_json;
use fusion_scanner::EntitlementSet;
use fusion_scanner::build_entitlements;
use fusion_scanner::scan_source;
use serde_json::Value;
use thiserror::Error;

use crate::capability::BehaviorSurface;
use crate::capability::SystemRuleSet;
use crate::capability::ToolCapability;
use crate::economics::classify_risk;
use crate::economics::estimate_tokens;
use crate::types::ActionContract;
use crate::types::BehaviorContract;
use crate::types::CognitiveGuardrails;
use crate::types::SurfaceContract;
use crate::types::TokenEconomics;
use crate::types::ToolContract;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while materializing contracts.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// A schema or descriptor could not be canonicalized.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalError),
    /// Two builders share a tool name.
    #[error("duplicate tool name: {name}")]
    DuplicateTool {
        /// Conflicting tool name.
        name: String,
    },
}

// ============================================================================
// SECTION: Materialization
// ============================================================================

/// Materializes one builder into a normalized [`ToolContract`].
///
/// # Errors
///
/// Returns [`MaterializeError::Canonicalization`] when a schema or
/// descriptor cannot be canonicalized.
pub fn materialize_contract(
    capability: &dyn ToolCapability,
) -> Result<ToolContract, MaterializeError> {
    let definition = capability.tool_definition();
    let input_schema_digest = hash_canonical_json(&definition.input_schema)?;

    let mut tags = capability.tags();
    tags.sort();
    tags.dedup();

    let mut actions = BTreeMap::new();
    for metadata in capability.action_metadata() {
        let mut required_fields = metadata.required_fields;
        required_fields.sort();
        required_fields.dedup();
        let action_schema_digest = match metadata.input_schema.as_ref() {
            Some(schema) => Some(hash_canonical_json(schema)?),
            None => None,
        };
        actions.insert(metadata.key, ActionContract {
            description: metadata.description,
            destructive: metadata.destructive,
            idempotent: metadata.idempotent,
            read_only: metadata.read_only,
            required_fields,
            presenter_name: metadata.presenter_name,
            input_schema_digest: action_schema_digest,
            has_middleware: metadata.has_middleware,
        });
    }

    let surface = SurfaceContract {
        name: capability.name(),
        description: capability.description(),
        tags,
        input_schema_digest,
        actions,
    };

    let behavior_surface = capability.behavior_surface();
    let behavior = materialize_behavior(&behavior_surface)?;
    let token_economics = materialize_economics(&behavior_surface);

    let entitlements = capability.handler_source().map_or_else(EntitlementSet::default, |source| {
        build_entitlements(&scan_source(&source, None))
    });

    Ok(ToolContract {
        surface,
        behavior,
        token_economics,
        entitlements,
    })
}

/// Materializes contracts for a set of builders, keyed and sorted by name.
///
/// # Errors
///
/// Returns [`MaterializeError::DuplicateTool`] when two builders share a
/// name, and propagates canonicalization failures.
pub fn compile_contracts(
    capabilities: &[&dyn ToolCapability],
) -> Result<BTreeMap<String, ToolContract>, MaterializeError> {
    let mut contracts = BTreeMap::new();
    for capability in capabilities {
        let contract = materialize_contract(*capability)?;
        let name = contract.surface.name.clone();
        if contracts.insert(name.clone(), contract).is_some() {
            return Err(MaterializeError::DuplicateTool {
                name,
            });
        }
    }
    Ok(contracts)
}

// ============================================================================
// SECTION: Behavior Fingerprinting
// ============================================================================

/// Distills the behavior surface into digestable fingerprints.
fn materialize_behavior(surface: &BehaviorSurface) -> Result<BehaviorContract, MaterializeError> {
    let mut egress_digests = Vec::new();
    for presenter in &surface.presenters {
        if let Some(schema) = presenter.egress_schema.as_ref() {
            egress_digests.push(hash_canonical_json(schema)?);
        }
    }
    egress_digests.sort();
    let egress_schema_digest = if egress_digests.is_empty() {
        None
    } else {
        Some(hash_canonical_json(&egress_digests)?)
    };

    let system_rules_fingerprint = fingerprint_system_rules(surface)?;

    let mut affordance_topology: BTreeSet<String> = BTreeSet::new();
    let mut embedded_presenters: BTreeSet<String> = BTreeSet::new();
    for presenter in &surface.presenters {
        affordance_topology.extend(presenter.suggested_tools.iter().cloned());
        if presenter.embedded {
            embedded_presenters.insert(presenter.name.clone());
        }
    }

    let state_sync_fingerprint = match surface.state_sync_descriptor.as_ref() {
        Some(descriptor) => Some(hash_canonical_json(descriptor)?),
        None => None,
    };
    let concurrency_fingerprint = match surface.concurrency_descriptor.as_ref() {
        Some(descriptor) => Some(hash_canonical_json(descriptor)?),
        None => None,
    };

    Ok(BehaviorContract {
        egress_schema_digest,
        system_rules_fingerprint,
        cognitive_guardrails: CognitiveGuardrails {
            agent_limit_max: surface.guardrails.agent_limit_max,
            egress_max_bytes: surface.guardrails.egress_max_bytes,
        },
        middleware_chain: surface.middleware_chain.clone(),
        state_sync_fingerprint,
        concurrency_fingerprint,
        affordance_topology: affordance_topology.into_iter().collect(),
        embedded_presenters: embedded_presenters.into_iter().collect(),
    })
}

/// Fingerprints presenter system rules.
///
/// The fingerprint is `static:<digest>` only when every presenter declares
/// literal rules; any dynamic rule set degrades the whole tool to
/// `dynamic:<digest>`.
fn fingerprint_system_rules(surface: &BehaviorSurface) -> Result<String, MaterializeError> {
    let mut material: Vec<Vec<String>> = Vec::with_capacity(surface.presenters.len());
    let mut all_static = true;
    for presenter in &surface.presenters {
        match &presenter.system_rules {
            SystemRuleSet::Static(rules) => material.push(rules.clone()),
            SystemRuleSet::Dynamic(label) => {
                all_static = false;
                material.push(vec![label.clone()]);
            }
        }
    }
    let digest = hash_canonical_json(&material)?;
    let prefix = if all_static { "static" } else { "dynamic" };
    Ok(format!("{prefix}:{digest}"))
}

// ============================================================================
// SECTION: Economics Projection
// ============================================================================

/// Builds the token economics record from the behavior surface.
fn materialize_economics(surface: &BehaviorSurface) -> TokenEconomics {
    let mut field_keys: BTreeSet<String> = BTreeSet::new();
    for presenter in &surface.presenters {
        if let Some(schema) = presenter.egress_schema.as_ref() {
            field_keys.extend(schema_field_keys(schema));
        }
    }

    let unbounded_collection =
        surface.presenters.iter().any(|presenter| presenter.unbounded_collection);
    let bounded = surface.guardrails.agent_limit_max.is_some()
        || surface.guardrails.egress_max_bytes.is_some();

    let base_overhead_tokens = field_keys.iter().map(|key| estimate_tokens(key)).sum();
    let inflation_risk = classify_risk(field_keys.len(), bounded && !unbounded_collection);

    TokenEconomics {
        schema_field_count: u32::try_from(field_keys.len()).unwrap_or(u32::MAX),
        unbounded_collection,
        base_overhead_tokens,
        inflation_risk,
    }
}

/// Returns the top-level property keys of a JSON Schema object.
fn schema_field_keys(schema: &Value) -> Vec<String> {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|properties| properties.keys().cloned().collect())
        .unwrap_or_default()
}
