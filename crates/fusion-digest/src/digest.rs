// crates/fusion-digest/src/digest.rs
// ============================================================================
// Module: Contract Digesting
// Description: Component, tool, and server digest computation.
// Purpose: Provide the content-addressed identity of a governed surface.
// Dependencies: fusion-contract, fusion-core, serde
// ============================================================================

//! ## Overview
//! A tool digest is the hash of the canonical list of its four component
//! digests; the server digest is the hash of the canonical name-to-digest
//! mapping. The entitlements component hashes the capability booleans only:
//! raw scanner matches carry line numbers that shift under cosmetic edits
//! and are treated as diagnostics, not identity.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use fusion_contract::ToolContract;
use fusion_core::CanonicalError;
use fusion_core::Timestamp;
use fusion_core::hash_canonical_json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while computing digests.
#[derive(Debug, Error)]
pub enum DigestError {
    /// A contract record could not be canonicalized.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalError),
}

// ============================================================================
// SECTION: Digest Records
// ============================================================================

/// Per-section digests of one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDigests {
    /// Digest of the surface record.
    pub surface: String,
    /// Digest of the behavior record.
    pub behavior: String,
    /// Digest of the token economics record.
    pub token_economics: String,
    /// Digest of the entitlement flags.
    pub entitlements: String,
}

/// Content-addressed fingerprint of one tool.
///
/// # Invariants
/// - `digest` is a pure function of the contract; `computed_at` is
///   caller-supplied metadata outside the hashed material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDigest {
    /// Tool name.
    pub tool_name: String,
    /// Tool digest over the component digests.
    pub digest: String,
    /// Per-section digests.
    pub components: ComponentDigests,
    /// Caller-supplied computation timestamp.
    pub computed_at: Timestamp,
}

/// Aggregate fingerprint over every tool of a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDigest {
    /// Aggregate digest over the sorted name-to-digest mapping.
    pub digest: String,
    /// Per-tool digests keyed by tool name.
    pub tools: BTreeMap<String, ToolDigest>,
    /// Caller-supplied computation timestamp.
    pub computed_at: Timestamp,
}

// ============================================================================
// SECTION: Digest Computation
// ============================================================================

/// Computes the component and tool digests for one contract.
///
/// # Errors
///
/// Returns [`DigestError`] when a contract record cannot be canonicalized.
pub fn digest_contract(
    contract: &ToolContract,
    computed_at: Timestamp,
) -> Result<ToolDigest, DigestError> {
    let components = ComponentDigests {
        surface: hash_canonical_json(&contract.surface)?,
        behavior: hash_canonical_json(&contract.behavior)?,
        token_economics: hash_canonical_json(&contract.token_economics)?,
        entitlements: hash_canonical_json(&contract.entitlements.flags())?,
    };
    let digest = hash_canonical_json(&[
        &components.surface,
        &components.behavior,
        &components.token_economics,
        &components.entitlements,
    ])?;
    Ok(ToolDigest {
        tool_name: contract.surface.name.clone(),
        digest,
        components,
        computed_at,
    })
}

/// Computes the aggregate server digest over all contracts.
///
/// # Errors
///
/// Returns [`DigestError`] when a contract record cannot be canonicalized.
pub fn digest_server(
    contracts: &BTreeMap<String, ToolContract>,
    computed_at: Timestamp,
) -> Result<ServerDigest, DigestError> {
    let mut tools = BTreeMap::new();
    let mut aggregation = BTreeMap::new();
    for (name, contract) in contracts {
        let tool_digest = digest_contract(contract, computed_at)?;
        aggregation.insert(name.clone(), tool_digest.digest.clone());
        tools.insert(name.clone(), tool_digest);
    }
    let digest = aggregate_digest(&aggregation)?;
    Ok(ServerDigest {
        digest,
        tools,
        computed_at,
    })
}

/// Hashes a sorted name-to-digest mapping into one aggregate digest.
///
/// Lockfile generation reuses this with prompt entries folded into the same
/// mapping, so a lockfile's integrity digest and the plain server digest
/// agree whenever the prompt set is empty.
///
/// # Errors
///
/// Returns [`DigestError`] when the mapping cannot be canonicalized.
pub fn aggregate_digest(entries: &BTreeMap<String, String>) -> Result<String, DigestError> {
    Ok(hash_canonical_json(entries)?)
}
