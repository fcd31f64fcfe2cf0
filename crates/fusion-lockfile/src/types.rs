// crates/fusion-lockfile/src/types.rs
// ============================================================================
// Module: Lockfile Types
// Description: Wire shapes for the sealed capability lockfile.
// Purpose: Define the canonical JSON artifact recorded on disk.
// Dependencies: fusion-contract, fusion-core, fusion-scanner, serde
// ============================================================================

//! ## Overview
//! The lockfile serializes with camelCase keys and canonical ordering at
//! every depth. Unknown top-level fields are preserved through a flattened
//! extras map so newer generators can extend the format without breaking
//! older readers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use fusion_contract::PromptArgument;
use fusion_contract::TokenEconomics;
use fusion_core::Timestamp;
use fusion_scanner::EntitlementFlags;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Current lockfile format version.
pub const LOCKFILE_VERSION: u32 = 1;

/// Canonical lockfile filename.
pub const LOCKFILE_NAME: &str = "fusion.lock.json";

// ============================================================================
// SECTION: Lockfile
// ============================================================================

/// Sealed snapshot of a server's accepted capability surface.
///
/// # Invariants
/// - `integrity_digest` is `sha256:` plus the aggregate digest computed
///   from the same tool and prompt records.
/// - `lockfile_version` is [`LOCKFILE_VERSION`] for artifacts produced by
///   this generator.
/// - `extra` preserves unknown top-level fields verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityLockfile {
    /// Accepted tools and prompts.
    pub capabilities: LockfileCapabilities,
    /// Generator version recorded for provenance; informational for
    /// freshness.
    pub fusion_version: String,
    /// Caller-supplied generation timestamp.
    pub generated_at: Timestamp,
    /// Sealed aggregate digest with the `sha256:` prefix.
    pub integrity_digest: String,
    /// Lockfile format version.
    pub lockfile_version: u32,
    /// Server the lockfile belongs to.
    pub server_name: String,
    /// Unknown top-level fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Accepted capability records keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockfileCapabilities {
    /// Prompt records keyed by prompt name, when any prompts are locked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts: Option<BTreeMap<String, PromptLockRecord>>,
    /// Tool records keyed by tool name.
    pub tools: BTreeMap<String, ToolLockRecord>,
}

// ============================================================================
// SECTION: Tool Records
// ============================================================================

/// Sealed record of one accepted tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolLockRecord {
    /// Agent-facing surface summary.
    pub surface: LockSurface,
    /// Behavioral summary.
    pub behavior: LockBehavior,
    /// Token economics snapshot.
    pub token_economics: TokenEconomics,
    /// Entitlement flags.
    pub entitlements: EntitlementFlags,
    /// Sealed tool digest with the `sha256:` prefix.
    pub integrity_digest: String,
}

/// Surface summary inside a tool lock record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockSurface {
    /// Tool description when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sorted tag set.
    pub tags: Vec<String>,
    /// Sorted action names.
    pub actions: Vec<String>,
    /// Digest of the canonical tool input schema.
    pub input_schema_digest: String,
}

/// Behavioral summary inside a tool lock record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockBehavior {
    /// Sorted names of destructive actions.
    pub destructive_actions: Vec<String>,
    /// Sorted names of read-only actions.
    pub read_only_actions: Vec<String>,
    /// Digest over the combined presenter egress schemas, when any.
    pub egress_schema_digest: Option<String>,
}

// ============================================================================
// SECTION: Prompt Records
// ============================================================================

/// Sealed record of one accepted prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptLockRecord {
    /// Prompt description when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Human-facing title when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Prompt arguments sorted by argument name.
    pub arguments: Vec<PromptArgument>,
    /// Sorted tag set.
    pub tags: Vec<String>,
    /// Hydration timeout in milliseconds, when declared.
    pub hydration_timeout: Option<u64>,
    /// Prompt has middleware attached.
    pub has_middleware: bool,
    /// Sealed prompt digest with the `sha256:` prefix.
    pub integrity_digest: String,
}
