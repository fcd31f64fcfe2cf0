// crates/fusion-lockfile/src/generate.rs
// ============================================================================
// Module: Lockfile Generation
// Description: Builds, serializes, and parses sealed capability lockfiles.
// Purpose: Produce byte-stable lockfiles from contracts and prompt builders.
// Dependencies: fusion-contract, fusion-core, fusion-digest, serde_json
// ============================================================================

//! ## Overview
//! Generation derives one lock record per contract and per prompt, seals
//! each with its digest, and seals the whole artifact with the aggregate
//! digest. Prompt entries join the aggregation map under `prompt:<name>`
//! keys so tool and prompt names cannot collide; with no prompts the
//! aggregate equals the plain server digest. Parsing is tolerant: a BOM is
//! stripped, and any malformed shape returns `None`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use fusion_contract::PromptCapability;
use fusion_contract::ToolContract;
use fusion_core::CanonicalError;
use fusion_core::Timestamp;
use fusion_core::canonical_json_string;
use fusion_core::hash_canonical_json;
use fusion_core::prefixed_digest;
use fusion_digest::DigestError;
use fusion_digest::aggregate_digest;
use fusion_digest::digest_contract;
use serde::Serialize;
use thiserror::Error;

use crate::types::CapabilityLockfile;
use crate::types::LOCKFILE_VERSION;
use crate::types::LockBehavior;
use crate::types::LockSurface;
use crate::types::LockfileCapabilities;
use crate::types::PromptLockRecord;
use crate::types::ToolLockRecord;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by lockfile generation, serialization, or storage.
#[derive(Debug, Error)]
pub enum LockfileError {
    /// A record could not be canonicalized.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalError),
    /// A contract could not be digested.
    #[error(transparent)]
    Digest(#[from] DigestError),
    /// The lockfile could not be read or written.
    #[error("lockfile io failed: {path}: {detail}")]
    Io {
        /// Path involved in the failure.
        path: String,
        /// Error details.
        detail: String,
    },
}

// ============================================================================
// SECTION: Options
// ============================================================================

/// Optional inputs for lockfile generation and drift checking.
pub struct LockfileOptions<'a> {
    /// Prompt builders locked alongside the tools.
    pub prompts: Vec<&'a dyn PromptCapability>,
}

impl Default for LockfileOptions<'_> {
    fn default() -> Self {
        Self {
            prompts: Vec::new(),
        }
    }
}

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Generates a sealed lockfile from contracts and optional prompts.
///
/// # Errors
///
/// Returns [`LockfileError`] when a record cannot be canonicalized or
/// digested.
pub fn generate_lockfile(
    server_name: &str,
    contracts: &BTreeMap<String, ToolContract>,
    fusion_version: &str,
    generated_at: Timestamp,
    options: &LockfileOptions<'_>,
) -> Result<CapabilityLockfile, LockfileError> {
    let mut tools = BTreeMap::new();
    let mut aggregation = BTreeMap::new();
    for (name, contract) in contracts {
        let digest = digest_contract(contract, generated_at)?;
        aggregation.insert(name.clone(), digest.digest.clone());
        tools.insert(name.clone(), tool_record(contract, &digest.digest));
    }

    let prompts = lock_prompts(&options.prompts, &mut aggregation)?;

    let integrity_digest = prefixed_digest(&aggregate_digest(&aggregation)?);

    Ok(CapabilityLockfile {
        capabilities: LockfileCapabilities {
            prompts,
            tools,
        },
        fusion_version: fusion_version.to_string(),
        generated_at,
        integrity_digest,
        lockfile_version: LOCKFILE_VERSION,
        server_name: server_name.to_string(),
        extra: BTreeMap::new(),
    })
}

/// Builds the lock record for one contract.
fn tool_record(contract: &ToolContract, digest: &str) -> ToolLockRecord {
    let mut destructive_actions = Vec::new();
    let mut read_only_actions = Vec::new();
    for (key, action) in &contract.surface.actions {
        if action.destructive {
            destructive_actions.push(key.clone());
        }
        if action.read_only {
            read_only_actions.push(key.clone());
        }
    }
    ToolLockRecord {
        surface: LockSurface {
            description: contract.surface.description.clone(),
            tags: contract.surface.tags.clone(),
            actions: contract.surface.actions.keys().cloned().collect(),
            input_schema_digest: contract.surface.input_schema_digest.clone(),
        },
        behavior: LockBehavior {
            destructive_actions,
            read_only_actions,
            egress_schema_digest: contract.behavior.egress_schema_digest.clone(),
        },
        token_economics: contract.token_economics,
        entitlements: contract.entitlements.flags(),
        integrity_digest: prefixed_digest(digest),
    }
}

/// Digestable material of a prompt record, without the seal itself.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptMaterial {
    /// Prompt description when declared.
    description: Option<String>,
    /// Human-facing title when declared.
    title: Option<String>,
    /// Prompt arguments sorted by argument name.
    arguments: Vec<fusion_contract::PromptArgument>,
    /// Sorted tag set.
    tags: Vec<String>,
    /// Hydration timeout in milliseconds, when declared.
    hydration_timeout: Option<u64>,
    /// Prompt has middleware attached.
    has_middleware: bool,
}

/// Builds sorted prompt records and folds their digests into the
/// aggregation map under `prompt:<name>` keys.
pub(crate) fn lock_prompts(
    prompts: &[&dyn PromptCapability],
    aggregation: &mut BTreeMap<String, String>,
) -> Result<Option<BTreeMap<String, PromptLockRecord>>, LockfileError> {
    if prompts.is_empty() {
        return Ok(None);
    }
    let mut records = BTreeMap::new();
    for prompt in prompts {
        let definition = prompt.prompt_definition();
        let mut arguments = definition.arguments;
        arguments.sort_by(|lhs, rhs| lhs.name.cmp(&rhs.name));
        let mut tags = prompt.tags();
        tags.sort();
        tags.dedup();

        let material = PromptMaterial {
            description: definition.description,
            title: definition.title,
            arguments,
            tags,
            hydration_timeout: prompt.hydration_timeout(),
            has_middleware: prompt.has_middleware(),
        };
        let digest = hash_canonical_json(&material)?;
        aggregation.insert(format!("prompt:{}", definition.name), digest.clone());
        records.insert(definition.name, PromptLockRecord {
            description: material.description,
            title: material.title,
            arguments: material.arguments,
            tags: material.tags,
            hydration_timeout: material.hydration_timeout,
            has_middleware: material.has_middleware,
            integrity_digest: prefixed_digest(&digest),
        });
    }
    Ok(Some(records))
}

// ============================================================================
// SECTION: Serialization
// ============================================================================

/// Serializes a lockfile as canonical JSON with a trailing newline.
///
/// # Errors
///
/// Returns [`LockfileError::Canonicalization`] when serialization fails.
pub fn serialize_lockfile(lockfile: &CapabilityLockfile) -> Result<String, LockfileError> {
    let mut text = canonical_json_string(lockfile)?;
    text.push('\n');
    Ok(text)
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses lockfile text, returning `None` on any malformed input.
///
/// A UTF-8 BOM prefix is tolerated. The shape must carry the required
/// fields and `lockfileVersion` 1; unknown top-level fields are preserved.
#[must_use]
pub fn parse_lockfile(text: &str) -> Option<CapabilityLockfile> {
    let trimmed = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lockfile: CapabilityLockfile = serde_json::from_str(trimmed).ok()?;
    if lockfile.lockfile_version != LOCKFILE_VERSION {
        return None;
    }
    Some(lockfile)
}
