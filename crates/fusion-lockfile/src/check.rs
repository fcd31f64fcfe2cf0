// crates/fusion-lockfile/src/check.rs
// ============================================================================
// Module: Lockfile Drift Check
// Description: Compares a cached lockfile against the current surface.
// Purpose: Detect added, removed, and changed tools and prompts.
// Dependencies: fusion-contract, fusion-core, fusion-digest, crate::generate
// ============================================================================

//! ## Overview
//! The drift check recomputes the current integrity digest first; when it
//! matches the sealed value the surface is fresh and no partition work
//! happens. Otherwise tools and prompts partition by presence and by their
//! per-record integrity digests, and the failure message names the drift
//! with a `stale` marker.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use fusion_contract::ToolContract;
use fusion_core::Timestamp;
use fusion_core::prefixed_digest;
use fusion_digest::aggregate_digest;
use fusion_digest::digest_contract;
use serde::Deserialize;
use serde::Serialize;

use crate::generate::LockfileError;
use crate::generate::LockfileOptions;
use crate::generate::lock_prompts;
use crate::types::CapabilityLockfile;
use crate::types::PromptLockRecord;

// ============================================================================
// SECTION: Check Result
// ============================================================================

/// Outcome of a lockfile drift check.
///
/// # Invariants
/// - `ok` is `false` exactly when any added/removed/changed list (tool or
///   prompt) is non-empty.
/// - On failure `message` contains `stale`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockfileCheck {
    /// Surface matches the lockfile.
    pub ok: bool,
    /// Human-readable verdict.
    pub message: String,
    /// Tools present now but not locked.
    pub added: Vec<String>,
    /// Tools locked but no longer present.
    pub removed: Vec<String>,
    /// Tools whose sealed digest no longer matches.
    pub changed: Vec<String>,
    /// Tools unchanged since sealing.
    pub unchanged: Vec<String>,
    /// Prompts present now but not locked.
    pub added_prompts: Vec<String>,
    /// Prompts locked but no longer present.
    pub removed_prompts: Vec<String>,
    /// Prompts whose sealed digest no longer matches.
    pub changed_prompts: Vec<String>,
    /// Prompts unchanged since sealing.
    pub unchanged_prompts: Vec<String>,
}

// ============================================================================
// SECTION: Drift Check
// ============================================================================

/// Checks a cached lockfile against the current contracts and prompts.
///
/// # Errors
///
/// Returns [`LockfileError`] when the current surface cannot be digested.
pub fn check_lockfile(
    lockfile: &CapabilityLockfile,
    contracts: &BTreeMap<String, ToolContract>,
    options: &LockfileOptions<'_>,
) -> Result<LockfileCheck, LockfileError> {
    let mut current_tools = BTreeMap::new();
    let mut aggregation = BTreeMap::new();
    for (name, contract) in contracts {
        let digest = digest_contract(contract, Timestamp::UNIX_EPOCH)?;
        aggregation.insert(name.clone(), digest.digest.clone());
        current_tools.insert(name.clone(), prefixed_digest(&digest.digest));
    }
    let current_prompts = lock_prompts(&options.prompts, &mut aggregation)?;

    let current_integrity = prefixed_digest(&aggregate_digest(&aggregation)?);
    if current_integrity == lockfile.integrity_digest {
        let mut check = LockfileCheck {
            ok: true,
            message: String::from("capability surface matches the lockfile"),
            ..LockfileCheck::default()
        };
        check.unchanged = current_tools.keys().cloned().collect();
        check.unchanged_prompts = current_prompts
            .as_ref()
            .map(|records| records.keys().cloned().collect())
            .unwrap_or_default();
        return Ok(check);
    }

    let mut check = LockfileCheck::default();
    partition_tools(lockfile, &current_tools, &mut check);
    partition_prompts(lockfile, current_prompts.as_ref(), &mut check);

    check.ok = check.added.is_empty()
        && check.removed.is_empty()
        && check.changed.is_empty()
        && check.added_prompts.is_empty()
        && check.removed_prompts.is_empty()
        && check.changed_prompts.is_empty();
    check.message = if check.ok {
        String::from("capability surface matches the lockfile")
    } else {
        format!(
            "capability lockfile is stale: {} added, {} removed, {} changed \
             ({} prompt(s) drifted)",
            check.added.len(),
            check.removed.len(),
            check.changed.len(),
            check.added_prompts.len() + check.removed_prompts.len() + check.changed_prompts.len(),
        )
    };
    Ok(check)
}

/// Partitions tool names by presence and sealed digest.
fn partition_tools(
    lockfile: &CapabilityLockfile,
    current: &BTreeMap<String, String>,
    check: &mut LockfileCheck,
) {
    for (name, digest) in current {
        match lockfile.capabilities.tools.get(name) {
            None => check.added.push(name.clone()),
            Some(record) if record.integrity_digest != *digest => check.changed.push(name.clone()),
            Some(_) => check.unchanged.push(name.clone()),
        }
    }
    for name in lockfile.capabilities.tools.keys() {
        if !current.contains_key(name) {
            check.removed.push(name.clone());
        }
    }
}

/// Partitions prompt names by presence and sealed digest.
fn partition_prompts(
    lockfile: &CapabilityLockfile,
    current: Option<&BTreeMap<String, PromptLockRecord>>,
    check: &mut LockfileCheck,
) {
    let empty = BTreeMap::new();
    let locked = lockfile.capabilities.prompts.as_ref().unwrap_or(&empty);
    let current = current.unwrap_or(&empty);

    for (name, record) in current {
        match locked.get(name) {
            None => check.added_prompts.push(name.clone()),
            Some(sealed) if sealed.integrity_digest != record.integrity_digest => {
                check.changed_prompts.push(name.clone());
            }
            Some(_) => check.unchanged_prompts.push(name.clone()),
        }
    }
    for name in locked.keys() {
        if !current.contains_key(name) {
            check.removed_prompts.push(name.clone());
        }
    }
}
