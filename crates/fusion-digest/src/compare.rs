// crates/fusion-digest/src/compare.rs
// ============================================================================
// Module: Server Digest Comparison
// Description: Name-level partition of two server digests.
// Purpose: Report added, removed, changed, and unchanged tools across runs.
// Dependencies: serde, crate::digest
// ============================================================================

//! ## Overview
//! Comparison partitions the union of tool names into four disjoint lists.
//! Names present on only one side land in `added` or `removed`; names on
//! both sides split into `changed` and `unchanged` by digest equality.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::digest::ServerDigest;

// ============================================================================
// SECTION: Comparison Result
// ============================================================================

/// Name-level partition of two server digests.
///
/// # Invariants
/// - The four lists partition the union of tool names; each list is sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestComparison {
    /// Aggregate digests differ.
    pub server_digest_changed: bool,
    /// Tools present only in the after digest.
    pub added: Vec<String>,
    /// Tools present only in the before digest.
    pub removed: Vec<String>,
    /// Tools present in both with differing digests.
    pub changed: Vec<String>,
    /// Tools present in both with equal digests.
    pub unchanged: Vec<String>,
}

// ============================================================================
// SECTION: Comparison
// ============================================================================

/// Partitions the tools of two server digests by presence and digest.
#[must_use]
pub fn compare_server_digests(before: &ServerDigest, after: &ServerDigest) -> DigestComparison {
    let mut comparison = DigestComparison {
        server_digest_changed: before.digest != after.digest,
        ..DigestComparison::default()
    };

    for (name, tool) in &after.tools {
        match before.tools.get(name) {
            None => comparison.added.push(name.clone()),
            Some(previous) if previous.digest != tool.digest => {
                comparison.changed.push(name.clone());
            }
            Some(_) => comparison.unchanged.push(name.clone()),
        }
    }
    for name in before.tools.keys() {
        if !after.tools.contains_key(name) {
            comparison.removed.push(name.clone());
        }
    }

    comparison
}
