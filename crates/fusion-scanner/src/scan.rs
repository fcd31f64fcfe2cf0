// crates/fusion-scanner/src/scan.rs
// ============================================================================
// Module: Entitlement Scan Pass
// Description: Line-oriented pattern matching over handler source.
// Purpose: Produce ordered entitlement matches and aggregate capability flags.
// Dependencies: crate::{patterns, types}
// ============================================================================

//! ## Overview
//! The scan pass walks handler source line by line and reports every
//! capability-surfacing hit with a 1-based line number. Matching is
//! deliberately conservative: hits inside comments are reported, and one
//! source line may yield several matches (for example `globalThis.fetch(`
//! reports both the qualified and the bare `fetch` identifier).

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::patterns::CALL_PATTERNS;
use crate::patterns::IdentifierSource;
use crate::types::EntitlementCategory;
use crate::types::EntitlementMatch;
use crate::types::EntitlementSet;

// ============================================================================
// SECTION: Scan Pass
// ============================================================================

/// Scans handler source and returns ordered entitlement matches.
///
/// Matches are ordered by line, then by pattern table order. Line numbers
/// are 1-based and best-effort; `file` is carried through verbatim.
#[must_use]
pub fn scan_source(source: &str, file: Option<&str>) -> Vec<EntitlementMatch> {
    let mut matches = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let line_number = u32::try_from(index + 1).ok();
        for pattern in CALL_PATTERNS.iter() {
            for captures in pattern.regex.captures_iter(line) {
                let identifier = match pattern.identifier {
                    IdentifierSource::Fixed(name) => name.to_string(),
                    IdentifierSource::Captured => captures
                        .get(1)
                        .map_or_else(String::new, |group| group.as_str().to_string()),
                };
                if identifier.is_empty() {
                    continue;
                }
                matches.push(EntitlementMatch {
                    category: pattern.category,
                    identifier,
                    line: line_number,
                    file: file.map(ToString::to_string),
                });
            }
        }
    }
    matches
}

// ============================================================================
// SECTION: Aggregation
// ============================================================================

/// Aggregates scanner matches into capability flags plus the raw hit list.
#[must_use]
pub fn build_entitlements(matches: &[EntitlementMatch]) -> EntitlementSet {
    let mut set = EntitlementSet {
        raw: matches.to_vec(),
        ..EntitlementSet::default()
    };
    for hit in matches {
        match hit.category {
            EntitlementCategory::Filesystem => set.filesystem = true,
            EntitlementCategory::Network => set.network = true,
            EntitlementCategory::Subprocess => set.subprocess = true,
            EntitlementCategory::Crypto => set.crypto = true,
            EntitlementCategory::CodeEvaluation => set.code_evaluation = true,
        }
    }
    set
}
