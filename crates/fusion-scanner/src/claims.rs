// crates/fusion-scanner/src/claims.rs
// ============================================================================
// Module: Claims Validation
// Description: Checks declared tool flags against observed capability hits.
// Purpose: Surface contradictions between advertised and actual behavior.
// Dependencies: serde, crate::types
// ============================================================================

//! ## Overview
//! A tool declares behavioral flags (`readOnly`, `destructive`) and may
//! allow-list specific capability categories. Claims validation compares
//! those declarations against scanner matches and reports violations:
//! contradictions are errors, suspicious-but-consistent combinations are
//! warnings. Code evaluation is always an error unless explicitly allowed,
//! because its blast radius is unbounded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::types::EntitlementCategory;
use crate::types::EntitlementMatch;

// ============================================================================
// SECTION: Declared Claims
// ============================================================================

/// Behavioral flags a tool advertises to agents.
///
/// # Invariants
/// - `allowed` lists categories the author has consciously accepted; each
///   entry suppresses the corresponding category-wide rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredClaims {
    /// Tool claims to never mutate state.
    pub read_only: bool,
    /// Tool admits to destructive operations.
    pub destructive: bool,
    /// Capability categories consciously accepted by the author.
    #[serde(default)]
    pub allowed: Vec<EntitlementCategory>,
}

impl DeclaredClaims {
    /// Returns `true` when the category is allow-listed.
    #[must_use]
    pub fn allows(&self, category: EntitlementCategory) -> bool {
        self.allowed.contains(&category)
    }
}

// ============================================================================
// SECTION: Violations
// ============================================================================

/// Severity of a claims violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClaimSeverity {
    /// Suspicious combination worth reviewing.
    Warning,
    /// Declared flags contradict observed capability hits.
    Error,
}

/// A single contradiction between claims and observed hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimViolation {
    /// Violation severity.
    pub severity: ClaimSeverity,
    /// Capability category the violation concerns.
    pub category: EntitlementCategory,
    /// Human-readable description of the contradiction.
    pub description: String,
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates declared claims against scanner matches.
///
/// Rules:
/// - `readOnly` with filesystem writes or subprocess execution is an error
///   regardless of allow-listing.
/// - Non-`destructive` tools with subprocess execution draw a warning.
/// - Any code-evaluation hit is an error with unbounded blast radius unless
///   the category is allow-listed; combined with `readOnly` it stays an
///   error even when allowed.
#[must_use]
pub fn validate_claims(
    matches: &[EntitlementMatch],
    claims: &DeclaredClaims,
) -> Vec<ClaimViolation> {
    let mut violations = Vec::new();

    let has_write = matches
        .iter()
        .any(|hit| hit.category == EntitlementCategory::Filesystem && is_write_identifier(&hit.identifier));
    let has_subprocess = matches.iter().any(|hit| hit.category == EntitlementCategory::Subprocess);
    let has_code_evaluation =
        matches.iter().any(|hit| hit.category == EntitlementCategory::CodeEvaluation);

    if claims.read_only && has_write {
        violations.push(ClaimViolation {
            severity: ClaimSeverity::Error,
            category: EntitlementCategory::Filesystem,
            description: String::from(
                "tool is declared readOnly but its handler writes to the filesystem",
            ),
        });
    }
    if claims.read_only && has_subprocess {
        violations.push(ClaimViolation {
            severity: ClaimSeverity::Error,
            category: EntitlementCategory::Subprocess,
            description: String::from(
                "tool is declared readOnly but its handler spawns subprocesses",
            ),
        });
    }
    if !claims.destructive
        && has_subprocess
        && !claims.allows(EntitlementCategory::Subprocess)
    {
        violations.push(ClaimViolation {
            severity: ClaimSeverity::Warning,
            category: EntitlementCategory::Subprocess,
            description: String::from(
                "tool is not declared destructive but its handler spawns subprocesses",
            ),
        });
    }
    if has_code_evaluation {
        if !claims.allows(EntitlementCategory::CodeEvaluation) {
            violations.push(ClaimViolation {
                severity: ClaimSeverity::Error,
                category: EntitlementCategory::CodeEvaluation,
                description: String::from(
                    "handler evaluates dynamic code; the blast radius is unbounded",
                ),
            });
        } else if claims.read_only {
            violations.push(ClaimViolation {
                severity: ClaimSeverity::Error,
                category: EntitlementCategory::CodeEvaluation,
                description: String::from(
                    "tool is declared readOnly but evaluates dynamic code; the blast radius is unbounded",
                ),
            });
        }
    }

    violations
}

/// Returns `true` for filesystem identifiers that mutate state.
fn is_write_identifier(identifier: &str) -> bool {
    identifier.starts_with("writeFile")
}
