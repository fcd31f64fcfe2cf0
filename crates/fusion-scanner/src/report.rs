// crates/fusion-scanner/src/report.rs
// ============================================================================
// Module: Scan Report
// Description: Combined scan, aggregation, and claims-validation entry point.
// Purpose: Produce the single report consumed by materialization and CI.
// Dependencies: serde, crate::{claims, evasion, scan, types}
// ============================================================================

//! ## Overview
//! `scan_and_validate` runs the entitlement pass, the evasion pass, and
//! claims validation over one handler source and folds the results into a
//! [`ScanReport`]. A report is `safe` only when no error-severity violation
//! and no high-confidence evasion indicator is present.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::claims::ClaimSeverity;
use crate::claims::ClaimViolation;
use crate::claims::DeclaredClaims;
use crate::claims::validate_claims;
use crate::evasion::scan_evasion;
use crate::scan::build_entitlements;
use crate::scan::scan_source;
use crate::types::EntitlementMatch;
use crate::types::EntitlementSet;
use crate::types::EvasionConfidence;
use crate::types::EvasionIndicator;

// ============================================================================
// SECTION: Report
// ============================================================================

/// Combined result of scanning one handler source against declared claims.
///
/// # Invariants
/// - `safe` is `true` exactly when `violations` carries no error and
///   `evasion_indicators` carries no high-confidence signal.
/// - `summary` names the categories present, or `sandboxed` when no match
///   was found, and mentions `evasion` when indicators exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Ordered entitlement matches.
    pub matches: Vec<EntitlementMatch>,
    /// Aggregated capability flags plus raw matches.
    pub entitlements: EntitlementSet,
    /// Evasion indicators from the second pass.
    pub evasion_indicators: Vec<EvasionIndicator>,
    /// Claims violations.
    pub violations: Vec<ClaimViolation>,
    /// Overall verdict.
    pub safe: bool,
    /// Human-readable one-line summary.
    pub summary: String,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Scans handler source and validates it against declared claims.
#[must_use]
pub fn scan_and_validate(source: &str, claims: &DeclaredClaims) -> ScanReport {
    let matches = scan_source(source, None);
    let entitlements = build_entitlements(&matches);
    let evasion_indicators = scan_evasion(source);
    let violations = validate_claims(&matches, claims);

    let has_error = violations.iter().any(|violation| violation.severity == ClaimSeverity::Error);
    let has_high_evasion = evasion_indicators
        .iter()
        .any(|indicator| indicator.confidence == EvasionConfidence::High);
    let safe = !has_error && !has_high_evasion;
    let summary = summarize(&matches, &evasion_indicators);

    ScanReport {
        matches,
        entitlements,
        evasion_indicators,
        violations,
        safe,
        summary,
    }
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Builds the one-line report summary.
fn summarize(matches: &[EntitlementMatch], indicators: &[EvasionIndicator]) -> String {
    let mut summary = if matches.is_empty() {
        String::from("sandboxed: no capability references detected")
    } else {
        let categories: BTreeSet<&str> =
            matches.iter().map(|hit| hit.category.as_str()).collect();
        let joined = categories.into_iter().collect::<Vec<_>>().join(", ");
        format!("capabilities detected: {joined}")
    };
    if !indicators.is_empty() {
        summary.push_str("; evasion indicators present");
    }
    summary
}
