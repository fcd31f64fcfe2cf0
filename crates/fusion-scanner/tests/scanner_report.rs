// crates/fusion-scanner/tests/scanner_report.rs
// ============================================================================
// Module: Scanner Report Tests
// Description: End-to-end scan, aggregation, and verdict behavior.
// ============================================================================
//! ## Overview
//! Exercises `scan_and_validate` over representative handler sources and
//! verifies the safety verdict, summary composition, and report shape.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only fixtures use unwraps for clarity."
)]

use fusion_scanner::DeclaredClaims;
use fusion_scanner::EntitlementCategory;
use fusion_scanner::EvasionConfidence;
use fusion_scanner::scan_and_validate;

#[test]
fn eval_source_is_unsafe_with_unbounded_violation() {
    let report = scan_and_validate("eval('x')", &DeclaredClaims::default());
    assert!(report.entitlements.code_evaluation);
    assert!(report.matches.iter().any(|hit| {
        hit.category == EntitlementCategory::CodeEvaluation && hit.identifier == "eval"
    }));
    assert!(report.violations.iter().any(|violation| violation.description.contains("unbounded")));
    assert!(!report.safe);
}

#[test]
fn clean_source_is_sandboxed_and_safe() {
    let report = scan_and_validate("export const add = (a, b) => a + b;", &DeclaredClaims::default());
    assert!(report.matches.is_empty());
    assert!(report.safe);
    assert!(report.summary.contains("sandboxed"));
}

#[test]
fn summary_names_categories_present() {
    let source = "const body = await fetch(url);\nawait writeFile(path, body);\n";
    let report = scan_and_validate(source, &DeclaredClaims::default());
    assert!(report.summary.contains("filesystem"));
    assert!(report.summary.contains("network"));
    assert!(!report.summary.contains("sandboxed"));
}

#[test]
fn summary_mentions_evasion_when_indicators_exist() {
    let report = scan_and_validate("const f = globalThis['fetch'];", &DeclaredClaims::default());
    assert!(report.summary.contains("evasion"));
    // A medium-confidence indicator alone does not flip the verdict.
    assert!(report.safe);
}

#[test]
fn high_confidence_evasion_alone_makes_the_report_unsafe() {
    let report = scan_and_validate("const mod = require(moduleName);", &DeclaredClaims::default());
    assert!(report.violations.is_empty());
    assert!(report.evasion_indicators.iter().any(|indicator| {
        indicator.confidence == EvasionConfidence::High
    }));
    assert!(!report.safe);
}

#[test]
fn report_serializes_with_camel_case_wire_form() {
    let report = scan_and_validate("eval('x')", &DeclaredClaims::default());
    let value = serde_json::to_value(&report).expect("serialize report");
    assert!(value.get("evasionIndicators").is_some());
    assert_eq!(
        value["entitlements"]["codeEvaluation"],
        serde_json::Value::Bool(true)
    );
}
