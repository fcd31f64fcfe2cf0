// crates/fusion-diff/src/format.rs
// ============================================================================
// Module: Diff Formatters
// Description: Human report and XML rendering of classified deltas.
// Purpose: Feed CI logs and the self-healing enrichment layer.
// Dependencies: crate::delta
// ============================================================================

//! ## Overview
//! The report formatter emits one `[toolName]` header line plus one tagged
//! line per delta. The XML formatter emits a `<contract_changes>` fragment
//! with one `<change>` element per delta; every interpolated value is
//! XML-escaped so hostile contract content cannot break the fragment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use serde_json::Value;

use crate::delta::ContractDelta;
use crate::delta::ContractDiffResult;

// ============================================================================
// SECTION: Human Report
// ============================================================================

/// Formats a diff result as a human-readable report.
///
/// The report begins with `[toolName]` and carries one line per delta with
/// its severity tag.
#[must_use]
pub fn format_diff_report(result: &ContractDiffResult) -> String {
    let mut report = String::new();
    if result.deltas.is_empty() {
        let _ = write!(report, "[{}] no contract changes", result.tool_name);
        return report;
    }
    let digest_note = if result.digest_changed { ", digest changed" } else { "" };
    let _ = writeln!(
        report,
        "[{}] {} contract change(s) (max severity: {}{})",
        result.tool_name,
        result.deltas.len(),
        result.max_severity,
        digest_note,
    );
    for delta in &result.deltas {
        let _ = writeln!(
            report,
            "  [{}] {}/{}: {}",
            delta.severity, delta.category, delta.field, delta.description,
        );
    }
    report
}

// ============================================================================
// SECTION: XML Rendering
// ============================================================================

/// Formats deltas as a `<contract_changes>` XML fragment.
///
/// Returns the empty string for an empty delta list.
#[must_use]
pub fn format_deltas_as_xml(deltas: &[ContractDelta]) -> String {
    if deltas.is_empty() {
        return String::new();
    }
    let mut xml = String::from("<contract_changes>\n");
    for delta in deltas {
        let _ = write!(
            xml,
            "<change severity=\"{}\" category=\"{}\" field=\"{}\"",
            xml_escape(delta.severity.as_str()),
            xml_escape(delta.category.as_str()),
            xml_escape(&delta.field),
        );
        if let Some(before) = delta.before.as_ref() {
            let _ = write!(xml, " before=\"{}\"", xml_escape(&compact(before)));
        }
        if let Some(after) = delta.after.as_ref() {
            let _ = write!(xml, " after=\"{}\"", xml_escape(&compact(after)));
        }
        let _ = writeln!(xml, ">{}</change>", xml_escape(&delta.description));
    }
    xml.push_str("</contract_changes>");
    xml
}

/// Escapes `&`, `<`, `>`, and `"` for XML text and attribute contexts.
#[must_use]
pub fn xml_escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for character in input.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Renders a JSON value compactly for attribute embedding.
fn compact(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
