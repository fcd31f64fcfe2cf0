// crates/fusion-scanner/src/evasion.rs
// ============================================================================
// Module: Evasion Indicator Pass
// Description: Signals that handler source obscures its capability surface.
// Purpose: Report string-construction, indirect-access, computed-import, and
//          encoding-density indicators with confidence tiers.
// Dependencies: regex, crate::types
// ============================================================================

//! ## Overview
//! The evasion pass runs independently of entitlement scanning and never
//! sets capability flags. It reports techniques that defeat identifier
//! matching: building names from character codes, indexing `globalThis` or
//! `process` with computed keys, importing computed specifiers, and packing
//! the source with escape sequences.

#![allow(
    clippy::expect_used,
    reason = "Pattern literals are static; construction is exercised by every scanner test."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::LazyLock;

use regex::Regex;

use crate::types::EvasionConfidence;
use crate::types::EvasionIndicator;
use crate::types::EvasionKind;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Escape occurrences per 100 characters that raise a medium-confidence
/// encoding-density indicator.
const ENCODING_DENSITY_MEDIUM_PERCENT: f64 = 2.0;
/// Escape occurrences per 100 characters that raise a high-confidence
/// encoding-density indicator.
const ENCODING_DENSITY_HIGH_PERCENT: f64 = 5.0;

// ============================================================================
// SECTION: Pattern Tables
// ============================================================================

/// `String.fromCharCode(` call sites.
static FROM_CHAR_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"String\s*\.\s*fromCharCode\s*\(").expect("static pattern"));

/// `String.raw` templates carrying hex escapes.
static STRING_RAW_HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"String\s*\.\s*raw\b").expect("static pattern"));

/// Hex escape sequences.
static HEX_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\x[0-9a-fA-F]{2}").expect("static pattern"));

/// `atob(` call sites.
static ATOB: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\batob\s*\(").expect("static pattern"));

/// `Buffer.from(..., 'base64')` call sites.
static BUFFER_BASE64: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"Buffer\s*\.\s*from\s*\([^)]*["']base64["']"#).expect("static pattern")
});

/// Bracket indexing of `globalThis` or `process`.
static GLOBAL_BRACKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(globalThis|process)\s*\[\s*").expect("static pattern"));

/// `require(` or dynamic `import(` call sites.
static IMPORT_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(require|import)\s*\(\s*").expect("static pattern"));

/// Escape sequences counted for encoding density.
static DENSITY_ESCAPES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\x[0-9a-fA-F]{2}|\\u[0-9a-fA-F]{4}").expect("static pattern"));

// ============================================================================
// SECTION: Evasion Pass
// ============================================================================

/// Scans handler source for evasion indicators.
#[must_use]
pub fn scan_evasion(source: &str) -> Vec<EvasionIndicator> {
    let mut indicators = Vec::new();
    string_construction(source, &mut indicators);
    indirect_access(source, &mut indicators);
    computed_imports(source, &mut indicators);
    encoding_density(source, &mut indicators);
    indicators
}

/// Reports identifier assembly from character codes or encodings.
fn string_construction(source: &str, indicators: &mut Vec<EvasionIndicator>) {
    if FROM_CHAR_CODE.is_match(source) {
        indicators.push(EvasionIndicator {
            kind: EvasionKind::StringConstruction,
            confidence: EvasionConfidence::High,
            detail: String::from("String.fromCharCode assembles identifiers at runtime"),
        });
    }
    if STRING_RAW_HEX.is_match(source) && HEX_ESCAPE.is_match(source) {
        indicators.push(EvasionIndicator {
            kind: EvasionKind::StringConstruction,
            confidence: EvasionConfidence::Medium,
            detail: String::from("String.raw template carries hex escape sequences"),
        });
    }
    if ATOB.is_match(source) {
        indicators.push(EvasionIndicator {
            kind: EvasionKind::StringConstruction,
            confidence: EvasionConfidence::Low,
            detail: String::from("atob decodes base64 payloads"),
        });
    }
    if BUFFER_BASE64.is_match(source) {
        indicators.push(EvasionIndicator {
            kind: EvasionKind::StringConstruction,
            confidence: EvasionConfidence::Low,
            detail: String::from("Buffer.from decodes base64 payloads"),
        });
    }
}

/// Reports bracket indexing of `globalThis` / `process`.
fn indirect_access(source: &str, indicators: &mut Vec<EvasionIndicator>) {
    for found in GLOBAL_BRACKET.captures_iter(source) {
        let Some(whole) = found.get(0) else {
            continue;
        };
        let root = found.get(1).map_or("globalThis", |group| group.as_str());
        let rest = source[whole.end() ..].trim_start();
        let (confidence, shape) = if rest.starts_with('\'') || rest.starts_with('"') {
            (EvasionConfidence::Medium, "a string literal")
        } else {
            (EvasionConfidence::High, "a computed expression")
        };
        indicators.push(EvasionIndicator {
            kind: EvasionKind::IndirectAccess,
            confidence,
            detail: format!("{root} indexed with {shape}"),
        });
    }
}

/// Reports `require` / dynamic `import` with a non-literal specifier.
fn computed_imports(source: &str, indicators: &mut Vec<EvasionIndicator>) {
    for found in IMPORT_CALL.captures_iter(source) {
        let Some(whole) = found.get(0) else {
            continue;
        };
        let callee = found.get(1).map_or("require", |group| group.as_str());
        let rest = source[whole.end() ..].trim_start();
        if rest.starts_with('\'') || rest.starts_with('"') || rest.starts_with(')') {
            continue;
        }
        indicators.push(EvasionIndicator {
            kind: EvasionKind::ComputedImport,
            confidence: EvasionConfidence::High,
            detail: format!("{callee} called with a computed specifier"),
        });
    }
}

/// Reports escape-sequence density above the configured thresholds.
fn encoding_density(source: &str, indicators: &mut Vec<EvasionIndicator>) {
    let chars = source.chars().count();
    if chars == 0 {
        return;
    }
    let escapes = DENSITY_ESCAPES.find_iter(source).count();
    if escapes == 0 {
        return;
    }
    #[allow(
        clippy::cast_precision_loss,
        reason = "Density is an approximate ratio; precision loss is acceptable."
    )]
    let percent = (escapes as f64) * 100.0 / (chars as f64);
    let confidence = if percent >= ENCODING_DENSITY_HIGH_PERCENT {
        EvasionConfidence::High
    } else if percent >= ENCODING_DENSITY_MEDIUM_PERCENT {
        EvasionConfidence::Medium
    } else {
        return;
    };
    indicators.push(EvasionIndicator {
        kind: EvasionKind::EncodingDensity,
        confidence,
        detail: format!("{escapes} escape sequences across {chars} characters"),
    });
}
