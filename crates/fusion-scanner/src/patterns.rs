// crates/fusion-scanner/src/patterns.rs
// ============================================================================
// Module: Scanner Pattern Tables
// Description: Capability-surfacing identifier patterns per category.
// Purpose: Centralize the call-site and import regexes used by the scanner.
// Dependencies: regex, crate::types
// ============================================================================

//! ## Overview
//! Each pattern detects one identifier class with call-syntax context:
//! function hits require a trailing `(`, import hits match the quoted
//! specifier inside `require(...)`, `import(...)`, or `from ...`. Patterns
//! with a capture group report the captured text as the canonical
//! identifier; fixed patterns report a constant name.

#![allow(
    clippy::expect_used,
    reason = "Pattern literals are static; construction is exercised by every scanner test."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::LazyLock;

use regex::Regex;

use crate::types::EntitlementCategory;

// ============================================================================
// SECTION: Pattern Model
// ============================================================================

/// How a pattern derives its canonical identifier.
pub enum IdentifierSource {
    /// Report a constant identifier.
    Fixed(&'static str),
    /// Report the first capture group of the regex.
    Captured,
}

/// One capability-surfacing pattern.
pub struct CallPattern {
    /// Category the pattern contributes to.
    pub category: EntitlementCategory,
    /// Compiled detection regex.
    pub regex: Regex,
    /// Identifier reporting mode.
    pub identifier: IdentifierSource,
}

impl CallPattern {
    /// Builds a pattern with a constant identifier.
    fn fixed(category: EntitlementCategory, identifier: &'static str, pattern: &str) -> Self {
        Self {
            category,
            regex: Regex::new(pattern).expect("static scanner pattern"),
            identifier: IdentifierSource::Fixed(identifier),
        }
    }

    /// Builds a pattern reporting its first capture group.
    fn captured(category: EntitlementCategory, pattern: &str) -> Self {
        Self {
            category,
            regex: Regex::new(pattern).expect("static scanner pattern"),
            identifier: IdentifierSource::Captured,
        }
    }
}

// ============================================================================
// SECTION: Import Context
// ============================================================================

/// Shared prefix matching `require(`, dynamic `import(`, or `from`.
const IMPORT_CONTEXT: &str = r#"(?:require\s*\(\s*|import\s*\(\s*|from\s+)"#;

/// Builds an import pattern for the given specifier alternation.
fn import_pattern(specifiers: &str) -> String {
    format!(r#"{IMPORT_CONTEXT}["']({specifiers})["']"#)
}

// ============================================================================
// SECTION: Pattern Table
// ============================================================================

/// All capability-surfacing patterns in category order.
pub static CALL_PATTERNS: LazyLock<Vec<CallPattern>> = LazyLock::new(|| {
    vec![
        // Filesystem.
        CallPattern::captured(EntitlementCategory::Filesystem, r"\b(readFile\w*)\s*\("),
        CallPattern::captured(EntitlementCategory::Filesystem, r"\b(writeFile\w*)\s*\("),
        CallPattern::captured(
            EntitlementCategory::Filesystem,
            &import_pattern(r"node:fs(?:/promises)?|fs(?:/promises)?"),
        ),
        // Network.
        CallPattern::fixed(
            EntitlementCategory::Network,
            "globalThis.fetch",
            r"\bglobalThis\s*\.\s*fetch\s*\(",
        ),
        CallPattern::fixed(EntitlementCategory::Network, "fetch", r"\bfetch\s*\("),
        CallPattern::fixed(
            EntitlementCategory::Network,
            "XMLHttpRequest",
            r"\b(?:new\s+)?XMLHttpRequest\s*\(",
        ),
        CallPattern::captured(
            EntitlementCategory::Network,
            &import_pattern(r"node:https?|https?|node:net|net|axios|undici|node-fetch"),
        ),
        // Subprocess.
        CallPattern::captured(EntitlementCategory::Subprocess, r"\b(exec(?:File)?(?:Sync)?)\s*\("),
        CallPattern::captured(EntitlementCategory::Subprocess, r"\b(spawn(?:Sync)?)\s*\("),
        CallPattern::captured(
            EntitlementCategory::Subprocess,
            &import_pattern(r"node:child_process|child_process"),
        ),
        // Crypto.
        CallPattern::captured(
            EntitlementCategory::Crypto,
            r"\b(createSign|createHash|createHmac)\s*\(",
        ),
        CallPattern::captured(EntitlementCategory::Crypto, &import_pattern(r"node:crypto|crypto")),
        // Code evaluation.
        CallPattern::fixed(
            EntitlementCategory::CodeEvaluation,
            "(0, eval)",
            r"\(\s*0\s*,\s*eval\s*\)\s*\(",
        ),
        CallPattern::fixed(
            EntitlementCategory::CodeEvaluation,
            "globalThis.eval",
            r"\bglobalThis\s*\.\s*eval\s*\(",
        ),
        CallPattern::fixed(EntitlementCategory::CodeEvaluation, "eval", r"\beval\s*\("),
        CallPattern::fixed(EntitlementCategory::CodeEvaluation, "Function", r"\bnew\s+Function\s*\("),
        CallPattern::fixed(
            EntitlementCategory::CodeEvaluation,
            "Reflect.construct",
            r"\bReflect\s*\.\s*construct\s*\(\s*Function\b",
        ),
        CallPattern::fixed(
            EntitlementCategory::CodeEvaluation,
            "vm.runInNewContext",
            r"\bvm\s*\.\s*runInNewContext\s*\(",
        ),
        CallPattern::fixed(
            EntitlementCategory::CodeEvaluation,
            "vm.runInThisContext",
            r"\bvm\s*\.\s*runInThisContext\s*\(",
        ),
        CallPattern::fixed(
            EntitlementCategory::CodeEvaluation,
            "vm.Script",
            r"\bnew\s+vm\s*\.\s*Script\s*\(",
        ),
        CallPattern::captured(EntitlementCategory::CodeEvaluation, &import_pattern(r"node:vm|vm")),
        CallPattern::fixed(
            EntitlementCategory::CodeEvaluation,
            "process.binding",
            r"\bprocess\s*\.\s*binding\s*\(",
        ),
        CallPattern::fixed(
            EntitlementCategory::CodeEvaluation,
            "process.dlopen",
            r"\bprocess\s*\.\s*dlopen\s*\(",
        ),
    ]
});
