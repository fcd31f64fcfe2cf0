// crates/fusion-scanner/src/types.rs
// ============================================================================
// Module: Scanner Types
// Description: Entitlement categories, matches, and evasion indicators.
// Purpose: Provide the shared shapes consumed by contracts, digests, and diffs.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the scanner's reporting vocabulary. An
//! [`EntitlementMatch`] is a single capability-surfacing hit in handler
//! source; an [`EntitlementSet`] aggregates matches into the five capability
//! booleans plus the raw hit list; an [`EvasionIndicator`] is a separate
//! signal that a handler is obscuring its true surface.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Entitlement Categories
// ============================================================================

/// Capability categories inferred from handler source.
///
/// # Invariants
/// - Wire labels are stable camelCase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntitlementCategory {
    /// File reads, writes, or `fs` imports.
    Filesystem,
    /// Outbound network calls or network-client imports.
    Network,
    /// Child-process execution.
    Subprocess,
    /// Cryptographic primitives.
    Crypto,
    /// Dynamic code evaluation; blast radius is unbounded.
    CodeEvaluation,
}

impl EntitlementCategory {
    /// Returns the stable wire label for the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filesystem => "filesystem",
            Self::Network => "network",
            Self::Subprocess => "subprocess",
            Self::Crypto => "crypto",
            Self::CodeEvaluation => "codeEvaluation",
        }
    }

    /// Returns all categories in declaration order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Filesystem, Self::Network, Self::Subprocess, Self::Crypto, Self::CodeEvaluation]
    }
}

impl fmt::Display for EntitlementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Matches
// ============================================================================

/// A single capability-surfacing hit in handler source.
///
/// # Invariants
/// - `identifier` is the canonical name of the hit (for example `eval`,
///   `vm.Script`, `globalThis.fetch`), not the raw matched text.
/// - `line` is 1-based when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementMatch {
    /// Capability category of the hit.
    pub category: EntitlementCategory,
    /// Canonical identifier of the hit.
    pub identifier: String,
    /// 1-based source line when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Source file when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

// ============================================================================
// SECTION: Entitlement Aggregates
// ============================================================================

/// Capability booleans derived from scanner matches.
///
/// # Invariants
/// - Field order and names are part of the digestable wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementFlags {
    /// Filesystem access observed.
    pub filesystem: bool,
    /// Network access observed.
    pub network: bool,
    /// Subprocess execution observed.
    pub subprocess: bool,
    /// Cryptographic primitives observed.
    pub crypto: bool,
    /// Dynamic code evaluation observed.
    pub code_evaluation: bool,
}

impl EntitlementFlags {
    /// Returns `true` when the named category flag is set.
    #[must_use]
    pub const fn contains(&self, category: EntitlementCategory) -> bool {
        match category {
            EntitlementCategory::Filesystem => self.filesystem,
            EntitlementCategory::Network => self.network,
            EntitlementCategory::Subprocess => self.subprocess,
            EntitlementCategory::Crypto => self.crypto,
            EntitlementCategory::CodeEvaluation => self.code_evaluation,
        }
    }
}

/// Full entitlement projection for a contract: flags plus raw matches.
///
/// # Invariants
/// - `raw` preserves scanner reporting order.
/// - The digestable identity of a contract covers the flags only; `raw` is
///   diagnostic payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementSet {
    /// Filesystem access observed.
    pub filesystem: bool,
    /// Network access observed.
    pub network: bool,
    /// Subprocess execution observed.
    pub subprocess: bool,
    /// Cryptographic primitives observed.
    pub crypto: bool,
    /// Dynamic code evaluation observed.
    pub code_evaluation: bool,
    /// Raw scanner matches backing the flags.
    pub raw: Vec<EntitlementMatch>,
}

impl EntitlementSet {
    /// Returns the digestable boolean projection of this set.
    #[must_use]
    pub const fn flags(&self) -> EntitlementFlags {
        EntitlementFlags {
            filesystem: self.filesystem,
            network: self.network,
            subprocess: self.subprocess,
            crypto: self.crypto,
            code_evaluation: self.code_evaluation,
        }
    }
}

// ============================================================================
// SECTION: Evasion Indicators
// ============================================================================

/// Evasion technique classes reported by the second scanner pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvasionKind {
    /// Capability names assembled from character codes or encodings.
    StringConstruction,
    /// Bracket indexing of `globalThis` or `process`.
    IndirectAccess,
    /// `require` or dynamic `import` with a computed specifier.
    ComputedImport,
    /// Unusually dense escape sequences across the source.
    EncodingDensity,
}

impl EvasionKind {
    /// Returns the stable wire label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StringConstruction => "string-construction",
            Self::IndirectAccess => "indirect-access",
            Self::ComputedImport => "computed-import",
            Self::EncodingDensity => "encoding-density",
        }
    }
}

/// Confidence tier attached to an evasion indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvasionConfidence {
    /// Weak signal; common in benign code.
    Low,
    /// Moderate signal.
    Medium,
    /// Strong signal of deliberate obfuscation.
    High,
}

/// A signal that a handler is obscuring its capability surface.
///
/// # Invariants
/// - Indicators are reported separately from entitlement matches and never
///   set capability flags on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvasionIndicator {
    /// Technique class.
    #[serde(rename = "type")]
    pub kind: EvasionKind,
    /// Confidence tier.
    pub confidence: EvasionConfidence,
    /// Human-readable detail for the signal.
    pub detail: String,
}
