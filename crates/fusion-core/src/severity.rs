// crates/fusion-core/src/severity.rs
// ============================================================================
// Module: Governance Severity Orderings
// Description: Change severity and inflation risk scales shared across crates.
// Purpose: Provide stable, totally ordered labels for diff and economics logic.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Two orderings govern blast-radius classification: [`ChangeSeverity`] for
//! contract deltas (COSMETIC < SAFE < RISKY < BREAKING) and [`InflationRisk`]
//! for token economics (low < medium < high < critical). Both serialize with
//! the stable wire labels consumed by lockfiles and reports.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Change Severity
// ============================================================================

/// Severity of a single contract delta.
///
/// # Invariants
/// - Variant order defines the severity ordering: `Cosmetic < Safe < Risky <
///   Breaking`.
/// - Wire labels are stable uppercase strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeSeverity {
    /// No behavioral impact (descriptions, removed tags).
    #[default]
    Cosmetic,
    /// Backwards-compatible widening (new actions, lost entitlements).
    Safe,
    /// Behavior shifts that agents may notice (middleware, guardrails).
    Risky,
    /// Contract-breaking change (schemas, entitlement gains, removals).
    Breaking,
}

impl ChangeSeverity {
    /// Returns the stable wire label for the severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cosmetic => "COSMETIC",
            Self::Safe => "SAFE",
            Self::Risky => "RISKY",
            Self::Breaking => "BREAKING",
        }
    }

    /// Returns `true` when the severity permits backwards compatibility.
    #[must_use]
    pub const fn is_backwards_compatible(self) -> bool {
        matches!(self, Self::Cosmetic | Self::Safe)
    }
}

impl fmt::Display for ChangeSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Inflation Risk
// ============================================================================

/// Token-inflation risk tier for a tool's egress.
///
/// # Invariants
/// - Variant order defines the escalation ordering: `Low < Medium < High <
///   Critical`.
/// - Wire labels are stable lowercase strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum InflationRisk {
    /// Bounded output with a narrow schema.
    #[default]
    Low,
    /// Moderate field count or unbounded-but-narrow output.
    Medium,
    /// Wide schema likely to dominate agent context.
    High,
    /// Unbounded or extremely wide output.
    Critical,
}

impl InflationRisk {
    /// Returns the stable wire label for the risk tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for InflationRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
