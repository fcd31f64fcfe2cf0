// crates/fusion-diff/src/delta.rs
// ============================================================================
// Module: Delta Types
// Description: Atomic contract changes and the aggregated diff result.
// Purpose: Provide the classified change vocabulary consumed by CI and heal.
// Dependencies: fusion-core, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`ContractDelta`] is one atomic change between two contracts: the
//! category and field it touches, its severity, a human-readable
//! description, and the before/after values when representable. A
//! [`ContractDiffResult`] aggregates the ordered deltas for one tool.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use fusion_core::ChangeSeverity;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Delta Category
// ============================================================================

/// Contract section a delta belongs to.
///
/// # Invariants
/// - Declaration order defines the category ordering used for delta sorting.
/// - Wire labels are stable dotted strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeltaCategory {
    /// Agent-facing surface: identity, tags, actions, input schemas.
    #[serde(rename = "surface")]
    Surface,
    /// Egress shape: presenter schemas and system rules.
    #[serde(rename = "behavior.egress")]
    BehaviorEgress,
    /// Cognitive guardrails.
    #[serde(rename = "behavior.guardrails")]
    BehaviorGuardrails,
    /// Middleware chain and runtime fingerprints.
    #[serde(rename = "behavior.middleware")]
    BehaviorMiddleware,
    /// Affordance topology and embedded presenters.
    #[serde(rename = "behavior.topology")]
    BehaviorTopology,
    /// Token economics.
    #[serde(rename = "tokenEconomics")]
    TokenEconomics,
    /// Entitlement flags.
    #[serde(rename = "entitlements")]
    Entitlements,
}

impl DeltaCategory {
    /// Returns the stable wire label for the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Surface => "surface",
            Self::BehaviorEgress => "behavior.egress",
            Self::BehaviorGuardrails => "behavior.guardrails",
            Self::BehaviorMiddleware => "behavior.middleware",
            Self::BehaviorTopology => "behavior.topology",
            Self::TokenEconomics => "tokenEconomics",
            Self::Entitlements => "entitlements",
        }
    }
}

impl fmt::Display for DeltaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Delta
// ============================================================================

/// One atomic change between two contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDelta {
    /// Contract section the change touches.
    pub category: DeltaCategory,
    /// Field path within the section.
    pub field: String,
    /// Blast-radius classification.
    pub severity: ChangeSeverity,
    /// Human-readable description of the change.
    pub description: String,
    /// Value before the change, when representable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    /// Value after the change, when representable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

// ============================================================================
// SECTION: Diff Result
// ============================================================================

/// Aggregated diff of one tool's contract across two observations.
///
/// # Invariants
/// - `deltas` orders by severity descending, then category, then field.
/// - `max_severity` is COSMETIC when `deltas` is empty.
/// - `is_backwards_compatible` is `true` exactly when `max_severity` is
///   SAFE or COSMETIC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDiffResult {
    /// Tool the diff concerns.
    pub tool_name: String,
    /// Ordered deltas.
    pub deltas: Vec<ContractDelta>,
    /// Greatest severity across the deltas.
    pub max_severity: ChangeSeverity,
    /// Tool digests differ across the two observations.
    pub digest_changed: bool,
    /// No delta reaches RISKY.
    pub is_backwards_compatible: bool,
}
