// crates/fusion-heal/src/lib.rs
// ============================================================================
// Module: Contract-Aware Self-Healing
// Description: Enriches validation errors with contract-delta context.
// Purpose: Let calling agents self-correct after a governed surface drifts.
// Dependencies: fusion-core, fusion-diff, serde
// ============================================================================

//! ## Overview
//! When a tool call fails validation against a drifted contract, the raw
//! error alone strands the agent. The enricher injects a
//! `<contract_awareness>` block, carrying the recent contract changes as
//! XML, immediately before the closing `</validation_error>` tag so the
//! agent can see what moved and retry correctly. Deltas below RISKY are
//! omitted unless the host opts in, and the block is capped to a
//! configurable number of deltas.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;
use std::collections::BTreeMap;

use fusion_core::ChangeSeverity;
use fusion_diff::ContractDelta;
use fusion_diff::ContractDiffResult;
use fusion_diff::format_deltas_as_xml;
use fusion_diff::xml_escape;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default cap on deltas injected into one error payload.
pub const DEFAULT_MAX_DELTAS_PER_ERROR: usize = 10;

/// Closing tag the enrichment block is injected before.
const VALIDATION_ERROR_CLOSE: &str = "</validation_error>";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the self-healing enricher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealingConfig {
    /// Active diffs keyed by tool name.
    pub active_deltas: BTreeMap<String, ContractDiffResult>,
    /// Inject deltas below RISKY as well.
    #[serde(default)]
    pub include_all_severities: bool,
    /// Cap on deltas injected per error; `None` uses the default.
    #[serde(default)]
    pub max_deltas_per_error: Option<usize>,
}

impl HealingConfig {
    /// Returns the effective per-error delta cap.
    #[must_use]
    pub fn delta_cap(&self) -> usize {
        self.max_deltas_per_error.unwrap_or(DEFAULT_MAX_DELTAS_PER_ERROR)
    }

    /// Selects the qualifying deltas for one tool, in diff order.
    fn qualifying_deltas(&self, tool_name: &str) -> Vec<ContractDelta> {
        let Some(diff) = self.active_deltas.get(tool_name) else {
            return Vec::new();
        };
        diff.deltas
            .iter()
            .filter(|delta| {
                self.include_all_severities || delta.severity >= ChangeSeverity::Risky
            })
            .take(self.delta_cap())
            .cloned()
            .collect()
    }
}

// ============================================================================
// SECTION: Enrichment
// ============================================================================

/// Outcome of one enrichment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentResult {
    /// Error payload, enriched when deltas qualified.
    pub enriched_error: String,
    /// Enrichment block was injected.
    pub injected: bool,
    /// Number of deltas injected.
    pub delta_count: usize,
}

/// Enriches a raw validation-error payload with contract-delta context.
#[must_use]
pub fn enrich_validation_error(
    raw_error: &str,
    tool_name: &str,
    action: &str,
    config: &HealingConfig,
) -> EnrichmentResult {
    let deltas = config.qualifying_deltas(tool_name);
    if deltas.is_empty() {
        return EnrichmentResult {
            enriched_error: raw_error.to_string(),
            injected: false,
            delta_count: 0,
        };
    }
    let enriched = inject_awareness(raw_error, tool_name, action, &deltas);
    EnrichmentResult {
        enriched_error: enriched,
        injected: true,
        delta_count: deltas.len(),
    }
}

/// Builds a per-tool enricher closure.
///
/// When the tool has no qualifying deltas the closure is the identity: it
/// returns the borrowed input unchanged.
pub fn create_tool_enhancer(
    tool_name: &str,
    config: &HealingConfig,
) -> impl for<'e> Fn(&'e str, &str) -> Cow<'e, str> + use<> {
    let deltas = config.qualifying_deltas(tool_name);
    let tool_name = tool_name.to_string();
    enhancer_fn(move |raw_error: &str, action: &str| {
        if deltas.is_empty() {
            Cow::Borrowed(raw_error)
        } else {
            Cow::Owned(inject_awareness(raw_error, &tool_name, action, &deltas))
        }
    })
}

/// Pins the higher-ranked signature of an enhancer closure.
fn enhancer_fn<F>(enhancer: F) -> F
where
    F: for<'e> Fn(&'e str, &str) -> Cow<'e, str>,
{
    enhancer
}

// ============================================================================
// SECTION: Injection
// ============================================================================

/// Renders the awareness block and splices it into the payload.
fn inject_awareness(
    raw_error: &str,
    tool_name: &str,
    action: &str,
    deltas: &[ContractDelta],
) -> String {
    let block = format!(
        "<contract_awareness>\nThe behavioral contract for tool \"{}\" changed since it was \
         last observed; the changes below may explain this validation failure for action \
         \"{}\".\n{}\n</contract_awareness>",
        xml_escape(tool_name),
        xml_escape(action),
        format_deltas_as_xml(deltas),
    );
    raw_error.rfind(VALIDATION_ERROR_CLOSE).map_or_else(
        || format!("{raw_error}{block}"),
        |position| {
            let mut enriched = String::with_capacity(raw_error.len() + block.len());
            enriched.push_str(&raw_error[.. position]);
            enriched.push_str(&block);
            enriched.push_str(&raw_error[position ..]);
            enriched
        },
    )
}
