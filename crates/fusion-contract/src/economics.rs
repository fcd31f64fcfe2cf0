// crates/fusion-contract/src/economics.rs
// ============================================================================
// Module: Token Economics Profiler
// Description: Static and runtime estimates of a tool's egress token cost.
// Purpose: Classify inflation risk and flag cognitive-overload egress.
// Dependencies: fusion-core, serde
// ============================================================================

//! ## Overview
//! Token estimates are deliberately coarse: one token per 3.5 characters,
//! rounded up, summed per schema field. The static profile classifies a
//! tool's inflation risk from field count and boundedness; the block
//! profiler accumulates runtime content blocks and attaches a
//! `COGNITIVE OVERLOAD` advisory above the critical threshold.

// ============================================================================
// SECTION: Imports
// ============================================================================

use fusion_core::InflationRisk;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Token total above which a block profile is critical.
pub const COGNITIVE_OVERLOAD_TOKENS: u32 = 10_000;

/// Token total above which a block profile is high risk.
const BLOCK_HIGH_TOKENS: u32 = 5_000;

/// Token total above which a block profile is medium risk.
const BLOCK_MEDIUM_TOKENS: u32 = 2_000;

// ============================================================================
// SECTION: Token Estimation
// ============================================================================

/// Estimates the token cost of a text: `ceil(chars / 3.5)`, zero when empty.
#[must_use]
pub fn estimate_tokens(text: &str) -> u32 {
    let chars = text.chars().count();
    if chars == 0 {
        return 0;
    }
    // ceil(chars / 3.5) in integer arithmetic: ceil(2 * chars / 7).
    let estimate = (chars * 2).div_ceil(7);
    u32::try_from(estimate).unwrap_or(u32::MAX)
}

/// Classifies inflation risk from field count and boundedness.
///
/// Tiers: low below 10 fields when bounded; medium through 20 fields; high
/// through 50; critical above 50 or unbounded with 10 or more fields. An
/// unbounded output never profiles as low.
#[must_use]
pub const fn classify_risk(field_count: usize, bounded: bool) -> InflationRisk {
    if field_count > 50 {
        return InflationRisk::Critical;
    }
    if !bounded && field_count >= 10 {
        return InflationRisk::Critical;
    }
    if field_count > 20 {
        return InflationRisk::High;
    }
    if field_count >= 10 {
        return InflationRisk::Medium;
    }
    if bounded { InflationRisk::Low } else { InflationRisk::Medium }
}

// ============================================================================
// SECTION: Static Profile
// ============================================================================

/// Static token economics profile for one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicsProfile {
    /// Profiled tool name.
    pub tool_name: String,
    /// Estimated token cost per egress record.
    pub tokens_per_record: u32,
    /// Output is bounded by an agent limit or an egress byte cap.
    pub bounded: bool,
    /// Inflation risk tier.
    pub inflation_risk: InflationRisk,
    /// Suggested remediations, empty when the profile is healthy.
    pub remediations: Vec<String>,
}

/// Profiles a tool's egress statically from its schema field keys and caps.
#[must_use]
pub fn profile_tool(
    tool_name: &str,
    field_keys: &[String],
    agent_limit_max: Option<u32>,
    egress_max_bytes: Option<u64>,
) -> EconomicsProfile {
    let bounded = agent_limit_max.is_some() || egress_max_bytes.is_some();
    let tokens_per_record = field_keys.iter().map(|key| estimate_tokens(key)).sum();
    let inflation_risk = classify_risk(field_keys.len(), bounded);

    let mut remediations = Vec::new();
    if !bounded {
        remediations.push(String::from("declare an agent-facing collection limit"));
        remediations.push(String::from("declare an egress byte ceiling"));
    }
    if field_keys.len() > 20 {
        remediations.push(String::from("trim the egress schema to the fields agents consume"));
    }
    if inflation_risk >= InflationRisk::High && field_keys.len() > 10 {
        remediations.push(String::from("split wide records across focused presenters"));
    }

    EconomicsProfile {
        tool_name: tool_name.to_string(),
        tokens_per_record,
        bounded,
        inflation_risk,
        remediations,
    }
}

// ============================================================================
// SECTION: Block Profile
// ============================================================================

/// Token and byte cost of one content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockCost {
    /// Zero-based block index.
    pub index: usize,
    /// Estimated token cost.
    pub tokens: u32,
    /// Block size in bytes.
    pub bytes: usize,
}

/// Accumulated runtime profile over an ordered sequence of content blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockProfile {
    /// Per-block costs in input order.
    pub blocks: Vec<BlockCost>,
    /// Total estimated tokens.
    pub total_tokens: u32,
    /// Total bytes.
    pub total_bytes: usize,
    /// Overall inflation risk.
    pub inflation_risk: InflationRisk,
    /// Advisory attached above the critical threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

/// Profiles an ordered sequence of runtime content blocks.
#[must_use]
pub fn profile_blocks(blocks: &[&str]) -> BlockProfile {
    let mut costs = Vec::with_capacity(blocks.len());
    let mut total_tokens: u32 = 0;
    let mut total_bytes: usize = 0;
    for (index, block) in blocks.iter().enumerate() {
        let tokens = estimate_tokens(block);
        let bytes = block.len();
        total_tokens = total_tokens.saturating_add(tokens);
        total_bytes = total_bytes.saturating_add(bytes);
        costs.push(BlockCost {
            index,
            tokens,
            bytes,
        });
    }

    let inflation_risk = if total_tokens >= COGNITIVE_OVERLOAD_TOKENS {
        InflationRisk::Critical
    } else if total_tokens >= BLOCK_HIGH_TOKENS {
        InflationRisk::High
    } else if total_tokens >= BLOCK_MEDIUM_TOKENS {
        InflationRisk::Medium
    } else {
        InflationRisk::Low
    };

    let advisory = (total_tokens >= COGNITIVE_OVERLOAD_TOKENS).then(|| {
        format!(
            "COGNITIVE OVERLOAD: egress totals {total_tokens} estimated tokens across {count} \
             blocks; agents will truncate or misread this volume",
            count = blocks.len()
        )
    });

    BlockProfile {
        blocks: costs,
        total_tokens,
        total_bytes,
        inflation_risk,
        advisory,
    }
}
