// crates/fusion-contract/src/lib.rs
// ============================================================================
// Module: Fusion Contract Library
// Description: Contract data model, capability interfaces, and materialization.
// Purpose: Distill tool builders into normalized, immutable tool contracts.
// Dependencies: crate::{capability, economics, materialize, types}
// ============================================================================

//! ## Overview
//! A [`ToolContract`] is the immutable projection of one tool's full
//! behavioral surface: its agent-facing surface, its behavior fingerprints,
//! its token economics, and its statically inferred entitlements. Builders
//! satisfy the [`ToolCapability`] interface; the materializer depends on
//! nothing else. Materialization is deterministic: the same builder always
//! yields a byte-identical contract.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod capability;
pub mod economics;
pub mod materialize;
pub mod types;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use capability::ActionMetadata;
pub use capability::BehaviorSurface;
pub use capability::GuardrailSurface;
pub use capability::PresenterSurface;
pub use capability::PromptArgument;
pub use capability::PromptCapability;
pub use capability::PromptDefinition;
pub use capability::StaticPromptCapability;
pub use capability::StaticToolCapability;
pub use capability::SystemRuleSet;
pub use capability::ToolCapability;
pub use capability::ToolDefinition;
pub use economics::BlockCost;
pub use economics::BlockProfile;
pub use economics::COGNITIVE_OVERLOAD_TOKENS;
pub use economics::EconomicsProfile;
pub use economics::classify_risk;
pub use economics::estimate_tokens;
pub use economics::profile_blocks;
pub use economics::profile_tool;
pub use materialize::MaterializeError;
pub use materialize::compile_contracts;
pub use materialize::materialize_contract;
pub use types::ActionContract;
pub use types::BehaviorContract;
pub use types::CognitiveGuardrails;
pub use types::SurfaceContract;
pub use types::TokenEconomics;
pub use types::ToolContract;
