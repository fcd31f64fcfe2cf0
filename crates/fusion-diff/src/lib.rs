// crates/fusion-diff/src/lib.rs
// ============================================================================
// Module: Contract Diff Engine
// Description: Structural diff of two contracts with severity classification.
// Purpose: Classify every contract change by blast radius for CI and runtime.
// Dependencies: crate::{delta, engine, format}
// ============================================================================

//! ## Overview
//! The diff engine walks two contracts field by field and emits one
//! [`ContractDelta`] per change, classified BREAKING, RISKY, SAFE, or
//! COSMETIC. Deltas order by severity descending, then category, then
//! field; a diff is backwards compatible exactly when nothing reaches
//! RISKY. Formatters render the result as a human report or as an
//! XML fragment for agent self-correction.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod delta;
pub mod engine;
pub mod format;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use delta::ContractDelta;
pub use delta::ContractDiffResult;
pub use delta::DeltaCategory;
pub use engine::DiffError;
pub use engine::diff_contracts;
pub use format::format_deltas_as_xml;
pub use format::format_diff_report;
pub use format::xml_escape;
