// crates/fusion-lockfile/src/lib.rs
// ============================================================================
// Module: Capability Lockfile Engine
// Description: Sealed snapshot of a server's accepted capability surface.
// Purpose: Generate, serialize, parse, store, and drift-check lockfiles.
// Dependencies: crate::{check, generate, storage, types}
// ============================================================================

//! ## Overview
//! The lockfile is the canonical, integrity-sealed record of the surface a
//! server has been accepted to expose: per-tool lock records, optional
//! prompt records, and a top-level `sha256:`-prefixed integrity digest over
//! the same aggregation the server digest uses. Serialization is canonical
//! JSON with a trailing newline; parsing is tolerant and returns absence on
//! any malformed input.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod check;
pub mod generate;
pub mod storage;
pub mod types;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use check::LockfileCheck;
pub use check::check_lockfile;
pub use generate::LockfileError;
pub use generate::LockfileOptions;
pub use generate::generate_lockfile;
pub use generate::parse_lockfile;
pub use generate::serialize_lockfile;
pub use storage::read_lockfile;
pub use storage::write_lockfile;
pub use types::CapabilityLockfile;
pub use types::LOCKFILE_NAME;
pub use types::LOCKFILE_VERSION;
pub use types::LockBehavior;
pub use types::LockSurface;
pub use types::LockfileCapabilities;
pub use types::PromptLockRecord;
pub use types::ToolLockRecord;
