// crates/fusion-digest/src/lib.rs
// ============================================================================
// Module: Behavior Digest Engine
// Description: Content-addressed fingerprints over contracts and servers.
// Purpose: Compute component, tool, and aggregate server digests.
// Dependencies: crate::{compare, digest}
// ============================================================================

//! ## Overview
//! Every contract fingerprints into four component digests (surface,
//! behavior, token economics, entitlements), a tool digest over the
//! components, and an aggregate [`ServerDigest`] over all tools. Digest
//! values are pure functions of contract content; timestamps are explicit
//! caller inputs carried as metadata outside the hashed material.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod compare;
pub mod digest;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use compare::DigestComparison;
pub use compare::compare_server_digests;
pub use digest::ComponentDigests;
pub use digest::DigestError;
pub use digest::ServerDigest;
pub use digest::ToolDigest;
pub use digest::aggregate_digest;
pub use digest::digest_contract;
pub use digest::digest_server;
