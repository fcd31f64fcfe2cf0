// crates/fusion-attest/src/lib.rs
// ============================================================================
// Module: Attestation Engine
// Description: Signed capability pins over server digests.
// Purpose: Sign, verify, and enforce expected-digest pins with pluggable
//          signers.
// Dependencies: crate::{attest, signer}
// ============================================================================

//! ## Overview
//! Attestation seals a [`fusion_digest::ServerDigest`] with a signature so
//! deployments can pin the exact capability surface they reviewed. Signing
//! is pluggable behind [`DigestSigner`]; the default is HMAC-SHA256 over a
//! shared secret, with an Ed25519 signer available for asymmetric trust.
//! Pin enforcement either reports a mismatching digest in the result or
//! raises [`AttestError::PinMismatch`] carrying the full attestation.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod attest;
pub mod signer;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use attest::AttestError;
pub use attest::AttestOptions;
pub use attest::AttestationResult;
pub use attest::PinOptions;
pub use attest::SignerChoice;
pub use attest::TrustCapability;
pub use attest::attest_server_digest;
pub use attest::build_trust_capability;
pub use attest::verify_attestation;
pub use attest::verify_capability_pin;
pub use signer::DigestSigner;
pub use signer::Ed25519Signer;
pub use signer::HmacSigner;
pub use signer::SignerError;
