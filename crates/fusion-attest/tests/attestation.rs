// crates/fusion-attest/tests/attestation.rs
// ============================================================================
// Module: Attestation Tests
// Description: Pin enforcement, verification, and trust capability shape.
// ============================================================================
//! ## Overview
//! Exercises attestation over real server digests: signing, pin
//! mismatches in both reporting modes, signature verification, missing
//! secrets, custom signer propagation, and trust capability construction.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only fixtures use unwraps and panic-based assertions for clarity."
)]

use std::collections::BTreeMap;

use fusion_attest::AttestError;
use fusion_attest::AttestOptions;
use fusion_attest::DigestSigner;
use fusion_attest::PinOptions;
use fusion_attest::SignerChoice;
use fusion_attest::SignerError;
use fusion_attest::attest_server_digest;
use fusion_attest::build_trust_capability;
use fusion_attest::verify_attestation;
use fusion_attest::verify_capability_pin;
use fusion_contract::StaticToolCapability;
use fusion_contract::materialize_contract;
use fusion_core::Timestamp;
use fusion_digest::ServerDigest;
use fusion_digest::digest_server;
use serde_json::json;

/// Builds a server digest over one minimal tool.
fn server_digest() -> ServerDigest {
    let capability = StaticToolCapability {
        name: String::from("users"),
        description: None,
        tags: Vec::new(),
        input_schema: json!({"type": "object"}),
        actions: Vec::new(),
        behavior: fusion_contract::BehaviorSurface::default(),
        handler_source: None,
    };
    let contract = materialize_contract(&capability).expect("materialize");
    let mut contracts = BTreeMap::new();
    contracts.insert(String::from("users"), contract);
    digest_server(&contracts, Timestamp::UNIX_EPOCH).expect("digest")
}

#[test]
fn attestation_signs_the_digest_payload() {
    let digest = server_digest();
    let options = AttestOptions::hmac(b"ci-secret", Timestamp::UNIX_EPOCH);
    let result = attest_server_digest(&digest, &options).expect("attest");
    assert!(result.valid);
    assert_eq!(result.computed_digest, digest.digest);
    assert_eq!(result.signer_name, "hmac");
    let signature = result.signature.expect("signature");
    assert_eq!(signature.len(), 64);

    let verified =
        verify_attestation(&digest, &signature, &options).expect("verify");
    assert!(verified.valid);
}

#[test]
fn tampered_signature_fails_verification() {
    let digest = server_digest();
    let options = AttestOptions::hmac(b"ci-secret", Timestamp::UNIX_EPOCH);
    let result = verify_attestation(&digest, &"0".repeat(64), &options).expect("verify");
    assert!(!result.valid);
    assert!(result.error.expect("error").contains("verification failed"));
}

#[test]
fn expected_digest_mismatch_reports_without_signing() {
    let digest = server_digest();
    let options = AttestOptions {
        signer: SignerChoice::Hmac,
        secret: Some(b"ci-secret"),
        expected_digest: Some("b"),
        attested_at: Timestamp::UNIX_EPOCH,
    };
    let result = attest_server_digest(&digest, &options).expect("attest");
    assert!(!result.valid);
    assert!(result.signature.is_none());
    assert!(result.error.expect("error").contains("does not match"));
}

#[test]
fn pin_mismatch_throws_when_fail_on_mismatch_is_set() {
    let digest = server_digest();
    let options = PinOptions {
        signer: SignerChoice::Hmac,
        secret: Some(b"ci-secret"),
        expected_digest: "b",
        fail_on_mismatch: true,
        attested_at: Timestamp::UNIX_EPOCH,
    };
    let err = verify_capability_pin(&digest, &options).unwrap_err();
    let AttestError::PinMismatch {
        attestation,
    } = err
    else {
        panic!("expected a pin mismatch error");
    };
    assert!(!attestation.valid);
    assert!(attestation.error.as_deref().expect("error").contains("does not match"));
    assert_eq!(attestation.expected_digest.as_deref(), Some("b"));
}

#[test]
fn matching_pin_signs_and_returns_valid() {
    let digest = server_digest();
    let expected = digest.digest.clone();
    let options = PinOptions {
        signer: SignerChoice::Hmac,
        secret: Some(b"ci-secret"),
        expected_digest: &expected,
        fail_on_mismatch: true,
        attested_at: Timestamp::UNIX_EPOCH,
    };
    let result = verify_capability_pin(&digest, &options).expect("pin");
    assert!(result.valid);
    assert!(result.signature.is_some());
}

#[test]
fn hmac_without_a_secret_fails_loudly() {
    let digest = server_digest();
    let options = AttestOptions {
        signer: SignerChoice::Hmac,
        secret: None,
        expected_digest: None,
        attested_at: Timestamp::UNIX_EPOCH,
    };
    let err = attest_server_digest(&digest, &options).unwrap_err();
    assert!(matches!(err, AttestError::MissingSecret));
}

/// Signer stub whose backend always fails.
struct FailingSigner;

impl DigestSigner for FailingSigner {
    fn name(&self) -> &str {
        "failing"
    }

    fn sign(&self, _payload: &str) -> Result<String, SignerError> {
        Err(SignerError::new("backend unavailable"))
    }

    fn verify(&self, _payload: &str, _signature: &str) -> Result<bool, SignerError> {
        Err(SignerError::new("backend unavailable"))
    }
}

#[test]
fn signer_failures_propagate_unchanged() {
    let digest = server_digest();
    let signer = FailingSigner;
    let options = AttestOptions::with_signer(&signer, Timestamp::UNIX_EPOCH);
    let err = attest_server_digest(&digest, &options).unwrap_err();
    assert!(matches!(err, AttestError::Signer(_)));
    assert!(err.to_string().contains("backend unavailable"));
}

#[test]
fn trust_capability_reflects_the_attestation() {
    let digest = server_digest();
    let options = AttestOptions::hmac(b"ci-secret", Timestamp::UNIX_EPOCH);
    let result = attest_server_digest(&digest, &options).expect("attest");
    let capability = build_trust_capability(&result, digest.tools.len());
    assert_eq!(capability.server_digest, digest.digest);
    assert_eq!(capability.tool_count, 1);
    assert!(capability.verified);
    assert_eq!(capability.signature, result.signature);
}
