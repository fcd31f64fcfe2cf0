// crates/fusion-attest/src/attest.rs
// ============================================================================
// Module: Attestation Operations
// Description: Sign, verify, and pin-enforce server digests.
// Purpose: Turn a computed server digest into a checkable trust artifact.
// Dependencies: fusion-core, fusion-digest, serde, crate::signer
// ============================================================================

//! ## Overview
//! The attestation payload is the plain `digest` field of a server digest.
//! A pin check compares the computed digest against an expected value
//! first: a mismatch either surfaces as `valid = false` or, in
//! fail-on-mismatch mode, raises [`AttestError::PinMismatch`] carrying the
//! full attestation so CI can print the computed-versus-expected pair.

// ============================================================================
// SECTION: Imports
// ============================================================================

use fusion_core::Timestamp;
use fusion_digest::ServerDigest;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::signer::DigestSigner;
use crate::signer::HmacSigner;
use crate::signer::SignerError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by attestation operations.
#[derive(Debug, Error)]
pub enum AttestError {
    /// The HMAC signer was requested without a secret.
    #[error("hmac signer requires a secret")]
    MissingSecret,
    /// The computed digest does not match the expected pin.
    #[error("capability pin mismatch: {}", .attestation.error.as_deref().unwrap_or("digest does not match"))]
    PinMismatch {
        /// Full attestation describing the mismatch.
        attestation: Box<AttestationResult>,
    },
    /// The signer backend failed; propagated unchanged.
    #[error(transparent)]
    Signer(#[from] SignerError),
}

// ============================================================================
// SECTION: Options
// ============================================================================

/// Signer selection for attestation operations.
#[derive(Default)]
pub enum SignerChoice<'a> {
    /// Default HMAC-SHA256 signer; requires a secret in the options.
    #[default]
    Hmac,
    /// Caller-provided signer backend.
    Custom(&'a dyn DigestSigner),
}

/// Options for [`attest_server_digest`] and [`verify_attestation`].
pub struct AttestOptions<'a> {
    /// Signer selection.
    pub signer: SignerChoice<'a>,
    /// Shared secret for the HMAC signer.
    pub secret: Option<&'a [u8]>,
    /// Expected digest pin, when enforcing one.
    pub expected_digest: Option<&'a str>,
    /// Caller-supplied attestation timestamp.
    pub attested_at: Timestamp,
}

impl<'a> AttestOptions<'a> {
    /// Builds HMAC options from a secret and timestamp.
    #[must_use]
    pub const fn hmac(secret: &'a [u8], attested_at: Timestamp) -> Self {
        Self {
            signer: SignerChoice::Hmac,
            secret: Some(secret),
            expected_digest: None,
            attested_at,
        }
    }

    /// Builds options around a caller-provided signer.
    #[must_use]
    pub const fn with_signer(signer: &'a dyn DigestSigner, attested_at: Timestamp) -> Self {
        Self {
            signer: SignerChoice::Custom(signer),
            secret: None,
            expected_digest: None,
            attested_at,
        }
    }
}

/// Options for [`verify_capability_pin`].
pub struct PinOptions<'a> {
    /// Signer selection.
    pub signer: SignerChoice<'a>,
    /// Shared secret for the HMAC signer.
    pub secret: Option<&'a [u8]>,
    /// Expected digest pin.
    pub expected_digest: &'a str,
    /// Raise [`AttestError::PinMismatch`] instead of returning an invalid
    /// result.
    pub fail_on_mismatch: bool,
    /// Caller-supplied attestation timestamp.
    pub attested_at: Timestamp,
}

// ============================================================================
// SECTION: Results
// ============================================================================

/// Outcome of an attestation or verification operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationResult {
    /// Operation succeeded and any pin matched.
    pub valid: bool,
    /// Digest computed from the server surface.
    pub computed_digest: String,
    /// Expected pin when one was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_digest: Option<String>,
    /// Signature over the computed digest, when produced or verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Stable name of the signer backend.
    pub signer_name: String,
    /// Caller-supplied attestation timestamp.
    pub attested_at: Timestamp,
    /// Failure detail when `valid` is `false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Trust summary handed to clients after attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustCapability {
    /// Attested server digest.
    pub server_digest: String,
    /// Signature over the digest, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Number of tools covered by the digest.
    pub tool_count: usize,
    /// Attestation verdict.
    pub verified: bool,
}

// ============================================================================
// SECTION: Signer Resolution
// ============================================================================

/// Resolved signer backend for one operation.
enum ResolvedSigner<'a> {
    /// Owned HMAC signer built from the options secret.
    Hmac(HmacSigner),
    /// Borrowed caller-provided signer.
    Custom(&'a dyn DigestSigner),
}

impl ResolvedSigner<'_> {
    /// Returns the backend as a trait object.
    fn as_signer(&self) -> &dyn DigestSigner {
        match self {
            Self::Hmac(signer) => signer,
            Self::Custom(signer) => *signer,
        }
    }
}

/// Resolves the signer choice, failing loudly on a missing HMAC secret.
fn resolve_signer<'a>(
    signer: &SignerChoice<'a>,
    secret: Option<&[u8]>,
) -> Result<ResolvedSigner<'a>, AttestError> {
    match signer {
        SignerChoice::Hmac => {
            let secret = secret.ok_or(AttestError::MissingSecret)?;
            Ok(ResolvedSigner::Hmac(HmacSigner::new(secret.to_vec())))
        }
        SignerChoice::Custom(backend) => Ok(ResolvedSigner::Custom(*backend)),
    }
}

// ============================================================================
// SECTION: Operations
// ============================================================================

/// Attests a server digest, signing it unless an expected pin mismatches.
///
/// # Errors
///
/// Returns [`AttestError::MissingSecret`] for an HMAC request without a
/// secret and propagates signer failures unchanged.
pub fn attest_server_digest(
    server_digest: &ServerDigest,
    options: &AttestOptions<'_>,
) -> Result<AttestationResult, AttestError> {
    let resolved = resolve_signer(&options.signer, options.secret)?;
    let signer = resolved.as_signer();
    let computed = server_digest.digest.clone();

    if let Some(expected) = options.expected_digest
        && expected != computed
    {
        return Ok(mismatch_result(signer.name(), &computed, expected, options.attested_at));
    }

    let signature = signer.sign(&computed)?;
    Ok(AttestationResult {
        valid: true,
        computed_digest: computed,
        expected_digest: options.expected_digest.map(ToString::to_string),
        signature: Some(signature),
        signer_name: signer.name().to_string(),
        attested_at: options.attested_at,
        error: None,
    })
}

/// Verifies a signature over a server digest.
///
/// # Errors
///
/// Returns [`AttestError::MissingSecret`] for an HMAC request without a
/// secret and propagates signer failures unchanged.
pub fn verify_attestation(
    server_digest: &ServerDigest,
    signature: &str,
    options: &AttestOptions<'_>,
) -> Result<AttestationResult, AttestError> {
    let resolved = resolve_signer(&options.signer, options.secret)?;
    let signer = resolved.as_signer();
    let computed = server_digest.digest.clone();
    let valid = signer.verify(&computed, signature)?;

    Ok(AttestationResult {
        valid,
        computed_digest: computed,
        expected_digest: options.expected_digest.map(ToString::to_string),
        signature: Some(signature.to_string()),
        signer_name: signer.name().to_string(),
        attested_at: options.attested_at,
        error: (!valid).then(|| String::from("signature verification failed")),
    })
}

/// Enforces an expected-digest pin over a server digest.
///
/// # Errors
///
/// Returns [`AttestError::PinMismatch`] carrying the full attestation when
/// the pin differs and `fail_on_mismatch` is set; otherwise mismatches are
/// reported in the result. Missing secrets and signer failures propagate
/// as with [`attest_server_digest`].
pub fn verify_capability_pin(
    server_digest: &ServerDigest,
    options: &PinOptions<'_>,
) -> Result<AttestationResult, AttestError> {
    let attest_options = AttestOptions {
        signer: match &options.signer {
            SignerChoice::Hmac => SignerChoice::Hmac,
            SignerChoice::Custom(backend) => SignerChoice::Custom(*backend),
        },
        secret: options.secret,
        expected_digest: Some(options.expected_digest),
        attested_at: options.attested_at,
    };
    let result = attest_server_digest(server_digest, &attest_options)?;
    if !result.valid && options.fail_on_mismatch {
        return Err(AttestError::PinMismatch {
            attestation: Box::new(result),
        });
    }
    Ok(result)
}

/// Builds the client-facing trust capability from an attestation.
#[must_use]
pub fn build_trust_capability(
    attestation: &AttestationResult,
    tool_count: usize,
) -> TrustCapability {
    TrustCapability {
        server_digest: attestation.computed_digest.clone(),
        signature: attestation.signature.clone(),
        tool_count,
        verified: attestation.valid,
    }
}

// ============================================================================
// SECTION: Result Helpers
// ============================================================================

/// Builds the invalid result for a pin mismatch.
fn mismatch_result(
    signer_name: &str,
    computed: &str,
    expected: &str,
    attested_at: Timestamp,
) -> AttestationResult {
    AttestationResult {
        valid: false,
        computed_digest: computed.to_string(),
        expected_digest: Some(expected.to_string()),
        signature: None,
        signer_name: signer_name.to_string(),
        attested_at,
        error: Some(format!("computed digest {computed} does not match expected {expected}")),
    }
}
