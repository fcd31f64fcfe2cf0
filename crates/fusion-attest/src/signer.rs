// crates/fusion-attest/src/signer.rs
// ============================================================================
// Module: Digest Signers
// Description: Pluggable signer interface with HMAC and Ed25519 backends.
// Purpose: Produce and verify signatures over server digest payloads.
// Dependencies: ed25519-dalek, hmac, sha2, subtle
// ============================================================================

//! ## Overview
//! A [`DigestSigner`] signs the plain digest string of a server digest and
//! verifies candidate signatures. The HMAC-SHA256 signer accepts any UTF-8
//! secret bytes and emits 64-character lowercase hex; verification is
//! constant-time and returns `false` on any mismatch, including length.
//! The Ed25519 signer wraps caller-supplied keys; key management stays with
//! the host.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ed25519_dalek::Signature;
use ed25519_dalek::Signer as _;
use ed25519_dalek::SigningKey;
use ed25519_dalek::Verifier as _;
use ed25519_dalek::VerifyingKey;
use hmac::Hmac;
use hmac::Mac;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure raised by a signer backend.
///
/// Signer failures propagate unchanged to the caller; the attestation
/// engine never wraps or retries them.
#[derive(Debug, Error)]
#[error("signer failure: {message}")]
pub struct SignerError {
    /// Backend-provided failure detail.
    message: String,
}

impl SignerError {
    /// Creates a signer failure with the provided detail.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// SECTION: Signer Interface
// ============================================================================

/// Pluggable signer over digest payloads.
pub trait DigestSigner {
    /// Returns the stable signer name recorded in attestation results.
    fn name(&self) -> &str;

    /// Signs the payload and returns the signature string.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError`] when the backend cannot sign.
    fn sign(&self, payload: &str) -> Result<String, SignerError>;

    /// Verifies a candidate signature over the payload.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError`] when the backend cannot verify; a mere
    /// mismatch is `Ok(false)`.
    fn verify(&self, payload: &str, signature: &str) -> Result<bool, SignerError>;
}

// ============================================================================
// SECTION: HMAC Signer
// ============================================================================

/// Default symmetric signer: HMAC-SHA256 over a shared secret.
pub struct HmacSigner {
    /// Shared secret bytes; any length is accepted.
    secret: Vec<u8>,
}

impl HmacSigner {
    /// Creates an HMAC signer from secret bytes.
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Computes the lowercase-hex HMAC-SHA256 tag for a payload.
    fn tag(&self, payload: &str) -> Result<String, SignerError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.secret)
            .map_err(|err| SignerError::new(err.to_string()))?;
        mac.update(payload.as_bytes());
        Ok(hex_encode(&mac.finalize().into_bytes()))
    }
}

impl DigestSigner for HmacSigner {
    fn name(&self) -> &str {
        "hmac"
    }

    fn sign(&self, payload: &str) -> Result<String, SignerError> {
        self.tag(payload)
    }

    fn verify(&self, payload: &str, signature: &str) -> Result<bool, SignerError> {
        let expected = self.tag(payload)?;
        if expected.len() != signature.len() {
            return Ok(false);
        }
        Ok(expected.as_bytes().ct_eq(signature.as_bytes()).into())
    }
}

// ============================================================================
// SECTION: Ed25519 Signer
// ============================================================================

/// Asymmetric signer over caller-supplied Ed25519 keys.
///
/// # Invariants
/// - A verify-only signer (no signing key) fails `sign` with a
///   [`SignerError`].
pub struct Ed25519Signer {
    /// Signing key when this instance may produce signatures.
    signing_key: Option<SigningKey>,
    /// Verifying key, always present.
    verifying_key: VerifyingKey,
}

impl Ed25519Signer {
    /// Creates a signer that can both sign and verify.
    #[must_use]
    pub fn new(signing_key: SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key: Some(signing_key),
            verifying_key,
        }
    }

    /// Creates a verify-only signer from a public key.
    #[must_use]
    pub const fn verify_only(verifying_key: VerifyingKey) -> Self {
        Self {
            signing_key: None,
            verifying_key,
        }
    }
}

impl DigestSigner for Ed25519Signer {
    fn name(&self) -> &str {
        "ed25519"
    }

    fn sign(&self, payload: &str) -> Result<String, SignerError> {
        let key = self
            .signing_key
            .as_ref()
            .ok_or_else(|| SignerError::new("ed25519 signer has no signing key"))?;
        let signature = key.sign(payload.as_bytes());
        Ok(hex_encode(&signature.to_bytes()))
    }

    fn verify(&self, payload: &str, signature: &str) -> Result<bool, SignerError> {
        let Some(bytes) = hex_decode(signature) else {
            return Ok(false);
        };
        let Ok(parsed) = Signature::from_slice(&bytes) else {
            return Ok(false);
        };
        Ok(self.verifying_key.verify(payload.as_bytes(), &parsed).is_ok())
    }
}

// ============================================================================
// SECTION: Hex Helpers
// ============================================================================

/// Encodes bytes as lowercase hex.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

/// Decodes lowercase or uppercase hex, returning `None` on malformed input.
fn hex_decode(input: &str) -> Option<Vec<u8>> {
    if !input.len().is_multiple_of(2) {
        return None;
    }
    let mut out = Vec::with_capacity(input.len() / 2);
    let bytes = input.as_bytes();
    for pair in bytes.chunks_exact(2) {
        let high = (pair[0] as char).to_digit(16)?;
        let low = (pair[1] as char).to_digit(16)?;
        let value = high * 16 + low;
        out.push(u8::try_from(value).ok()?);
    }
    Some(out)
}
