// crates/fusion-core/src/hashing.rs
// ============================================================================
// Module: Content Hashing
// Description: SHA-256 digests over canonical JSON bytes.
// Purpose: Provide the content-addressed identity function for contracts.
// Dependencies: serde, sha2, crate::canonical
// ============================================================================

//! ## Overview
//! MCP Fusion identifies every governed value by the lowercase-hex SHA-256 of
//! its canonical JSON bytes. Two values share a digest exactly when their
//! canonical encodings are byte-identical. Sealed artifacts carry digests
//! with the `sha256:` prefix; bare hex-64 digests are used everywhere else.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use crate::canonical::CanonicalError;
use crate::canonical::canonical_json_bytes;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix applied to digests embedded in sealed artifacts.
pub const SHA256_PREFIX: &str = "sha256:";

// ============================================================================
// SECTION: Hashing Helpers
// ============================================================================

/// Hashes raw bytes to a 64-character lowercase hex SHA-256 digest.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex_encode(&hasher.finalize())
}

/// Hashes the canonical JSON encoding of a serializable value.
///
/// # Errors
///
/// Returns [`CanonicalError`] when the value cannot be canonicalized.
pub fn hash_canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CanonicalError> {
    let bytes = canonical_json_bytes(value)?;
    Ok(sha256_hex(&bytes))
}

/// Prefixes a bare hex digest with [`SHA256_PREFIX`] for sealed artifacts.
#[must_use]
pub fn prefixed_digest(digest: &str) -> String {
    format!("{SHA256_PREFIX}{digest}")
}

/// Strips the [`SHA256_PREFIX`] from a sealed digest when present.
#[must_use]
pub fn strip_digest_prefix(digest: &str) -> &str {
    digest.strip_prefix(SHA256_PREFIX).unwrap_or(digest)
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

#[cfg(test)]
mod tests;
