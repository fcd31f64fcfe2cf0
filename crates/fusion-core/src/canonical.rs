// crates/fusion-core/src/canonical.rs
// ============================================================================
// Module: Canonical JSON Encoding
// Description: RFC 8785 JSON canonicalization with a recursion depth guard.
// Purpose: Provide the sole source of JSON bytes fed to the content hasher.
// Dependencies: serde, serde_jcs, serde_json
// ============================================================================

//! ## Overview
//! Every digest in MCP Fusion is computed over canonical JSON: object keys
//! sorted ascending at every depth, arrays in index order, no whitespace
//! between tokens, and absent values omitted. Canonicalization is delegated
//! to RFC 8785 (JCS) after an iterative depth check so pathological inputs
//! are rejected instead of overflowing the stack.
//!
//! Security posture: canonical bytes feed integrity digests; see the
//! lockfile and attestation crates for how digests are sealed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum nesting depth accepted by the canonical encoder.
pub const MAX_CANONICAL_DEPTH: usize = 128;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while producing canonical JSON bytes.
#[derive(Debug, Error)]
pub enum CanonicalError {
    /// Serialization into a JSON value failed.
    #[error("failed to canonicalize json: {0}")]
    Serialization(String),
    /// Input nesting exceeded the canonical depth guard.
    #[error("canonical depth limit exceeded: depth {depth} > limit {limit}")]
    DepthLimitExceeded {
        /// Configured depth limit.
        limit: usize,
        /// Observed nesting depth.
        depth: usize,
    },
}

// ============================================================================
// SECTION: Canonical Encoding
// ============================================================================

/// Returns canonical JSON bytes for a serializable value using RFC 8785.
///
/// # Errors
///
/// Returns [`CanonicalError::Serialization`] when the value cannot be
/// represented as JSON (for example non-finite floats) and
/// [`CanonicalError::DepthLimitExceeded`] when nesting exceeds
/// [`MAX_CANONICAL_DEPTH`].
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CanonicalError> {
    let value =
        serde_json::to_value(value).map_err(|err| CanonicalError::Serialization(err.to_string()))?;
    ensure_depth(&value)?;
    serde_jcs::to_vec(&value).map_err(|err| CanonicalError::Serialization(err.to_string()))
}

/// Returns canonical JSON as a UTF-8 string.
///
/// # Errors
///
/// Returns [`CanonicalError`] under the same conditions as
/// [`canonical_json_bytes`].
pub fn canonical_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String, CanonicalError> {
    let bytes = canonical_json_bytes(value)?;
    String::from_utf8(bytes).map_err(|err| CanonicalError::Serialization(err.to_string()))
}

// ============================================================================
// SECTION: Depth Guard
// ============================================================================

/// Rejects values nested beyond [`MAX_CANONICAL_DEPTH`].
///
/// The walk is iterative so the guard itself cannot overflow on the inputs
/// it exists to reject.
fn ensure_depth(value: &Value) -> Result<(), CanonicalError> {
    let mut stack: Vec<(&Value, usize)> = vec![(value, 1)];
    while let Some((current, depth)) = stack.pop() {
        if depth > MAX_CANONICAL_DEPTH {
            return Err(CanonicalError::DepthLimitExceeded {
                limit: MAX_CANONICAL_DEPTH,
                depth,
            });
        }
        match current {
            Value::Array(items) => {
                for item in items {
                    stack.push((item, depth + 1));
                }
            }
            Value::Object(entries) => {
                for entry in entries.values() {
                    stack.push((entry, depth + 1));
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
    }
    Ok(())
}
