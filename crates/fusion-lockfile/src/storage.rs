// crates/fusion-lockfile/src/storage.rs
// ============================================================================
// Module: Lockfile Storage
// Description: Sandboxed reads and writes of the lockfile file.
// Purpose: Persist canonical lockfile bytes under the known filename.
// Dependencies: cap-std, crate::{generate, types}
// ============================================================================

//! ## Overview
//! The lockfile is the only shared resource of the governance core. Writes
//! emit the full canonical bytes with a trailing newline through a
//! capability-scoped directory handle; readers tolerate missing, truncated,
//! or BOM-prefixed content by returning absence. The engine performs no
//! file locking; write serialization belongs to the host.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::io::Write;
use std::path::Path;

use cap_std::ambient_authority;
use cap_std::fs::Dir;

use crate::generate::LockfileError;
use crate::generate::parse_lockfile;
use crate::generate::serialize_lockfile;
use crate::types::CapabilityLockfile;
use crate::types::LOCKFILE_NAME;

// ============================================================================
// SECTION: Writing
// ============================================================================

/// Writes the lockfile under [`LOCKFILE_NAME`] in the given directory.
///
/// # Errors
///
/// Returns [`LockfileError`] when serialization or the write fails.
pub fn write_lockfile(dir: &Path, lockfile: &CapabilityLockfile) -> Result<(), LockfileError> {
    let text = serialize_lockfile(lockfile)?;
    let output = Dir::open_ambient_dir(dir, ambient_authority()).map_err(|err| io_error(dir, &err))?;
    let mut file = output.create(LOCKFILE_NAME).map_err(|err| io_error(dir, &err))?;
    file.write_all(text.as_bytes()).map_err(|err| io_error(dir, &err))?;
    Ok(())
}

// ============================================================================
// SECTION: Reading
// ============================================================================

/// Reads and parses the lockfile from the given directory.
///
/// Returns `None` when the file is missing, unreadable, or malformed.
#[must_use]
pub fn read_lockfile(dir: &Path) -> Option<CapabilityLockfile> {
    let input = Dir::open_ambient_dir(dir, ambient_authority()).ok()?;
    let mut file = input.open(LOCKFILE_NAME).ok()?;
    let mut text = String::new();
    file.read_to_string(&mut text).ok()?;
    parse_lockfile(&text)
}

// ============================================================================
// SECTION: Error Helpers
// ============================================================================

/// Wraps an IO failure with the offending path.
fn io_error(dir: &Path, err: &std::io::Error) -> LockfileError {
    LockfileError::Io {
        path: dir.join(LOCKFILE_NAME).display().to_string(),
        detail: err.to_string(),
    }
}
