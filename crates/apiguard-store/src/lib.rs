//! Baseline snapshot persistence.
//!
//! One canonically-encoded JSON file per target inside the baseline
//! directory. Saves replace the whole file atomically (write to a temp file
//! in the same directory, then rename over the destination), so a reader
//! never observes a partially written baseline: it sees either the old
//! complete content or the new complete content. There is no cross-process
//! locking; the operational model is one run at a time per checkout.
//!
//! Baselines are mutated only by an explicit update; comparison runs only
//! read them.

mod error;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use apiguard_schemas::Snapshot;
use tempfile::NamedTempFile;
use tracing::{debug, info};

#[doc(inline)]
pub use crate::error::StoreError;
use crate::error::StoreErrorKind;

/// Replaces path separators so every target maps to one flat file name.
fn sanitize_target(target: &str) -> String {
    target.replace(['/', '\\'], "-")
}

/// Returns the baseline file path for a target.
pub fn baseline_path(baseline_dir: &Path, target: &str) -> PathBuf {
    baseline_dir.join(format!("{}.json", sanitize_target(target)))
}

/// Loads the stored baseline snapshot for a target.
///
/// # Errors
///
/// Returns [`StoreError`] if:
/// - No baseline file exists for the target
///   ([`StoreError::is_baseline_missing`]); a missing baseline is never
///   treated as an empty snapshot
/// - The file cannot be read ([`StoreError::is_io`])
/// - The file does not parse as a snapshot
///   ([`StoreError::is_deserialization`])
pub fn load(
    baseline_dir: &Path,
    target: &str,
) -> Result<Snapshot, StoreError> {
    let path = baseline_path(baseline_dir, target);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(StoreError::baseline_missing(target));
        }
        Err(err) => return Err(err.into()),
    };

    let snapshot: Snapshot = serde_json::from_slice(&bytes)
        .map_err(|err| StoreError::new(StoreErrorKind::Deserialization(err)))?;
    debug!(
        target = %target,
        path = %path.display(),
        symbols = snapshot.symbols.len(),
        "baseline.loaded"
    );
    Ok(snapshot)
}

/// Saves a snapshot as the baseline for its target, replacing any prior
/// baseline file.
///
/// Creates the baseline directory if absent. Returns the path written.
///
/// # Errors
///
/// Returns [`StoreError`] if:
/// - The snapshot cannot be encoded ([`StoreError::is_serialization`])
/// - Directory creation, the temp-file write, or the atomic rename fails
///   ([`StoreError::is_io`])
pub fn save(
    snapshot: &Snapshot,
    baseline_dir: &Path,
) -> Result<PathBuf, StoreError> {
    fs::create_dir_all(baseline_dir)?;
    let path = baseline_path(baseline_dir, &snapshot.target);
    let bytes = snapshot
        .to_canonical_bytes()
        .map_err(|err| StoreError::new(StoreErrorKind::Serialization(err)))?;

    // The temp file must live in the destination directory: rename is only
    // atomic within one filesystem.
    let mut tmp = NamedTempFile::new_in(baseline_dir)?;
    tmp.write_all(&bytes)?;
    tmp.write_all(b"\n")?;
    tmp.persist(&path).map_err(|err| StoreError::from(err.error))?;

    info!(
        target = %snapshot.target,
        path = %path.display(),
        symbols = snapshot.symbols.len(),
        "baseline.written"
    );
    Ok(path)
}
