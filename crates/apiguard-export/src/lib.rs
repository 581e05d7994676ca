//! Export collection and symbol normalization.
//!
//! This crate owns the boundary to the Raw Export Collaborator: it invokes
//! the configured exporter command for a target, parses the export document
//! the exporter wrote, and normalizes it into a [`Snapshot`] of the target's
//! externally visible API surface.
//!
//! ## Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use apiguard_export::{produce_snapshot, ExporterConfig};
//!
//! let config = ExporterConfig::from_template(
//!     "symbol-exporter --module {target} -o {output}",
//!     Duration::from_secs(600),
//! );
//! let snapshot = produce_snapshot(&config, "Widgets").unwrap();
//! ```

mod error;
mod normalize;
mod runner;

use std::io;

use apiguard_schemas::{RawExport, Snapshot};
use tracing::{debug_span, info};

#[doc(inline)]
pub use crate::error::ExportError;
#[doc(inline)]
pub use crate::normalize::normalize;
#[doc(inline)]
pub use crate::runner::ExporterConfig;

/// Produces a snapshot for `target` by invoking the exporter and
/// normalizing its output.
///
/// The exporter writes its export document to a scratch file in a temporary
/// directory; the directory is removed when this function returns, so the
/// snapshot is the only thing that survives the invocation.
///
/// # Errors
///
/// Returns [`ExportError`] if:
/// - The exporter fails, times out, or produces no export file
///   ([`ExportError::is_unavailable`])
/// - The export file does not parse into the expected symbol-record shape
///   ([`ExportError::is_malformed`])
/// - Scratch-space I/O fails ([`ExportError::is_io`])
pub fn produce_snapshot(
    config: &ExporterConfig,
    target: &str,
) -> Result<Snapshot, ExportError> {
    let _span = debug_span!("produce_snapshot", target = %target).entered();

    let scratch = tempfile::tempdir()?;
    let export_path = scratch.path().join("export.json");
    runner::run_exporter(config, target, &export_path)?;

    let bytes = std::fs::read(&export_path).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            ExportError::unavailable(format!(
                "exporter produced no export file for target `{target}`"
            ))
        } else {
            ExportError::from(err)
        }
    })?;
    let raw: RawExport = serde_json::from_slice(&bytes)?;

    info!(
        target = %target,
        symbols = raw.symbols.len(),
        "export.parsed"
    );
    Ok(normalize(&raw, target))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    /// Config whose exporter writes `document` to the output path.
    fn writing_exporter(document: &str) -> ExporterConfig {
        ExporterConfig {
            command: vec![
                "sh".to_string(),
                "-c".to_string(),
                format!("printf '%s' '{document}' > {{output}}"),
            ],
            timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn produces_snapshot_from_export() {
        let config = writing_exporter(
            r#"{"symbols":[{"identifier":"s:f","name":"f","kind":"func","accessLevel":"public"}]}"#,
        );
        let snapshot =
            produce_snapshot(&config, "M").expect("snapshot should build");
        assert_eq!(snapshot.target, "M");
        assert_eq!(
            snapshot.symbols.get("s:f").map(String::as_str),
            Some("func f")
        );
    }

    #[test]
    fn missing_export_file_is_unavailable() {
        // The exporter exits successfully but writes nothing.
        let config = ExporterConfig {
            command: vec!["true".to_string()],
            timeout: Duration::from_secs(10),
        };
        let err = produce_snapshot(&config, "M")
            .expect_err("missing export should fail");
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("no export file"));
    }

    #[test]
    fn unparseable_export_is_malformed() {
        let config = writing_exporter("this is not json");
        let err = produce_snapshot(&config, "M")
            .expect_err("bad export should fail");
        assert!(err.is_malformed());
    }

    #[test]
    fn wrong_shape_export_is_malformed() {
        // Valid JSON, wrong shape: symbols must be a list of records.
        let config = writing_exporter(r#"{"symbols": 7}"#);
        let err = produce_snapshot(&config, "M")
            .expect_err("wrong-shape export should fail");
        assert!(err.is_malformed());
    }
}
