//! Error types for the apiguard-store crate.

use std::backtrace::Backtrace;
use std::fmt;

/// Error type for baseline load and save operations.
///
/// A missing baseline gets its own kind because it signals a setup step
/// (record a baseline first), not a defect; callers present it differently
/// from file damage or filesystem failures.
#[derive(Debug)]
pub struct StoreError {
    kind: StoreErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods.
#[derive(Debug)]
pub(crate) enum StoreErrorKind {
    /// No baseline file exists for the requested target.
    BaselineMissing(String),
    /// Failed to convert a snapshot into its canonical JSON form.
    /// Internal-contract violation; should not occur in normal operation.
    Serialization(serde_json::Error),
    /// A baseline file exists but does not parse as a snapshot.
    Deserialization(serde_json::Error),
    /// I/O error reading or writing baseline files.
    Io(std::io::Error),
}

impl StoreError {
    /// Creates an error from an error kind, capturing a backtrace.
    pub(crate) fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `BaselineMissing` error for a target.
    pub(crate) fn baseline_missing(target: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::BaselineMissing(target.into()))
    }

    /// Returns true if no baseline exists for the requested target.
    pub fn is_baseline_missing(&self) -> bool {
        matches!(self.kind, StoreErrorKind::BaselineMissing(_))
    }

    /// Returns true if snapshot encoding failed.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, StoreErrorKind::Serialization(_))
    }

    /// Returns true if a baseline file failed to parse.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, StoreErrorKind::Deserialization(_))
    }

    /// Returns true if this error is due to I/O failure.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, StoreErrorKind::Io(_))
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreErrorKind::BaselineMissing(target) => {
                write!(
                    f,
                    "no baseline recorded for target `{target}`; \
                     run update first"
                )
            }
            StoreErrorKind::Serialization(err) => {
                write!(f, "failed to encode snapshot: {err}")
            }
            StoreErrorKind::Deserialization(err) => {
                write!(f, "failed to parse baseline file: {err}")
            }
            StoreErrorKind::Io(err) => {
                write!(f, "I/O error: {err}")
            }
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Summary of what happened.
        writeln!(f, "{}", self.kind)?;

        // Backtrace (will be empty unless RUST_BACKTRACE is set).
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            StoreErrorKind::BaselineMissing(_) => None,
            StoreErrorKind::Serialization(err)
            | StoreErrorKind::Deserialization(err) => Some(err),
            StoreErrorKind::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::new(StoreErrorKind::Io(err))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_baseline_missing() {
        let err = StoreError::baseline_missing("Widgets");

        assert!(err.is_baseline_missing());
        assert!(!err.is_serialization());
        assert!(!err.is_deserialization());
        assert!(!err.is_io());

        assert!(err.to_string().contains("no baseline recorded"));
        assert!(err.to_string().contains("Widgets"));
        assert!(err.to_string().contains("run update first"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_deserialization() {
        let json_err =
            serde_json::from_str::<String>("not valid json").unwrap_err();
        let err = StoreError::new(StoreErrorKind::Deserialization(json_err));

        assert!(err.is_deserialization());
        assert!(!err.is_baseline_missing());
        assert!(!err.is_io());

        assert!(err.to_string().contains("failed to parse baseline file"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_serialization() {
        let json_err =
            serde_json::from_str::<String>("not valid json").unwrap_err();
        let err = StoreError::new(StoreErrorKind::Serialization(json_err));

        assert!(err.is_serialization());
        assert!(!err.is_deserialization());

        assert!(err.to_string().contains("failed to encode snapshot"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_from() {
        let io_err = std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only filesystem",
        );
        let err = StoreError::from(io_err);

        assert!(err.is_io());
        assert!(!err.is_baseline_missing());

        assert!(err.to_string().contains("I/O error"));
        assert!(err.source().is_some());
    }
}
