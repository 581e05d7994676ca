//! Error types for the apiguard-export crate.

use std::backtrace::Backtrace;
use std::fmt;

/// Error type for export collection operations.
///
/// Captures failures between "the exporter was asked to run" and "a
/// normalized snapshot exists": the exporter process failing, timing out,
/// or producing nothing, and the export document failing to parse.
#[derive(Debug)]
pub struct ExportError {
    kind: ExportErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods.
#[derive(Debug)]
pub(crate) enum ExportErrorKind {
    /// The exporter failed, timed out, or produced no export file.
    /// Carries the captured diagnostic output. Never retried.
    Unavailable(String),
    /// The export file exists but does not parse into the expected
    /// symbol-record shape. Never retried: a malformed export will not
    /// become valid on a second read.
    Malformed(serde_json::Error),
    /// I/O error reading the export file or managing scratch space.
    Io(std::io::Error),
}

impl ExportError {
    /// Creates an error from an error kind, capturing a backtrace.
    pub(crate) fn new(kind: ExportErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates an `Unavailable` error from a diagnostic message.
    pub(crate) fn unavailable(diagnostic: impl Into<String>) -> Self {
        Self::new(ExportErrorKind::Unavailable(diagnostic.into()))
    }

    /// Returns true if the exporter failed, timed out, or produced no file.
    pub fn is_unavailable(&self) -> bool {
        matches!(self.kind, ExportErrorKind::Unavailable(_))
    }

    /// Returns true if the export file could not be parsed.
    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, ExportErrorKind::Malformed(_))
    }

    /// Returns true if this error is due to I/O failure.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ExportErrorKind::Io(_))
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for ExportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportErrorKind::Unavailable(diagnostic) => {
                write!(f, "export unavailable: {diagnostic}")
            }
            ExportErrorKind::Malformed(err) => {
                write!(f, "malformed export: {err}")
            }
            ExportErrorKind::Io(err) => {
                write!(f, "I/O error: {err}")
            }
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Summary of what happened.
        writeln!(f, "{}", self.kind)?;

        // Backtrace (will be empty unless RUST_BACKTRACE is set).
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ExportErrorKind::Unavailable(_) => None,
            ExportErrorKind::Malformed(err) => Some(err),
            ExportErrorKind::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::new(ExportErrorKind::Io(err))
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ExportErrorKind::Malformed(err))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_unavailable() {
        let err = ExportError::unavailable("exporter exited with status 1");

        assert!(err.is_unavailable());
        assert!(!err.is_malformed());
        assert!(!err.is_io());

        assert!(err.to_string().contains("export unavailable"));
        assert!(err.to_string().contains("exited with status 1"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_malformed_from() {
        let json_err =
            serde_json::from_str::<String>("not valid json").unwrap_err();
        let err = ExportError::from(json_err);

        assert!(err.is_malformed());
        assert!(!err.is_unavailable());
        assert!(!err.is_io());

        assert!(err.to_string().contains("malformed export"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_from() {
        let io_err =
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ExportError::from(io_err);

        assert!(err.is_io());
        assert!(!err.is_unavailable());
        assert!(!err.is_malformed());

        assert!(err.to_string().contains("I/O error"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_backtrace_captured() {
        let err = ExportError::unavailable("test");
        // Just verify we can call backtrace() - the actual content depends
        // on RUST_BACKTRACE environment variable.
        let _ = err.backtrace();
    }
}
