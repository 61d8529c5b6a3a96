//! Error types for LeetTutor.
//!
//! Library crates use [`LeetTutorError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all LeetTutor operations.
#[derive(Debug, thiserror::Error)]
pub enum LeetTutorError {
    /// Non-2xx response or transport failure on either remote API.
    #[error("network error: {0}")]
    Network(String),

    /// A command that needs a target notebook was invoked without one.
    #[error("no active notebook found, open or create a notebook first")]
    NoActiveDocument,

    /// Malformed embedded JSON (stats, similar questions, test cases).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The document rejected the edit (closed or modified concurrently).
    #[error("edit conflict: {0}")]
    EditConflict(String),

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (malformed notebook, refused overwrite, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// HTML-to-Markdown conversion error.
    #[error("conversion error: {0}")]
    Conversion(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LeetTutorError>;

impl LeetTutorError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = LeetTutorError::Network("https://example.com/problem/1: HTTP 404 Not Found".into());
        assert!(err.to_string().starts_with("network error:"));
        assert!(err.to_string().contains("404"));

        let err = LeetTutorError::parse("stats: expected value at line 1 column 1");
        assert_eq!(
            err.to_string(),
            "parse error: stats: expected value at line 1 column 1"
        );
    }

    #[test]
    fn no_active_document_message() {
        let err = LeetTutorError::NoActiveDocument;
        assert!(err.to_string().contains("no active notebook"));
    }
}
