//! Error types for docforge.
//!
//! Library crates use [`DocforgeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all docforge operations.
///
/// One variant per pipeline step, so a failure always names the step
/// that produced it. The run stops at the first error; nothing retries.
#[derive(Debug, thiserror::Error)]
pub enum DocforgeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Constructor repository clone or checkout error.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Template download or missing-file error.
    #[error("template error: {0}")]
    Template(String),

    /// Markdown discovery error (missing or unreadable docs directory).
    #[error("discovery error: {0}")]
    Discovery(String),

    /// Converter/typesetting toolchain installation error.
    #[error("toolchain error: {0}")]
    Toolchain(String),

    /// Document conversion error.
    #[error("conversion error: {0}")]
    Convert(String),

    /// Artifact publishing error.
    #[error("publish error: {0}")]
    Publish(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad inputs, malformed manifest, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocforgeError>;

impl DocforgeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
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
