//! Error types for SupportDesk.
//!
//! Library crates use [`SupportDeskError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all SupportDesk operations.
#[derive(Debug, thiserror::Error)]
pub enum SupportDeskError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport-level HTTP error (client construction, connection, body read).
    #[error("network error: {0}")]
    Network(String),

    /// The vector store was unreachable or rejected the search.
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// The language model call failed (API error, empty reply).
    #[error("model error: {0}")]
    Model(String),

    /// A remote call did not resolve within its deadline.
    #[error("{stage} timed out after {millis}ms")]
    Timeout { stage: String, millis: u64 },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Rejected input: an empty query or a zero timeout.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SupportDeskError>;

impl SupportDeskError {
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

    /// Create a timeout error for the named pipeline stage.
    pub fn timeout(stage: impl Into<String>, after: std::time::Duration) -> Self {
        Self::Timeout {
            stage: stage.into(),
            millis: u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
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
