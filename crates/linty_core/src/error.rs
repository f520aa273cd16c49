//! Linter error types.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort a run before or during discovery.
///
/// Per-file checker failures are never reported through this type; they
/// become failing [`Verdict`](crate::Verdict)s instead.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The scan root or one of its entries could not be read.
    #[error("Failed to get files under {}: {message}", root.display())]
    Discovery { root: PathBuf, message: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LinterError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a discovery error for the given scan root.
    pub fn discovery(root: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Discovery {
            root: root.into(),
            message: message.into(),
        }
    }
}
