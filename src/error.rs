//! Error types for deploy operations.
//!
//! Configuration problems are reported before any network call is made;
//! filesystem and remote failures are passed through with the path or
//! endpoint that produced them.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for deploy operations
pub type Result<T> = std::result::Result<T, DeployError>;

/// Main error type for all deploy operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Configuration failed validation or could not be parsed
    #[error("Invalid screeps configuration: {reason}")]
    ConfigInvalid {
        /// Reason for the error
        reason: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Filesystem operation on a known path failed
    #[error("Failed {action} {}: {source}", path.display())]
    Fs {
        /// What was being done, e.g. "renaming source map"
        action: &'static str,
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The Screeps server answered with an error payload
    #[error("Screeps API error at {endpoint}: {message}")]
    Remote {
        /// API endpoint that was called
        endpoint: String,
        /// Error message reported by the server
        message: String,
    },

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl DeployError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            reason: reason.into(),
        }
    }

    pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Fs {
            action,
            path: path.into(),
            source,
        }
    }
}
