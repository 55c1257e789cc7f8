//! Error types for ublue-update operations.
//!
//! This module defines [`UpdateError`], the error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Expected outcomes (failed inhibitor checks, failing update scripts,
//!   no update available) are *not* errors; they are reported through
//!   [`RunOutcome`](crate::engine::RunOutcome)
//! - `UpdateError` covers collaborator faults that abort the run
//! - Use `anyhow::Error` (via `UpdateError::Other`) for unexpected errors

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core error type for ublue-update operations.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// Configuration file not found at an explicitly requested location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// External command could not be run or exited unexpectedly.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// External command produced output we could not interpret.
    #[error("Unexpected output from {command}: {message}")]
    UnexpectedOutput { command: String, message: String },

    /// The package manager kept a transaction open past the wait deadline.
    #[error("Transaction still in progress after {waited:?}")]
    TransactionTimeout { waited: Duration },

    /// Update script directory is missing or not a directory.
    #[error("Script directory not found: {path}")]
    ScriptDirNotFound { path: PathBuf },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for ublue-update operations.
pub type Result<T> = std::result::Result<T, UpdateError>;
