//! Error handling module for autorip
//!
//! Process-level failures that happen before or around a run. Failures
//! inside a run are `DomainError`s and end up in the `RunOutcome`.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for autorip startup and command handling
#[derive(Error, Debug)]
pub enum AutoripError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid environment variable override
    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: String, value: String },

    /// Logging could not be initialised
    #[error("Failed to initialize logging: {message}")]
    Logging { message: String },

    /// Log file could not be opened
    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Drive is not ready to be ripped
    #[error("Drive {device} is not ready: {status}")]
    DriveNotReady { device: String, status: String },

    /// Domain failure surfaced outside a run
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for autorip operations
pub type AutoripResult<T> = std::result::Result<T, AutoripError>;
