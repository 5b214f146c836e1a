//! Error types for q2setup operations.
//!
//! This module defines [`SetupError`], the error type returned by every
//! provisioning step, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Library code never exits the process; failures are returned as
//!   `SetupError` and propagated with `?`
//! - `main` renders the error and maps it to exit status 1
//! - Failures outside a step (such as preparing scratch space) carry
//!   `anyhow` context and surface as `SetupError::Other`

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for q2setup operations.
#[derive(Debug, Error)]
pub enum SetupError {
    /// A provisioning step did not produce its success marker.
    #[error("Step '{step}' failed: {message}")]
    StepFailed {
        step: String,
        message: String,
        /// Combined stdout and stderr of the failed command.
        output: String,
    },

    /// The version-gated plugin verification failed.
    #[error("Plugin check failed: {message}")]
    PluginCheckFailed { message: String },

    /// Configuration file not found at the given location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure outside a provisioning step, with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SetupError {
    /// Captured command output, if this error carries any.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::StepFailed { output, .. } if !output.is_empty() => Some(output.as_str()),
            _ => None,
        }
    }
}

/// Result type alias for q2setup operations.
pub type Result<T> = std::result::Result<T, SetupError>;
