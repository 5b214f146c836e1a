//! Configuration validation rules.
//!
//! - The installer URL must end in a file name
//! - The install prefix must be absolute
//! - Channels and packages must not be empty
//! - Markers must not be empty (an empty marker matches anything)
//! - The gated interpreter version must look like `major.minor`

use crate::config::schema::BootstrapConfig;
use crate::error::{Result, SetupError};
use regex::Regex;
use std::sync::LazyLock;

static PYTHON_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+$").expect("valid regex"));

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Config field the problem is in.
    pub field: String,
    /// Human-readable error message.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration and return all errors.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_config(config: &BootstrapConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let installer = config.installer_name();
    if installer.is_empty() || installer.contains(':') {
        errors.push(ValidationError::new(
            "miniconda_url",
            format!("'{}' does not end in an installer file name", config.miniconda_url),
        ));
    }

    if !config.install_prefix.is_absolute() {
        errors.push(ValidationError::new(
            "install_prefix",
            format!("'{}' must be an absolute path", config.install_prefix.display()),
        ));
    }

    if config.qiime_release.trim().is_empty() {
        errors.push(ValidationError::new("qiime_release", "must not be empty"));
    }

    if config.channels.is_empty() {
        errors.push(ValidationError::new("channels", "must not be empty"));
    }

    if config.packages.is_empty() {
        errors.push(ValidationError::new("packages", "must not be empty"));
    }

    for pkg in &config.pip_packages {
        if pkg.name.trim().is_empty() {
            errors.push(ValidationError::new("pip_packages", "package name must not be empty"));
        }
        if pkg.marker.is_empty() {
            errors.push(ValidationError::new(
                "pip_packages",
                format!("marker for '{}' must not be empty", pkg.name),
            ));
        }
    }

    for (field, marker) in [
        ("probes.conda", &config.probes.conda),
        ("probes.mamba", &config.probes.mamba),
        ("probes.qiime", &config.probes.qiime),
    ] {
        if marker.is_empty() {
            errors.push(ValidationError::new(field, "marker must not be empty"));
        }
    }

    if !PYTHON_VERSION.is_match(&config.python_version) {
        errors.push(ValidationError::new(
            "python_version",
            format!("'{}' is not a major.minor version", config.python_version),
        ));
    }

    errors
}

/// Validate a configuration, failing with all problems joined.
pub fn validate(config: &BootstrapConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");
    Err(SetupError::ConfigValidationError { message })
}
