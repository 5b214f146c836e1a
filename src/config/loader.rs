//! Configuration file loading.

use crate::config::schema::BootstrapConfig;
use crate::config::validator::validate;
use crate::error::{Result, SetupError};
use std::fs;
use std::path::Path;

/// Load the plan from `path`, or fall back to the built-in defaults.
///
/// The result is validated either way.
pub fn load_or_default(path: Option<&Path>) -> Result<BootstrapConfig> {
    let config = match path {
        Some(path) => load_config_file(path)?,
        None => BootstrapConfig::default(),
    };
    validate(&config)?;
    Ok(config)
}

/// Load a single config file and parse it into BootstrapConfig.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<BootstrapConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SetupError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SetupError::Io(e)
        }
    })?;

    tracing::debug!(path = %path.display(), "loaded config file");
    parse_config(&content, path)
}

/// Parse YAML content into BootstrapConfig.
///
/// `source_path` is only used for error reporting. An empty document
/// yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<BootstrapConfig> {
    if content.trim().is_empty() {
        return Ok(BootstrapConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| SetupError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
