//! Configuration of the bootstrap plan.
//!
//! - Schema definitions and defaults in [`schema`]
//! - File loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use q2setup::config::{parse_config, validate};
//! use std::path::Path;
//!
//! let config = parse_config("qiime_release: \"2024.5\"", Path::new("plan.yml")).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.qiime_release, "2024.5");
//! assert_eq!(config.installer_name(), "Miniconda3-latest-Linux-x86_64.sh");
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{load_config_file, load_or_default, parse_config};
pub use schema::{BootstrapConfig, PipPackage, ProbeMarkers};
pub use validator::{validate, validate_config, ValidationError};
