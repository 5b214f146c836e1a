//! q2setup - Bootstrap a QIIME 2 toolchain onto a fresh host.
//!
//! q2setup installs Miniconda, mamba, QIIME 2 and its plugins, and a couple
//! of auxiliary libraries, checking each external command's output for a
//! known success marker and stopping at the first step that fails.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument parsing
//! - [`config`] - Plan configuration, defaults, and validation
//! - [`detection`] - Probes for preexisting installations
//! - [`error`] - Error types and result aliases
//! - [`plugins`] - Version-gated plugin verification
//! - [`runner`] - The bootstrap sequence and cleanup
//! - [`shell`] - External command execution and environment overlays
//! - [`steps`] - Provisioning steps and success classification
//! - [`ui`] - Terminal output, spinners, and theme
//!
//! # Example
//!
//! ```
//! use q2setup::shell::{Executor, Invocation, SystemExecutor};
//! use q2setup::steps::{classify, ContainsMarker};
//!
//! let out = SystemExecutor.execute(&Invocation::new("echo", ["ok-done"])).unwrap();
//! assert!(classify(&out, &ContainsMarker::new("done"), true).is_pass());
//! ```

pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod plugins;
pub mod runner;
pub mod shell;
pub mod steps;
pub mod ui;

pub use error::{Result, SetupError};
