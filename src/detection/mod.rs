//! Detection of preexisting installations on the host.

pub mod interpreter;
pub mod tools;

pub use interpreter::{parse_python_version, python_version};
pub use tools::{mamba_installed, InstalledTools, ToolProbe};
