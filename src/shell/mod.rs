//! Process execution and environment handling.

pub mod command;
pub mod env;
pub mod platform;
pub mod scripted;

pub use command::{
    execute, probe_output, CommandOutput, Executor, Invocation, SystemExecutor,
};
pub use env::{append_search_path, merge_env};
pub use platform::{is_ci, is_elevated, is_system_prefix};
pub use scripted::ScriptedExecutor;
