//! Scripted executor for testing.
//!
//! `ScriptedExecutor` implements [`Executor`] by matching each invocation
//! against canned responses, and records every invocation for assertions.
//! Commands with no matching rule behave like a missing program.
//!
//! # Example
//!
//! ```
//! use q2setup::shell::{Executor, Invocation, ScriptedExecutor};
//!
//! let exec = ScriptedExecutor::new().on("conda --version", 0, "conda 23.1.0\n");
//!
//! let out = exec.execute(&Invocation::new("conda", ["--version"])).unwrap();
//! assert!(out.combined.contains("23.1.0"));
//! assert!(exec.execute(&Invocation::new("mamba", ["--version"])).is_err());
//! assert!(exec.ran("conda --version"));
//! ```

use std::cell::RefCell;
use std::io;
use std::time::Duration;

use crate::error::Result;

use super::command::{CommandOutput, Executor, Invocation};

#[derive(Debug, Clone)]
enum Response {
    Output { code: i32, text: String },
    Missing,
}

/// Executor that replays canned responses.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    rules: Vec<(String, Response)>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to commands starting with `prefix` with an exit code and output.
    ///
    /// Rules are tried in the order they were added.
    pub fn on(mut self, prefix: &str, code: i32, output: &str) -> Self {
        self.rules.push((
            prefix.to_string(),
            Response::Output {
                code,
                text: output.to_string(),
            },
        ));
        self
    }

    /// Make commands starting with `prefix` fail to spawn.
    pub fn missing(mut self, prefix: &str) -> Self {
        self.rules.push((prefix.to_string(), Response::Missing));
        self
    }

    /// Every invocation seen so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Whether any recorded command line starts with `prefix`.
    pub fn ran(&self, prefix: &str) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|inv| inv.to_string().starts_with(prefix))
    }
}

impl Executor for ScriptedExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        let line = invocation.to_string();

        let response = self
            .rules
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, r)| r.clone())
            .unwrap_or(Response::Missing);

        match response {
            Response::Output { code, text } => {
                Ok(CommandOutput::new(Some(code), &text, "", Duration::ZERO))
            }
            Response::Missing => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: command not found", invocation.program),
            )
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_rule_wins() {
        let exec = ScriptedExecutor::new()
            .on("pip install empress", 1, "boom")
            .on("pip install", 0, "Successfully installed");

        let out = exec
            .execute(&Invocation::new("pip", ["install", "empress"]))
            .unwrap();
        assert_eq!(out.exit_code, Some(1));

        let out = exec
            .execute(&Invocation::new("pip", ["install", "redbiom"]))
            .unwrap();
        assert_eq!(out.exit_code, Some(0));
    }

    #[test]
    fn unmatched_commands_are_missing() {
        let exec = ScriptedExecutor::new();
        assert!(exec.execute(&Invocation::new("qiime", ["info"])).is_err());
        assert_eq!(exec.calls().len(), 1);
    }

    #[test]
    fn explicit_missing_rule() {
        let exec = ScriptedExecutor::new().missing("wget").on("wget", 0, "saved");
        assert!(exec.execute(&Invocation::new("wget", ["x"])).is_err());
    }
}
