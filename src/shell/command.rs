//! External command execution.

use crate::error::Result;
use crate::shell::env::merge_env;
use std::collections::HashMap;
use std::fmt;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// One external command: program, arguments, and an environment overlay.
///
/// The overlay is applied on top of a copy of the ambient environment for
/// this child only. The parent process environment is never written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Program to run, looked up on `PATH`.
    pub program: String,

    /// Arguments passed to the program.
    pub args: Vec<String>,

    /// Extra environment variables for this invocation only.
    pub env: HashMap<String, String>,
}

impl Invocation {
    /// Create an invocation with no environment overlay.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            env: HashMap::new(),
        }
    }

    /// Build an invocation from a full argument vector (program first).
    ///
    /// Returns `None` for an empty vector.
    pub fn from_argv<S: AsRef<str>>(argv: &[S]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(
            program.as_ref(),
            args.iter().map(|a| a.as_ref().to_string()),
        ))
    }

    /// Add an environment variable to the overlay.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output followed by standard error.
    pub combined: String,

    /// Execution duration.
    pub duration: Duration,
}

impl CommandOutput {
    /// Build a result from an exit code and separate streams.
    pub fn new(exit_code: Option<i32>, stdout: &str, stderr: &str, duration: Duration) -> Self {
        let mut combined = String::with_capacity(stdout.len() + stderr.len());
        combined.push_str(stdout);
        combined.push_str(stderr);
        Self {
            exit_code,
            combined,
            duration,
        }
    }

    /// Whether the process exited with status zero.
    pub fn exited_cleanly(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Something that can run an [`Invocation`] to completion.
///
/// The bootstrap sequence talks to this trait so tests can script
/// command results without spawning installers.
pub trait Executor {
    /// Run the invocation and wait for it to finish.
    fn execute(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Executor that spawns real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<CommandOutput> {
        execute(invocation)
    }
}

/// Spawn the invocation, wait for it, and capture both output streams.
pub fn execute(invocation: &Invocation) -> Result<CommandOutput> {
    let start = Instant::now();

    tracing::debug!(
        program = %invocation.program,
        args = ?invocation.args,
        overlay = ?invocation.env.keys().collect::<Vec<_>>(),
        "spawning command"
    );

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);
    cmd.env_clear();
    cmd.envs(merge_env(std::env::vars_os(), &invocation.env));
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd.output()?;
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    tracing::debug!(
        program = %invocation.program,
        code = ?output.status.code(),
        elapsed_ms = duration.as_millis() as u64,
        "command finished"
    );

    Ok(CommandOutput::new(
        output.status.code(),
        &stdout,
        &stderr,
        duration,
    ))
}

/// Run a command and return its combined output, or an empty string if it
/// could not be spawned.
///
/// Used for presence probes like `conda --version`, where a missing
/// executable simply means "not installed".
pub fn probe_output(executor: &dyn Executor, invocation: &Invocation) -> String {
    match executor.execute(invocation) {
        Ok(out) => out.combined,
        Err(e) => {
            tracing::debug!(command = %invocation, error = %e, "probe could not run");
            String::new()
        }
    }
}
