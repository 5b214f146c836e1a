//! Success classification for provisioning steps.
//!
//! A step succeeds when its captured output satisfies an [`OutputCheck`]
//! and, when required, the process exited with status zero. Today the only
//! check is a substring marker; the trait is the seam for structured
//! parsing if an installer ever emits machine-readable output.

use crate::shell::CommandOutput;

/// Predicate over a command's combined output.
pub trait OutputCheck {
    /// Whether the output indicates success.
    fn matches(&self, output: &str) -> bool;

    /// Short description for logs and failure reports.
    fn describe(&self) -> String;
}

/// Succeeds when the output contains a fixed substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainsMarker(pub String);

impl ContainsMarker {
    pub fn new(marker: impl Into<String>) -> Self {
        Self(marker.into())
    }
}

impl OutputCheck for ContainsMarker {
    fn matches(&self, output: &str) -> bool {
        output.contains(&self.0)
    }

    fn describe(&self) -> String {
        format!("output contains {:?}", self.0)
    }
}

/// Outcome of classifying a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Marker present and, if required, exit status zero.
    Passed,

    /// Exit status was required to be zero and was not.
    BadExitStatus(Option<i32>),

    /// The marker was not found in the output.
    MarkerMissing,
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// One-line reason for a failed verdict.
    pub fn reason(&self, check: &dyn OutputCheck) -> String {
        match self {
            Self::Passed => "passed".to_string(),
            Self::BadExitStatus(Some(code)) => format!("exited with status {}", code),
            Self::BadExitStatus(None) => "terminated by signal".to_string(),
            Self::MarkerMissing => format!("expected {}", check.describe()),
        }
    }
}

/// Classify a finished command.
///
/// With `check_returncode`, both a zero exit status and a matching output are
/// required. Without it, only the output is considered, since some installers
/// exit non-zero after doing detectable useful work.
pub fn classify(
    output: &CommandOutput,
    check: &dyn OutputCheck,
    check_returncode: bool,
) -> Verdict {
    if check_returncode && !output.exited_cleanly() {
        return Verdict::BadExitStatus(output.exit_code);
    }
    if !check.matches(&output.combined) {
        return Verdict::MarkerMissing;
    }
    Verdict::Passed
}
