//! Provisioning step definition.

use crate::shell::Invocation;
use crate::steps::check::ContainsMarker;

/// One external install or verification action.
///
/// Bundles the command with everything needed to judge and report it.
#[derive(Debug, Clone)]
pub struct ProvisionStep {
    /// Short identifier used in errors and logs.
    pub name: String,

    /// Command to run.
    pub invocation: Invocation,

    /// Output check that signals success.
    pub check: ContainsMarker,

    /// Shown before the command starts.
    pub progress: String,

    /// Shown when the command fails, followed by its output.
    pub failure: String,

    /// Shown when the command succeeds.
    pub success: String,

    /// Require exit status zero in addition to the marker.
    pub check_returncode: bool,
}

impl ProvisionStep {
    /// Create a step with placeholder messages and exit-status checking on.
    pub fn new(name: impl Into<String>, invocation: Invocation, marker: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            progress: format!("Running {}...", name),
            failure: format!("{} failed", name),
            success: format!("{} done", name),
            name,
            invocation,
            check: ContainsMarker::new(marker),
            check_returncode: true,
        }
    }

    pub fn progress(mut self, msg: impl Into<String>) -> Self {
        self.progress = msg.into();
        self
    }

    pub fn failure(mut self, msg: impl Into<String>) -> Self {
        self.failure = msg.into();
        self
    }

    pub fn success(mut self, msg: impl Into<String>) -> Self {
        self.success = msg.into();
        self
    }

    /// Accept a non-zero exit status as long as the marker is present.
    pub fn lenient(mut self) -> Self {
        self.check_returncode = false;
        self
    }

    /// Add an environment variable for this step's command only.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.invocation = self.invocation.with_env(key, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_step_checks_returncode() {
        let step = ProvisionStep::new("echo", Invocation::new("echo", ["hi"]), "hi");
        assert!(step.check_returncode);
        assert_eq!(step.check, ContainsMarker::new("hi"));
    }

    #[test]
    fn builder_sets_messages() {
        let step = ProvisionStep::new("qiime", Invocation::new("qiime", ["info"]), "QIIME 2 release:")
            .progress("Checking...")
            .failure("broken")
            .success("looks good");
        assert_eq!(step.progress, "Checking...");
        assert_eq!(step.failure, "broken");
        assert_eq!(step.success, "looks good");
    }

    #[test]
    fn lenient_disables_returncode() {
        let step = ProvisionStep::new("empress", Invocation::new("pip", ["install", "empress"]), "x")
            .lenient();
        assert!(!step.check_returncode);
    }

    #[test]
    fn env_goes_into_overlay() {
        let step = ProvisionStep::new("py", Invocation::new("python", ["-V"]), "Python")
            .env("PYTHONPATH", "/usr/local/lib");
        assert_eq!(
            step.invocation.env.get("PYTHONPATH").map(String::as_str),
            Some("/usr/local/lib")
        );
    }
}
