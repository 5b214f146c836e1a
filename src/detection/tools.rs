//! Presence probes for already-installed tools.

use crate::config::ProbeMarkers;
use crate::shell::{probe_output, Executor, Invocation};

/// A `<tool> --version` probe with the marker that means "installed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolProbe {
    /// Tool name for logs.
    pub name: String,
    /// Command to run.
    pub invocation: Invocation,
    /// Substring expected in the output when the tool is present.
    pub marker: String,
}

impl ToolProbe {
    /// Probe `<program> --version` for `marker`.
    pub fn version(program: &str, marker: &str) -> Self {
        Self {
            name: program.to_string(),
            invocation: Invocation::new(program, ["--version"]),
            marker: marker.to_string(),
        }
    }

    /// Run the probe. A program that cannot be spawned counts as absent.
    pub fn detect(&self, executor: &dyn Executor) -> bool {
        let found = probe_output(executor, &self.invocation).contains(&self.marker);
        tracing::debug!(tool = %self.name, found, "probed tool");
        found
    }
}

/// Which parts of the toolchain were present before the run started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstalledTools {
    pub conda: bool,
    pub qiime: bool,
}

impl InstalledTools {
    /// Probe conda and qiime.
    pub fn detect(executor: &dyn Executor, markers: &ProbeMarkers) -> Self {
        Self {
            conda: ToolProbe::version("conda", &markers.conda).detect(executor),
            qiime: ToolProbe::version("qiime", &markers.qiime).detect(executor),
        }
    }
}

/// Probe mamba. Runs after conda may have been installed.
pub fn mamba_installed(executor: &dyn Executor, markers: &ProbeMarkers) -> bool {
    ToolProbe::version("mamba", &markers.mamba).detect(executor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::ScriptedExecutor;

    #[test]
    fn probe_detects_marker() {
        let exec = ScriptedExecutor::new().on("conda --version", 0, "conda 23.1.0\n");
        assert!(ToolProbe::version("conda", "conda ").detect(&exec));
    }

    #[test]
    fn probe_missing_program_is_absent() {
        let exec = ScriptedExecutor::new();
        assert!(!ToolProbe::version("conda", "conda ").detect(&exec));
    }

    #[test]
    fn probe_wrong_output_is_absent() {
        let exec = ScriptedExecutor::new().on("qiime --version", 127, "qiime: not configured");
        assert!(!ToolProbe::version("qiime", "q2cli version").detect(&exec));
    }

    #[test]
    fn probe_ignores_exit_status() {
        let exec = ScriptedExecutor::new().on("mamba --version", 1, "mamba 1.4.2\nconda 23.1.0");
        assert!(mamba_installed(&exec, &ProbeMarkers::default()));
    }

    #[test]
    fn installed_tools_snapshot() {
        let exec = ScriptedExecutor::new()
            .on("conda --version", 0, "conda 23.1.0")
            .on("qiime --version", 0, "q2cli version 2023.2.0");
        let tools = InstalledTools::detect(&exec, &ProbeMarkers::default());
        assert_eq!(tools, InstalledTools { conda: true, qiime: true });
    }

    #[test]
    fn real_missing_program_is_absent() {
        let probe = ToolProbe::version("q2setup-definitely-not-a-program", "x");
        assert!(!probe.detect(&crate::shell::SystemExecutor));
    }
}
