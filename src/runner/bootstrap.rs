//! The bootstrap sequence.
//!
//! Runs the provisioning steps in a fixed order, skipping the ones whose
//! tools are already installed, and stops at the first failure.

use std::path::Path;
use std::time::Instant;

use crate::config::BootstrapConfig;
use crate::detection::{mamba_installed, python_version, InstalledTools};
use crate::error::Result;
use crate::plugins::{InterpreterPluginVerifier, PluginVerifier};
use crate::runner::cleanup::DownloadDir;
use crate::runner::plan;
use crate::shell::{is_elevated, is_system_prefix, Executor};
use crate::steps::{ProvisionStep, StepRunner};
use crate::ui::{RunSummary, UserInterface};

/// Message shown after every step passed.
pub const COMPLETION_MESSAGE: &str = "Everything is A-OK. You can start using QIIME 2 now 👍";

/// Stand-in for the per-run download directory in dry-run listings.
const DRY_RUN_DOWNLOAD_DIR: &str = "$TMPDIR/q2setup-XXXXXX";

/// Drives the whole installation.
pub struct Bootstrap<'a> {
    config: &'a BootstrapConfig,
    executor: &'a dyn Executor,
    verifier: Option<Box<dyn PluginVerifier + 'a>>,
    elevated: bool,
}

impl<'a> Bootstrap<'a> {
    pub fn new(config: &'a BootstrapConfig, executor: &'a dyn Executor) -> Self {
        Self {
            config,
            executor,
            verifier: None,
            elevated: is_elevated(),
        }
    }

    /// Replace the interpreter-based plugin check.
    pub fn with_plugin_verifier(mut self, verifier: Box<dyn PluginVerifier + 'a>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Override whether the process counts as root.
    pub fn with_elevated(mut self, elevated: bool) -> Self {
        self.elevated = elevated;
        self
    }

    /// Run the bootstrap. Returns at the first failed step.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<RunSummary> {
        let start = Instant::now();
        let mut summary = RunSummary::default();
        let runner = StepRunner::new(self.executor);

        ui.show_header(&format!("QIIME 2 {} setup", self.config.qiime_release));
        self.warn_if_unprivileged(ui);

        let installed = InstalledTools::detect(self.executor, &self.config.probes);
        tracing::info!(conda = installed.conda, qiime = installed.qiime, "detected tools");

        let download = if installed.conda {
            ui.message("🐍 Miniconda is already installed. Skipped.");
            summary.steps_skipped += 2;
            None
        } else {
            let download = DownloadDir::create(self.config.installer_name())?;
            let installer = download.installer();
            self.step(&runner, &plan::download_miniconda(self.config, installer), ui, &mut summary)?;
            self.step(&runner, &plan::install_miniconda(self.config, installer), ui, &mut summary)?;
            Some(download)
        };

        // Probed only now, since the fresh Miniconda may ship it.
        let toolkit_present = installed.qiime || mamba_installed(self.executor, &self.config.probes);
        if toolkit_present {
            ui.message("🔍 QIIME 2 is already installed. Skipped.");
            summary.steps_skipped += 2 + self.config.pip_packages.len();
        } else {
            self.step(&runner, &plan::install_mamba(), ui, &mut summary)?;
            self.step(&runner, &plan::install_qiime(self.config), ui, &mut summary)?;
            for pkg in &self.config.pip_packages {
                self.step(&runner, &plan::install_pip_package(pkg), ui, &mut summary)?;
            }
        }

        self.step(&runner, &plan::smoke_test_qiime(), ui, &mut summary)?;

        summary.plugins_checked = self.check_plugins(ui)?;

        if let Some(download) = download {
            download.close();
        }

        summary.total_duration = start.elapsed();
        ui.success(COMPLETION_MESSAGE);
        ui.show_summary(&summary);
        Ok(summary)
    }

    /// Show the commands a run on a bare host would execute.
    ///
    /// Nothing is executed, not even the presence probes.
    pub fn dry_run(&self, ui: &mut dyn UserInterface) -> Vec<ProvisionStep> {
        ui.show_header(&format!(
            "QIIME 2 {} setup (dry-run mode)",
            self.config.qiime_release
        ));
        let steps = plan::full_plan(self.config, Path::new(DRY_RUN_DOWNLOAD_DIR));
        for (i, step) in steps.iter().enumerate() {
            ui.message(&format!("[{}/{}] {}", i + 1, steps.len(), step.name));
            ui.message(&format!("    $ {}", step.invocation));
        }
        ui.message(&format!(
            "Plugin check runs when {} reports Python {}.",
            self.config.python, self.config.python_version
        ));
        steps
    }

    fn step(
        &self,
        runner: &StepRunner<'_>,
        step: &ProvisionStep,
        ui: &mut dyn UserInterface,
        summary: &mut RunSummary,
    ) -> Result<()> {
        runner.run(step, ui)?;
        summary.steps_run += 1;
        Ok(())
    }

    /// Verify plugins when the host interpreter is the gated version.
    fn check_plugins(&self, ui: &mut dyn UserInterface) -> Result<bool> {
        let found = python_version(self.executor, &self.config.python);
        if found.as_deref() != Some(self.config.python_version.as_str()) {
            tracing::debug!(?found, wanted = %self.config.python_version, "skipping plugin check");
            return Ok(false);
        }

        match &self.verifier {
            Some(verifier) => verifier.verify(ui)?,
            None => InterpreterPluginVerifier::new(
                self.executor,
                self.config.python.as_str(),
                self.config.site_packages(),
            )
            .verify(ui)?,
        }
        Ok(true)
    }

    fn warn_if_unprivileged(&self, ui: &mut dyn UserInterface) {
        if is_system_prefix(&self.config.install_prefix) && !self.elevated {
            ui.warning(&format!(
                "Not running as root; installing into {} may fail.",
                self.config.install_prefix.display()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SetupError;
    use crate::shell::ScriptedExecutor;
    use crate::ui::MockUI;
    use std::cell::Cell;
    use std::path::PathBuf;

    const QIIME_INFO: &str = "System versions\nQIIME 2 release: 2023.2\nQIIME 2 version: 2023.2.0\n";

    /// Prefix outside system paths so the privilege warning stays quiet,
    /// and an interpreter name that never matches a real one.
    fn config() -> BootstrapConfig {
        BootstrapConfig {
            install_prefix: PathBuf::from("/home/tester/conda"),
            python: "q2setup-test-python".to_string(),
            ..Default::default()
        }
    }

    fn bare_host() -> ScriptedExecutor {
        ScriptedExecutor::new()
            .on("wget", 0, "2023-02-01 'Miniconda3-latest-Linux-x86_64.sh' saved [74403966]")
            .on("bash", 0, "PREFIX=/home/tester/conda\ninstallation finished.\n")
            .on("conda install mamba", 0, "Preparing transaction: done\n  mamba-1.4.2\n")
            .on("mamba install", 0, "Extracting Packages: ...working... done\n")
            .on("pip install empress", 0, "Successfully installed empress-1.2.0\n")
            .on("pip install", 0, "Successfully installed redbiom-0.3.9\n")
            .on("qiime info", 0, QIIME_INFO)
    }

    /// Target of the `wget -O` call.
    fn downloaded_to(exec: &ScriptedExecutor) -> PathBuf {
        let wget = exec
            .calls()
            .into_iter()
            .find(|c| c.program == "wget")
            .unwrap();
        assert_eq!(wget.args[0], "-O");
        PathBuf::from(&wget.args[1])
    }

    struct CountingVerifier<'c> {
        calls: &'c Cell<usize>,
        fail: bool,
    }

    impl PluginVerifier for CountingVerifier<'_> {
        fn verify(&self, _ui: &mut dyn UserInterface) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(SetupError::PluginCheckFailed {
                    message: "Could not add the plugins".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn bare_host_runs_every_step() {
        let config = config();
        let exec = bare_host();
        let mut ui = MockUI::new();

        let summary = Bootstrap::new(&config, &exec).run(&mut ui).unwrap();

        assert_eq!(summary.steps_run, 7);
        assert_eq!(summary.steps_skipped, 0);
        assert!(!summary.plugins_checked);
        let installer = downloaded_to(&exec);
        assert!(installer.ends_with("Miniconda3-latest-Linux-x86_64.sh"));
        assert!(exec.ran(&format!("bash {} -bfp /home/tester/conda", installer.display())));
        assert!(exec.ran("mamba install -n base -y -c conda-forge"));
        assert!(ui.has_success("Everything is A-OK"));
        assert_eq!(ui.summaries().len(), 1);
    }

    #[test]
    fn steps_run_in_order() {
        let config = config();
        let exec = bare_host();
        let mut ui = MockUI::new();

        Bootstrap::new(&config, &exec).run(&mut ui).unwrap();

        let programs: Vec<String> = exec
            .calls()
            .into_iter()
            .filter(|c| !c.args.iter().any(|a| a == "--version"))
            .map(|c| c.program)
            .collect();
        assert_eq!(
            programs,
            vec!["wget", "bash", "conda", "mamba", "pip", "pip", "qiime"]
        );
    }

    #[test]
    fn installer_is_downloaded_into_a_private_directory() {
        let config = config();
        let exec = bare_host();
        let mut ui = MockUI::new();

        Bootstrap::new(&config, &exec).run(&mut ui).unwrap();

        let installer = downloaded_to(&exec);
        let dir = installer.parent().unwrap();
        assert!(dir
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("q2setup-"));
        assert_ne!(dir, std::env::current_dir().unwrap());
        assert!(!dir.exists());
    }

    #[test]
    fn failed_download_removes_only_its_own_directory() {
        let workdir = tempfile::TempDir::new().unwrap();
        let users_file = workdir.path().join("mine.sh");
        std::fs::write(&users_file, "#!/bin/sh\necho mine").unwrap();
        let config = BootstrapConfig {
            miniconda_url: "https://x/mine.sh".to_string(),
            ..config()
        };
        let exec = ScriptedExecutor::new().on("wget", 4, "Unable to resolve host address 'x'");
        let mut ui = MockUI::new();

        let err = Bootstrap::new(&config, &exec).run(&mut ui).unwrap_err();

        assert!(matches!(err, SetupError::StepFailed { ref step, .. } if step == "download-miniconda"));
        let installer = downloaded_to(&exec);
        assert!(installer.ends_with("mine.sh"));
        assert!(!installer.parent().unwrap().exists());
        assert!(users_file.exists());
        assert!(!exec.ran("bash"));
    }

    #[test]
    fn system_prefix_without_root_warns() {
        let config = BootstrapConfig {
            install_prefix: PathBuf::from("/usr/local"),
            ..config()
        };
        let exec = bare_host();
        let mut ui = MockUI::new();

        Bootstrap::new(&config, &exec)
            .with_elevated(false)
            .run(&mut ui)
            .unwrap();

        assert!(ui.has_warning("Not running as root"));
        assert!(ui.warnings()[0].contains("/usr/local"));
    }

    #[test]
    fn system_prefix_as_root_does_not_warn() {
        let config = BootstrapConfig {
            install_prefix: PathBuf::from("/usr/local"),
            ..config()
        };
        let exec = bare_host();
        let mut ui = MockUI::new();

        Bootstrap::new(&config, &exec)
            .with_elevated(true)
            .run(&mut ui)
            .unwrap();

        assert!(ui.warnings().is_empty());
    }

    #[test]
    fn user_prefix_never_warns() {
        let config = config();
        let exec = bare_host();
        let mut ui = MockUI::new();

        Bootstrap::new(&config, &exec)
            .with_elevated(false)
            .run(&mut ui)
            .unwrap();

        assert!(ui.warnings().is_empty());
    }

    #[test]
    fn existing_conda_skips_miniconda() {
        let config = config();
        let exec = ScriptedExecutor::new()
            .on("conda --version", 0, "conda 23.1.0")
            .on("wget", 0, "saved")
            .on("conda install mamba", 0, "mamba")
            .on("mamba install", 0, "Extracting Packages: ...working... done")
            .on("pip install empress", 0, "Successfully installed empress-1.2.0")
            .on("pip install", 0, "Successfully installed redbiom")
            .on("qiime info", 0, QIIME_INFO);
        let mut ui = MockUI::new();

        let summary = Bootstrap::new(&config, &exec).run(&mut ui).unwrap();

        assert!(!exec.ran("wget"));
        assert!(!exec.ran("bash"));
        assert!(ui.has_message("Miniconda is already installed"));
        assert_eq!(summary.steps_skipped, 2);
        assert_eq!(summary.steps_run, 5);
    }

    #[test]
    fn existing_qiime_only_runs_smoke_test() {
        let config = config();
        let exec = ScriptedExecutor::new()
            .on("conda --version", 0, "conda 23.1.0")
            .on("qiime --version", 0, "q2cli version 2023.2.0")
            .on("qiime info", 0, QIIME_INFO);
        let mut ui = MockUI::new();

        let summary = Bootstrap::new(&config, &exec).run(&mut ui).unwrap();

        assert_eq!(summary.steps_run, 1);
        assert_eq!(summary.steps_skipped, 6);
        assert!(!exec.ran("mamba install"));
        assert!(!exec.ran("pip"));
        assert!(ui.has_message("QIIME 2 is already installed"));
    }

    #[test]
    fn existing_mamba_skips_toolkit_group() {
        let config = config();
        let exec = ScriptedExecutor::new()
            .on("conda --version", 0, "conda 23.1.0")
            .on("mamba --version", 0, "mamba 1.4.2\nconda 23.1.0")
            .on("mamba install", 0, "Extracting Packages: ...working... done")
            .on("pip install", 0, "Successfully installed redbiom")
            .on("qiime info", 0, QIIME_INFO);
        let mut ui = MockUI::new();

        let summary = Bootstrap::new(&config, &exec).run(&mut ui).unwrap();

        assert!(!exec.ran("conda install"));
        assert!(!exec.ran("mamba install"));
        assert!(!exec.ran("pip"));
        assert!(exec.ran("qiime info"));
        assert!(ui.has_message("QIIME 2 is already installed"));
        assert_eq!(summary.steps_run, 1);
        assert_eq!(summary.steps_skipped, 6);
    }

    #[test]
    fn mamba_from_fresh_miniconda_skips_toolkit_group() {
        let config = config();
        let exec = ScriptedExecutor::new()
            .on("wget", 0, "saved")
            .on("bash", 0, "installation finished.")
            .on("mamba --version", 0, "mamba 1.4.2")
            .on("qiime info", 0, QIIME_INFO);
        let mut ui = MockUI::new();

        let summary = Bootstrap::new(&config, &exec).run(&mut ui).unwrap();

        assert!(exec.ran("bash"));
        assert!(!exec.ran("mamba install"));
        assert_eq!(summary.steps_run, 3);
        assert_eq!(summary.steps_skipped, 4);
    }

    #[test]
    fn first_failure_stops_the_run() {
        let config = config();
        let exec = ScriptedExecutor::new()
            .on("wget", 0, "saved")
            .on("bash", 1, "ERROR: File or directory already exists")
            .on("qiime info", 0, QIIME_INFO);
        let mut ui = MockUI::new();

        let err = Bootstrap::new(&config, &exec).run(&mut ui).unwrap_err();

        match &err {
            SetupError::StepFailed { step, message, output } => {
                assert_eq!(step, "install-miniconda");
                assert!(message.contains("could not install miniconda"));
                assert!(output.contains("already exists"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!exec.ran("conda install"));
        assert!(!exec.ran("qiime info"));
        assert!(!ui.has_success("Everything is A-OK"));
    }

    #[test]
    fn failing_smoke_test_is_fatal() {
        let config = config();
        let exec = ScriptedExecutor::new()
            .on("conda --version", 0, "conda 23.1.0")
            .on("qiime --version", 0, "q2cli version 2023.2.0")
            .on("qiime info", 1, "Traceback (most recent call last):");
        let mut ui = MockUI::new();

        let err = Bootstrap::new(&config, &exec).run(&mut ui).unwrap_err();

        assert!(err.to_string().contains("QIIME 2 command line does not seem to work"));
    }

    #[test]
    fn plugin_check_runs_on_gated_interpreter() {
        let config = BootstrapConfig {
            python: "python3".to_string(),
            ..config()
        };
        let exec = ScriptedExecutor::new()
            .on("conda --version", 0, "conda 23.1.0")
            .on("qiime --version", 0, "q2cli version 2023.2.0")
            .on("qiime info", 0, QIIME_INFO)
            .on("python3 --version", 0, "Python 3.8.16");
        let calls = Cell::new(0);
        let mut ui = MockUI::new();

        let summary = Bootstrap::new(&config, &exec)
            .with_plugin_verifier(Box::new(CountingVerifier {
                calls: &calls,
                fail: false,
            }))
            .run(&mut ui)
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert!(summary.plugins_checked);
    }

    #[test]
    fn plugin_check_skipped_on_other_interpreter() {
        let config = BootstrapConfig {
            python: "python3".to_string(),
            ..config()
        };
        let exec = ScriptedExecutor::new()
            .on("conda --version", 0, "conda 23.1.0")
            .on("qiime --version", 0, "q2cli version 2023.2.0")
            .on("qiime info", 0, QIIME_INFO)
            .on("python3 --version", 0, "Python 3.10.12");
        let calls = Cell::new(0);
        let mut ui = MockUI::new();

        let summary = Bootstrap::new(&config, &exec)
            .with_plugin_verifier(Box::new(CountingVerifier {
                calls: &calls,
                fail: false,
            }))
            .run(&mut ui)
            .unwrap();

        assert_eq!(calls.get(), 0);
        assert!(!summary.plugins_checked);
    }

    #[test]
    fn plugin_failure_is_fatal() {
        let config = BootstrapConfig {
            python: "python3".to_string(),
            ..config()
        };
        let exec = ScriptedExecutor::new()
            .on("conda --version", 0, "conda 23.1.0")
            .on("qiime --version", 0, "q2cli version 2023.2.0")
            .on("qiime info", 0, QIIME_INFO)
            .on("python3 --version", 0, "Python 3.8.16");
        let calls = Cell::new(0);
        let mut ui = MockUI::new();

        let err = Bootstrap::new(&config, &exec)
            .with_plugin_verifier(Box::new(CountingVerifier {
                calls: &calls,
                fail: true,
            }))
            .run(&mut ui)
            .unwrap_err();

        assert!(matches!(err, SetupError::PluginCheckFailed { .. }));
        assert!(!ui.has_success("Everything is A-OK"));
    }

    #[test]
    fn default_verifier_uses_interpreter_with_search_path() {
        let config = BootstrapConfig {
            python: "python3".to_string(),
            ..config()
        };
        let exec = ScriptedExecutor::new()
            .on("conda --version", 0, "conda 23.1.0")
            .on("qiime --version", 0, "q2cli version 2023.2.0")
            .on("qiime info", 0, QIIME_INFO)
            .on("python3 --version", 0, "Python 3.8.16")
            .on("python3 -c", 0, "q2setup: import ok\nq2setup: plugins ok\n");
        let mut ui = MockUI::new();

        let summary = Bootstrap::new(&config, &exec).run(&mut ui).unwrap();

        assert!(summary.plugins_checked);
        let probe = exec
            .calls()
            .into_iter()
            .find(|c| c.args.first().map(String::as_str) == Some("-c"))
            .unwrap();
        assert!(probe.env["PYTHONPATH"].ends_with("/home/tester/conda/lib/python3.8/site-packages"));
    }

    #[test]
    fn dry_run_executes_nothing() {
        let config = config();
        let exec = ScriptedExecutor::new();
        let mut ui = MockUI::new();

        let steps = Bootstrap::new(&config, &exec).dry_run(&mut ui);

        assert_eq!(steps.len(), 7);
        assert!(exec.calls().is_empty());
        assert!(ui.has_message("$ pip install redbiom"));
        assert!(ui.headers()[0].contains("dry-run"));
    }
}
