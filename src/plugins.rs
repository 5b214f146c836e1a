//! Plugin verification for the installed toolkit.
//!
//! Whether the interpreter can import QIIME 2 and register its plugins is
//! treated as an opaque capability of the external environment: the checks
//! run as interpreter subprocesses with the distribution's `site-packages`
//! appended to `PYTHONPATH`, and any failure is reported generically.

use std::path::PathBuf;

use crate::error::{Result, SetupError};
use crate::shell::{append_search_path, Executor, Invocation};
use crate::steps::{ProvisionStep, StepRunner};
use crate::ui::UserInterface;

const IMPORT_MARKER: &str = "q2setup: import ok";
const PLUGINS_MARKER: &str = "q2setup: plugins ok";

const IMPORT_SCRIPT: &str = "import qiime2\nprint('q2setup: import ok')\n";

// Registers every entry point in the qiime2.plugins group, then imports one
// generated plugin module to prove registration worked.
const PLUGINS_SCRIPT: &str = r#"
from importlib.metadata import entry_points
import qiime2.sdk

manager = qiime2.sdk.PluginManager(add_plugins=False)
for ep in entry_points()["qiime2.plugins"]:
    project = ep.value.split(":")[0].split(".")[0]
    manager.add_plugin(ep.load(), project, ep.name)

from qiime2.plugins import feature_table
print("q2setup: plugins ok")
"#;

/// Confirms that installed extensions can be listed and loaded.
pub trait PluginVerifier {
    fn verify(&self, ui: &mut dyn UserInterface) -> Result<()>;
}

/// Verifies plugins by running the interpreter as a subprocess.
pub struct InterpreterPluginVerifier<'a> {
    executor: &'a dyn Executor,
    python: String,
    search_dir: PathBuf,
    ambient_pythonpath: Option<String>,
}

impl<'a> InterpreterPluginVerifier<'a> {
    /// `search_dir` is appended to the interpreter's module search path.
    pub fn new(executor: &'a dyn Executor, python: impl Into<String>, search_dir: PathBuf) -> Self {
        Self {
            executor,
            python: python.into(),
            search_dir,
            ambient_pythonpath: std::env::var("PYTHONPATH").ok(),
        }
    }

    /// The `PYTHONPATH` value passed to the interpreter.
    pub fn pythonpath(&self) -> String {
        append_search_path(
            self.ambient_pythonpath.as_deref(),
            &self.search_dir.to_string_lossy(),
        )
    }

    fn probe(&self, name: &str, script: &str, marker: &str) -> ProvisionStep {
        ProvisionStep::new(
            name,
            Invocation::new(self.python.as_str(), ["-c", script]),
            marker,
        )
        .env("PYTHONPATH", self.pythonpath())
    }
}

impl PluginVerifier for InterpreterPluginVerifier<'_> {
    fn verify(&self, ui: &mut dyn UserInterface) -> Result<()> {
        let runner = StepRunner::new(self.executor);
        ui.message(&format!(
            "🔍 Fixed import paths to include QIIME 2 ({}).",
            self.search_dir.display()
        ));

        let import = self
            .probe("qiime2-import", IMPORT_SCRIPT, IMPORT_MARKER)
            .progress("📊 Checking if QIIME 2 import works...")
            .failure("QIIME 2 can not be imported 😭")
            .success("📊 QIIME 2 can be imported 🎉");
        runner
            .run(&import, ui)
            .map_err(|_| SetupError::PluginCheckFailed {
                message: "QIIME 2 can not be imported".to_string(),
            })?;

        let plugins = self
            .probe("qiime2-plugins", PLUGINS_SCRIPT, PLUGINS_MARKER)
            .progress("📊 Setting up QIIME 2 plugins...")
            .failure("Could not add the plugins 😭")
            .success("📊 Plugins are working 🎉");
        runner
            .run(&plugins, ui)
            .map_err(|_| SetupError::PluginCheckFailed {
                message: "Could not add the plugins".to_string(),
            })?;

        Ok(())
    }
}
