//! Interpreter version detection.

use regex::Regex;
use std::sync::LazyLock;

use crate::shell::{probe_output, Executor, Invocation};

static PYTHON_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Python\s+(\d+)\.(\d+)").expect("valid regex"));

/// Extract `major.minor` from `python --version` output.
pub fn parse_python_version(output: &str) -> Option<String> {
    let caps = PYTHON_VERSION.captures(output)?;
    Some(format!("{}.{}", &caps[1], &caps[2]))
}

/// Ask `python` for its version. `None` if it is missing or unparsable.
pub fn python_version(executor: &dyn Executor, python: &str) -> Option<String> {
    let output = probe_output(executor, &Invocation::new(python, ["--version"]));
    let version = parse_python_version(&output);
    tracing::debug!(%python, ?version, "probed interpreter");
    version
}
