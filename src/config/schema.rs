//! Configuration schema for the bootstrap plan.
//!
//! Every field has a default, so a YAML file only needs to name the values
//! it changes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder replaced by [`BootstrapConfig::qiime_release`] in channel URLs.
pub const RELEASE_PLACEHOLDER: &str = "{release}";

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// URL of the Miniconda installer script.
    pub miniconda_url: String,

    /// Where the base distribution is installed.
    pub install_prefix: PathBuf,

    /// QIIME 2 release to install, e.g. `2023.2`.
    pub qiime_release: String,

    /// Channels passed to mamba in order. `{release}` is expanded.
    pub channels: Vec<String>,

    /// Packages installed alongside `qiime2=<release>`.
    pub packages: Vec<String>,

    /// Auxiliary libraries installed with pip after the toolkit.
    pub pip_packages: Vec<PipPackage>,

    /// Interpreter version (`major.minor`) that gets the plugin check.
    pub python_version: String,

    /// Interpreter used for the version probe and plugin check.
    pub python: String,

    /// Markers that signal a tool is already installed.
    pub probes: ProbeMarkers,
}

/// A pip-installed auxiliary library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipPackage {
    /// Requirement passed to `pip install`.
    pub name: String,

    /// Output marker for a successful install.
    #[serde(default = "default_pip_marker")]
    pub marker: String,

    /// Accept a non-zero pip exit status when the marker is present.
    #[serde(default, skip_serializing_if = "is_false")]
    pub lenient: bool,
}

/// Output markers searched for in `<tool> --version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeMarkers {
    pub conda: String,
    pub mamba: String,
    pub qiime: String,
}

impl Default for ProbeMarkers {
    fn default() -> Self {
        Self {
            conda: "conda ".to_string(),
            mamba: "mamba ".to_string(),
            qiime: "q2cli version".to_string(),
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            miniconda_url:
                "https://repo.anaconda.com/miniconda/Miniconda3-latest-Linux-x86_64.sh".to_string(),
            install_prefix: PathBuf::from("/usr/local"),
            qiime_release: "2023.2".to_string(),
            channels: to_strings(&[
                "conda-forge",
                "bioconda",
                "qiime2",
                "https://packages.qiime2.org/qiime2/{release}/tested/",
                "defaults",
            ]),
            packages: to_strings(&[
                "q2cli",
                "q2templates",
                "q2-alignment",
                "q2-composition",
                "q2-cutadapt",
                "q2-dada2",
                "q2-demux",
                "q2-deblur",
                "q2-diversity",
                "q2-diversity-lib",
                "q2-emperor",
                "q2-feature-classifier",
                "q2-feature-table",
                "q2-fragment-insertion",
                "q2-gneiss",
                "q2-longitudinal",
                "q2-metadata",
                "q2-mystery-stew",
                "q2-phylogeny",
                "q2-quality-control",
                "q2-quality-filter",
                "q2-sample-classifier",
                "q2-taxa",
                "q2-vsearch",
                "pandas<2",
                "ipykernel",
            ]),
            pip_packages: vec![
                PipPackage {
                    name: "redbiom".to_string(),
                    marker: default_pip_marker(),
                    lenient: false,
                },
                PipPackage {
                    name: "empress".to_string(),
                    marker: "Successfully installed empress-".to_string(),
                    lenient: false,
                },
            ],
            python_version: "3.8".to_string(),
            python: "python3".to_string(),
            probes: ProbeMarkers::default(),
        }
    }
}

impl BootstrapConfig {
    /// File name of the downloaded installer (last URL segment).
    pub fn installer_name(&self) -> &str {
        self.miniconda_url
            .rsplit('/')
            .next()
            .unwrap_or(&self.miniconda_url)
    }

    /// Channels with `{release}` expanded.
    pub fn resolved_channels(&self) -> Vec<String> {
        self.channels
            .iter()
            .map(|c| c.replace(RELEASE_PLACEHOLDER, &self.qiime_release))
            .collect()
    }

    /// `site-packages` directory of the installed distribution for the
    /// gated interpreter version.
    pub fn site_packages(&self) -> PathBuf {
        self.install_prefix
            .join("lib")
            .join(format!("python{}", self.python_version))
            .join("site-packages")
    }
}

fn default_pip_marker() -> String {
    "Successfully installed".to_string()
}

fn is_false(b: &bool) -> bool {
    !b
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
