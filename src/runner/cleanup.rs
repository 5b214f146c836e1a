//! Private scratch space for the downloaded installer.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tempfile::TempDir;

use crate::error::Result;

/// A fresh directory that holds the Miniconda installer for one run.
///
/// The directory and everything in it is removed when this value is
/// dropped, including on early returns after a failed step. Nothing
/// outside it is ever touched.
#[derive(Debug)]
pub struct DownloadDir {
    dir: TempDir,
    installer: PathBuf,
}

impl DownloadDir {
    /// Create a new directory in the system temp location.
    pub fn create(installer_name: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("q2setup-")
            .tempdir()
            .context("could not create a download directory")?;
        let installer = dir.path().join(installer_name);
        tracing::debug!(path = %dir.path().display(), "created download directory");
        Ok(Self { dir, installer })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the installer is saved.
    pub fn installer(&self) -> &Path {
        &self.installer
    }

    /// Remove the directory now, reporting failures.
    ///
    /// Dropping without calling this still removes it, but errors are lost.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            tracing::warn!(path = %path.display(), error = %e, "could not remove download directory");
        }
    }
}
