//! The provisioning steps of the bootstrap, built from configuration.

use std::path::Path;

use crate::config::{BootstrapConfig, PipPackage};
use crate::shell::Invocation;
use crate::steps::ProvisionStep;

/// Marker mamba prints once all packages are unpacked.
pub const MAMBA_EXTRACT_MARKER: &str = "Extracting Packages: ...working... done";

/// Marker `qiime info` prints when the command line works.
pub const QIIME_INFO_MARKER: &str = "QIIME 2 release:";

/// Download the Miniconda installer to `dest`, replacing any file there.
pub fn download_miniconda(config: &BootstrapConfig, dest: &Path) -> ProvisionStep {
    let dest = dest.to_string_lossy().into_owned();
    ProvisionStep::new(
        "download-miniconda",
        Invocation::new("wget", ["-O", dest.as_str(), config.miniconda_url.as_str()]),
        "saved",
    )
    .progress("🐍 Downloading miniconda...")
    .failure("failed downloading miniconda 😭")
    .success("🐍 Done.")
}

/// Run the installer in batch mode into the install prefix.
pub fn install_miniconda(config: &BootstrapConfig, installer: &Path) -> ProvisionStep {
    let prefix = config.install_prefix.to_string_lossy().into_owned();
    let installer = installer.to_string_lossy().into_owned();
    ProvisionStep::new(
        "install-miniconda",
        Invocation::new("bash", [installer.as_str(), "-bfp", prefix.as_str()]),
        "installation finished.",
    )
    .progress("🐍 Installing miniconda...")
    .failure("could not install miniconda 😭")
    .success(format!("🐍 Installed miniconda to `{}` 🐍", prefix))
}

/// Install mamba into the base environment.
pub fn install_mamba() -> ProvisionStep {
    ProvisionStep::new(
        "install-mamba",
        Invocation::new(
            "conda",
            ["install", "mamba", "-y", "-n", "base", "-c", "conda-forge"],
        ),
        "mamba",
    )
    .progress("🔍 Installing mamba...")
    .failure("could not install mamba 😭")
    .success("🔍 Done.")
}

/// Install the toolkit and its plugins with mamba.
pub fn install_qiime(config: &BootstrapConfig) -> ProvisionStep {
    let mut args: Vec<String> = ["install", "-n", "base", "-y"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for channel in config.resolved_channels() {
        args.push("-c".to_string());
        args.push(channel);
    }
    args.push(format!("qiime2={}", config.qiime_release));
    args.extend(config.packages.iter().cloned());

    ProvisionStep::new("install-qiime2", Invocation::new("mamba", args), MAMBA_EXTRACT_MARKER)
        .progress("🔍 Installing QIIME 2. This may take a little bit.\n 🕐")
        .failure("could not install QIIME 2 😭")
        .success("🔍 Done.")
}

/// Install one auxiliary library with pip.
pub fn install_pip_package(pkg: &PipPackage) -> ProvisionStep {
    let step = ProvisionStep::new(
        format!("install-{}", pkg.name),
        Invocation::new("pip", ["install", pkg.name.as_str()]),
        pkg.marker.as_str(),
    )
    .progress(format!("🔍 Installing {}. This may take a little bit.\n 🕐", pkg.name))
    .failure(format!("could not install {} 😭", pkg.name))
    .success("🔍 Done.");

    if pkg.lenient {
        step.lenient()
    } else {
        step
    }
}

/// Check that the installed command line works.
pub fn smoke_test_qiime() -> ProvisionStep {
    ProvisionStep::new(
        "qiime-info",
        Invocation::new("qiime", ["info"]),
        QIIME_INFO_MARKER,
    )
    .progress("📊 Checking that QIIME 2 command line works...")
    .failure("QIIME 2 command line does not seem to work 😭")
    .success("📊 QIIME 2 command line looks good 🎉")
}

/// Every step in order, as run on a bare host, downloading into `download_dir`.
pub fn full_plan(config: &BootstrapConfig, download_dir: &Path) -> Vec<ProvisionStep> {
    let installer = download_dir.join(config.installer_name());
    let mut steps = vec![
        download_miniconda(config, &installer),
        install_miniconda(config, &installer),
        install_mamba(),
        install_qiime(config),
    ];
    steps.extend(config.pip_packages.iter().map(install_pip_package));
    steps.push(smoke_test_qiime());
    steps
}
