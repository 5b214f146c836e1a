//! CLI argument definitions.
//!
//! Running with no arguments performs the full bootstrap.

use clap::Parser;
use std::path::PathBuf;

use crate::ui::OutputMode;

/// q2setup - Install QIIME 2 and verify every step.
#[derive(Debug, Parser)]
#[command(name = "q2setup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a YAML plan overriding the built-in defaults
    #[arg(short, long, env = "Q2SETUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show command output for passing steps too
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Print the commands that would run without executing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Output mode selected by `--verbose` / `--quiet`.
    pub fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}
