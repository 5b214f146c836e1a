//! Provisioning steps and their run-and-verify execution.
//!
//! - [`ProvisionStep`] - A command plus its success marker and messages
//! - [`StepRunner`] - Runs a step and classifies the result
//! - [`classify`] - Pure success classification over captured output
//!
//! # Example
//!
//! ```no_run
//! use q2setup::shell::{Invocation, SystemExecutor};
//! use q2setup::steps::{ProvisionStep, StepRunner};
//! use q2setup::ui::{create_ui, OutputMode};
//!
//! let step = ProvisionStep::new("qiime", Invocation::new("qiime", ["info"]), "QIIME 2 release:")
//!     .progress("Checking that QIIME 2 command line works...")
//!     .failure("QIIME 2 command line does not seem to work")
//!     .success("QIIME 2 command line looks good");
//!
//! let mut ui = create_ui(false, OutputMode::Normal);
//! let runner = StepRunner::new(&SystemExecutor);
//! if let Err(e) = runner.run(&step, ui.as_mut()) {
//!     eprintln!("{}", e);
//! }
//! ```

pub mod check;
pub mod runner;
pub mod step;

pub use check::{classify, ContainsMarker, OutputCheck, Verdict};
pub use runner::StepRunner;
pub use step::ProvisionStep;
