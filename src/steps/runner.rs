//! Run-and-verify execution of a single provisioning step.

use crate::error::{Result, SetupError};
use crate::shell::{CommandOutput, Executor};
use crate::steps::check::{classify, Verdict};
use crate::steps::step::ProvisionStep;
use crate::ui::UserInterface;

/// Runs provisioning steps and reports their outcome through the UI.
///
/// A failed step is returned as [`SetupError::StepFailed`]; deciding whether
/// to abort is left to the caller.
pub struct StepRunner<'a> {
    executor: &'a dyn Executor,
}

impl<'a> StepRunner<'a> {
    pub fn new(executor: &'a dyn Executor) -> Self {
        Self { executor }
    }

    /// Run one step: announce it, execute it, classify its output.
    pub fn run(&self, step: &ProvisionStep, ui: &mut dyn UserInterface) -> Result<CommandOutput> {
        tracing::info!(step = %step.name, command = %step.invocation, "starting step");
        let mut spinner = ui.start_spinner(&step.progress);

        let output = match self.executor.execute(&step.invocation) {
            Ok(output) => output,
            Err(e) => {
                spinner.finish_error(&step.failure);
                let diagnostic = format!("could not run '{}': {}", step.invocation.program, e);
                ui.show_error_block(&step.invocation.to_string(), &diagnostic);
                return Err(SetupError::StepFailed {
                    step: step.name.clone(),
                    message: step.failure.clone(),
                    output: diagnostic,
                });
            }
        };

        let verdict = classify(&output, &step.check, step.check_returncode);
        match verdict {
            Verdict::Passed => {
                spinner.finish_success(&step.success);
                if ui.output_mode().shows_command_output() {
                    ui.show_command_output(&output.combined);
                }
                tracing::debug!(step = %step.name, "step passed");
                Ok(output)
            }
            failed => {
                let reason = failed.reason(&step.check);
                tracing::warn!(step = %step.name, %reason, "step failed");
                spinner.finish_error(&step.failure);
                ui.show_error_block(&step.invocation.to_string(), &output.combined);
                Err(SetupError::StepFailed {
                    step: step.name.clone(),
                    message: format!("{} ({})", step.failure, reason),
                    output: output.combined,
                })
            }
        }
    }
}
