//! Command dispatching.
//!
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing the parsed CLI to the engine
//!
//! This is the only place a [`RunOutcome`] becomes an exit code.

use crate::cli::args::Cli;
use crate::engine::{RunOutcome, UpdateEngine};
use crate::error::Result;

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

impl From<&RunOutcome> for CommandResult {
    fn from(outcome: &RunOutcome) -> Self {
        if outcome.is_success() {
            CommandResult::success()
        } else {
            CommandResult::failure(1)
        }
    }
}

/// Dispatches the parsed CLI to the update engine.
pub struct CommandDispatcher<'a> {
    engine: &'a UpdateEngine<'a>,
}

impl<'a> CommandDispatcher<'a> {
    /// Create a dispatcher over a configured engine.
    pub fn new(engine: &'a UpdateEngine<'a>) -> Self {
        Self { engine }
    }

    /// Run the mode selected by `cli` and report the outcome.
    pub fn dispatch(&self, cli: &Cli) -> Result<CommandResult> {
        let outcome = self.engine.run(cli.run_mode())?;
        report(&outcome);
        Ok(CommandResult::from(&outcome))
    }
}

fn report(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Completed => {}
        RunOutcome::InhibitorFailure(reasons) => {
            let list: String = reasons.iter().map(|r| format!("\n - {}", r)).collect();
            tracing::error!("update failed to pass checks:{}", list);
        }
        RunOutcome::ScriptFailure(outcomes) => {
            for outcome in outcomes.iter().filter(|o| o.failed()) {
                match outcome.exit_code {
                    Some(code) => tracing::error!(
                        "Update script {} failed with exit code {}",
                        outcome.path.display(),
                        code
                    ),
                    None => tracing::error!(
                        "Update script {} could not be started",
                        outcome.path.display()
                    ),
                }
            }
        }
        RunOutcome::UpdateUnavailable => tracing::info!("Update not available"),
    }
}
