//! The update decision flow.
//!
//! [`UpdateEngine::run`] composes the inhibitor evaluator, the
//! transaction barrier and the script runner into the behavior of each
//! [`RunMode`]. It never exits the process: every path ends in a
//! [`RunOutcome`] (or a collaborator error) that the CLI dispatcher turns
//! into an exit code.

use std::time::Duration;

use crate::config::Config;
use crate::engine::mode::RunMode;
use crate::error::Result;
use crate::inhibitors::{InhibitorEvaluator, InhibitorResult, SystemProbe};
use crate::notify::{Notification, NotificationGateway, Notifier, Urgency, TITLE};
use crate::scripts::{ScriptOutcome, ScriptRunner, ScriptSource};
use crate::shell::Executor;
use crate::transaction::{PackageManager, TransactionBarrier};

/// Action key of the "update now" button.
pub const CONFIRM_ACTION: &str = "universal-blue-update-confirm";

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing failed.
    Completed,
    /// Inhibitor checks failed; carries the reasons in check order.
    InhibitorFailure(Vec<String>),
    /// At least one update script failed; carries every outcome.
    ScriptFailure(Vec<ScriptOutcome>),
    /// An update check found nothing to install.
    UpdateUnavailable,
}

impl RunOutcome {
    /// Whether the run should be reported as a success.
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }
}

/// Drives one invocation of the updater.
pub struct UpdateEngine<'a> {
    config: &'a Config,
    probe: &'a dyn SystemProbe,
    package_manager: &'a dyn PackageManager,
    scripts: &'a dyn ScriptSource,
    executor: &'a dyn Executor,
    notifications: NotificationGateway<'a>,
    wait_timeout: Option<Duration>,
}

impl<'a> UpdateEngine<'a> {
    /// Create an engine over its collaborators.
    ///
    /// Notifications are enabled according to `config.notify.dbus_notify`.
    pub fn new(
        config: &'a Config,
        probe: &'a dyn SystemProbe,
        package_manager: &'a dyn PackageManager,
        scripts: &'a dyn ScriptSource,
        executor: &'a dyn Executor,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            config,
            probe,
            package_manager,
            scripts,
            executor,
            notifications: NotificationGateway::new(notifier, config.dbus_notify()),
            wait_timeout: None,
        }
    }

    /// Bound every transaction wait by `timeout`.
    pub fn with_wait_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Run the flow for `mode`.
    pub fn run(&self, mode: RunMode) -> Result<RunOutcome> {
        tracing::debug!("Running in {} mode", mode);

        match mode {
            RunMode::WaitOnly => {
                self.wait_for_transactions()?;
                Ok(RunOutcome::Completed)
            }
            RunMode::Force => self.run_updates(),
            RunMode::UpdateCheckOnly => {
                if self.package_manager.updates_available()? {
                    tracing::info!("Update available");
                    Ok(RunOutcome::Completed)
                } else {
                    tracing::info!("No updates are available");
                    Ok(RunOutcome::UpdateUnavailable)
                }
            }
            RunMode::CheckOnly => {
                let result = self.evaluate();
                if result.passed() {
                    tracing::info!("System passed all update checks");
                } else {
                    self.offer_override(false)?;
                }
                Ok(RunOutcome::Completed)
            }
            RunMode::Normal => {
                let result = self.evaluate();
                if !result.passed() {
                    self.offer_override(true)?;
                    return Ok(RunOutcome::InhibitorFailure(result.into_failures()));
                }

                tracing::info!("System passed all update checks");
                self.notifications
                    .notify(&Notification::new(TITLE, "System passed checks, updating ..."))?;
                self.run_updates()
            }
        }
    }

    fn evaluate(&self) -> InhibitorResult {
        InhibitorEvaluator::new(self.probe, self.executor).evaluate(self.config)
    }

    fn wait_for_transactions(&self) -> Result<()> {
        TransactionBarrier::new(self.package_manager, self.config.poll_interval())
            .with_timeout(self.wait_timeout)
            .wait()
    }

    /// Wait for transactions, then run every update script.
    fn run_updates(&self) -> Result<RunOutcome> {
        self.wait_for_transactions()?;

        let report = ScriptRunner::new(self.executor, &self.notifications).run(self.scripts)?;
        if report.success() {
            Ok(RunOutcome::Completed)
        } else {
            Ok(RunOutcome::ScriptFailure(report.outcomes))
        }
    }

    /// Offer a manual update after failed checks.
    ///
    /// Only runs with notifications enabled. When `interactive` is false
    /// the update check is logged but no button is offered. Notification
    /// and forced-run errors are returned; a failed update check is not.
    fn offer_override(&self, interactive: bool) -> Result<()> {
        if !self.notifications.is_enabled() {
            return Ok(());
        }

        let available = match self.package_manager.updates_available() {
            Ok(available) => available,
            Err(e) => {
                tracing::warn!("Could not check for updates: {}", e);
                false
            }
        };
        if !available {
            tracing::info!("No updates are available");
            return Ok(());
        }

        tracing::info!("Hardware checks failed, but update is available");
        if !interactive {
            return Ok(());
        }

        let answer = self.notifications.notify(
            &Notification::new(
                TITLE,
                "Update available, but system checks failed. Update now?",
            )
            .with_action(format!("{}=Confirm", CONFIRM_ACTION))
            .with_urgency(Urgency::Critical),
        )?;

        if answer.as_deref() != Some(CONFIRM_ACTION) {
            tracing::debug!("Manual update not confirmed");
            return Ok(());
        }

        tracing::info!("Manual update confirmed, skipping update checks");
        if self.run_updates()?.is_success() {
            tracing::info!("Manual update finished");
        } else {
            tracing::warn!("Manual update finished with script errors");
        }
        Ok(())
    }
}
