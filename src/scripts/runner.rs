//! Update script execution.
//!
//! Scripts are independent: a failing script never stops the ones after
//! it. Each failure produces one notification naming the script; the
//! script's output only goes to the log.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::notify::{Notification, NotificationGateway, TITLE};
use crate::scripts::source::ScriptSource;
use crate::shell::Executor;

/// What happened to one script directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutcome {
    /// Path of the entry.
    pub path: PathBuf,
    /// Whether the entry was run (false when it is not executable).
    pub executed: bool,
    /// Exit code; `None` when not run, killed by a signal, or failed to start.
    pub exit_code: Option<i32>,
    /// Combined stdout and stderr, or the start-up error.
    pub output: String,
}

impl ScriptOutcome {
    /// Outcome for an entry that was not executed.
    pub fn skipped(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            executed: false,
            exit_code: None,
            output: String::new(),
        }
    }

    /// Whether this entry counts against the run.
    pub fn failed(&self) -> bool {
        self.executed && self.exit_code != Some(0)
    }

    /// File name for user-facing messages.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Result of running a script directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptReport {
    /// Every entry, in execution order.
    pub outcomes: Vec<ScriptOutcome>,
}

impl ScriptReport {
    /// True when every executed script exited zero.
    pub fn success(&self) -> bool {
        !self.outcomes.iter().any(ScriptOutcome::failed)
    }

    /// Scripts that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ScriptOutcome> {
        self.outcomes.iter().filter(|o| o.failed())
    }

    /// Number of scripts that were executed.
    pub fn executed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.executed).count()
    }
}

/// Runs every executable entry of a [`ScriptSource`].
pub struct ScriptRunner<'a> {
    executor: &'a dyn Executor,
    notifications: &'a NotificationGateway<'a>,
}

impl<'a> ScriptRunner<'a> {
    /// Create a runner.
    pub fn new(executor: &'a dyn Executor, notifications: &'a NotificationGateway<'a>) -> Self {
        Self {
            executor,
            notifications,
        }
    }

    /// Run all scripts and report their outcomes.
    ///
    /// Failing to list the scripts or to deliver a notification is an
    /// error; script failures are recorded in the report.
    pub fn run(&self, source: &dyn ScriptSource) -> Result<ScriptReport> {
        tracing::info!("Running system update");

        let mut outcomes = Vec::new();
        for entry in source.entries()? {
            if !entry.executable {
                tracing::info!("Skipping non-executable file: {}", entry.path.display());
                outcomes.push(ScriptOutcome::skipped(&entry.path));
                continue;
            }

            let outcome = self.run_one(&entry.path);
            if outcome.failed() {
                self.notifications.notify(&Notification::new(
                    TITLE,
                    format!(
                        "Error in update script: {}, check logs for more info",
                        outcome.name()
                    ),
                ))?;
            }
            outcomes.push(outcome);
        }

        let report = ScriptReport { outcomes };
        if report.success() {
            tracing::info!(
                "System update complete ({} scripts run)",
                report.executed_count()
            );
            self.notifications.notify(&Notification::new(
                TITLE,
                "System update complete, reboot for changes to take effect",
            ))?;
        } else {
            let failed: Vec<String> = report.failures().map(ScriptOutcome::name).collect();
            tracing::warn!("System update finished with errors in: {}", failed.join(", "));
        }

        Ok(report)
    }

    fn run_one(&self, path: &Path) -> ScriptOutcome {
        tracing::info!("Running update script: {}", path.display());

        let outcome = match self.executor.execute(path) {
            Ok(result) => ScriptOutcome {
                path: path.to_path_buf(),
                executed: true,
                exit_code: result.exit_code,
                output: result.stdout,
            },
            Err(e) => ScriptOutcome {
                path: path.to_path_buf(),
                executed: true,
                exit_code: None,
                output: e.to_string(),
            },
        };

        if outcome.failed() {
            tracing::info!(
                "{} returned error code: {:?}",
                path.display(),
                outcome.exit_code
            );
            tracing::info!("Program output:\n{}", outcome.output);
        } else {
            tracing::debug!("{} output:\n{}", path.display(), outcome.output);
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpdateError;
    use crate::mock::{MockExecutor, MockScriptSource};
    use crate::notify::RecordingNotifier;

    #[test]
    fn executable_success_and_skipped_file() {
        let source = MockScriptSource::new()
            .script("/etc/ublue-update.d/10-system", true)
            .script("/etc/ublue-update.d/README", false);
        let executor = MockExecutor::new().exits("/etc/ublue-update.d/10-system", 0, "ok");
        let notifier = RecordingNotifier::new();
        let gateway = NotificationGateway::new(&notifier, true);

        let report = ScriptRunner::new(&executor, &gateway).run(&source).unwrap();

        assert!(report.success());
        assert_eq!(report.outcomes.len(), 2);
        assert!(report.outcomes[0].executed);
        assert_eq!(report.outcomes[0].exit_code, Some(0));
        assert_eq!(
            report.outcomes[1],
            ScriptOutcome::skipped(Path::new("/etc/ublue-update.d/README"))
        );
        assert_eq!(
            executor.calls(),
            vec![PathBuf::from("/etc/ublue-update.d/10-system")]
        );
        assert_eq!(
            notifier.bodies(),
            vec!["System update complete, reboot for changes to take effect"]
        );
    }

    #[test]
    fn failing_script_does_not_stop_later_scripts() {
        let source = MockScriptSource::new()
            .script("/d/10-first", true)
            .script("/d/20-second", true);
        let executor = MockExecutor::new()
            .exits("/d/10-first", 1, "boom")
            .exits("/d/20-second", 0, "");
        let notifier = RecordingNotifier::new();
        let gateway = NotificationGateway::new(&notifier, true);

        let report = ScriptRunner::new(&executor, &gateway).run(&source).unwrap();

        assert!(!report.success());
        assert_eq!(
            executor.calls(),
            vec![PathBuf::from("/d/10-first"), PathBuf::from("/d/20-second")]
        );
        assert_eq!(report.outcomes[0].exit_code, Some(1));
        assert_eq!(report.outcomes[0].output, "boom");
        assert_eq!(report.outcomes[1].exit_code, Some(0));
    }

    #[test]
    fn one_notification_per_failure_without_output() {
        let source = MockScriptSource::new()
            .script("/d/10-a", true)
            .script("/d/20-b", true)
            .script("/d/30-c", true);
        let executor = MockExecutor::new()
            .exits("/d/10-a", 2, "secret details")
            .exits("/d/20-b", 0, "")
            .exits("/d/30-c", 127, "more details");
        let notifier = RecordingNotifier::new();
        let gateway = NotificationGateway::new(&notifier, true);

        ScriptRunner::new(&executor, &gateway).run(&source).unwrap();

        assert_eq!(
            notifier.bodies(),
            vec![
                "Error in update script: 10-a, check logs for more info",
                "Error in update script: 30-c, check logs for more info",
            ]
        );
    }

    #[test]
    fn start_failure_counts_as_failure() {
        let source = MockScriptSource::new().script("/d/10-broken", true);
        let executor = MockExecutor::new();
        let notifier = RecordingNotifier::new();
        let gateway = NotificationGateway::new(&notifier, false);

        let report = ScriptRunner::new(&executor, &gateway).run(&source).unwrap();

        assert!(!report.success());
        assert!(report.outcomes[0].executed);
        assert_eq!(report.outcomes[0].exit_code, None);
        assert!(!report.outcomes[0].output.is_empty());
    }

    #[test]
    fn empty_source_is_success() {
        let source = MockScriptSource::new();
        let executor = MockExecutor::new();
        let notifier = RecordingNotifier::new();
        let gateway = NotificationGateway::new(&notifier, false);

        let report = ScriptRunner::new(&executor, &gateway).run(&source).unwrap();

        assert!(report.success());
        assert_eq!(report.executed_count(), 0);
        assert!(notifier.sent().is_empty());
    }

    #[test]
    fn unreachable_notifications_abort_the_run() {
        let source = MockScriptSource::new()
            .script("/d/10-first", true)
            .script("/d/20-second", true);
        let executor = MockExecutor::new()
            .exits("/d/10-first", 1, "boom")
            .exits("/d/20-second", 0, "");
        let notifier = RecordingNotifier::new();
        notifier.set_unreachable();
        let gateway = NotificationGateway::new(&notifier, true);

        let err = ScriptRunner::new(&executor, &gateway)
            .run(&source)
            .unwrap_err();

        assert!(matches!(err, UpdateError::CommandFailed { .. }));
        assert_eq!(executor.calls(), vec![PathBuf::from("/d/10-first")]);
    }

    #[test]
    fn listing_failure_is_error() {
        let source = MockScriptSource::missing("/etc/ublue-update.d");
        let executor = MockExecutor::new();
        let notifier = RecordingNotifier::new();
        let gateway = NotificationGateway::new(&notifier, false);

        assert!(ScriptRunner::new(&executor, &gateway).run(&source).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn runs_real_scripts_from_directory() {
        use crate::scripts::DirectorySource;
        use crate::shell::ProcessExecutor;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        let temp = TempDir::new().unwrap();
        let ok = temp.path().join("10-ok");
        fs::write(&ok, "#!/bin/sh\necho updated\n").unwrap();
        fs::set_permissions(&ok, fs::Permissions::from_mode(0o755)).unwrap();
        let notes = temp.path().join("20-notes.txt");
        fs::write(&notes, "not a script").unwrap();
        fs::set_permissions(&notes, fs::Permissions::from_mode(0o644)).unwrap();

        let notifier = RecordingNotifier::new();
        let gateway = NotificationGateway::new(&notifier, false);
        let report = ScriptRunner::new(&ProcessExecutor, &gateway)
            .run(&DirectorySource::new(temp.path()))
            .unwrap();

        assert!(report.success());
        assert_eq!(report.outcomes[0].output, "updated\n");
        assert!(!report.outcomes[1].executed);
    }
}
