//! Desktop notifications through `notify-send`.

use std::path::Path;

use crate::error::Result;
use crate::notify::session::{active_sessions, runtime_dir, UserSession};
use crate::notify::{Notification, Notifier};
use crate::shell::{display_command, execute, is_elevated, CommandOptions};

const APP_NAME: &str = "Universal Blue Updater";
const ICON: &str = "software-update-available-symbolic";

/// Sends notifications with `notify-send`.
///
/// As root, every active graphical session gets its own notification,
/// sent as that user onto their session bus (see [`deliver_to_sessions`]).
/// Otherwise the notification goes to the caller's own session.
///
/// A `notify-send` that runs but exits non-zero is logged and treated as
/// "no answer". Failing to start it, or to look up sessions, is an error.
#[derive(Debug, Clone, Copy)]
pub struct DesktopNotifier {
    via_sessions: bool,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopNotifier {
    /// Create a notifier, delivering through user sessions when running as root.
    pub fn new() -> Self {
        Self {
            via_sessions: is_elevated(),
        }
    }

    fn send_to_session(&self, session: &UserSession, args: &[String]) -> Result<Option<String>> {
        let runtime = runtime_dir(session.uid)?;
        let mut sudo_args = vec![
            "-u".to_string(),
            session.user.clone(),
            "env".to_string(),
            format!(
                "DBUS_SESSION_BUS_ADDRESS={}",
                UserSession::bus_address(&runtime)
            ),
            format!("XDG_RUNTIME_DIR={}", runtime.display()),
            "notify-send".to_string(),
        ];
        sudo_args.extend_from_slice(args);
        run_notify(Path::new("sudo"), sudo_args)
    }
}

impl Notifier for DesktopNotifier {
    fn send(&self, notification: &Notification) -> Result<Option<String>> {
        let args = notify_send_args(notification);

        if !self.via_sessions {
            return run_notify(Path::new("notify-send"), args);
        }

        let sessions = active_sessions()?;
        deliver_to_sessions(&sessions, notification.is_interactive(), |session| {
            self.send_to_session(session, &args)
        })
    }
}

/// Deliver a notification to each session in turn.
///
/// One-way notifications reach every session even when some fail; the
/// first failure is returned once all sessions were tried.
///
/// Interactive notifications are shown one session at a time, since
/// `notify-send --action` blocks until that user responds or the prompt
/// is dismissed. A later session only sees the prompt after the earlier
/// ones closed it without answering. The first answer ends delivery.
pub fn deliver_to_sessions<F>(
    sessions: &[UserSession],
    interactive: bool,
    mut send: F,
) -> Result<Option<String>>
where
    F: FnMut(&UserSession) -> Result<Option<String>>,
{
    let mut first_error = None;

    for session in sessions {
        tracing::debug!("Notifying {} (session {})", session.user, session.id);
        match send(session) {
            Ok(Some(answer)) if interactive => return Ok(Some(answer)),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Failed to notify {}: {}", session.user, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(None),
    }
}

/// Build the `notify-send` argument list for a notification.
pub fn notify_send_args(notification: &Notification) -> Vec<String> {
    let mut args = vec![
        notification.title.clone(),
        notification.body.clone(),
        format!("--app-name={}", APP_NAME),
        format!("--icon={}", ICON),
        format!("--urgency={}", notification.urgency),
    ];
    for action in &notification.actions {
        args.push(format!("--action={}", action));
    }
    args
}

fn run_notify(program: &Path, args: Vec<String>) -> Result<Option<String>> {
    let options = CommandOptions {
        args,
        ..Default::default()
    };
    let result = execute(program, &options)?;
    if !result.success {
        tracing::warn!(
            "{} exited with {:?}: {}",
            display_command(program, &options.args),
            result.exit_code,
            result.stderr.trim()
        );
        return Ok(None);
    }

    let answer = result.stdout.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpdateError;
    use crate::notify::Urgency;

    fn sessions(users: &[&str]) -> Vec<UserSession> {
        users
            .iter()
            .enumerate()
            .map(|(i, user)| UserSession {
                id: (i + 1).to_string(),
                uid: 1000 + i as u32,
                user: user.to_string(),
            })
            .collect()
    }

    fn unreachable(session: &UserSession) -> UpdateError {
        UpdateError::CommandFailed {
            command: format!("sudo -u {} notify-send", session.user),
            code: None,
        }
    }

    #[test]
    fn one_way_reaches_every_session_despite_failure() {
        let mut reached = Vec::new();
        let result = deliver_to_sessions(&sessions(&["alice", "bob", "carol"]), false, |s| {
            reached.push(s.user.clone());
            if s.user == "alice" {
                Err(unreachable(s))
            } else {
                Ok(None)
            }
        });

        assert_eq!(reached, vec!["alice", "bob", "carol"]);
        assert!(matches!(result, Err(UpdateError::CommandFailed { .. })));
    }

    #[test]
    fn one_way_success_has_no_answer() {
        let result = deliver_to_sessions(&sessions(&["alice", "bob"]), false, |_| Ok(None));
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn interactive_stops_at_first_answer() {
        let mut reached = Vec::new();
        let result = deliver_to_sessions(&sessions(&["alice", "bob", "carol"]), true, |s| {
            reached.push(s.user.clone());
            Ok((s.user == "bob").then(|| "confirm".to_string()))
        });

        assert_eq!(result.unwrap().as_deref(), Some("confirm"));
        assert_eq!(reached, vec!["alice", "bob"]);
    }

    #[test]
    fn interactive_answer_wins_over_earlier_failure() {
        let result = deliver_to_sessions(&sessions(&["alice", "bob"]), true, |s| {
            if s.user == "alice" {
                Err(unreachable(s))
            } else {
                Ok(Some("confirm".to_string()))
            }
        });
        assert_eq!(result.unwrap().as_deref(), Some("confirm"));
    }

    #[test]
    fn no_sessions_is_no_answer() {
        let result = deliver_to_sessions(&[], true, |s| Err(unreachable(s)));
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn missing_notify_send_is_an_error() {
        let err = run_notify(
            Path::new("definitely-not-notify-send-xyz"),
            vec!["title".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, UpdateError::CommandFailed { code: None, .. }));
    }

    #[test]
    fn one_way_notification_args() {
        let n = Notification::new("System Updater", "System passed checks, updating ...");
        let args = notify_send_args(&n);
        assert_eq!(
            args,
            vec![
                "System Updater",
                "System passed checks, updating ...",
                "--app-name=Universal Blue Updater",
                "--icon=software-update-available-symbolic",
                "--urgency=normal",
            ]
        );
    }

    #[test]
    fn interactive_notification_args() {
        let n = Notification::new("System Updater", "Update now?")
            .with_action("universal-blue-update-confirm=Confirm")
            .with_urgency(Urgency::Critical);
        let args = notify_send_args(&n);
        assert!(args.contains(&"--urgency=critical".to_string()));
        assert_eq!(
            args.last().unwrap(),
            "--action=universal-blue-update-confirm=Confirm"
        );
    }
}
