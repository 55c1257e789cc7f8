//! Active graphical login sessions, as reported by systemd-logind.
//!
//! The updater normally runs as a root system service, so desktop
//! notifications have to be delivered into each user's session bus.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{Result, UpdateError};
use crate::shell::execute_tool;

/// A graphical session that can receive notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    /// logind session id.
    pub id: String,
    /// Numeric user id.
    pub uid: u32,
    /// Login name.
    pub user: String,
}

impl UserSession {
    /// Session bus address for this user, given their runtime directory.
    pub fn bus_address(runtime_dir: &std::path::Path) -> String {
        format!("unix:path={}", runtime_dir.join("bus").display())
    }
}

#[derive(Debug, Deserialize)]
struct SessionEntry {
    session: String,
    uid: u32,
    user: String,
}

/// List active graphical sessions.
pub fn active_sessions() -> Result<Vec<UserSession>> {
    let listing = run_loginctl(&["list-sessions", "--output=json"])?;
    let mut sessions = Vec::new();

    for entry in parse_session_list(&listing)? {
        let properties = run_loginctl(&[
            "show-session",
            &entry.id,
            "--property=Active",
            "--property=Type",
        ])?;
        if is_graphical_and_active(&parse_properties(&properties)) {
            sessions.push(entry);
        }
    }

    Ok(sessions)
}

/// The user's `XDG_RUNTIME_DIR`, e.g. `/run/user/1000`.
pub fn runtime_dir(uid: u32) -> Result<PathBuf> {
    let uid = uid.to_string();
    let output = run_loginctl(&["show-user", &uid, "--property=RuntimePath", "--value"])?;
    let path = output.trim();
    if path.is_empty() {
        return Err(UpdateError::UnexpectedOutput {
            command: format!("loginctl show-user {}", uid),
            message: "empty RuntimePath".to_string(),
        });
    }
    Ok(PathBuf::from(path))
}

/// Parse `loginctl list-sessions --output=json`.
pub fn parse_session_list(json: &str) -> Result<Vec<UserSession>> {
    let entries: Vec<SessionEntry> =
        serde_json::from_str(json).map_err(|e| UpdateError::UnexpectedOutput {
            command: "loginctl list-sessions --output=json".to_string(),
            message: e.to_string(),
        })?;

    Ok(entries
        .into_iter()
        .map(|e| UserSession {
            id: e.session,
            uid: e.uid,
            user: e.user,
        })
        .collect())
}

/// Parse `Key=Value` lines from `loginctl show-*`.
pub fn parse_properties(output: &str) -> HashMap<String, String> {
    output
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

/// Whether session properties describe an active X11 or Wayland session.
pub fn is_graphical_and_active(properties: &HashMap<String, String>) -> bool {
    let active = properties.get("Active").map(String::as_str) == Some("yes");
    let graphical = matches!(
        properties.get("Type").map(String::as_str),
        Some("x11") | Some("wayland")
    );
    active && graphical
}

fn run_loginctl(args: &[&str]) -> Result<String> {
    let result = execute_tool("loginctl", args)?;
    if !result.success {
        return Err(UpdateError::CommandFailed {
            command: format!("loginctl {}", args.join(" ")),
            code: result.exit_code,
        });
    }
    Ok(result.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_session_list() {
        let json = r#"[
            {"session":"2","uid":1000,"user":"alice","seat":"seat0","tty":"tty2"},
            {"session":"c1","uid":42,"user":"gdm","seat":"seat0","tty":"tty1","state":"online"}
        ]"#;
        let sessions = parse_session_list(json).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(
            sessions[0],
            UserSession {
                id: "2".into(),
                uid: 1000,
                user: "alice".into()
            }
        );
    }

    #[test]
    fn empty_session_list() {
        assert!(parse_session_list("[]").unwrap().is_empty());
    }

    #[test]
    fn malformed_session_list_is_error() {
        assert!(parse_session_list("No sessions.").is_err());
    }

    #[test]
    fn graphical_active_session_is_selected() {
        let props = parse_properties("Active=yes\nType=wayland\n");
        assert!(is_graphical_and_active(&props));
    }

    #[test]
    fn tty_and_inactive_sessions_are_skipped() {
        assert!(!is_graphical_and_active(&parse_properties(
            "Active=yes\nType=tty\n"
        )));
        assert!(!is_graphical_and_active(&parse_properties(
            "Active=no\nType=x11\n"
        )));
        assert!(!is_graphical_and_active(&parse_properties("")));
    }

    #[test]
    fn bus_address_points_into_runtime_dir() {
        let address = UserSession::bus_address(std::path::Path::new("/run/user/1000"));
        assert_eq!(address, "unix:path=/run/user/1000/bus");
    }
}
