//! rpm-ostree backed package manager.

use serde::Deserialize;

use crate::error::{Result, UpdateError};
use crate::shell::execute_tool;
use crate::transaction::PackageManager;

/// Exit status `rpm-ostree upgrade --check` uses for "no updates".
const NO_UPDATES_EXIT_CODE: i32 = 77;

/// The fields of `rpm-ostree status --json` we care about.
#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    transaction: Option<serde_json::Value>,
}

/// Talks to the rpm-ostree daemon through its CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct RpmOstree;

impl RpmOstree {
    /// Create a new rpm-ostree client.
    pub fn new() -> Self {
        Self
    }
}

impl PackageManager for RpmOstree {
    fn active_transaction(&self) -> Result<Option<String>> {
        let result = execute_tool("rpm-ostree", &["status", "--json"])?;
        if !result.success {
            tracing::debug!("rpm-ostree status stderr: {}", result.stderr.trim());
            return Err(UpdateError::CommandFailed {
                command: "rpm-ostree status --json".to_string(),
                code: result.exit_code,
            });
        }
        parse_transaction(&result.stdout)
    }

    fn updates_available(&self) -> Result<bool> {
        let result = execute_tool("rpm-ostree", &["upgrade", "--check"])?;
        tracing::debug!("rpm-ostree upgrade --check: {}", result.stdout.trim());
        match result.exit_code {
            Some(0) => Ok(true),
            Some(NO_UPDATES_EXIT_CODE) => Ok(false),
            code => {
                tracing::debug!("rpm-ostree upgrade --check stderr: {}", result.stderr.trim());
                Err(UpdateError::CommandFailed {
                    command: "rpm-ostree upgrade --check".to_string(),
                    code,
                })
            }
        }
    }
}

/// Extract the in-flight transaction from `rpm-ostree status --json`.
///
/// The daemon reports `"transaction": null` when idle; otherwise an array
/// whose first element names the operation (e.g. `"upgrade"`).
pub fn parse_transaction(json: &str) -> Result<Option<String>> {
    let status: Status =
        serde_json::from_str(json).map_err(|e| UpdateError::UnexpectedOutput {
            command: "rpm-ostree status --json".to_string(),
            message: e.to_string(),
        })?;

    Ok(match status.transaction {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::Array(parts)) => Some(
            parts
                .iter()
                .filter_map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        ),
        Some(other) => Some(other.to_string()),
    })
}
