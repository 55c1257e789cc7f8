//! Configuration schema definitions for ublue-update.
//!
//! This module contains the struct definitions that map to the TOML
//! configuration file format.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default directory holding update scripts.
pub const DEFAULT_SCRIPTS_DIR: &str = "/etc/ublue-update.d";

/// Root configuration structure for ublue-update.toml
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Desktop notification settings
    pub notify: NotifySettings,

    /// Update inhibitor thresholds
    pub checks: CheckSettings,

    /// Update execution settings
    pub update: UpdateSettings,
}

/// `[notify]` section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NotifySettings {
    /// Send desktop notifications over D-Bus
    pub dbus_notify: bool,
}

/// `[checks]` section.
///
/// A threshold left unset disables its check.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CheckSettings {
    /// Refuse to update over a metered connection
    pub network_not_metered: bool,

    /// Minimum battery charge when running on battery power
    pub min_battery_percent: Option<f64>,

    /// Maximum 5-minute CPU load, as a percentage of online CPUs
    pub max_cpu_load_percent: Option<f64>,

    /// Maximum used memory percentage
    pub max_mem_percent: Option<f64>,

    /// Custom check executables, run in order
    pub scripts: Vec<PathBuf>,
}

/// `[update]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpdateSettings {
    /// Directory of update scripts
    pub scripts_dir: PathBuf,

    /// Seconds between package-manager transaction polls
    pub poll_interval_secs: u64,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            scripts_dir: PathBuf::from(DEFAULT_SCRIPTS_DIR),
            poll_interval_secs: 1,
        }
    }
}

impl Config {
    /// Whether desktop notifications are enabled.
    pub fn dbus_notify(&self) -> bool {
        self.notify.dbus_notify
    }

    /// Interval between transaction polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.update.poll_interval_secs)
    }
}
