//! Configuration loading, parsing, and validation for ublue-update.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use ublue_update::config::{load_config, Config};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("ublue-update.toml");
//! fs::write(&path, "[checks]\nmin_battery_percent = 20.0\n").unwrap();
//!
//! let config = load_config(Some(&path)).unwrap();
//! assert_eq!(config.checks.min_battery_percent, Some(20.0));
//! ```
//!
//! # Configuration File Locations
//!
//! Without `--config`, the first existing file is used:
//! 1. `/etc/ublue-update/ublue-update.toml`
//! 2. `/usr/etc/ublue-update/ublue-update.toml`

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    find_config_in, find_default_config_file, load_config, load_config_file, parse_config,
    DEFAULT_CONFIG_PATHS,
};
pub use schema::{CheckSettings, Config, NotifySettings, UpdateSettings, DEFAULT_SCRIPTS_DIR};
pub use validator::validate;
