//! ublue-update - Update orchestrator for immutable desktop images.
//!
//! Decides whether a system update may run right now, waits for any
//! in-flight package-manager transaction, then runs the update scripts
//! in a drop-in directory and reports the outcome through desktop
//! notifications and logs.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and exit-code mapping
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`engine`] - Run modes and the update decision flow
//! - [`error`] - Error types and result aliases
//! - [`inhibitors`] - System condition checks that block an update
//! - [`mock`] - In-memory collaborators for tests
//! - [`notify`] - Desktop notifications
//! - [`scripts`] - Update script discovery and execution
//! - [`shell`] - Process execution
//! - [`transaction`] - Package-manager transaction state
//!
//! # Example
//!
//! ```
//! use ublue_update::config::Config;
//! use ublue_update::engine::{RunMode, RunOutcome, UpdateEngine};
//! use ublue_update::mock::{MockExecutor, MockPackageManager, MockProbe, MockScriptSource};
//! use ublue_update::notify::RecordingNotifier;
//!
//! let mut config = Config::default();
//! config.checks.min_battery_percent = Some(20.0);
//!
//! let probe = MockProbe::new().on_battery(15.0);
//! let package_manager = MockPackageManager::new();
//! let scripts = MockScriptSource::new();
//! let executor = MockExecutor::new();
//! let notifier = RecordingNotifier::new();
//!
//! let engine = UpdateEngine::new(
//!     &config, &probe, &package_manager, &scripts, &executor, &notifier,
//! );
//! let outcome = engine.run(RunMode::Normal).unwrap();
//! assert!(matches!(outcome, RunOutcome::InhibitorFailure(_)));
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod inhibitors;
pub mod mock;
pub mod notify;
pub mod scripts;
pub mod shell;
pub mod transaction;

pub use error::{Result, UpdateError};
