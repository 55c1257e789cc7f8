//! Update inhibitors: conditions that block an unattended update.
//!
//! # Modules
//!
//! - [`probe`] - Live hardware/resource state (battery, CPU, memory, network)
//! - [`evaluator`] - Runs the configured checks and aggregates failures

pub mod evaluator;
pub mod probe;

pub use evaluator::{InhibitorEvaluator, InhibitorResult};
pub use probe::{BatteryStatus, LinuxProbe, SystemProbe};
