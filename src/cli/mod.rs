//! Command-line interface for ublue-update.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`dispatcher`] - Routing to the engine and exit-code mapping

pub mod args;
pub mod dispatcher;

pub use args::Cli;
pub use dispatcher::{CommandDispatcher, CommandResult};
