//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct. The mode flags are not
//! declared as conflicting; [`Cli::run_mode`] resolves combinations.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::RunMode;

/// Update orchestrator for immutable desktop images.
#[derive(Debug, Parser)]
#[command(name = "ublue-update")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Force update, skipping all update checks
    #[arg(short, long)]
    pub force: bool,

    /// Run update checks and exit
    #[arg(short, long)]
    pub check: bool,

    /// Check for available updates and exit
    #[arg(short, long)]
    pub updatecheck: bool,

    /// Wait for package-manager transactions to complete and exit
    #[arg(short, long)]
    pub wait: bool,

    /// Path to config file (overrides the default search)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Give up waiting for a transaction after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub wait_timeout: Option<u64>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// The run mode selected by the flags.
    pub fn run_mode(&self) -> RunMode {
        RunMode::from_flags(self.force, self.check, self.updatecheck, self.wait)
    }

    /// The transaction wait timeout, if one was given.
    pub fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout.map(Duration::from_secs)
    }
}
