//! ublue-update CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use ublue_update::cli::{Cli, CommandDispatcher};
use ublue_update::config::load_config;
use ublue_update::engine::UpdateEngine;
use ublue_update::inhibitors::LinuxProbe;
use ublue_update::notify::DesktopNotifier;
use ublue_update::scripts::DirectorySource;
use ublue_update::shell::ProcessExecutor;
use ublue_update::transaction::RpmOstree;

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `UBLUE_LOG`, then `RUST_LOG` environment variables (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("ublue_update=debug")
    } else {
        EnvFilter::try_from_env("UBLUE_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("ublue_update=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("ublue-update starting with args: {:?}", cli);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::from(1);
        }
    };

    let probe = LinuxProbe::new();
    let package_manager = RpmOstree::new();
    let scripts = DirectorySource::new(&config.update.scripts_dir);
    let executor = ProcessExecutor;
    let notifier = DesktopNotifier::new();

    let engine = UpdateEngine::new(
        &config,
        &probe,
        &package_manager,
        &scripts,
        &executor,
        &notifier,
    )
    .with_wait_timeout(cli.wait_timeout());
    let dispatcher = CommandDispatcher::new(&engine);

    match dispatcher.dispatch(&cli) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(1)
        }
    }
}
