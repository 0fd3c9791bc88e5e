//! `Dockyard` CLI - headless harness for the `Dockyard` docking engine
//!
//! Loads a layout description, lays it out in a virtual host area and
//! shows the resulting tree, probes drop targets under a pointer, or
//! replays scripted pointer sessions.

mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;
use cli::Cli;
use dockyard_core::DockConfig;
use dockyard_core::tracing::{TracingConfig, init_tracing};

fn main() {
    let cli = Cli::parse();

    // A config that fails to load is reported by the command itself
    let mut tracing_config = TracingConfig::for_command_line(cli.verbose, cli.quiet);
    if let Some(filter) = cli
        .config
        .as_deref()
        .and_then(|path| DockConfig::load(path).ok())
        .and_then(|config| config.logging.filter)
    {
        tracing_config = tracing_config.with_filter(filter);
    }
    if let Err(e) = init_tracing(&tracing_config) {
        eprintln!("[tracing disabled: {e}]");
    }

    let options = util::HostOptions {
        config_path: cli.config.as_deref(),
        width: cli.width,
        height: cli.height,
    };
    let result = commands::dispatch(&options, cli.command);

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
