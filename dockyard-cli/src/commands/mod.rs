//! Command handler modules for the CLI.

mod config;
mod probe;
mod show;
mod simulate;

use crate::cli::Commands;
use crate::error::CliError;
use crate::util::HostOptions;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(options: &HostOptions<'_>, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Show { layout, format } => show::cmd_show(options, &layout, format),
        Commands::Probe { layout, x, y } => probe::cmd_probe(options, &layout, x, y),
        Commands::Simulate {
            layout,
            script,
            format,
            paint,
        } => simulate::cmd_simulate(options, &layout, &script, format, paint),
        Commands::Config => config::cmd_config(options.config_path),
    }
}
