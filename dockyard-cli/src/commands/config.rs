//! Print effective configuration command.

use std::path::Path;

use crate::error::CliError;
use crate::util::load_config;

/// Config command handler
pub fn cmd_config(config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let text = config
        .to_toml()
        .map_err(|e| CliError::config("Failed to serialize config", &e))?;
    print!("{text}");
    Ok(())
}
