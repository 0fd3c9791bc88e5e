//! Shared utility functions used across command modules.

use std::path::Path;

use dockyard_core::tree::LayoutSpec;
use dockyard_core::{DockConfig, DockingHost, Rect, create_tree};

use crate::error::CliError;

/// Global options that shape the virtual host.
#[derive(Debug, Clone, Copy)]
pub struct HostOptions<'a> {
    /// Optional dock configuration file.
    pub config_path: Option<&'a Path>,
    /// Host area width.
    pub width: f64,
    /// Host area height.
    pub height: f64,
}

impl HostOptions<'_> {
    /// The host area.
    pub const fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Loads the configuration file, or the defaults when none is given.
pub fn load_config(config_path: Option<&Path>) -> Result<DockConfig, CliError> {
    match config_path {
        Some(path) => DockConfig::load(path).map_err(|e| CliError::config("Failed to load config", &e)),
        None => Ok(DockConfig::default()),
    }
}

/// Reads a layout file and lays it out in the host area.
pub fn load_host(options: &HostOptions<'_>, layout: &Path) -> Result<DockingHost, CliError> {
    if !(options.width > 0.0 && options.height > 0.0) {
        return Err(CliError::Config(format!(
            "host area must be positive, got {}x{}",
            options.width, options.height
        )));
    }
    let config = load_config(options.config_path)?;
    let spec = LayoutSpec::load(layout)
        .map_err(|e| CliError::Layout(format!("Failed to read {}: {e}", layout.display())))?;
    let tree = create_tree(&spec)?;
    Ok(DockingHost::new(tree, config, options.bounds()))
}

/// `x,y WxH` with integral values printed without a fraction.
pub fn format_rect(rect: Rect) -> String {
    format!("{},{} {}x{}", rect.x, rect.y, rect.width, rect.height)
}
