//! CLI error types and exit codes.

use dockyard_core::{ConfigError, DockError, StructuralError};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, layout, script or IO errors
    pub const GENERAL_ERROR: i32 = 1;
    /// Drop failure - a replayed drop found the layout changed under it
    pub const DROP_FAILURE: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Layout error
    #[error("Layout error: {0}")]
    Layout(String),

    /// Script error
    #[error("Script error: {0}")]
    Script(String),

    /// A replayed step failed its consistency check
    #[error("Drop failed: {0}")]
    DropFailed(String),

    /// Output serialization error
    #[error("Output error: {0}")]
    Output(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StructuralError> for CliError {
    fn from(err: StructuralError) -> Self {
        Self::Layout(err.to_string())
    }
}

impl From<DockError> for CliError {
    fn from(err: DockError) -> Self {
        match err {
            DockError::Structural(e) => Self::Layout(e.to_string()),
            DockError::Consistency(e) => Self::DropFailed(e.to_string()),
            DockError::Config(e) => Self::Config(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err.to_string())
    }
}

impl CliError {
    /// Wraps a configuration error raised while reading `what`.
    pub fn config(what: &str, err: &ConfigError) -> Self {
        Self::Config(format!("{what}: {err}"))
    }

    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, layout, script, IO)
    /// - 2: Drop failure (a drop target vanished during a replay)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::DropFailed(_) => exit_codes::DROP_FAILURE,
            Self::Config(_) | Self::Layout(_) | Self::Script(_) | Self::Output(_) | Self::Io(_) => {
                exit_codes::GENERAL_ERROR
            }
        }
    }
}
