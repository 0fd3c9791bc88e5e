//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// `Dockyard` command-line interface for exercising docking layouts
#[derive(Parser)]
#[command(name = "dockyard-cli")]
#[command(author, version, about = "Dockyard docking engine harness")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a dock configuration file (TOML)
    #[arg(short, long, global = true, env = "DOCKYARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Width of the virtual host area in pixels
    #[arg(long, global = true, default_value_t = 800.0)]
    pub width: f64,

    /// Height of the virtual host area in pixels
    #[arg(long, global = true, default_value_t = 600.0)]
    pub height: f64,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the laid-out tree of a layout
    #[command(about = "Lay out a layout file and print the resulting tree")]
    Show {
        /// Layout description (TOML or JSON)
        layout: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text", value_enum)]
        format: OutputFormat,
    },

    /// Resolve the drop target under a pointer position
    #[command(about = "Print the drop target a floating tab would see at a position")]
    Probe {
        /// Layout description (TOML or JSON)
        layout: PathBuf,

        /// Pointer x coordinate
        #[arg(short, long, allow_hyphen_values = true)]
        x: f64,

        /// Pointer y coordinate
        #[arg(short, long, allow_hyphen_values = true)]
        y: f64,
    },

    /// Replay a pointer script against a layout
    #[command(about = "Replay scripted pointer steps and print each outcome")]
    Simulate {
        /// Layout description (TOML or JSON)
        layout: PathBuf,

        /// Pointer script (JSON)
        script: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text", value_enum)]
        format: OutputFormat,

        /// Also print the indicator primitives painted for the final state
        #[arg(long)]
        paint: bool,
    },

    /// Print the effective dock configuration
    #[command(about = "Print the effective configuration as TOML")]
    Config,
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Output as JSON
    Json,
}
