//! Structured logging setup
//!
//! The engine logs through the `tracing` macros with spans around tree
//! transactions, drags, drops and resizes. Hosts that have no subscriber
//! of their own can install one with [`init_tracing`].
//!
//! Levels apply only to the dockyard crates; anything else a host wants to
//! see goes into [`TracingConfig::filter`] as extra `EnvFilter` directives.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingSettings;

/// Configuration of the subscriber installed by [`init_tracing`]
static INSTALLED: OnceLock<TracingConfig> = OnceLock::new();

/// Crates whose events the level applies to
const DOCKYARD_TARGETS: [&str; 2] = ["dockyard_core", "dockyard_cli"];

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum TracingError {
    /// A global subscriber is already installed
    #[error("a tracing subscriber is already installed")]
    AlreadyInitialized,

    /// The extra filter directives could not be parsed
    #[error("invalid filter directive: {0}")]
    InvalidFilter(String),

    /// The log file could not be created
    #[error("cannot create log file {}: {source}", .path.display())]
    LogFile {
        /// Requested log file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for tracing setup
pub type TracingResult<T> = Result<T, TracingError>;

/// Verbosity of the dockyard crates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TracingLevel {
    /// Consistency failures only
    Error,
    /// Rejected operations and release-mode repairs
    Warn,
    /// Committed drops and structural changes
    #[default]
    Info,
    /// Per-move drag and hover decisions
    Debug,
    /// Everything, including per-node hover resolution
    Trace,
}

impl TracingLevel {
    const ALL: [Self; 5] = [Self::Error, Self::Warn, Self::Info, Self::Debug, Self::Trace];

    /// Lower-case name as used in filter directives.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// The `tracing` level.
    #[must_use]
    pub const fn as_level(self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Level for a `-v` count added on top of warn.
    #[must_use]
    pub const fn from_verbosity(count: u8) -> Self {
        match count {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }
}

impl FromStr for TracingLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("warning") {
            return Ok(Self::Warn);
        }
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

impl fmt::Display for TracingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where formatted events are written
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TracingOutput {
    /// Standard output
    Stdout,
    /// Standard error, keeping stdout free for command output
    #[default]
    Stderr,
    /// A file, truncated when the subscriber is installed
    File(PathBuf),
}

impl TracingOutput {
    /// Writer plus whether ANSI colors apply.
    fn writer(&self) -> TracingResult<(BoxMakeWriter, bool)> {
        Ok(match self {
            Self::Stdout => (BoxMakeWriter::new(std::io::stdout), true),
            Self::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
            Self::File(path) => {
                let file = std::fs::File::create(path).map_err(|source| TracingError::LogFile {
                    path: path.clone(),
                    source,
                })?;
                (BoxMakeWriter::new(file), false)
            }
        })
    }
}

/// Subscriber settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracingConfig {
    /// Level for the dockyard crates
    pub level: TracingLevel,
    /// Output destination
    pub output: TracingOutput,
    /// Log an event with the elapsed time whenever a span closes
    pub span_close_events: bool,
    /// Extra `EnvFilter` directives appended after the level directives
    pub filter: Option<String>,
}

impl TracingConfig {
    /// Info level on stderr.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from the `[logging]` section of a dock config.
    #[must_use]
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        Self {
            level: settings.tracing_level(),
            filter: settings.filter.clone(),
            ..Self::default()
        }
    }

    /// Warn by default, one level per `-v`, errors only when `quiet`.
    #[must_use]
    pub fn for_command_line(verbose: u8, quiet: bool) -> Self {
        let level = if quiet {
            TracingLevel::Error
        } else {
            TracingLevel::from_verbosity(verbose)
        };
        Self::new().with_level(level)
    }

    /// Sets the level
    #[must_use]
    pub const fn with_level(mut self, level: TracingLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the output destination
    #[must_use]
    pub fn with_output(mut self, output: TracingOutput) -> Self {
        self.output = output;
        self
    }

    /// Sets whether span close events are logged
    #[must_use]
    pub const fn with_span_close_events(mut self, enabled: bool) -> Self {
        self.span_close_events = enabled;
        self
    }

    /// Sets extra filter directives
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// The `EnvFilter` directives this configuration installs.
    #[must_use]
    pub fn directives(&self) -> String {
        let extra = self
            .filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty());
        DOCKYARD_TARGETS
            .iter()
            .map(|target| format!("{target}={}", self.level))
            .chain(extra.map(str::to_string))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Installs a global `fmt` subscriber.
///
/// # Errors
///
/// Returns [`TracingError::AlreadyInitialized`] when a global subscriber is
/// already set (by this function or by the host),
/// [`TracingError::InvalidFilter`] for unparsable extra directives and
/// [`TracingError::LogFile`] when the log file cannot be created.
pub fn init_tracing(config: &TracingConfig) -> TracingResult<()> {
    if INSTALLED.get().is_some() {
        return Err(TracingError::AlreadyInitialized);
    }
    let filter = EnvFilter::try_new(config.directives())
        .map_err(|e| TracingError::InvalidFilter(e.to_string()))?;
    let (writer, ansi) = config.output.writer()?;
    let span_events = if config.span_close_events {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(ansi)
                .with_span_events(span_events)
                .with_writer(writer),
        )
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)?;

    let _ = INSTALLED.set(config.clone());
    tracing::debug!(level = %config.level, directives = %config.directives(), "tracing installed");
    Ok(())
}

/// The configuration [`init_tracing`] installed, if it ran.
#[must_use]
pub fn installed_config() -> Option<&'static TracingConfig> {
    INSTALLED.get()
}

/// Opens an info-level span with the given name and fields.
///
/// ```ignore
/// let span = trace_operation!(span_names::TREE_MUTATION, op = "insert_split", %target);
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! trace_operation {
    ($name:expr) => {
        tracing::info_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

/// Debug-level variant of `trace_operation!` for spans entered on every
/// pointer move or layout pass.
#[macro_export]
macro_rules! trace_operation_debug {
    ($name:expr) => {
        tracing::debug_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::debug_span!($name, $($field)*)
    };
}

/// Span names
pub mod span_names {
    /// Public tree mutation
    pub const TREE_MUTATION: &str = "tree.mutation";
    /// Post-mutation structural repair
    pub const TREE_REPAIR: &str = "tree.repair";
    /// Layout pass
    pub const TREE_ARRANGE: &str = "tree.arrange";
    /// Building a tree from a layout description
    pub const LAYOUT_CREATE: &str = "layout.create";
    /// Tab drag session
    pub const DRAG: &str = "drag";
    /// Drop commit or cancel
    pub const DROP: &str = "drag.drop";
    /// Divider move
    pub const RESIZE: &str = "resize";
    /// Configuration load
    pub const CONFIG_LOAD: &str = "config.load";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!("error".parse::<TracingLevel>(), Ok(TracingLevel::Error));
        assert_eq!(" WARN ".parse::<TracingLevel>(), Ok(TracingLevel::Warn));
        assert_eq!("warning".parse::<TracingLevel>(), Ok(TracingLevel::Warn));
        assert_eq!("Debug".parse::<TracingLevel>(), Ok(TracingLevel::Debug));
        assert!("loud".parse::<TracingLevel>().is_err());
        for level in TracingLevel::ALL {
            assert_eq!(level.to_string().parse::<TracingLevel>(), Ok(level));
        }
    }

    #[test]
    fn verbosity_steps_up_from_warn() {
        assert_eq!(TracingLevel::from_verbosity(0), TracingLevel::Warn);
        assert_eq!(TracingLevel::from_verbosity(1), TracingLevel::Info);
        assert_eq!(TracingLevel::from_verbosity(2), TracingLevel::Debug);
        assert_eq!(TracingLevel::from_verbosity(9), TracingLevel::Trace);
        assert_eq!(TracingLevel::Trace.as_level(), Level::TRACE);
    }

    #[test]
    fn quiet_wins_over_verbosity() {
        let config = TracingConfig::for_command_line(3, true);
        assert_eq!(config.level, TracingLevel::Error);
        assert_eq!(
            TracingConfig::for_command_line(1, false).level,
            TracingLevel::Info
        );
    }

    #[test]
    fn directives_scope_level_to_dockyard_crates() {
        let config = TracingConfig::new()
            .with_level(TracingLevel::Debug)
            .with_output(TracingOutput::Stdout)
            .with_span_close_events(true)
            .with_filter("dockyard_core::drag=trace");

        assert!(config.span_close_events);
        assert_eq!(
            config.directives(),
            "dockyard_core=debug,dockyard_cli=debug,dockyard_core::drag=trace"
        );
    }

    #[test]
    fn blank_filter_from_settings_is_ignored() {
        let settings = LoggingSettings {
            level: "trace".to_string(),
            filter: Some("   ".to_string()),
        };
        let config = TracingConfig::from_settings(&settings);
        assert_eq!(config.level, TracingLevel::Trace);
        assert_eq!(config.directives(), "dockyard_core=trace,dockyard_cli=trace");
        assert_eq!(config.output, TracingOutput::Stderr);
    }

    #[test]
    fn unwritable_log_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let output = TracingOutput::File(dir.path().join("missing").join("dock.log"));
        let err = output.writer().err().unwrap();
        assert!(matches!(err, TracingError::LogFile { .. }));
        assert!(err.to_string().contains("dock.log"));
    }
}
