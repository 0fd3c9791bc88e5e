//! Docking configuration
//!
//! Indicator metrics and colors, tab bar metrics, resize limits and logging
//! settings, stored in TOML. Every field has a default so a partial file is
//! valid.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::trace_operation;
use crate::tracing::{TracingLevel, span_names};

/// An RGBA color written as `#RRGGBBAA` (or `#RRGGBB`, opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 is opaque.
    pub a: u8,
}

impl Rgba {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with the alpha channel multiplied by `opacity`.
    #[must_use]
    pub fn with_opacity(self, opacity: f64) -> Self {
        let alpha = (f64::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..self }
    }
}

impl FromStr for Rgba {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::Invalid(format!("invalid color '{s}', expected #RRGGBBAA"));
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl TryFrom<String> for Rgba {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

/// Drop indicator metrics and colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorStyle {
    /// Side of one grid cell before scaling.
    pub size: f64,
    /// Gap between adjacent cells before scaling.
    pub spacing: f64,
    /// Corner radius of painted cells before scaling.
    pub corner_radius: f64,
    /// Fill of an offered cell.
    pub fill: Rgba,
    /// Fill of the cell under the pointer.
    pub hovered_fill: Rgba,
    /// Cell and node outline.
    pub stroke: Rgba,
    /// Outline thickness.
    pub stroke_thickness: f64,
}

impl Default for IndicatorStyle {
    fn default() -> Self {
        Self {
            size: 40.0,
            spacing: 10.0,
            corner_radius: 5.0,
            fill: Rgba::new(0x64, 0x95, 0xED, 0x80),
            hovered_fill: Rgba::new(0x64, 0x95, 0xED, 0xFF),
            stroke: Rgba::new(0x64, 0x95, 0xED, 0xFF),
            stroke_thickness: 1.0,
        }
    }
}

/// Logging settings (stored under `[logging]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level: error, warn, info, debug or trace
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Extra `EnvFilter` directives appended to the level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            filter: None,
        }
    }
}

impl LoggingSettings {
    /// Parsed level, falling back to info for unknown names.
    #[must_use]
    pub fn tracing_level(&self) -> TracingLevel {
        self.level.parse().unwrap_or_default()
    }
}

/// Configuration for a docking host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockConfig {
    /// Smallest pixel size a slot may be resized to (default: 20)
    #[serde(default = "default_min_slot_pixels")]
    pub min_slot_pixels: i64,
    /// Thickness of the divider hit area between slots (default: 4)
    #[serde(default = "default_divider_thickness")]
    pub divider_thickness: f64,
    /// Height of a group's tab bar (default: 28)
    #[serde(default = "default_tab_bar_height")]
    pub tab_bar_height: f64,
    /// Header width used when the host has not measured a tab (default: 100)
    #[serde(default = "default_tab_width")]
    pub default_tab_width: f64,
    /// Opacity applied to the placeholder header (default: 0.5)
    #[serde(default = "default_placeholder_opacity")]
    pub placeholder_opacity: f64,
    /// Share given to docked content when its size is unknown (default: 0.5)
    #[serde(default = "default_split_fraction")]
    pub default_split_fraction: f64,
    /// Drop indicator appearance.
    #[serde(default)]
    pub indicator: IndicatorStyle,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

const fn default_min_slot_pixels() -> i64 {
    20
}

const fn default_divider_thickness() -> f64 {
    4.0
}

const fn default_tab_bar_height() -> f64 {
    28.0
}

const fn default_tab_width() -> f64 {
    100.0
}

const fn default_placeholder_opacity() -> f64 {
    0.5
}

const fn default_split_fraction() -> f64 {
    0.5
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            min_slot_pixels: default_min_slot_pixels(),
            divider_thickness: default_divider_thickness(),
            tab_bar_height: default_tab_bar_height(),
            default_tab_width: default_tab_width(),
            placeholder_opacity: default_placeholder_opacity(),
            default_split_fraction: default_split_fraction(),
            indicator: IndicatorStyle::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl DockConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Self::from_toml`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let span = trace_operation!(span_names::CONFIG_LOAD, path = %path.display());
        let _guard = span.enter();

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        debug!(path = %path.display(), "loaded dock configuration");
        Ok(config)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Checks that every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("indicator.size", self.indicator.size),
            ("tab_bar_height", self.tab_bar_height),
            ("default_tab_width", self.default_tab_width),
            ("divider_thickness", self.divider_thickness),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        let non_negative = [
            ("indicator.spacing", self.indicator.spacing),
            ("indicator.corner_radius", self.indicator.corner_radius),
            ("indicator.stroke_thickness", self.indicator.stroke_thickness),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        if self.min_slot_pixels < 1 {
            return Err(ConfigError::Invalid(format!(
                "min_slot_pixels must be at least 1, got {}",
                self.min_slot_pixels
            )));
        }
        if !(0.0..=1.0).contains(&self.placeholder_opacity) {
            return Err(ConfigError::Invalid(format!(
                "placeholder_opacity must be between 0 and 1, got {}",
                self.placeholder_opacity
            )));
        }
        if !(self.default_split_fraction > 0.0 && self.default_split_fraction < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "default_split_fraction must be between 0 and 1 exclusive, got {}",
                self.default_split_fraction
            )));
        }
        if self.logging.level.parse::<TracingLevel>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }
        Ok(())
    }
}
