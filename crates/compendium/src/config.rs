//! Configuration management for compendium.
//!
//! Configuration is layered with figment: built-in defaults, an optional TOML
//! file, then `COMPENDIUM_` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::canvas::brush::parse_hex_color;
use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "compendium";

/// Default preference database file name.
const PREFERENCES_FILE_NAME: &str = "preferences.db";

/// Application configuration.
///
/// Loaded from (highest precedence first):
/// 1. Environment variables (prefixed with `COMPENDIUM_`, sections split on `__`)
/// 2. TOML config file at `~/.config/compendium/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sketch canvas configuration.
    pub canvas: CanvasConfig,
    /// Export bundle configuration.
    pub export: ExportConfig,
    /// Preference store configuration.
    pub preferences: PreferencesConfig,
}

/// Sketch canvas configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Surface width used when the host cannot report one.
    pub default_width: u32,
    /// Fixed surface height.
    pub height: u32,
    /// Initial brush color as `#rgb` or `#rrggbb`.
    pub brush_color: String,
    /// Initial brush width in pixels.
    pub brush_size: u32,
    /// Smallest accepted brush width.
    pub min_brush_size: u32,
    /// Largest accepted brush width.
    pub max_brush_size: u32,
    /// Upper bound on decoding a seed or photo, in milliseconds.
    pub decode_timeout_ms: u64,
    /// Colors offered by the palette.
    pub palette: Vec<String>,
}

/// Export bundle configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory the archive is written to.
    /// Defaults to the current working directory.
    pub output_dir: Option<PathBuf>,
    /// Archive file name prefix; the export date is appended.
    pub archive_prefix: String,
}

/// Preference store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    /// Persist form defaults between sessions.
    pub enabled: bool,
    /// Path to the preference database.
    /// Defaults to `~/.local/share/compendium/preferences.db`
    pub database_path: Option<PathBuf>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            default_width: 600,
            height: 260,
            brush_color: "#ffffff".to_string(),
            brush_size: 3,
            min_brush_size: 1,
            max_brush_size: 48,
            decode_timeout_ms: 5_000,
            palette: default_palette(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            archive_prefix: "compendium".to_string(),
        }
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database_path: None,
        }
    }
}

/// Default brush palette.
fn default_palette() -> Vec<String> {
    [
        "#000000", "#ffffff", "#ef4444", "#f59e0b", "#fbbf24", "#22c55e", "#10b981", "#06b6d4",
        "#0ea5e9", "#3b82f6", "#6366f1", "#8b5cf6", "#a855f7", "#ec4899", "#f43f5e", "#94a3b8",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("COMPENDIUM_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let canvas = &self.canvas;

        if canvas.default_width == 0 || canvas.height == 0 {
            return Err(invalid(format!(
                "canvas dimensions must be non-zero (default_width={}, height={})",
                canvas.default_width, canvas.height
            )));
        }

        if canvas.min_brush_size == 0 {
            return Err(invalid("min_brush_size must be at least 1"));
        }

        if canvas.min_brush_size > canvas.max_brush_size {
            return Err(invalid(format!(
                "min_brush_size ({}) cannot be greater than max_brush_size ({})",
                canvas.min_brush_size, canvas.max_brush_size
            )));
        }

        if !(canvas.min_brush_size..=canvas.max_brush_size).contains(&canvas.brush_size) {
            return Err(invalid(format!(
                "brush_size ({}) must lie within {}..={}",
                canvas.brush_size, canvas.min_brush_size, canvas.max_brush_size
            )));
        }

        if canvas.decode_timeout_ms == 0 {
            return Err(invalid("decode_timeout_ms must be greater than 0"));
        }

        for color in std::iter::once(&canvas.brush_color).chain(&canvas.palette) {
            if parse_hex_color(color).is_err() {
                return Err(invalid(format!("invalid color: {color}")));
            }
        }

        let prefix = &self.export.archive_prefix;
        if prefix.trim().is_empty() || prefix.contains(['/', '\\']) {
            return Err(invalid(format!("invalid archive_prefix: '{prefix}'")));
        }

        Ok(())
    }

    /// Get the export directory, resolving defaults if not set.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the preference database path, resolving defaults if not set.
    #[must_use]
    pub fn preferences_path(&self) -> PathBuf {
        self.preferences
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(PREFERENCES_FILE_NAME))
    }
}

impl CanvasConfig {
    /// Get the decode timeout as a Duration.
    #[must_use]
    pub fn decode_timeout(&self) -> Duration {
        Duration::from_millis(self.decode_timeout_ms)
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::ConfigValidation {
        message: message.into(),
    }
}
