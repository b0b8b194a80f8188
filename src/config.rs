//! Configuration management for CogniBench
//!
//! Provides persistent configuration that is automatically loaded from a
//! platform-specific config file.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/cognibench/config.toml` |
//! | macOS | `~/Library/Application Support/cognibench/config.toml` |
//! | Windows | `%APPDATA%\cognibench\config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use cognibench::Config;
//!
//! // Load existing config or use defaults
//! let mut config = Config::load().unwrap_or_default();
//!
//! // Reproducible target positions and delays
//! config.random.seed = Some(42);
//!
//! // Save to disk
//! config.save().expect("Failed to save config");
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the application's config directory, creating it if needed.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = base.join("cognibench");

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir)
}

/// Returns the path to the config file.
///
/// # Platform-specific paths
///
/// - Linux: `~/.config/cognibench/config.toml`
/// - macOS: `~/Library/Application Support/cognibench/config.toml`
/// - Windows: `%APPDATA%\cognibench\config.toml`
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// UI settings
    #[serde(default)]
    pub ui: UiConfig,
    /// Where finished attempts go
    #[serde(default)]
    pub results: ResultsConfig,
    /// Aim trainer play field
    #[serde(default)]
    pub aim: AimConfig,
    /// Random source settings
    #[serde(default)]
    pub random: RandomConfig,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Refresh rate for UI updates (in Hz)
    pub refresh_rate_hz: u32,
    /// How long status messages stay visible
    pub status_duration_secs: u32,
    /// Color theme (dark/light)
    pub theme: Theme,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_hz: 60,
            status_duration_secs: 3,
            theme: Theme::Dark,
        }
    }
}

/// Color theme options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Result persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResultsConfig {
    /// JSON-lines file that receives every recorded attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
    /// Signed-in user. Without one, attempts are not persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Aim trainer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AimConfig {
    /// Play field width in pixels
    pub field_width: f64,
    /// Play field height in pixels
    pub field_height: f64,
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 500.0,
        }
    }
}

/// Random source configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RandomConfig {
    /// Fixed seed for reproducible sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get UI refresh interval as Duration
    pub fn refresh_interval(&self) -> Duration {
        let hz = self.ui.refresh_rate_hz.max(1) as u64;
        Duration::from_micros(1_000_000 / hz)
    }

    /// How long a status message stays visible
    pub fn status_duration(&self) -> Duration {
        Duration::from_secs(self.ui.status_duration_secs as u64)
    }
}
