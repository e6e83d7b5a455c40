//! Configuration loading and management.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tt_core::DEFAULT_DATETIME_FORMAT;
use tt_core::datetime::is_valid_format;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// strftime pattern used when listing entries.
    pub datetime_format: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("tt.db"),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, the user config file, `config_path`, then
    /// `TT_*` environment variables.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            if !path.exists() {
                bail!("config file not found: {}", path.display());
            }
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("TT_"));

        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !is_valid_format(&self.datetime_format) {
            bail!("invalid datetime_format: {}", self.datetime_format);
        }
        Ok(())
    }
}

/// Returns the platform-specific config directory for the time tracker.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("timetracker"))
}

/// Returns the platform-specific data directory for the time tracker.
///
/// On Linux: `~/.local/share/timetracker`
fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("timetracker"))
}
