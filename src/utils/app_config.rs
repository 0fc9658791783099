//! Application configuration management
//! Stores user preferences in ~/.config/sysdash/config.toml

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::constants::APP_DIR;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log destination; logging is off when unset
    pub log_file: Option<PathBuf>,
    /// `tracing` filter used when RUST_LOG is not set
    pub log_filter: String,
    /// Draw on the alternate screen instead of the main one
    pub alternate_screen: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            log_filter: "info".to_string(),
            alternate_screen: true,
        }
    }
}

impl AppConfig {
    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine the user config directory")?
            .join(APP_DIR);

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a file, falling back to defaults if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }
}
