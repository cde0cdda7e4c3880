//! Configuration management for the morwiki CLI

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    pub source_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub unlock_overrides: Option<PathBuf>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("morwiki");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    /// Resolve the source directory from an argument or the saved default
    pub fn resolve_source(&self, arg: Option<&Path>) -> Result<PathBuf> {
        arg.map(Path::to_path_buf)
            .or_else(|| self.source_dir.clone())
            .context("No source directory given; pass --source or run `morwiki configure`")
    }

    /// Resolve the output directory, defaulting to ./output
    pub fn resolve_output(&self, arg: Option<&Path>) -> PathBuf {
        arg.map(Path::to_path_buf)
            .or_else(|| self.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("output"))
    }

    /// Resolve the unlock-override file from an argument or the saved
    /// default
    pub fn resolve_overrides(&self, arg: Option<&Path>) -> Option<PathBuf> {
        arg.map(Path::to_path_buf)
            .or_else(|| self.unlock_overrides.clone())
    }
}
