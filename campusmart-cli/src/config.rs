//! Configuration management for the campusmart CLI.

use anyhow::{Context, Result};
use campusmart::{FileStorage, Marketplace, UserSession};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// CLI configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding persisted catalog, chats and session.
    pub data_dir: Option<PathBuf>,
    /// Start from the demo catalog when nothing is stored yet.
    pub seed_samples: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            seed_samples: true,
        }
    }
}

impl Config {
    /// Resolve the data directory: override, then config, then next to the config file.
    pub fn data_dir(&self, overridden: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = overridden {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let path = config_path()?;
        let dir = path
            .parent()
            .context("Could not determine configuration directory")?;
        Ok(dir.join("campusmart-data"))
    }
}

/// Get the configuration file path.
pub fn config_path() -> Result<PathBuf> {
    let exe_path = env::current_exe().context("Could not determine executable path")?;
    let exe_dir = exe_path
        .parent()
        .context("Could not determine executable directory")?;

    Ok(exe_dir.join("campusmart.toml"))
}

/// Load configuration from file.
pub fn load_config() -> Result<Config> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path).context("Failed to read config file")?;

    parse_config(&content)
}

fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).context("Failed to parse config file")
}

/// Save configuration to file.
pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path()?;
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&path, content).context("Failed to write config file")?;

    Ok(())
}

/// Open the marketplace persisted under the configured data directory.
pub async fn open_market(data_dir: Option<&Path>) -> Result<Marketplace> {
    let config = load_config()?;
    let dir = config.data_dir(data_dir)?;

    Marketplace::builder()
        .storage(Arc::new(FileStorage::new(dir)))
        .seed_samples(config.seed_samples)
        .load()
        .await
        .context("Failed to load marketplace data")
}

/// The signed-in user, or an error telling how to sign in.
pub async fn require_user(market: &Marketplace) -> Result<UserSession> {
    market
        .session()
        .current()
        .await?
        .context("Login required. Run 'campusmart auth login' first.")
}
