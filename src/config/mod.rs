// src/config/mod.rs
//
// Application configuration
//
// Loaded from `<config_dir>/gestion-academica/config.toml` (or an explicit
// path). Missing files and missing keys fall back to defaults; command-line
// flags override file values for a single run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppResult;

pub const APP_DIR_NAME: &str = "gestion-academica";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_POOL_SIZE: u32 = 4;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file; the platform data directory when absent
    pub path: Option<PathBuf>,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Firebase project; cloud sync is disabled without it
    pub project_id: Option<String>,
    /// Web API key used for both Firestore and authentication
    pub api_key: Option<String>,
    /// Prepended to every collection name, e.g. `test_` for a staging copy
    pub collection_prefix: String,
}

impl CloudConfig {
    pub fn is_configured(&self) -> bool {
        self.project_id.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn collection(&self, name: &str) -> String {
        format!("{}{}", self.collection_prefix, name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive understood by `EnvFilter` (e.g. `info`, `gestion_academica=debug`)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub cloud: CloudConfig,
    pub logging: LoggingConfig,
}

/// Per-run overrides coming from the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub project_id: Option<String>,
    pub api_key: Option<String>,
}

impl AppConfig {
    /// `~/.config/gestion-academica` on Linux, the platform equivalent elsewhere
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    }

    pub fn default_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE_NAME)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> AppResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Read the file at `path`, or defaults when it does not exist
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::default_path()),
        }
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(path) = &overrides.database_path {
            self.database.path = Some(path.clone());
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level.clone_from(level);
        }
        if let Some(project) = &overrides.project_id {
            self.cloud.project_id = Some(project.clone());
        }
        if let Some(key) = &overrides.api_key {
            self.cloud.api_key = Some(key.clone());
        }
    }
}
