use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::models::ProviderTag;
use crate::storage::DEFAULT_DATABASE_URL;

pub const CONFIG_PATH_ENV: &str = "FINANCE_TRACKER_CONFIG";
pub const DATABASE_URL_ENV: &str = "FINANCE_TRACKER_DATABASE_URL";
const DEFAULT_CONFIG_FILE: &str = "finance_tracker.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Config enables unsupported identity provider: {0}")]
    UnsupportedProvider(String),
    #[error("Identity provider {0} is configured more than once")]
    DuplicateProvider(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Keyed by provider tag; providers not listed are enabled
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            log_filter: default_log_filter(),
            providers: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the explicit path, the `FINANCE_TRACKER_CONFIG`
    /// variable or `finance_tracker.toml`, then apply environment overrides
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit_path {
            Some(path) => path.to_path_buf(),
            None => std::env::var_os(CONFIG_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        };

        let mut config = Self::load_from(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a TOML file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        // Reject unknown provider keys up front
        config.enabled_providers()?;
        Ok(config)
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.database_url = url;
        }
    }

    /// Supported providers that are not switched off, in `ProviderTag::ALL` order
    pub fn enabled_providers(&self) -> Result<Vec<ProviderTag>, ConfigError> {
        let mut seen = Vec::new();
        let mut disabled = Vec::new();
        for (name, provider) in &self.providers {
            let tag: ProviderTag = name
                .parse()
                .map_err(|_| ConfigError::UnsupportedProvider(name.clone()))?;
            // Tags are case-insensitive, so "google" and "GOOGLE" collide
            if seen.contains(&tag) {
                return Err(ConfigError::DuplicateProvider(tag.to_string()));
            }
            seen.push(tag);
            if !provider.enabled {
                disabled.push(tag);
            }
        }

        Ok(ProviderTag::ALL
            .into_iter()
            .filter(|tag| !disabled.contains(tag))
            .collect())
    }
}
