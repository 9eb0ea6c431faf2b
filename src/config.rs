use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigurationError;

pub const DEFAULT_API_BASE: &str = "https://api.deezer.com";

/// Options the plugin is constructed with. Validated once, never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PluginOptions {
    pub playlist_page_limit: Option<NonZeroUsize>,
    pub album_page_limit: Option<NonZeroUsize>,
    pub eager_resolve: bool,
}

impl PluginOptions {
    /// Validates raw options. `null` means "all defaults"; unknown keys are ignored.
    pub fn from_value(value: &Value) -> Result<Self, ConfigurationError> {
        let map = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            _ => return Err(ConfigurationError::NotAnObject),
        };

        let eager_resolve = match map.get("eagerResolve") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                return Err(ConfigurationError::WrongType {
                    key: "eagerResolve",
                    expected: "a boolean",
                })
            }
        };

        Ok(Self {
            playlist_page_limit: page_limit(map.get("playlistPageLimit"), "playlistPageLimit")?,
            album_page_limit: page_limit(map.get("albumPageLimit"), "albumPageLimit")?,
            eager_resolve,
        })
    }
}

fn page_limit(
    value: Option<&Value>,
    key: &'static str,
) -> Result<Option<NonZeroUsize>, ConfigurationError> {
    let number = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n,
        Some(_) => {
            return Err(ConfigurationError::WrongType {
                key,
                expected: "a number",
            })
        }
    };
    let limit = number
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .and_then(NonZeroUsize::new)
        .ok_or(ConfigurationError::NotPositive { key })?;
    Ok(Some(limit))
}

/// On-disk configuration of the command line tool.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Raw plugin options; checked by [`PluginOptions::from_value`] when the plugin is built.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub plugin: Value,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub lavalink: LavalinkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LavalinkConfig {
    pub url: Option<String>,
    pub password: Option<String>,
}

impl LavalinkConfig {
    pub fn is_configured(&self) -> bool {
        self.url.as_ref().is_some_and(|s| !s.is_empty())
    }
}

pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".config")
        .join("deezer-resolver")
        .join("config.toml")
}

pub fn load_config() -> Config {
    load_config_from(&config_path())
}

/// Missing or unreadable files fall back to the defaults.
pub fn load_config_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring invalid config {}: {}", path.display(), e);
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}

pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(config, &config_path())
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, content)
        .with_context(|| format!("failed to write config to {}", path.display()))?;
    Ok(())
}
