//! Configuration for the holocron CLI.
//!
//! Defaults, then `config.toml` in the platform config directory, then
//! `HOLOCRON_*` environment variables, merged with figment. The CLI applies
//! its own flag overrides on top and converts the result into a
//! [`holocron_core::ArchiveConfig`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use holocron_core::{ArchiveConfig, DEFAULT_PAGE_SIZE};

/// Prefix for environment overrides, e.g. `HOLOCRON_PAGE_SIZE=25`.
pub const ENV_PREFIX: &str = "HOLOCRON_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Everything `config.toml` can set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Archive API root.
    pub api_url: String,

    /// Records per page when a command does not say.
    pub page_size: u32,

    /// Request timeout in seconds.
    pub timeout: u64,

    /// Extra attempts for transient failures.
    pub retries: u32,

    /// Default output format: table, json, json-compact, yaml, plain.
    pub output: String,

    /// Color mode: auto, always, never.
    pub color: String,
}

impl Default for Config {
    fn default() -> Self {
        let archive = ArchiveConfig::default();
        Self {
            api_url: archive.base_url,
            page_size: DEFAULT_PAGE_SIZE,
            timeout: archive.timeout.as_secs(),
            retries: archive.max_retries,
            output: "table".into(),
            color: "auto".into(),
        }
    }
}

impl Config {
    /// Validate and convert into the runtime archive settings.
    pub fn to_archive_config(&self) -> Result<ArchiveConfig, ConfigError> {
        url::Url::parse(&self.api_url).map_err(|e| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("{e}: {}", self.api_url),
        })?;
        if self.page_size == 0 {
            return Err(ConfigError::Validation {
                field: "page_size".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(ArchiveConfig {
            base_url: self.api_url.clone(),
            page_size: self.page_size,
            timeout: Duration::from_secs(self.timeout),
            max_retries: self.retries,
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "holocron", "holocron").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("holocron");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path + environment. A missing file is fine.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, falling back to defaults on any error.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
