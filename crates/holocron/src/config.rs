//! CLI configuration — thin wrapper around `holocron_config`.
//!
//! Adds resolution that lets `GlobalOpts` flags override file and
//! environment values.

use std::time::Duration;

use clap::ValueEnum;
use tracing::warn;

use holocron_core::ArchiveConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use holocron_config::{Config, config_path, load_config, load_config_or_default, save_config};

// ── Resolved settings ───────────────────────────────────────────────

/// Everything a command needs after merging config and flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub archive: ArchiveConfig,
    pub output: OutputFormat,
    pub color: ColorMode,
    pub quiet: bool,
}

/// Load the config file and apply flag overrides (flag > env > file).
pub fn resolve(global: &GlobalOpts) -> Result<Settings, CliError> {
    let mut cfg = load_config()?;

    if let Some(ref url) = global.api_url {
        cfg.api_url.clone_from(url);
    }
    if let Some(size) = global.page_size {
        cfg.page_size = size;
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    if let Some(retries) = global.retries {
        cfg.retries = retries;
    }

    let mut archive = cfg.to_archive_config()?;
    archive.timeout = Duration::from_secs(cfg.timeout.max(1));

    Ok(Settings {
        archive,
        output: output_format(global, &cfg),
        color: color_mode(global, &cfg),
        quiet: global.quiet,
    })
}

/// Output format: flag, then config, then table.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&cfg.output, true).unwrap_or_else(|_| {
            warn!(value = %cfg.output, "unknown output format in config, using table");
            OutputFormat::Table
        })
    })
}

/// Color mode: flag, then config, then auto.
pub fn color_mode(global: &GlobalOpts, cfg: &Config) -> ColorMode {
    global.color.unwrap_or_else(|| {
        ColorMode::from_str(&cfg.color, true).unwrap_or_else(|_| {
            warn!(value = %cfg.color, "unknown color mode in config, using auto");
            ColorMode::Auto
        })
    })
}
