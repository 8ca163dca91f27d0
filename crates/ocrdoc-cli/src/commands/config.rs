//! Configuration loading and display.

use std::path::{Path, PathBuf};

use anyhow::Context;
use console::style;
use tracing::debug;

use ocrdoc_core::models::config::OcrDocConfig;

/// `<config_dir>/ocrdoc/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ocrdoc")
        .join("config.json")
}

/// Load the explicit config file, else the default one if present, else defaults.
pub fn load(path: Option<&Path>) -> anyhow::Result<OcrDocConfig> {
    if let Some(path) = path {
        debug!("Loading config from {}", path.display());
        return OcrDocConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        OcrDocConfig::from_file(&default_path)
            .with_context(|| format!("failed to load config from {}", default_path.display()))
    } else {
        Ok(OcrDocConfig::default())
    }
}

/// Print the effective configuration as pretty JSON.
pub fn show(config: &OcrDocConfig) -> anyhow::Result<()> {
    let default_path = default_config_path();
    if !default_path.exists() {
        eprintln!(
            "{} No config file at {}, showing defaults with overrides.",
            style("ℹ").blue(),
            default_path.display()
        );
    }

    println!("{}", serde_json::to_string_pretty(config)?);

    Ok(())
}
