//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML file and maps it onto the [`AppConfig`] DTO. No validation
//! and no defaults here: empty values are facts, and the policy structs in
//! `sl_core::config::policy` decide what an empty value means.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use sl_core::config::AppConfig;

const CONFIG_FILE: &str = "config.toml";

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// `<config dir>/skinlens/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("skinlens").join(CONFIG_FILE))
}

/// Loads the explicit path if given. Otherwise loads the default path when
/// the file exists, and falls back to an empty config when it does not.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_config(&path),
        Some(path) => {
            info!(path = %path.display(), "no config file, using empty config");
            Ok(AppConfig::empty())
        }
        None => Ok(AppConfig::empty()),
    }
}
