//! Client configuration loading.
//!
//! Precedence: environment variables, then `config.toml`, then defaults.

use crate::paths::HuddlePaths;
use crate::storage::AtomicTomlFile;
use huddle_core::config::{normalize_base_url, ClientConfig};
use huddle_core::error::{HuddleError, Result};
use std::path::{Path, PathBuf};

pub const ENV_API_BASE_URL: &str = "HUDDLE_API_BASE_URL";
pub const ENV_STATE_DIR: &str = "HUDDLE_STATE_DIR";

/// Reads `path`, falling back to defaults when the file is missing or empty.
pub fn load_config_file(path: &Path) -> Result<ClientConfig> {
    let config = AtomicTomlFile::<ClientConfig>::new(path.to_path_buf())
        .load()
        .map_err(|e| HuddleError::config(format!("{}: {}", path.display(), e)))?;
    match config {
        Some(config) => {
            tracing::debug!("[ConfigLoader] Loaded {}", path.display());
            Ok(config)
        }
        None => Ok(ClientConfig::default()),
    }
}

/// Applies overrides from `lookup` and normalizes the base URL.
pub fn apply_overrides<F>(mut config: ClientConfig, lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
        config.api_base_url = url;
    }
    if let Some(dir) = lookup(ENV_STATE_DIR).filter(|v| !v.trim().is_empty()) {
        config.state_dir = Some(PathBuf::from(dir.trim()));
    }
    config.api_base_url = normalize_base_url(&config.api_base_url)?;
    Ok(config)
}

/// Loads the effective configuration for this process.
///
/// `explicit_path` replaces the default `config.toml` location.
pub fn load_client_config(explicit_path: Option<&Path>) -> Result<ClientConfig> {
    let path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => HuddlePaths::config_file()?,
    };
    let config = load_config_file(&path)?;
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Resolves the directory holding the persisted entries.
pub fn resolve_state_dir(config: &ClientConfig) -> Result<PathBuf> {
    Ok(HuddlePaths::state_dir(config.state_dir.as_deref())?)
}
