//! CLI command implementations.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use pagesmith_core::Config;

pub mod build;
pub mod check;
pub mod routes;

/// Load the site configuration, layering `PAGESMITH__*` environment
/// overrides over the file.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load_with_env(path)
        .wrap_err_with(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Resolve a configured directory relative to the config file's location.
pub fn resolve_dir(config_path: &Path, dir: &str) -> PathBuf {
    let dir = Path::new(dir);
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(dir),
        _ => dir.to_path_buf(),
    }
}
