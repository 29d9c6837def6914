//! Configuration for the catalog file location.
//!
//! Resolution order (highest priority first):
//! 1. `--catalog` CLI flag (handled by the CLI layer)
//! 2. `LIBRIS_CATALOG` environment variable
//! 3. Config file (`.libris/config.yaml`, discovered by searching the
//!    current directory and its parents; paths in the file are relative to
//!    the config file's parent directory)
//! 4. Default (`~/.libris/catalog.json`)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Catalog file (relative to the config file's project directory)
    pub catalog: Option<String>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".libris").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Resolve the catalog file path from env var, config file, or default
pub fn catalog_path() -> Result<PathBuf> {
    if let Ok(env_path) = std::env::var("LIBRIS_CATALOG") {
        return Ok(PathBuf::from(env_path));
    }

    if let Some(config_path) = find_config_file() {
        let config = load_config_file(&config_path)?;
        if let Some(ref catalog) = config.paths.catalog {
            // Base directory is the parent of .libris/ (the project root)
            let base = config_path
                .parent()
                .and_then(|p| p.parent())
                .unwrap_or(Path::new("."));
            return Ok(resolve_path(base, catalog));
        }
    }

    let home = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home.join(".libris").join("catalog.json"))
}
