//! Configuration loading
//!
//! Reads `~/.config/bblsearch/config.toml`. Every field has a default, so a
//! missing file (or a missing section) is never an error.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BblError;

pub mod types;

pub use types::{Config, SearchConfig, ServiceConfig};

const CONFIG_DIR: &str = "bblsearch";
const CONFIG_FILE: &str = "config.toml";

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config").join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load the config from the default location
///
/// A missing file yields defaults. An unreadable or malformed file is logged
/// and also yields defaults; only an explicitly requested file is fatal.
pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };

    if !path.exists() {
        return Config::default();
    }

    match load_config_from_path(&path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring config: {}", e);
            Config::default()
        }
    }
}

/// Load the config from an explicit path
pub fn load_config_from_path(path: &Path) -> Result<Config, BblError> {
    let contents = fs::read_to_string(path).map_err(|e| BblError::Config {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    parse_config(&contents).map_err(|message| BblError::Config {
        path: path.display().to_string(),
        message,
    })
}

pub fn parse_config(content: &str) -> Result<Config, String> {
    toml::from_str::<Config>(content).map_err(|e| e.message().to_string())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
