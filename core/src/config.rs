//! Client configuration
//!
//! One knob matters: where the automation server lives. Loaded from
//! `autoctl.toml` in the working directory or the user config directory,
//! falling back to defaults when no file exists.

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the automation server endpoint
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Base URL of the automation server (host:port, no trailing path)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Top-level configuration file contents
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from the standard locations
    ///
    /// Returns defaults when no configuration file is present.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| ClientError::InvalidConfig {
            message: format!("{}: {}", path.display(), e),
        })
    }
}

/// Find the configuration file in standard locations
pub fn find_config_file() -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join("autoctl.toml");
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(dir) = get_config_dir() {
        let path = dir.join("autoctl.toml");
        if path.exists() {
            return Some(path);
        }
    }

    None
}

/// Get the configuration directory path
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("autoctl"))
}
