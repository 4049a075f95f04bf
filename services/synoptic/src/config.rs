//! Configuration types for the synoptic engine

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::session::Mode;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the apparatus backend
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Seconds between live snapshot refreshes
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Engine mode, chosen once per session
    #[serde(default = "default_mode")]
    pub mode: Mode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            poll_interval_seconds: default_poll_interval(),
            mode: default_mode(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_poll_interval() -> u64 {
    5
}

fn default_mode() -> Mode {
    Mode::Live
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::SynopticError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
