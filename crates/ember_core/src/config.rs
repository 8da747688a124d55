//! Configuration management for the engagement engine.
//!
//! Loads settings from /etc/ember/config.toml or uses defaults. A missing
//! or unreadable file never fails the caller; the engine runs on defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/ember/config.toml";

/// Which persistence backend the CLI and embedding host should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// One JSON file per user under the data directory
    Json,
    /// SQLite database under the data directory
    #[default]
    Sqlite,
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding per-user state
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Persistence backend
    #[serde(default)]
    pub store: StoreBackend,

    /// User id assumed when the caller does not name one
    #[serde(default = "default_user")]
    pub default_user: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("/var/lib/ember")
}

fn default_user() -> String {
    "local".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            store: StoreBackend::default(),
            default_user: default_user(),
        }
    }
}

impl EngineConfig {
    /// Load from the default path, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    /// Load from a specific path, falling back to defaults on any failure.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded engine config");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Path of the SQLite database under the data directory.
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("engagement.db")
    }
}
