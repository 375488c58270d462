//! Application configuration management
//!
//! Remembers the confirmed target wattage between sessions, the desktop
//! counterpart of the original bookmarkable URL. Stored as JSON in the
//! platform config directory; loading falls back to defaults so a broken
//! file never blocks startup.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Last confirmed target wattage; revalidated before use.
    pub last_target_power: Option<u32>,
}

impl AppConfig {
    fn config_file() -> Option<PathBuf> {
        ProjectDirs::from("io.github", "towatt", "towatt")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load the stored configuration, using defaults on any problem.
    pub fn load() -> Self {
        let Some(path) = Self::config_file() else {
            return Self::default();
        };
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            // Missing file on first run is the normal case.
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("ignoring malformed config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Save the configuration to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file().context("no usable config directory")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn remember_target(&mut self, value: u32) {
        self.last_target_power = Some(value);
    }

    pub fn clear_target(&mut self) {
        self.last_target_power = None;
    }
}
