//! Viewer configuration
//!
//! Configuration is stored as YAML in the user's config directory.
//! Default location: ~/.config/gliss/config.yaml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use gliss_widgets::RollConfig;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ViewerConfig {
    /// Window settings
    pub window: WindowConfig,
    /// Roll display settings
    pub display: DisplayConfig,
}

/// Window configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 700.0,
        }
    }
}

/// Roll display configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Reserve the piano-key label gutter on the left
    pub gutter: bool,
    /// Major gridline spacing in seconds
    pub time_step: f64,
    /// Minor gridline spacing in seconds
    pub minor_time_step: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            gutter: true,
            time_step: 1.0,
            minor_time_step: 0.25,
        }
    }
}

impl DisplayConfig {
    /// Translate into the widget-level roll configuration
    pub fn roll_config(&self) -> RollConfig {
        RollConfig {
            time_step: self.time_step,
            minor_time_step: self.minor_time_step,
            ..RollConfig::default()
        }
    }
}

/// Get the default config file path
///
/// Returns: ~/.config/gliss/config.yaml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join("gliss")
        .join("config.yaml")
}

/// Load config from a path, falling back to defaults
///
/// A missing file is normal (first run); a malformed file is logged and
/// replaced by defaults rather than aborting startup.
pub fn load_config(path: &Path) -> ViewerConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str(&contents) {
            Ok(config) => {
                log::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("Malformed config at {:?} ({e}); using defaults", path);
                ViewerConfig::default()
            }
        },
        Err(_) => {
            log::info!("No config at {:?}; using defaults", path);
            ViewerConfig::default()
        }
    }
}

/// Save config to a path, creating parent directories as needed
pub fn save_config(config: &ViewerConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating config directory {:?}", parent))?;
    }
    let yaml = serde_yaml::to_string(config).context("serializing config")?;
    std::fs::write(path, yaml).with_context(|| format!("writing config to {:?}", path))?;
    Ok(())
}
