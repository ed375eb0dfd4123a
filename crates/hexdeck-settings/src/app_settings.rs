//! Application-level preferences.
//!
//! Local TOML file in the platform config directory, separate from robot
//! configuration: these settings never sync to the controller.

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Deck preferences loaded at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Remote controller address, `host:port`.
    pub remote_addr: String,
    /// Render/reconcile tick rate in Hz.
    pub tick_hz: u32,
    /// Structural merge keys (see the store's merge policy). Shipped as
    /// configuration because the exact set is a product decision.
    pub structural_keys: Vec<String>,
    /// Debounce quiet window for interactive saves, milliseconds.
    pub debounce_ms: u64,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            remote_addr: "192.168.4.1:8765".to_string(),
            tick_hz: 60,
            structural_keys: vec!["cameras".to_string(), "pose_presets".to_string()],
            debounce_ms: 300,
            log_filter: "info".to_string(),
        }
    }
}

impl AppSettings {
    /// Default preferences file path, e.g. `~/.config/hexdeck/hexdeck.toml`.
    pub fn default_path() -> SettingsResult<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| SettingsError::ConfigDirectory("no platform config dir".to_string()))?;
        Ok(base.join("hexdeck").join("hexdeck.toml"))
    }

    /// Load from file, or defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save to file, creating parent directories as needed.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate preference values.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.tick_hz == 0 || self.tick_hz > 240 {
            return Err(SettingsError::InvalidSetting {
                key: "tick_hz".to_string(),
                reason: format!("{} outside 1..=240", self.tick_hz),
            });
        }
        if self.remote_addr.is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: "remote_addr".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.debounce_ms == 0 {
            return Err(SettingsError::InvalidSetting {
                key: "debounce_ms".to_string(),
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }

    /// Tick period derived from `tick_hz`.
    pub fn tick_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.tick_hz as f64)
    }
}
