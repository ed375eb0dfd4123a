//! Durable client cache: the offline source of truth.
//!
//! A key-value scoped store surviving process restarts. Absence of an
//! entry is a valid state, not an error.

use crate::error::{SettingsError, SettingsResult};
use hexdeck_core::ConfigEntry;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Storage backend for cached configuration entries, keyed by profile.
pub trait CacheStore: Send + Sync {
    /// Read the cached entry for a profile, if one exists.
    fn read(&self, profile: &str) -> SettingsResult<Option<ConfigEntry>>;

    /// Write (overwrite) the cached entry for a profile.
    fn write(&self, profile: &str, entry: &ConfigEntry) -> SettingsResult<()>;

    /// Remove a profile's cached entry, if present.
    fn remove(&self, profile: &str) -> SettingsResult<()>;
}

/// File-backed cache: one JSON document per profile under a base
/// directory (platform config dir by default).
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Cache rooted at an explicit directory (tests use a tempdir).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache under the platform config directory, e.g.
    /// `~/.config/hexdeck/cache` on Linux.
    pub fn for_app() -> SettingsResult<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| SettingsError::ConfigDirectory("no platform config dir".to_string()))?;
        Ok(Self::new(base.join("hexdeck").join("cache")))
    }

    fn path_for(&self, profile: &str) -> PathBuf {
        // Profile names are normalized upstream; sanitize anyway so a
        // hostile name cannot escape the cache directory.
        let safe: String = profile
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CacheStore for FileCache {
    fn read(&self, profile: &str) -> SettingsResult<Option<ConfigEntry>> {
        let path = self.path_for(profile);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| SettingsError::CacheRead(format!("{}: {}", path.display(), e)))?;
        let entry: ConfigEntry = serde_json::from_str(&content)
            .map_err(|e| SettingsError::CacheRead(format!("{}: {}", path.display(), e)))?;
        Ok(Some(entry))
    }

    fn write(&self, profile: &str, entry: &ConfigEntry) -> SettingsResult<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| SettingsError::CacheWrite(format!("{}: {}", self.dir.display(), e)))?;
        let path = self.path_for(profile);
        let content = serde_json::to_string_pretty(entry)?;
        std::fs::write(&path, content)
            .map_err(|e| SettingsError::CacheWrite(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    fn remove(&self, profile: &str) -> SettingsResult<()> {
        let path = self.path_for(profile);
        if path.exists() {
            std::fs::remove_file(&path)
                .map_err(|e| SettingsError::CacheWrite(format!("{}: {}", path.display(), e)))?;
        }
        Ok(())
    }
}

/// In-memory cache for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, ConfigEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCache {
    fn read(&self, profile: &str) -> SettingsResult<Option<ConfigEntry>> {
        Ok(self.entries.read().get(profile).cloned())
    }

    fn write(&self, profile: &str, entry: &ConfigEntry) -> SettingsResult<()> {
        self.entries
            .write()
            .insert(profile.to_string(), entry.clone());
        Ok(())
    }

    fn remove(&self, profile: &str) -> SettingsResult<()> {
        self.entries.write().remove(profile);
        Ok(())
    }
}
