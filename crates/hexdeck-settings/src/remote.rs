//! Remote configuration authority boundary.
//!
//! The controller exposes request/response operations for configuration,
//! profile, gait, and pose documents. Every call is fallible and every
//! failure degrades gracefully to cached or default data — the core never
//! crashes because the remote side is away.

use crate::error::{SettingsError, SettingsResult};
use async_trait::async_trait;
use hexdeck_core::ConfigEntry;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

/// Client for the remote configuration API.
///
/// Named documents ("profiles", "gaits", "poses") carry the registry
/// lists; per-profile [`ConfigEntry`] documents carry everything else.
#[async_trait]
pub trait RemoteConfigClient: Send + Sync {
    /// Fetch the authoritative config entry for a profile.
    async fn fetch_config(&self, profile: &str) -> SettingsResult<ConfigEntry>;

    /// Persist a config entry for a profile.
    async fn push_config(&self, profile: &str, entry: &ConfigEntry) -> SettingsResult<()>;

    /// Fetch a named document (registry lists).
    async fn fetch_document(&self, name: &str) -> SettingsResult<Value>;

    /// Persist a named document.
    async fn push_document(&self, name: &str, value: &Value) -> SettingsResult<()>;
}

/// Remote client that is always unavailable. Used when the deck runs
/// fully offline; every load falls back to cache or defaults.
pub struct OfflineRemote;

#[async_trait]
impl RemoteConfigClient for OfflineRemote {
    async fn fetch_config(&self, _profile: &str) -> SettingsResult<ConfigEntry> {
        Err(SettingsError::RemoteUnavailable("offline".to_string()))
    }

    async fn push_config(&self, _profile: &str, _entry: &ConfigEntry) -> SettingsResult<()> {
        Err(SettingsError::RemoteUnavailable("offline".to_string()))
    }

    async fn fetch_document(&self, _name: &str) -> SettingsResult<Value> {
        Err(SettingsError::RemoteUnavailable("offline".to_string()))
    }

    async fn push_document(&self, _name: &str, _value: &Value) -> SettingsResult<()> {
        Err(SettingsError::RemoteUnavailable("offline".to_string()))
    }
}

/// In-memory remote for tests: scripted contents plus a failure switch.
#[derive(Default)]
pub struct MockRemote {
    configs: RwLock<HashMap<String, ConfigEntry>>,
    documents: RwLock<HashMap<String, Value>>,
    failing: RwLock<bool>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_config(&self, profile: &str, entry: ConfigEntry) {
        self.configs.write().insert(profile.to_string(), entry);
    }

    pub fn set_document(&self, name: &str, value: Value) {
        self.documents.write().insert(name.to_string(), value);
    }

    pub fn document(&self, name: &str) -> Option<Value> {
        self.documents.read().get(name).cloned()
    }

    pub fn config(&self, profile: &str) -> Option<ConfigEntry> {
        self.configs.read().get(profile).cloned()
    }

    /// Make every subsequent call fail (simulated outage).
    pub fn set_failing(&self, failing: bool) {
        *self.failing.write() = failing;
    }

    fn check(&self) -> SettingsResult<()> {
        if *self.failing.read() {
            Err(SettingsError::RemoteUnavailable(
                "simulated outage".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteConfigClient for MockRemote {
    async fn fetch_config(&self, profile: &str) -> SettingsResult<ConfigEntry> {
        self.check()?;
        self.configs
            .read()
            .get(profile)
            .cloned()
            .ok_or_else(|| SettingsError::RemoteUnavailable(format!("no config for {}", profile)))
    }

    async fn push_config(&self, profile: &str, entry: &ConfigEntry) -> SettingsResult<()> {
        self.check()?;
        self.configs
            .write()
            .insert(profile.to_string(), entry.clone());
        Ok(())
    }

    async fn fetch_document(&self, name: &str) -> SettingsResult<Value> {
        self.check()?;
        self.documents
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| SettingsError::RemoteUnavailable(format!("no document {}", name)))
    }

    async fn push_document(&self, name: &str, value: &Value) -> SettingsResult<()> {
        self.check()?;
        self.documents
            .write()
            .insert(name.to_string(), value.clone());
        Ok(())
    }
}
