//! The configuration sync store.
//!
//! Reconciles the durable client cache with the remote authority:
//! cache wins on conflict, remote fills gaps, and designated structural
//! keys prefer a non-empty remote value over an empty cached one. Saves
//! are synchronous to cache (the only hard durability guarantee) and
//! best-effort to the remote; rapid slider edits are coalesced through a
//! single-slot debounced writer.

use crate::cache::CacheStore;
use crate::error::SettingsResult;
use crate::remote::RemoteConfigClient;
use hexdeck_core::ConfigEntry;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Store tuning knobs.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Keys where an empty cached value yields to a non-empty remote
    /// value even though the key exists locally. The exact set is a
    /// product decision; it ships as configuration, not code.
    pub structural_keys: Vec<String>,
    /// Quiet window for coalescing interactive saves.
    pub debounce_window: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            structural_keys: vec!["cameras".to_string(), "pose_presets".to_string()],
            debounce_window: Duration::from_millis(300),
        }
    }
}

/// Merge a cached entry with the remote authoritative entry.
///
/// Rules: remote-provided keys populate any key absent from cache; for
/// keys present in both, the cached (locally edited) value wins — except
/// structural keys, where an empty cached value defers to a non-empty
/// remote one. Either side may be absent.
pub fn merge_entries(
    cached: Option<&ConfigEntry>,
    remote: Option<&ConfigEntry>,
    structural_keys: &[String],
) -> ConfigEntry {
    match (cached, remote) {
        (None, None) => ConfigEntry::new(),
        (Some(c), None) => c.clone(),
        (None, Some(r)) => r.clone(),
        (Some(c), Some(r)) => {
            let mut merged = c.clone();
            for (key, remote_value) in r.iter() {
                let take_remote = match merged.get(key) {
                    None => true,
                    Some(cached_value) => {
                        structural_keys.contains(key)
                            && ConfigEntry::value_is_empty(cached_value)
                            && !ConfigEntry::value_is_empty(remote_value)
                    }
                };
                if take_remote {
                    merged.set(key.clone(), remote_value.clone());
                }
            }
            merged
        }
    }
}

struct PendingWrite {
    profile: String,
    handle: tokio::task::JoinHandle<()>,
}

/// Two-tier persistence for profile configurations and registry documents.
pub struct ConfigSyncStore {
    cache: Box<dyn CacheStore>,
    remote: Arc<dyn RemoteConfigClient>,
    config: StoreConfig,
    entries: RwLock<HashMap<String, ConfigEntry>>,
    /// Single pending-timer slot; a new edit aborts and replaces it.
    pending: Mutex<Option<PendingWrite>>,
}

impl ConfigSyncStore {
    pub fn new(
        cache: Box<dyn CacheStore>,
        remote: Arc<dyn RemoteConfigClient>,
        config: StoreConfig,
    ) -> Self {
        Self {
            cache,
            remote,
            config,
            entries: RwLock::new(HashMap::new()),
            pending: Mutex::new(None),
        }
    }

    /// Load a profile's configuration: cache merged with remote, falling
    /// back to cache only, then to built-in defaults (an empty entry —
    /// consumers default every documented key). Never fails.
    pub async fn load(&self, profile: &str) -> ConfigEntry {
        let cached = match self.cache.read(profile) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, profile, "cache read failed; treating as absent");
                None
            }
        };
        let remote = match self.remote.fetch_config(profile).await {
            Ok(r) => Some(r),
            Err(e) => {
                tracing::warn!(error = %e, profile, "remote fetch failed; using cache only");
                None
            }
        };

        let merged = merge_entries(cached.as_ref(), remote.as_ref(), &self.config.structural_keys);
        self.entries
            .write()
            .insert(profile.to_string(), merged.clone());
        merged
    }

    /// Current in-memory entry for a profile (empty if never loaded).
    pub fn entry(&self, profile: &str) -> ConfigEntry {
        self.entries.read().get(profile).cloned().unwrap_or_default()
    }

    /// Merge `updates` into the in-memory entry, write the full entry to
    /// the durable cache synchronously, then push to the remote best
    /// effort. Remote failure is logged, never raised.
    pub async fn save(&self, profile: &str, updates: &ConfigEntry) -> SettingsResult<()> {
        let entry = self.apply_updates(profile, updates);
        self.cache.write(profile, &entry)?;
        if let Err(e) = self.remote.push_config(profile, &entry).await {
            tracing::warn!(error = %e, profile, "remote push failed; cache is durable");
        }
        Ok(())
    }

    /// Coalescing save for rapid interactive controls. The in-memory
    /// entry updates immediately; the durable write fires once after the
    /// quiet window, and each new edit resets the timer rather than
    /// stacking pending writes.
    pub fn save_debounced(self: &Arc<Self>, profile: &str, updates: &ConfigEntry) {
        self.apply_updates(profile, updates);

        let mut pending = self.pending.lock();
        if let Some(prev) = pending.take() {
            prev.handle.abort();
            if prev.profile != profile {
                // Edits moved to another profile: flush the old one now
                // instead of losing it.
                let store = Arc::clone(self);
                tokio::spawn(async move {
                    if let Err(e) = store.flush(&prev.profile).await {
                        tracing::warn!(error = %e, profile = %prev.profile, "flush failed");
                    }
                });
            }
        }

        let store = Arc::clone(self);
        let prof = profile.to_string();
        let window = self.config.debounce_window;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if let Err(e) = store.flush(&prof).await {
                tracing::warn!(error = %e, profile = %prof, "debounced flush failed");
            }
        });
        *pending = Some(PendingWrite {
            profile: profile.to_string(),
            handle,
        });
    }

    /// Abort the pending debounce timer (if any) and flush its profile
    /// immediately. Called on shutdown and before profile switches.
    pub async fn flush_pending(&self) -> SettingsResult<()> {
        let prev = self.pending.lock().take();
        if let Some(prev) = prev {
            prev.handle.abort();
            self.flush(&prev.profile).await?;
        }
        Ok(())
    }

    /// Load a named registry document: remote first (cached on success),
    /// cache when the remote is away, `None` when neither side has it.
    pub async fn load_document(&self, name: &str) -> Option<Value> {
        let key = Self::document_key(name);
        match self.remote.fetch_document(name).await {
            Ok(value) => {
                let mut wrapper = ConfigEntry::new();
                wrapper.set("data", value.clone());
                if let Err(e) = self.cache.write(&key, &wrapper) {
                    tracing::warn!(error = %e, name, "failed to cache document");
                }
                Some(value)
            }
            Err(e) => {
                tracing::debug!(error = %e, name, "remote document fetch failed; using cache");
                match self.cache.read(&key) {
                    Ok(Some(wrapper)) => wrapper.get("data").cloned(),
                    Ok(None) => None,
                    Err(e) => {
                        tracing::warn!(error = %e, name, "cached document unreadable");
                        None
                    }
                }
            }
        }
    }

    /// Persist a named registry document: durable cache first, remote
    /// best effort.
    pub async fn save_document(&self, name: &str, value: &Value) -> SettingsResult<()> {
        let mut wrapper = ConfigEntry::new();
        wrapper.set("data", value.clone());
        self.cache.write(&Self::document_key(name), &wrapper)?;
        if let Err(e) = self.remote.push_document(name, value).await {
            tracing::warn!(error = %e, name, "remote document push failed; cache is durable");
        }
        Ok(())
    }

    pub fn structural_keys(&self) -> &[String] {
        &self.config.structural_keys
    }

    fn document_key(name: &str) -> String {
        format!("doc_{}", name)
    }

    fn apply_updates(&self, profile: &str, updates: &ConfigEntry) -> ConfigEntry {
        let mut entries = self.entries.write();
        let entry = entries.entry(profile.to_string()).or_default();
        entry.merge_updates(updates);
        entry.clone()
    }

    async fn flush(&self, profile: &str) -> SettingsResult<()> {
        let entry = self.entry(profile);
        self.cache.write(profile, &entry)?;
        if let Err(e) = self.remote.push_config(profile, &entry).await {
            tracing::warn!(error = %e, profile, "remote push failed; cache is durable");
        }
        Ok(())
    }
}
