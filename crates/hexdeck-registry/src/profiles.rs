//! Profile registry.
//!
//! Invariants: exactly one profile is flagged default; `current` always
//! names an existing profile; names are unique after normalization.

use crate::error::{RegistryError, RegistryResult};
use crate::model::{normalize_name, Profile};
use hexdeck_settings::ConfigSyncStore;
use serde_json::{json, Value};
use std::sync::Arc;

const DOCUMENT: &str = "profiles";
const FALLBACK_PROFILE: &str = "default";

/// Name-keyed profile registry backed by the sync store.
pub struct ProfileRegistry {
    store: Arc<ConfigSyncStore>,
    profiles: Vec<Profile>,
    current: String,
}

impl ProfileRegistry {
    /// Load the registry from the store, repairing invariants where a
    /// stale or legacy document violates them. Never fails: an absent or
    /// unusable document seeds a single default profile.
    pub async fn load(store: Arc<ConfigSyncStore>) -> Self {
        let document = store.load_document(DOCUMENT).await;
        let mut registry = Self::from_document(store, document.as_ref());
        registry.repair();
        registry
    }

    fn from_document(store: Arc<ConfigSyncStore>, document: Option<&Value>) -> Self {
        let mut profiles = Vec::new();
        let mut current = String::new();

        if let Some(doc) = document {
            if let Some(entries) = doc.get("profiles").and_then(Value::as_array) {
                for entry in entries {
                    if let Some(profile) = Profile::from_document_entry(entry) {
                        // First occurrence wins on duplicate names.
                        let key = normalize_name(&profile.name);
                        if !profiles
                            .iter()
                            .any(|p: &Profile| normalize_name(&p.name) == key)
                        {
                            profiles.push(profile);
                        }
                    }
                }
            }
            if let Some(name) = doc.get("current").and_then(Value::as_str) {
                current = name.to_string();
            }
        }

        Self {
            store,
            profiles,
            current,
        }
    }

    /// Enforce the registry invariants after loading an external document.
    fn repair(&mut self) {
        if self.profiles.is_empty() {
            let mut fallback = Profile::new(FALLBACK_PROFILE, "Factory default profile");
            fallback.is_default = true;
            self.profiles.push(fallback);
        }

        // Exactly one default: keep the first flagged one, or flag the
        // first profile.
        let default_idx = self
            .profiles
            .iter()
            .position(|p| p.is_default)
            .unwrap_or(0);
        for (i, profile) in self.profiles.iter_mut().enumerate() {
            profile.is_default = i == default_idx;
        }

        if self.find(&self.current).is_none() {
            self.current = self.profiles[default_idx].name.clone();
        }
    }

    pub fn list(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        let key = normalize_name(name);
        self.profiles
            .iter()
            .find(|p| normalize_name(&p.name) == key)
    }

    pub fn default_profile(&self) -> &Profile {
        // repair() guarantees one flagged profile.
        self.profiles
            .iter()
            .find(|p| p.is_default)
            .unwrap_or(&self.profiles[0])
    }

    fn find(&self, name: &str) -> Option<usize> {
        let key = normalize_name(name);
        self.profiles
            .iter()
            .position(|p| normalize_name(&p.name) == key)
    }

    /// Create a profile. The new profile clones the current profile's
    /// configuration unless `blank` is set.
    pub async fn create(
        &mut self,
        name: &str,
        description: &str,
        blank: bool,
    ) -> RegistryResult<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RegistryError::InvariantViolation(
                "profile name must not be empty".to_string(),
            ));
        }
        if self.find(trimmed).is_some() {
            return Err(RegistryError::AlreadyExists(trimmed.to_string()));
        }

        if !blank {
            let config = self.store.entry(&self.current);
            if let Err(e) = self.store.save(trimmed, &config).await {
                tracing::warn!(error = %e, profile = trimmed, "failed to clone configuration");
            }
        }

        self.profiles.push(Profile::new(trimmed, description));
        self.persist().await;
        Ok(())
    }

    /// Delete a profile. Rejected for the default profile and for the
    /// current profile (switch to the default first).
    pub async fn delete(&mut self, name: &str) -> RegistryResult<()> {
        let idx = self
            .find(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        if self.profiles[idx].is_default {
            return Err(RegistryError::InvariantViolation(
                "cannot delete the default profile".to_string(),
            ));
        }
        if normalize_name(&self.profiles[idx].name) == normalize_name(&self.current) {
            return Err(RegistryError::InvariantViolation(
                "cannot delete the current profile; switch to the default first".to_string(),
            ));
        }

        self.profiles.remove(idx);
        self.persist().await;
        Ok(())
    }

    /// Flag a profile as default, atomically clearing the flag elsewhere.
    pub async fn set_default(&mut self, name: &str) -> RegistryResult<()> {
        let idx = self
            .find(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        for (i, profile) in self.profiles.iter_mut().enumerate() {
            profile.is_default = i == idx;
        }
        self.profiles[idx].touch();
        self.persist().await;
        Ok(())
    }

    /// Switch the current profile. Pending debounced edits for the old
    /// profile flush first so nothing is lost.
    pub async fn switch_current(&mut self, name: &str) -> RegistryResult<()> {
        let idx = self
            .find(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        if let Err(e) = self.store.flush_pending().await {
            tracing::warn!(error = %e, "flush before profile switch failed");
        }
        self.current = self.profiles[idx].name.clone();
        self.persist().await;
        Ok(())
    }

    async fn persist(&self) {
        let doc = json!({
            "profiles": self.profiles,
            "current": self.current,
        });
        if let Err(e) = self.store.save_document(DOCUMENT, &doc).await {
            tracing::warn!(error = %e, "failed to persist profile registry");
        }
    }
}
