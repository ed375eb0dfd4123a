//! Body-pose preset registry.

use crate::error::{RegistryError, RegistryResult};
use crate::model::{normalize_name, PosePreset};
use hexdeck_core::BodyPose;
use hexdeck_settings::ConfigSyncStore;
use serde_json::{json, Value};
use std::sync::Arc;

const DOCUMENT: &str = "poses";

/// Name-keyed store of saved body poses.
pub struct PoseRegistry {
    store: Arc<ConfigSyncStore>,
    presets: Vec<PosePreset>,
}

impl PoseRegistry {
    /// Load the registry from the store. Absent or unusable documents
    /// yield an empty registry.
    pub async fn load(store: Arc<ConfigSyncStore>) -> Self {
        let mut presets = Vec::new();
        if let Some(doc) = store.load_document(DOCUMENT).await {
            if let Some(entries) = doc.get("presets").and_then(Value::as_array) {
                for entry in entries {
                    if let Ok(preset) = serde_json::from_value::<PosePreset>(entry.clone()) {
                        if preset.name.trim().is_empty() {
                            continue;
                        }
                        let key = normalize_name(&preset.name);
                        if !presets
                            .iter()
                            .any(|p: &PosePreset| normalize_name(&p.name) == key)
                        {
                            presets.push(preset);
                        }
                    }
                }
            }
        }
        Self { store, presets }
    }

    pub fn list(&self) -> &[PosePreset] {
        &self.presets
    }

    pub fn get(&self, name: &str) -> Option<&BodyPose> {
        let key = normalize_name(name);
        self.presets
            .iter()
            .find(|p| normalize_name(&p.name) == key)
            .map(|p| &p.pose)
    }

    /// Save a pose under a name, replacing any existing preset with the
    /// same normalized name.
    pub async fn upsert(&mut self, name: &str, pose: BodyPose) -> RegistryResult<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RegistryError::InvariantViolation(
                "preset name must not be empty".to_string(),
            ));
        }
        let key = normalize_name(trimmed);
        match self
            .presets
            .iter_mut()
            .find(|p| normalize_name(&p.name) == key)
        {
            Some(existing) => existing.pose = pose,
            None => self.presets.push(PosePreset::new(trimmed, pose)),
        }
        self.persist().await;
        Ok(())
    }

    pub async fn delete(&mut self, name: &str) -> RegistryResult<()> {
        let key = normalize_name(name);
        let idx = self
            .presets
            .iter()
            .position(|p| normalize_name(&p.name) == key)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        self.presets.remove(idx);
        self.persist().await;
        Ok(())
    }

    async fn persist(&self) {
        let doc = json!({ "presets": self.presets });
        if let Err(e) = self.store.save_document(DOCUMENT, &doc).await {
            tracing::warn!(error = %e, "failed to persist pose presets");
        }
    }
}
