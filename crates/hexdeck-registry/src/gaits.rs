//! Gait registry.
//!
//! Invariants: at least one gait is enabled at all times; the active gait
//! is always enabled; names are unique after normalization.

use crate::error::{RegistryError, RegistryResult};
use crate::model::{normalize_name, GaitDefinition};
use hexdeck_settings::ConfigSyncStore;
use serde_json::{json, Value};
use std::sync::Arc;

const DOCUMENT: &str = "gaits";

fn builtin_gaits() -> Vec<GaitDefinition> {
    vec![
        GaitDefinition::new(
            "tripod",
            "Alternating tripods, fastest statically stable gait",
            json!({"pattern": "tripod", "period_s": 1.2, "duty": 0.5}),
        ),
        GaitDefinition::new(
            "wave",
            "One leg swings at a time, maximum stability",
            json!({"pattern": "wave", "period_s": 3.0, "duty": 0.83}),
        ),
        GaitDefinition::new(
            "ripple",
            "Overlapping pairs, balance of speed and stability",
            json!({"pattern": "ripple", "period_s": 1.8, "duty": 0.66}),
        ),
    ]
}

/// Name-keyed gait registry backed by the sync store.
pub struct GaitRegistry {
    store: Arc<ConfigSyncStore>,
    gaits: Vec<GaitDefinition>,
    active: String,
}

impl GaitRegistry {
    /// Load the registry from the store. Never fails: an absent or
    /// unusable document seeds the built-in gaits with tripod active.
    pub async fn load(store: Arc<ConfigSyncStore>) -> Self {
        let document = store.load_document(DOCUMENT).await;
        let mut registry = Self::from_document(store, document.as_ref());
        registry.repair();
        registry
    }

    fn from_document(store: Arc<ConfigSyncStore>, document: Option<&Value>) -> Self {
        let mut gaits = Vec::new();
        let mut active = String::new();

        if let Some(doc) = document {
            if let Some(entries) = doc.get("gaits").and_then(Value::as_array) {
                for entry in entries {
                    if let Some(gait) = GaitDefinition::from_document_entry(entry) {
                        let key = normalize_name(&gait.name);
                        if !gaits
                            .iter()
                            .any(|g: &GaitDefinition| normalize_name(&g.name) == key)
                        {
                            gaits.push(gait);
                        }
                    }
                }
            }
            if let Some(name) = doc.get("active").and_then(Value::as_str) {
                active = name.to_string();
            }
        }

        Self {
            store,
            gaits,
            active,
        }
    }

    fn repair(&mut self) {
        if self.gaits.is_empty() {
            self.gaits = builtin_gaits();
        }
        if !self.gaits.iter().any(|g| g.enabled) {
            self.gaits[0].enabled = true;
        }

        let active_ok = self
            .find(&self.active)
            .map(|i| self.gaits[i].enabled)
            .unwrap_or(false);
        if !active_ok {
            // repair() above guarantees an enabled gait exists.
            if let Some(first) = self.gaits.iter().find(|g| g.enabled) {
                self.active = first.name.clone();
            }
        }
    }

    pub fn list(&self) -> &[GaitDefinition] {
        &self.gaits
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn get(&self, name: &str) -> Option<&GaitDefinition> {
        let key = normalize_name(name);
        self.gaits.iter().find(|g| normalize_name(&g.name) == key)
    }

    pub fn active_gait(&self) -> Option<&GaitDefinition> {
        self.get(&self.active)
    }

    fn find(&self, name: &str) -> Option<usize> {
        let key = normalize_name(name);
        self.gaits
            .iter()
            .position(|g| normalize_name(&g.name) == key)
    }

    fn enabled_count(&self) -> usize {
        self.gaits.iter().filter(|g| g.enabled).count()
    }

    /// Register a new gait definition.
    pub async fn create(&mut self, gait: GaitDefinition) -> RegistryResult<()> {
        if gait.name.trim().is_empty() {
            return Err(RegistryError::InvariantViolation(
                "gait name must not be empty".to_string(),
            ));
        }
        if self.find(&gait.name).is_some() {
            return Err(RegistryError::AlreadyExists(gait.name.clone()));
        }
        self.gaits.push(gait);
        self.persist().await;
        Ok(())
    }

    /// Select the active gait. The target must exist and be enabled.
    pub async fn set_active(&mut self, name: &str) -> RegistryResult<()> {
        let idx = self
            .find(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        if !self.gaits[idx].enabled {
            return Err(RegistryError::InvariantViolation(format!(
                "gait '{}' is disabled",
                self.gaits[idx].name
            )));
        }
        self.active = self.gaits[idx].name.clone();
        self.persist().await;
        Ok(())
    }

    /// Enable or disable a gait. Disabling is rejected for the active
    /// gait and for the last enabled gait.
    pub async fn set_enabled(&mut self, name: &str, enabled: bool) -> RegistryResult<()> {
        let idx = self
            .find(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        if !enabled {
            if normalize_name(&self.gaits[idx].name) == normalize_name(&self.active) {
                return Err(RegistryError::InvariantViolation(format!(
                    "gait '{}' is active; select another gait first",
                    self.gaits[idx].name
                )));
            }
            if self.gaits[idx].enabled && self.enabled_count() == 1 {
                return Err(RegistryError::InvariantViolation(
                    "at least one gait must remain enabled".to_string(),
                ));
            }
        }

        self.gaits[idx].enabled = enabled;
        self.persist().await;
        Ok(())
    }

    /// Delete a gait. Deleting the active gait requires `replacement` to
    /// name another enabled gait; deleting the last enabled gait is
    /// always rejected.
    pub async fn delete(&mut self, name: &str, replacement: Option<&str>) -> RegistryResult<()> {
        let idx = self
            .find(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        if self.gaits[idx].enabled && self.enabled_count() == 1 {
            return Err(RegistryError::InvariantViolation(
                "cannot delete the last enabled gait".to_string(),
            ));
        }

        if normalize_name(&self.gaits[idx].name) == normalize_name(&self.active) {
            let replacement =
                replacement.ok_or_else(|| {
                    RegistryError::InvariantViolation(
                        "deleting the active gait requires a replacement".to_string(),
                    )
                })?;
            let rep_idx = self
                .find(replacement)
                .ok_or_else(|| RegistryError::NotFound(replacement.to_string()))?;
            if rep_idx == idx {
                return Err(RegistryError::InvariantViolation(
                    "replacement must be a different gait".to_string(),
                ));
            }
            if !self.gaits[rep_idx].enabled {
                return Err(RegistryError::InvariantViolation(format!(
                    "replacement gait '{}' is disabled",
                    self.gaits[rep_idx].name
                )));
            }
            self.active = self.gaits[rep_idx].name.clone();
        }

        self.gaits.remove(idx);
        self.persist().await;
        Ok(())
    }

    async fn persist(&self) {
        let doc = json!({
            "gaits": self.gaits,
            "active": self.active,
        });
        if let Err(e) = self.store.save_document(DOCUMENT, &doc).await {
            tracing::warn!(error = %e, "failed to persist gait registry");
        }
    }
}
