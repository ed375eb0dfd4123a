//! Registry entity records.
//!
//! Historical profile documents were duck-typed: entries were sometimes a
//! bare name string, sometimes a full object. Normalization happens here,
//! once, at the registry boundary — downstream code never branches on
//! runtime shape.

use chrono::{DateTime, Utc};
use hexdeck_core::BodyPose;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Normalized comparison key for entity names: trimmed, lowercased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A named configuration profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub description: String,
    pub last_modified: DateTime<Utc>,
    pub is_default: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            last_modified: Utc::now(),
            is_default: false,
        }
    }
}

impl Profile {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Normalize a legacy document entry: either a bare name string or a
    /// full object. Returns `None` for unusable entries.
    pub fn from_document_entry(value: &Value) -> Option<Profile> {
        match value {
            Value::String(name) if !name.trim().is_empty() => Some(Profile::new(name.trim(), "")),
            Value::Object(_) => serde_json::from_value(value.clone())
                .ok()
                .filter(|p: &Profile| !p.name.trim().is_empty()),
            _ => None,
        }
    }

    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }
}

/// A named leg-movement pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaitDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    /// Free-form pattern parameters the simulator and controller read
    /// (e.g. `{"pattern": "tripod", "period_s": 1.2}`).
    pub metadata: Value,
}

impl Default for GaitDefinition {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            description: String::new(),
            enabled: true,
            metadata: Value::Null,
        }
    }
}

impl GaitDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, metadata: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            metadata,
            ..Default::default()
        }
    }

    /// Normalize a legacy document entry (bare name string or object).
    pub fn from_document_entry(value: &Value) -> Option<GaitDefinition> {
        match value {
            Value::String(name) if !name.trim().is_empty() => {
                Some(GaitDefinition::new(name.trim(), "", Value::Null))
            }
            Value::Object(_) => serde_json::from_value(value.clone())
                .ok()
                .filter(|g: &GaitDefinition| !g.name.trim().is_empty()),
            _ => None,
        }
    }
}

/// A named body-pose preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosePreset {
    pub name: String,
    pub pose: BodyPose,
}

impl PosePreset {
    pub fn new(name: impl Into<String>, pose: BodyPose) -> Self {
        Self {
            name: name.into(),
            pose,
        }
    }
}
