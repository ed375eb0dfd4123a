//! The flat configuration entry shared by the sync store, geometry
//! resolution, and the registries.
//!
//! A `ConfigEntry` is a string-keyed map of scalar/array values. No nested
//! schema is enforced beyond the documented keys; consumers use the typed
//! accessors and fall back to defaults for anything absent or mistyped.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One profile's configuration: a flat string-keyed value map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigEntry {
    values: BTreeMap<String, Value>,
}

impl ConfigEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Numeric value for `key`, if present and numeric.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(Value::as_f64)
    }

    /// Numeric value for `key`, or `default`.
    pub fn get_f64_or(&self, key: &str, default: f64) -> f64 {
        self.get_f64(key).unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn get_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.values.get(key).and_then(Value::as_array)
    }

    /// Array of numbers for `key`, if present and fully numeric.
    pub fn get_f64_array(&self, key: &str) -> Option<Vec<f64>> {
        self.get_array(key)?
            .iter()
            .map(Value::as_f64)
            .collect::<Option<Vec<f64>>>()
    }

    /// True when a value is "empty" for merge purposes: null, empty
    /// string, empty array, or empty object.
    pub fn value_is_empty(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(a) => a.is_empty(),
            Value::Object(o) => o.is_empty(),
            _ => false,
        }
    }

    /// Overlay `updates` onto this entry, replacing existing keys.
    pub fn merge_updates(&mut self, updates: &ConfigEntry) {
        for (key, value) in &updates.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

impl FromIterator<(String, Value)> for ConfigEntry {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_accessors() {
        let mut entry = ConfigEntry::new();
        entry.set("body_height", json!(90));
        entry.set("cameras", json!(["front", "rear"]));
        entry.set("name", json!("default"));

        assert_eq!(entry.get_f64("body_height"), Some(90.0));
        assert_eq!(entry.get_f64_or("missing", 1.5), 1.5);
        assert_eq!(entry.get_str("name"), Some("default"));
        assert_eq!(entry.get_array("cameras").unwrap().len(), 2);
        assert_eq!(entry.get_f64_array("cameras"), None);
    }

    #[test]
    fn emptiness_for_merge() {
        assert!(ConfigEntry::value_is_empty(&json!(null)));
        assert!(ConfigEntry::value_is_empty(&json!("")));
        assert!(ConfigEntry::value_is_empty(&json!([])));
        assert!(!ConfigEntry::value_is_empty(&json!(0)));
        assert!(!ConfigEntry::value_is_empty(&json!(false)));
    }
}
