//! Section settings as a JSON object with lenient loading.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key-value settings attached to a section.
///
/// Always a JSON object in memory. Storage is less tidy: older rows hold
/// settings as a serialized JSON string instead of a JSON object, so
/// [`SettingsMap::from_stored`] accepts both shapes and degrades anything
/// unreadable to an empty map rather than failing the load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsMap(Map<String, Value>);

impl SettingsMap {
    /// Empty settings.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Normalize a stored settings value.
    ///
    /// Accepts a JSON object directly, or a string containing serialized
    /// JSON that parses to an object. Everything else becomes an empty map.
    #[must_use]
    pub fn from_stored(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => Self(map),
                _ => Self::new(),
            },
            _ => Self::new(),
        }
    }

    /// Look up a setting by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a single setting, replacing any existing value for the key.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over key-value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// View as a plain JSON value.
    #[must_use]
    pub fn as_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Consume into a plain JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for SettingsMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<SettingsMap> for Value {
    fn from(settings: SettingsMap) -> Self {
        settings.into_value()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_stored_accepts_object() {
        let settings = SettingsMap::from_stored(json!({"title": "Sale", "columns": 3}));
        assert_eq!(settings.get("title"), Some(&json!("Sale")));
        assert_eq!(settings.get("columns"), Some(&json!(3)));
    }

    #[test]
    fn test_from_stored_parses_serialized_string() {
        let settings = SettingsMap::from_stored(json!(r#"{"title":"Sale"}"#));
        assert_eq!(settings.get("title"), Some(&json!("Sale")));
    }

    #[test]
    fn test_from_stored_degrades_bad_string_to_empty() {
        assert!(SettingsMap::from_stored(json!("not json at all")).is_empty());
        // A string holding valid JSON that is not an object is also dropped.
        assert!(SettingsMap::from_stored(json!("[1,2,3]")).is_empty());
    }

    #[test]
    fn test_from_stored_degrades_non_object_to_empty() {
        assert!(SettingsMap::from_stored(json!(null)).is_empty());
        assert!(SettingsMap::from_stored(json!(17)).is_empty());
        assert!(SettingsMap::from_stored(json!(["a"])).is_empty());
    }

    #[test]
    fn test_set_replaces_existing_key() {
        let mut settings = SettingsMap::from_stored(json!({"title": "Old"}));
        settings.set("title", json!("New"));
        assert_eq!(settings.get("title"), Some(&json!("New")));
        assert_eq!(settings.len(), 1);
    }

    #[test]
    fn test_serializes_transparently() {
        let settings = SettingsMap::from_stored(json!({"sticky": true}));
        assert_eq!(serde_json::to_value(&settings).unwrap(), json!({"sticky": true}));
    }
}
