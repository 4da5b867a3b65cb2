use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closed set of values an attribute may hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Flag(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Number(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

/// Typed key/value attributes attached to an import
///
/// Holds caller-supplied context such as the vehicle program or ECU
/// revision. Keys are kept sorted so serialized output is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Metadata {
    data: BTreeMap<String, MetadataValue>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.data.get(key)
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.data.get(key) {
            Some(MetadataValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<MetadataValue> {
        self.data.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_typed_values() {
        let mut meta = Metadata::new();
        meta.set("program", "MY27-Platform");
        meta.set("ecu_revision", 4.0);
        meta.set("released", true);

        assert_eq!(meta.get_text("program"), Some("MY27-Platform"));
        assert_eq!(meta.get("ecu_revision"), Some(&MetadataValue::Number(4.0)));
        assert_eq!(meta.get("released"), Some(&MetadataValue::Flag(true)));
        assert_eq!(meta.get_text("released"), None);
        assert_eq!(meta.len(), 3);
    }

    #[test]
    fn test_round_trips_through_json() {
        let mut meta = Metadata::new();
        meta.set("program", "MY27");
        meta.set("released", false);
        meta.set("ecu_revision", 2.5);

        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(
            json,
            r#"{"ecu_revision":2.5,"program":"MY27","released":false}"#
        );
        let back: Metadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }
}
