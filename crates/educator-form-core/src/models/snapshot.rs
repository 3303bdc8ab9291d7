//! Persisted form snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Snapshot (de)serialization errors.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot is not a JSON object")]
    NotAnObject,
}

/// Mapping of field id to value, persisted as one JSON object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<String, String>);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value recorded for `field_id`.
    pub fn insert(&mut self, field_id: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field_id.into(), value.into());
    }

    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.0.get(field_id).map(String::as_str)
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.0.contains_key(field_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize to the stored blob format.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored blob. The blob must be a JSON object.
    ///
    /// Numbers and booleans are kept as their JSON text and `null` becomes an
    /// empty value. Nested arrays and objects are dropped.
    pub fn from_json(blob: &str) -> Result<Self, SnapshotError> {
        let Value::Object(entries) = serde_json::from_str::<Value>(blob)? else {
            return Err(SnapshotError::NotAnObject);
        };
        Ok(entries
            .into_iter()
            .filter_map(|(field_id, value)| match as_field_value(value) {
                Some(text) => Some((field_id, text)),
                None => {
                    log::debug!("dropping nested saved value for '{}'", field_id);
                    None
                }
            })
            .collect())
    }
}

fn as_field_value(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_is_flat_object() {
        let snapshot: Snapshot = [("hospitalName", "Jane")].into_iter().collect();
        assert_eq!(snapshot.to_json().unwrap(), r#"{"hospitalName":"Jane"}"#);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Snapshot::from_json("not json").is_err());
        assert!(matches!(
            Snapshot::from_json("[1, 2]"),
            Err(SnapshotError::NotAnObject)
        ));
        assert!(matches!(
            Snapshot::from_json(r#""text""#),
            Err(SnapshotError::NotAnObject)
        ));
    }

    #[test]
    fn test_from_json_stringifies_scalars() {
        let snapshot =
            Snapshot::from_json(r#"{"a": 1, "b": 2.5, "c": false, "d": null, "e": "x"}"#).unwrap();
        assert_eq!(snapshot.get("a"), Some("1"));
        assert_eq!(snapshot.get("b"), Some("2.5"));
        assert_eq!(snapshot.get("c"), Some("false"));
        assert_eq!(snapshot.get("d"), Some(""));
        assert_eq!(snapshot.get("e"), Some("x"));
    }

    #[test]
    fn test_from_json_drops_nested_values() {
        let snapshot = Snapshot::from_json(r#"{"a": [1], "b": {"c": "d"}, "e": "x"}"#).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot.contains("a"));
        assert!(!snapshot.contains("b"));
    }

    #[test]
    fn test_from_json_empty_object() {
        let snapshot = Snapshot::from_json("{}").unwrap();
        assert!(snapshot.is_empty());
    }
}
