//! Immutable point-in-time views of a path in the data tree.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StoreError;

/// An immutable view of the data at one path, taken at one instant.
///
/// A snapshot of a missing node is still a valid snapshot; it simply
/// reports [`exists`](Self::exists) as `false` and every child lookup
/// yields another absent snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    key: String,
    value: Option<Value>,
}

impl Snapshot {
    /// Create a snapshot of `value` stored under `key`.
    pub fn new(key: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Create a snapshot of a node that does not exist.
    pub fn absent(key: impl Into<String>) -> Self {
        Self::new(key, None)
    }

    /// The last path segment this snapshot was taken at.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the node holds any data.
    ///
    /// `null` and empty objects count as absent, matching a tree where
    /// deleting the last child removes the parent.
    pub fn exists(&self) -> bool {
        match &self.value {
            None | Some(Value::Null) => false,
            Some(Value::Object(map)) => !map.is_empty(),
            Some(_) => true,
        }
    }

    /// Raw JSON value, if present.
    pub const fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Look up a named child field.
    pub fn child(&self, name: &str) -> Self {
        let value = self
            .value
            .as_ref()
            .and_then(|v| v.get(name))
            .cloned();
        Self::new(name, value)
    }

    /// Iterate over every direct child of an object node.
    ///
    /// Non-object nodes have no children.
    pub fn children(&self) -> impl Iterator<Item = Self> + '_ {
        self.value
            .as_ref()
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|map| map.iter())
            .map(|(key, value)| Self::new(key.as_str(), Some(value.clone())))
    }

    /// Number of direct children.
    pub fn children_count(&self) -> usize {
        self.value
            .as_ref()
            .and_then(Value::as_object)
            .map_or(0, serde_json::Map::len)
    }

    /// Read the node as a signed integer.
    ///
    /// Returns `None` for missing nodes, non-numeric values, and numbers
    /// outside the `i64` range.
    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_ref().and_then(|v| {
            v.as_i64()
                .or_else(|| v.as_u64().and_then(|n| i64::try_from(n).ok()))
        })
    }

    /// Read the node as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(Value::as_str)
    }

    /// Deserialize the whole node into `T`.
    ///
    /// Returns `Ok(None)` when the node does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the node has the wrong shape.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Option<T>, StoreError> {
        if !self.exists() {
            return Ok(None);
        }
        match &self.value {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use headcount_types::CounterRecord;
    use serde_json::json;

    use super::*;

    #[test]
    fn absent_snapshot_has_absent_children() {
        let snap = Snapshot::absent("counter");
        assert!(!snap.exists());
        assert!(!snap.child("entryCount").exists());
        assert_eq!(snap.child("entryCount").as_i64(), None);
        assert_eq!(snap.children().count(), 0);
    }

    #[test]
    fn empty_object_does_not_exist() {
        let snap = Snapshot::new("activityLog", Some(json!({})));
        assert!(!snap.exists());
        assert_eq!(snap.children_count(), 0);
    }

    #[test]
    fn child_lookup_reads_fields() {
        let snap = Snapshot::new("counter", Some(json!({"entryCount": 5, "note": "x"})));
        assert!(snap.exists());
        assert_eq!(snap.child("entryCount").as_i64(), Some(5));
        assert_eq!(snap.child("note").as_str(), Some("x"));
        assert_eq!(snap.child("note").as_i64(), None);
        assert_eq!(snap.child("entryCount").key(), "entryCount");
    }

    #[test]
    fn children_are_keyed() {
        let snap = Snapshot::new(
            "activityLog",
            Some(json!({"a": {"count": 1}, "b": {"count": 2}})),
        );
        let keys: Vec<String> = snap.children().map(|c| c.key().to_owned()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn deserialize_typed_record() {
        let snap = Snapshot::new(
            "counter",
            Some(json!({
                "entryCount": 5,
                "exitCount": 2,
                "currentInRoom": 3,
                "lastUpdated": 10
            })),
        );
        let record: CounterRecord = snap.deserialize().unwrap().unwrap();
        assert_eq!(record.current_in_room, 3);

        let missing: Option<CounterRecord> = Snapshot::absent("counter").deserialize().unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn deserialize_wrong_shape_is_error() {
        let snap = Snapshot::new("counter", Some(json!({"entryCount": "many"})));
        let result: Result<Option<CounterRecord>, _> = snap.deserialize();
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }
}
