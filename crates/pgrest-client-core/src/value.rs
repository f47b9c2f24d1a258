use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::ops::{Deref, DerefMut};

/// A dynamic record: an insertion-ordered map of column name to JSON value.
///
/// Records carry no schema; they are whatever the remote table returned or
/// whatever the caller is about to write.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Record(pub Map<String, JsonValue>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Set a column value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Get a column value.
    pub fn get_value(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// Check if a column exists.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Get a typed value from a column, returning None if missing or wrong type.
    pub fn get_as<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.0
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Column names, in insertion order.
    pub fn columns(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the record and return the inner map.
    pub fn into_inner(self) -> Map<String, JsonValue> {
        self.0
    }

    /// Merge `other` into this record; `other`'s keys win on collision.
    pub fn merged_with(mut self, other: Record) -> Self {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
        self
    }
}

impl Deref for Record {
    type Target = Map<String, JsonValue>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Record {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<K: Into<String>, V: Into<JsonValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self(map)
    }
}

impl<K: Into<String>, V: Into<JsonValue>, const N: usize> From<[(K, V); N]> for Record {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

/// Macro for constructing a `Record` with key-value pairs.
///
/// # Examples
/// ```
/// use pgrest_client_core::record;
/// let row = record![("name", "Auckland"), ("country_id", 554)];
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($(($key:expr, $val:expr)),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $(
            record.set($key, serde_json::json!($val));
        )+
        record
    }};
}
