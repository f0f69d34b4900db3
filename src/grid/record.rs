//! Record abstraction shared by every engine

use std::collections::{BTreeMap, HashMap};

use super::value::Value;

/// One row of tabular data.
///
/// Engines only read records; they never mutate them. Missing fields read as
/// [`Value::Null`].
pub trait Record {
    /// Raw value of a single field.
    fn field(&self, key: &str) -> Value;

    /// Every field value, in any order. Used by the global search.
    fn values(&self) -> Vec<Value>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, key: &str) -> Value {
        (**self).field(key)
    }

    fn values(&self) -> Vec<Value> {
        (**self).values()
    }
}

impl Record for BTreeMap<String, Value> {
    fn field(&self, key: &str) -> Value {
        self.get(key).cloned().unwrap_or_default()
    }

    fn values(&self) -> Vec<Value> {
        BTreeMap::values(self).cloned().collect()
    }
}

impl Record for HashMap<String, Value> {
    fn field(&self, key: &str) -> Value {
        self.get(key).cloned().unwrap_or_default()
    }

    fn values(&self) -> Vec<Value> {
        HashMap::values(self).cloned().collect()
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn field(&self, key: &str) -> Value {
        self.get(key).map(Value::from).unwrap_or_default()
    }

    fn values(&self) -> Vec<Value> {
        serde_json::Map::values(self).map(Value::from).collect()
    }
}
