//! Untyped settings document

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A settings document: string keys mapped to arbitrary JSON values.
///
/// No schema is enforced. Equality is deep and key-order insensitive, which
/// is what the resolver relies on to decide whether a migration changed
/// anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Map<String, Value>);

impl ConfigDocument {
    /// An empty document (`{}`).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shallow-merge the object stored under `key` over the top level.
    ///
    /// Keys from the nested object win on conflict. The nested key itself is
    /// kept. Returns `None` when `key` is absent or does not hold an object.
    pub fn overlay(&self, key: &str) -> Option<Self> {
        let nested = self.0.get(key)?.as_object()?;
        let mut merged = self.0.clone();
        for (k, v) in nested {
            merged.insert(k.clone(), v.clone());
        }
        Some(Self(merged))
    }
}

impl From<Map<String, Value>> for ConfigDocument {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<ConfigDocument> for Value {
    fn from(doc: ConfigDocument) -> Self {
        Value::Object(doc.0)
    }
}

impl TryFrom<Value> for ConfigDocument {
    type Error = Value;

    /// Only JSON objects are documents; anything else is handed back.
    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}
