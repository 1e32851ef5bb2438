//! Static unit attributes.
//!
//! Attributes are per-unit values set before the run (geometry, soil class,
//! calibrated coefficients) and readable by every component. Unlike
//! variables they carry no time dimension.

use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// All attributes of one spatial unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeStore {
    entries: IndexMap<String, Value>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Set an attribute, creating it or replacing its previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.entries.insert(name.into(), value);
    }

    /// Create the attribute with a null value unless it already exists.
    pub fn create_if_absent(&mut self, name: &str) {
        if !self.entries.contains_key(name) {
            self.entries.insert(name.to_string(), Value::Null);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut store = AttributeStore::new();
        store.set("area", Value::Double(120.0));
        assert!(store.exists("area"));
        assert_eq!(store.get("area"), Some(&Value::Double(120.0)));

        store.set("area", Value::Double(240.0));
        assert_eq!(store.get("area"), Some(&Value::Double(240.0)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn create_if_absent_keeps_existing() {
        let mut store = AttributeStore::new();
        store.create_if_absent("slope");
        assert_eq!(store.get("slope"), Some(&Value::Null));

        store.set("slope", Value::Double(0.02));
        store.create_if_absent("slope");
        assert_eq!(store.get("slope"), Some(&Value::Double(0.02)));
    }
}
