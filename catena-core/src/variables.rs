//! Time-indexed simulation variables.
//!
//! Each spatial unit carries a [`VariableStore`] mapping variable names to
//! an append-only series of values ordered by time index. A series may be
//! declared with a fixed value type at creation, in which case every
//! appended value must match it.

use crate::errors::{CatenaError, CatenaResult};
use crate::time::TimeIndex;
use crate::value::{Value, ValueType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One stored value together with the time index it was produced at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedValue {
    pub index: TimeIndex,
    pub value: Value,
}

/// The ordered history of a single variable on a single unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableSeries {
    declared_type: Option<ValueType>,
    values: Vec<IndexedValue>,
}

impl VariableSeries {
    pub fn declared_type(&self) -> Option<ValueType> {
        self.declared_type
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn latest(&self) -> Option<&IndexedValue> {
        self.values.last()
    }

    /// The value produced exactly at `index`, if any.
    pub fn at(&self, index: TimeIndex) -> Option<&Value> {
        self.values
            .binary_search_by_key(&index, |iv| iv.index)
            .ok()
            .map(|pos| &self.values[pos].value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedValue> {
        self.values.iter()
    }
}

/// All variables of one spatial unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableStore {
    series: IndexMap<String, VariableSeries>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.series.contains_key(name)
    }

    /// Whether the variable exists and is compatible with `value_type`.
    ///
    /// `None` matches any series; `Some(t)` only matches a series declared
    /// with exactly that type.
    pub fn typed_exists(&self, name: &str, value_type: Option<ValueType>) -> bool {
        match (self.series.get(name), value_type) {
            (Some(_), None) => true,
            (Some(series), Some(t)) => series.declared_type == Some(t),
            (None, _) => false,
        }
    }

    pub fn create(&mut self, name: &str, declared_type: Option<ValueType>) -> CatenaResult<()> {
        if self.series.contains_key(name) {
            return Err(CatenaError::VariableAlreadyExists {
                variable: name.to_string(),
            });
        }
        self.series.insert(
            name.to_string(),
            VariableSeries {
                declared_type,
                values: Vec::new(),
            },
        );
        Ok(())
    }

    pub fn create_if_absent(&mut self, name: &str, declared_type: Option<ValueType>) {
        if !self.series.contains_key(name) {
            self.series.insert(
                name.to_string(),
                VariableSeries {
                    declared_type,
                    values: Vec::new(),
                },
            );
        }
    }

    /// Append a value at `index`, which must be strictly after the latest
    /// stored index.
    pub fn append(&mut self, name: &str, index: TimeIndex, value: Value) -> CatenaResult<()> {
        let series = self
            .series
            .get_mut(name)
            .ok_or_else(|| CatenaError::VariableNotFound {
                variable: name.to_string(),
            })?;
        if let Some(declared) = series.declared_type {
            if value.value_type() != declared {
                return Err(CatenaError::InvalidValueType {
                    variable: name.to_string(),
                    expected: declared,
                });
            }
        }
        if let Some(latest) = series.values.last() {
            if index <= latest.index {
                return Err(CatenaError::StaleValue {
                    variable: name.to_string(),
                    index,
                    latest: latest.index,
                });
            }
        }
        series.values.push(IndexedValue { index, value });
        Ok(())
    }

    /// Replace the value recorded at exactly `index`.
    pub fn update(&mut self, name: &str, index: TimeIndex, value: Value) -> CatenaResult<()> {
        let series = self
            .series
            .get_mut(name)
            .ok_or_else(|| CatenaError::VariableNotFound {
                variable: name.to_string(),
            })?;
        if let Some(declared) = series.declared_type {
            if value.value_type() != declared {
                return Err(CatenaError::InvalidValueType {
                    variable: name.to_string(),
                    expected: declared,
                });
            }
        }
        match series.values.binary_search_by_key(&index, |iv| iv.index) {
            Ok(pos) => {
                series.values[pos].value = value;
                Ok(())
            }
            Err(_) => Err(CatenaError::ValueNotFound {
                variable: name.to_string(),
                index,
            }),
        }
    }

    pub fn series(&self, name: &str) -> Option<&VariableSeries> {
        self.series.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &VariableSeries)> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_append() {
        let mut store = VariableStore::new();
        store.create("flow", Some(ValueType::Double)).unwrap();
        assert!(store.exists("flow"));
        assert!(store.typed_exists("flow", None));
        assert!(store.typed_exists("flow", Some(ValueType::Double)));
        assert!(!store.typed_exists("flow", Some(ValueType::Integer)));

        store
            .append("flow", TimeIndex::ZERO, Value::Double(1.0))
            .unwrap();
        store
            .append("flow", TimeIndex::new(60), Value::Double(2.0))
            .unwrap();

        let series = store.series("flow").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.latest().unwrap().value, Value::Double(2.0));
        assert_eq!(series.at(TimeIndex::ZERO), Some(&Value::Double(1.0)));
        assert_eq!(series.at(TimeIndex::new(30)), None);
    }

    #[test]
    fn rejects_duplicate_creation() {
        let mut store = VariableStore::new();
        store.create("flow", None).unwrap();
        let err = store.create("flow", None);
        assert!(matches!(
            err,
            Err(CatenaError::VariableAlreadyExists { variable }) if variable == "flow"
        ));
        // The silent variant leaves the existing series untouched.
        store.create_if_absent("flow", Some(ValueType::Double));
        assert!(store.typed_exists("flow", None));
        assert!(!store.typed_exists("flow", Some(ValueType::Double)));
    }

    #[test]
    fn rejects_stale_and_mistyped_appends() {
        let mut store = VariableStore::new();
        store.create("flow", Some(ValueType::Double)).unwrap();
        store
            .append("flow", TimeIndex::new(60), Value::Double(1.0))
            .unwrap();

        let err = store.append("flow", TimeIndex::new(60), Value::Double(2.0));
        assert!(matches!(err, Err(CatenaError::StaleValue { .. })));
        let err = store.append("flow", TimeIndex::new(30), Value::Double(2.0));
        assert!(matches!(err, Err(CatenaError::StaleValue { .. })));
        let err = store.append("flow", TimeIndex::new(120), Value::Integer(2));
        assert!(matches!(
            err,
            Err(CatenaError::InvalidValueType { expected, .. }) if expected == ValueType::Double
        ));
        let err = store.append("missing", TimeIndex::new(120), Value::Double(2.0));
        assert!(matches!(err, Err(CatenaError::VariableNotFound { .. })));
    }

    #[test]
    fn update_replaces_exact_index_only() {
        let mut store = VariableStore::new();
        store.create("state", None).unwrap();
        store
            .append("state", TimeIndex::ZERO, Value::Integer(1))
            .unwrap();
        store
            .append("state", TimeIndex::new(60), Value::Integer(2))
            .unwrap();

        store
            .update("state", TimeIndex::new(60), Value::Integer(5))
            .unwrap();
        store
            .update("state", TimeIndex::ZERO, Value::Integer(9))
            .unwrap();
        let series = store.series("state").unwrap();
        assert_eq!(series.latest().unwrap().value, Value::Integer(5));
        assert_eq!(series.at(TimeIndex::ZERO), Some(&Value::Integer(9)));

        let err = store.update("state", TimeIndex::new(30), Value::Integer(7));
        assert!(matches!(err, Err(CatenaError::ValueNotFound { .. })));

        store.create("typed", Some(ValueType::Double)).unwrap();
        store
            .append("typed", TimeIndex::ZERO, Value::Double(1.0))
            .unwrap();
        let err = store.update("typed", TimeIndex::ZERO, Value::Integer(1));
        assert!(matches!(err, Err(CatenaError::InvalidValueType { .. })));
    }
}
