//! Component parameters.
//!
//! Parameters are string-valued: the caller supplies them as text and the
//! components convert on use. Each model item has a local set; the model
//! carries a global set consulted when a local key is absent. Keys may be
//! dot-structured (`range.min`); the engine only ever searches the flat
//! sets, but components can parse them into a [`ParameterTree`] for grouped
//! access.

use crate::errors::{CatenaError, CatenaResult};
use crate::signature::ComponentId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single string-convertible parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParamValue(String);

impl ParamValue {
    pub fn new(raw: impl Into<String>) -> Self {
        ParamValue(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.0.trim().parse().ok()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.0.trim().parse().ok()
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.0.trim().parse().ok()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.0.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(raw: &str) -> Self {
        ParamValue(raw.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(raw: String) -> Self {
        ParamValue(raw)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A flat, insertion-ordered set of named parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    entries: IndexMap<String, ParamValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter and return the set, for chained construction.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ParamValue)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        ParameterSet {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Resolve a required parameter: the local set decides when it holds the
/// key (an empty local value fails without falling back), otherwise the
/// global set is searched.
pub(crate) fn resolve_required_parameter<'a>(
    local: &'a ParameterSet,
    global: Option<&'a ParameterSet>,
    name: &str,
    component: &ComponentId,
) -> CatenaResult<&'a ParamValue> {
    let found = match local.get(name) {
        Some(value) => Some(value),
        None => global.and_then(|set| set.get(name)),
    };
    match found {
        Some(value) if value.is_empty() => Err(CatenaError::EmptyParameter {
            parameter: name.to_string(),
            component: component.clone(),
        }),
        Some(value) => Ok(value),
        None => Err(CatenaError::MissingParameter {
            parameter: name.to_string(),
            component: component.clone(),
        }),
    }
}

/// A node of a [`ParameterTree`]: an optional value plus named children.
///
/// A key can hold both, e.g. `range = "auto"` next to `range.min = "0"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamNode {
    value: Option<ParamValue>,
    children: IndexMap<String, ParamNode>,
}

impl ParamNode {
    pub fn value(&self) -> Option<&ParamValue> {
        self.value.as_ref()
    }

    pub fn child(&self, name: &str) -> Option<&ParamNode> {
        self.children.get(name)
    }

    pub fn children(&self) -> impl Iterator<Item = (&String, &ParamNode)> {
        self.children.iter()
    }
}

/// Dot-structured view over a flat [`ParameterSet`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterTree {
    root: ParamNode,
}

impl ParameterTree {
    pub fn from_set(set: &ParameterSet) -> Self {
        let mut tree = ParameterTree::default();
        for (key, value) in set.iter() {
            tree.insert(key, value.clone());
        }
        tree
    }

    fn insert(&mut self, full_key: &str, value: ParamValue) {
        let mut node = &mut self.root;
        for segment in full_key.split('.') {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node.value = Some(value);
    }

    /// Look a value up by its full dotted key.
    pub fn value(&self, full_key: &str) -> Option<&ParamValue> {
        self.node(full_key).and_then(ParamNode::value)
    }

    /// Walk to the node at the given dotted key.
    pub fn node(&self, full_key: &str) -> Option<&ParamNode> {
        let mut node = &self.root;
        for segment in full_key.split('.') {
            node = node.child(segment)?;
        }
        Some(node)
    }

    pub fn root(&self) -> &ParamNode {
        &self.root
    }
}
