//! The spatial domain.
//!
//! Units are grouped into named classes ("SU", "RS", ...) and identified by
//! a numeric id unique within their class. Directed links between units
//! describe the topology components traverse (e.g. water routed from a
//! surface unit to the reach downstream of it).

use crate::attributes::AttributeStore;
use crate::errors::{CatenaError, CatenaResult};
use crate::events::EventsCollection;
use crate::variables::VariableStore;
use indexmap::IndexMap;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

/// Identifier of a unit within its class.
pub type UnitId = u32;

/// Graph node key: (class index, unit id). Classes are never removed, so
/// the index stays stable for the lifetime of the domain.
type NodeKey = (u32, UnitId);

/// One spatial unit with its variables, attributes and events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialUnit {
    class: String,
    id: UnitId,
    variables: VariableStore,
    attributes: AttributeStore,
    events: EventsCollection,
}

impl SpatialUnit {
    fn new(class: impl Into<String>, id: UnitId) -> Self {
        SpatialUnit {
            class: class.into(),
            id,
            variables: VariableStore::new(),
            attributes: AttributeStore::new(),
            events: EventsCollection::new(),
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut VariableStore {
        &mut self.variables
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeStore {
        &mut self.attributes
    }

    pub fn events(&self) -> &EventsCollection {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventsCollection {
        &mut self.events
    }
}

/// All units of a simulation, grouped by class and linked by a directed
/// connectivity graph.
#[derive(Debug, Clone, Default)]
pub struct SpatialDomain {
    classes: IndexMap<String, IndexMap<UnitId, SpatialUnit>>,
    links: DiGraphMap<NodeKey, ()>,
}

impl SpatialDomain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_unit(&mut self, class: impl Into<String>, id: UnitId) -> CatenaResult<()> {
        let class = class.into();
        let units = self.classes.entry(class.clone()).or_default();
        if units.contains_key(&id) {
            return Err(CatenaError::DuplicateUnit { class, id });
        }
        units.insert(id, SpatialUnit::new(class, id));
        Ok(())
    }

    pub fn class_exists(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn unit_count(&self, class: &str) -> usize {
        self.classes.get(class).map_or(0, IndexMap::len)
    }

    pub fn unit(&self, class: &str, id: UnitId) -> Option<&SpatialUnit> {
        self.classes.get(class)?.get(&id)
    }

    pub fn unit_mut(&mut self, class: &str, id: UnitId) -> Option<&mut SpatialUnit> {
        self.classes.get_mut(class)?.get_mut(&id)
    }

    pub fn units_of_class(&self, class: &str) -> Option<impl Iterator<Item = &SpatialUnit>> {
        self.classes.get(class).map(|units| units.values())
    }

    pub fn units_of_class_mut(
        &mut self,
        class: &str,
    ) -> Option<impl Iterator<Item = &mut SpatialUnit>> {
        self.classes.get_mut(class).map(|units| units.values_mut())
    }

    /// All units across every class, in class then id insertion order.
    pub fn units(&self) -> impl Iterator<Item = &SpatialUnit> {
        self.classes.values().flat_map(|units| units.values())
    }

    fn node_key(&self, class: &str, id: UnitId) -> CatenaResult<NodeKey> {
        let class_index = self
            .classes
            .get_index_of(class)
            .filter(|_| self.unit(class, id).is_some())
            .ok_or_else(|| CatenaError::UnitNotFound {
                class: class.to_string(),
                id,
            })?;
        Ok((class_index as u32, id))
    }

    fn unit_ref(&self, key: NodeKey) -> (&str, UnitId) {
        let (name, _) = self
            .classes
            .get_index(key.0 as usize)
            .expect("link to unknown class");
        (name.as_str(), key.1)
    }

    /// Add a directed link between two existing units.
    pub fn connect(
        &mut self,
        from: (&str, UnitId),
        to: (&str, UnitId),
    ) -> CatenaResult<()> {
        let from_key = self.node_key(from.0, from.1)?;
        let to_key = self.node_key(to.0, to.1)?;
        self.links.add_edge(from_key, to_key, ());
        Ok(())
    }

    /// Units the given unit links to (downstream neighbours).
    pub fn to_units(&self, class: &str, id: UnitId) -> CatenaResult<Vec<(&str, UnitId)>> {
        let key = self.node_key(class, id)?;
        Ok(self
            .links
            .neighbors_directed(key, Direction::Outgoing)
            .map(|n| self.unit_ref(n))
            .collect())
    }

    /// Units linking to the given unit (upstream neighbours).
    pub fn from_units(&self, class: &str, id: UnitId) -> CatenaResult<Vec<(&str, UnitId)>> {
        let key = self.node_key(class, id)?;
        Ok(self
            .links
            .neighbors_directed(key, Direction::Incoming)
            .map(|n| self.unit_ref(n))
            .collect())
    }
}
