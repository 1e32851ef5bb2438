//! Discrete events attached to spatial units.
//!
//! An event is a dated bundle of key/value infos (a fertilizer application,
//! a dam release). Components query a unit's collection for the events
//! falling inside the current step.

use crate::parameters::ParamValue;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One dated event with free-form infos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    date: DateTime<Utc>,
    infos: IndexMap<String, ParamValue>,
}

impl Event {
    pub fn new(date: DateTime<Utc>) -> Self {
        Event {
            date,
            infos: IndexMap::new(),
        }
    }

    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.infos.insert(key.into(), value.into());
        self
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn info(&self, key: &str) -> Option<&ParamValue> {
        self.infos.get(key)
    }

    pub fn infos(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.infos.iter()
    }
}

/// The chronologically ordered events of one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventsCollection {
    events: Vec<Event>,
}

impl EventsCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert keeping chronological order; equal dates keep insertion order.
    pub fn add(&mut self, event: Event) {
        let pos = self.events.partition_point(|e| e.date <= event.date);
        self.events.insert(pos, event);
    }

    /// Events with `begin <= date <= end`.
    pub fn between(&self, begin: DateTime<Utc>, end: DateTime<Utc>) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(move |e| e.date >= begin && e.date <= end)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
