//! Entity state snapshot — the host's view of the world, handed to the card
//! on every store tick.
//!
//! The host owns snapshots; a card reads exactly one entry by key and holds
//! no reference past the call that delivered it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute key carrying the pointer angle in degrees.
pub const ATTR_DEGREE: &str = "degree";

/// One entity's state record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EntityState {
    /// Primary value, numeric-as-text (e.g. "1.2" metres of water).
    pub state: String,
    /// Named attributes; values are free-form JSON.
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

impl EntityState {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            attributes: HashMap::new(),
        }
    }

    /// Typed accessor for the "degree" attribute.  `None` when the attribute
    /// is absent or not a number — callers decide what that means.
    pub fn degree(&self) -> Option<f64> {
        self.attributes.get(ATTR_DEGREE).and_then(Value::as_f64)
    }
}

/// The full entity-state snapshot.  `rev` is a monotonically increasing
/// counter incremented every time the store changes; clients can use it to
/// detect missed updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StateSnapshot {
    #[serde(default)]
    pub rev: u64,
    #[serde(default)]
    pub states: HashMap<String, EntityState>,
}

impl StateSnapshot {
    /// Single-key lookup.  Consumers must not scan all entities; cost stays
    /// independent of snapshot size.
    pub fn get(&self, entity_id: &str) -> Option<&EntityState> {
        self.states.get(entity_id)
    }

    /// Insert or replace one entity record and bump the revision.
    pub fn set(&mut self, entity_id: impl Into<String>, state: EntityState) {
        self.states.insert(entity_id.into(), state);
        self.rev += 1;
    }

    /// Drop an entity record (integration unloading, sensor removed) and
    /// bump the revision.
    pub fn remove(&mut self, entity_id: &str) {
        if self.states.remove(entity_id).is_some() {
            self.rev += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tide_entity(degree: Value) -> EntityState {
        let mut entity = EntityState::new("1.2");
        entity.attributes.insert(ATTR_DEGREE.to_string(), degree);
        entity
    }

    #[test]
    fn test_degree_numeric() {
        assert_eq!(tide_entity(json!(45)).degree(), Some(45.0));
        assert_eq!(tide_entity(json!(412.5)).degree(), Some(412.5));
    }

    #[test]
    fn test_degree_missing_or_malformed() {
        assert_eq!(EntityState::new("1.2").degree(), None);
        assert_eq!(tide_entity(json!("northeast")).degree(), None);
        assert_eq!(tide_entity(Value::Null).degree(), None);
    }

    #[test]
    fn test_snapshot_lookup_and_rev() {
        let mut snapshot = StateSnapshot::default();
        assert!(snapshot.get("sensor.tide").is_none());

        snapshot.set("sensor.tide", EntityState::new("0.8"));
        assert_eq!(snapshot.rev, 1);
        assert_eq!(snapshot.get("sensor.tide").unwrap().state, "0.8");

        snapshot.remove("sensor.tide");
        assert_eq!(snapshot.rev, 2);
        assert!(snapshot.get("sensor.tide").is_none());

        // Removing an unknown entity is not a change.
        snapshot.remove("sensor.tide");
        assert_eq!(snapshot.rev, 2);
    }
}
