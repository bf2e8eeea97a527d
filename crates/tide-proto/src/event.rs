//! Outbound host-bus events — the card's only channel back to the host.
//!
//! A card never talks to the event bus directly; it is handed a
//! [`HostNotifier`] at construction and fires [`HostEvent`]s through it.
//! That keeps cards decoupled from the concrete bus and testable with a
//! recording fake.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event name asking the host to open its entity-detail view.
pub const MORE_INFO_EVENT: &str = "hass-more-info";

/// A host-bus event.  Delivery semantics are fixed at construction: events
/// bubble up through ancestors, cross isolation boundaries (`composed`), and
/// cannot be canceled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostEvent {
    pub name: String,
    pub detail: Value,
    pub bubbles: bool,
    pub composed: bool,
    pub cancelable: bool,
}

impl HostEvent {
    /// Build an event with the fixed delivery flags for card-originated
    /// notifications: bubbles and composed, never cancelable.
    pub fn new(name: impl Into<String>, detail: Value) -> Self {
        Self {
            name: name.into(),
            detail,
            bubbles: true,
            composed: true,
            cancelable: false,
        }
    }

    /// Ask the host to open its entity-detail view for `entity_id`.
    pub fn more_info(entity_id: &str) -> Self {
        Self::new(MORE_INFO_EVENT, serde_json::json!({ "entityId": entity_id }))
    }

    /// The `entityId` field of the detail payload, when present.
    pub fn entity_id(&self) -> Option<&str> {
        self.detail.get("entityId").and_then(Value::as_str)
    }
}

/// The capability a host injects into a card so the card can raise events
/// without knowing the concrete event bus.
pub trait HostNotifier: Send + Sync {
    /// Deliver `event` to the host bus.  Must not block and must not call
    /// back into the card.
    fn dispatch(&self, event: &HostEvent);
}
