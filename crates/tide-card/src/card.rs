//! TideCard — the clock-face gauge card.
//!
//! Lifecycle contract with the host:
//! - `set_config` once at mount time (idempotent; authoring errors are fatal),
//! - `update` on every state-store tick, with the full snapshot,
//! - `draw` whenever the host renders,
//! - a click anywhere on the card asks the host for the entity-detail view.
//!
//! All entry points run synchronously to completion on the host's render
//! thread; the card spawns nothing and holds no timers.

use std::sync::Arc;

use ratatui::crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{layout::Rect, Frame};
use tracing::debug;

use tide_proto::config::{CardConfig, ConfigError};
use tide_proto::event::{HostEvent, HostNotifier};
use tide_proto::state::StateSnapshot;

use crate::chrome::CardChrome;
use crate::dial;
use crate::render::{Node, NodeKey, RenderRoot};

/// Fallback readout value when the configured entity is absent from a
/// snapshot.  A recoverable, expected condition — never an error.
const UNAVAILABLE: &str = "unavailable";

/// Unit suffix appended to the readout.
const UNIT: &str = " m";

/// The narrow lifecycle every dashboard card implements.
///
/// Hosts guarantee `set_config` has succeeded at least once before the
/// first `update`; behavior of an unconfigured update is undefined and the
/// card does not defend it beyond ignoring the call.
pub trait DashboardCard {
    /// Accept (or reject) a static configuration and build the visual tree.
    /// Safe to call more than once; each success fully replaces the tree.
    fn set_config(&mut self, config: CardConfig) -> Result<(), ConfigError>;

    /// Project the current state snapshot onto the visual tree.  Must not
    /// fail for a well-formed snapshot, present entity or not.
    fn update(&mut self, snapshot: &StateSnapshot);

    /// Handle a mouse event routed to the card's area by the host.
    /// Returns the host events dispatched as a result.
    fn handle_mouse(&mut self, event: MouseEvent, area: Rect) -> Vec<HostEvent>;

    /// Render into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect);

    /// Rows of host grid space the card asks for.  Static.
    fn card_size(&self) -> u16 {
        2
    }
}

pub struct TideCard {
    config: Option<CardConfig>,
    root: RenderRoot,
    chrome: CardChrome,
    notifier: Arc<dyn HostNotifier>,
}

impl TideCard {
    pub fn new(notifier: Arc<dyn HostNotifier>) -> Self {
        Self {
            config: None,
            root: RenderRoot::default(),
            chrome: CardChrome::new("Tide"),
            notifier,
        }
    }

    /// Current readout text, when configured.
    pub fn readout_text(&self) -> Option<&str> {
        match self.root.node(NodeKey::Readout) {
            Some(Node::Readout { text, .. }) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Current pointer angle in degrees, when configured.
    pub fn pointer_angle(&self) -> Option<f64> {
        match self.root.node(NodeKey::Pointer) {
            Some(Node::Pointer { angle_deg }) => Some(*angle_deg),
            _ => None,
        }
    }

    /// Construct-and-dispatch through the injected notifier; hands the
    /// dispatched event back to the caller.
    fn fire(&self, event: HostEvent) -> HostEvent {
        self.notifier.dispatch(&event);
        event
    }
}

impl DashboardCard for TideCard {
    fn set_config(&mut self, config: CardConfig) -> Result<(), ConfigError> {
        // Refuse to proceed on authoring errors: no partial rendering, any
        // previously accepted state stays as it was.
        config.validate()?;

        self.root.replace_contents(dial::build_nodes());
        debug!(entity = %config.entity, "tide card configured");
        self.config = Some(config);
        Ok(())
    }

    fn update(&mut self, snapshot: &StateSnapshot) {
        let Some(config) = &self.config else {
            // Precondition violated; nothing to project onto.
            debug!("update before configuration; ignored");
            return;
        };

        let entity = snapshot.get(&config.entity);

        let readout = match entity {
            Some(record) => format!("{}{}", record.state, UNIT),
            None => format!("{}{}", UNAVAILABLE, UNIT),
        };
        if let Some(Node::Readout { text, .. }) = self.root.node_mut(NodeKey::Readout) {
            *text = readout;
        }

        // Degree passes through as-is: no clamping, no wrapping.  Absent or
        // non-numeric values leave the pointer where it was.
        match entity.and_then(|record| record.degree()) {
            Some(degree) => {
                if let Some(Node::Pointer { angle_deg }) = self.root.node_mut(NodeKey::Pointer) {
                    *angle_deg = degree;
                }
            }
            None => debug!(entity = %config.entity, "no usable degree attribute"),
        }

        // The chrome sees the whole snapshot, same as the card did.
        self.chrome.update(&config.entity, snapshot);
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect) -> Vec<HostEvent> {
        let Some(config) = &self.config else {
            return Vec::new();
        };
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                vec![self.fire(HostEvent::more_info(&config.entity))]
            }
            _ => Vec::new(),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let block = self.chrome.block();
        let inner = block.inner(area);
        frame.render_widget(block, area);
        dial::draw_dial(frame, inner, &self.root);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use serde_json::json;
    use tide_proto::event::MORE_INFO_EVENT;
    use tide_proto::state::{EntityState, ATTR_DEGREE};

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<HostEvent>>,
    }

    impl HostNotifier for RecordingNotifier {
        fn dispatch(&self, event: &HostEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn card_with_notifier() -> (TideCard, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        (TideCard::new(notifier.clone()), notifier)
    }

    fn configured_card() -> (TideCard, Arc<RecordingNotifier>) {
        let (mut card, notifier) = card_with_notifier();
        card.set_config(CardConfig::new("sensor.tide")).unwrap();
        (card, notifier)
    }

    fn tide_snapshot(state: &str, degree: f64) -> StateSnapshot {
        let mut entity = EntityState::new(state);
        entity
            .attributes
            .insert(ATTR_DEGREE.to_string(), json!(degree));
        let mut snapshot = StateSnapshot::default();
        snapshot.set("sensor.tide", entity);
        snapshot
    }

    fn left_click() -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 5,
            modifiers: ratatui::crossterm::event::KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_empty_entity_is_fatal_and_builds_nothing() {
        let (mut card, _) = card_with_notifier();
        assert_eq!(
            card.set_config(CardConfig::new("")),
            Err(ConfigError::NoEntity)
        );
        assert!(card.root.is_empty());
        assert!(card.readout_text().is_none());
    }

    #[test]
    fn test_reconfigure_replaces_subtree() {
        let (mut card, _) = configured_card();
        card.update(&tide_snapshot("1.2", 45.0));
        assert_eq!(card.readout_text(), Some("1.2 m"));

        // Second configuration discards the mutated tree entirely.
        card.set_config(CardConfig::new("sensor.other_tide")).unwrap();
        assert_eq!(card.readout_text(), Some("0 m"));
        assert_eq!(card.pointer_angle(), Some(0.0));
        assert_eq!(card.root.nodes().len(), dial::build_nodes().len());
    }

    #[test]
    fn test_update_projects_state_and_degree() {
        let (mut card, _) = configured_card();
        card.update(&tide_snapshot("1.2", 45.0));
        assert_eq!(card.readout_text(), Some("1.2 m"));
        assert_eq!(card.pointer_angle(), Some(45.0));
    }

    #[test]
    fn test_degree_is_not_normalized() {
        let (mut card, _) = configured_card();
        card.update(&tide_snapshot("1.2", 540.0));
        assert_eq!(card.pointer_angle(), Some(540.0));

        card.update(&tide_snapshot("1.2", -30.0));
        assert_eq!(card.pointer_angle(), Some(-30.0));
    }

    #[test]
    fn test_missing_entity_falls_back_without_error() {
        let (mut card, _) = configured_card();
        card.update(&tide_snapshot("1.2", 45.0));

        card.update(&StateSnapshot::default());
        assert_eq!(card.readout_text(), Some("unavailable m"));
        // Pointer holds its last angle.
        assert_eq!(card.pointer_angle(), Some(45.0));
    }

    #[test]
    fn test_missing_degree_keeps_previous_angle() {
        let (mut card, _) = configured_card();
        card.update(&tide_snapshot("1.2", 45.0));

        let mut snapshot = StateSnapshot::default();
        snapshot.set("sensor.tide", EntityState::new("1.4"));
        card.update(&snapshot);
        assert_eq!(card.readout_text(), Some("1.4 m"));
        assert_eq!(card.pointer_angle(), Some(45.0));
    }

    #[test]
    fn test_click_fires_exactly_one_more_info_event() {
        let (mut card, notifier) = configured_card();
        let returned = card.handle_mouse(left_click(), Rect::new(0, 0, 20, 10));

        let recorded = notifier.events.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(returned.len(), 1);
        let event = &recorded[0];
        assert_eq!(event.name, MORE_INFO_EVENT);
        assert_eq!(event.entity_id(), Some("sensor.tide"));
        assert!(event.bubbles && event.composed && !event.cancelable);
        assert_eq!(returned[0], *event);
    }

    #[test]
    fn test_non_click_mouse_events_fire_nothing() {
        let (mut card, notifier) = configured_card();
        let moved = MouseEvent {
            kind: MouseEventKind::Moved,
            ..left_click()
        };
        assert!(card.handle_mouse(moved, Rect::new(0, 0, 20, 10)).is_empty());
        assert!(notifier.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_updates_touch_only_readout_and_pointer() {
        let (mut card, _) = configured_card();
        let decoration = |card: &TideCard| -> Vec<Node> {
            card.root
                .nodes()
                .iter()
                .filter(|n| {
                    matches!(n, Node::Face | Node::Label { .. } | Node::TickRow { .. })
                })
                .cloned()
                .collect()
        };

        let before = decoration(&card);
        card.update(&tide_snapshot("1.2", 45.0));
        card.update(&StateSnapshot::default());
        card.update(&tide_snapshot("2.0", 300.0));
        assert_eq!(decoration(&card), before);
    }

    #[test]
    fn test_unconfigured_update_is_ignored() {
        let (mut card, notifier) = card_with_notifier();
        card.update(&tide_snapshot("1.2", 45.0));
        assert!(card.readout_text().is_none());
        assert!(card.handle_mouse(left_click(), Rect::new(0, 0, 20, 10)).is_empty());
        assert!(notifier.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_card_size_is_static() {
        let (card, _) = configured_card();
        assert_eq!(card.card_size(), 2);
    }
}
