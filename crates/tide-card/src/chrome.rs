//! CardChrome — the bordered host-card shell around the dial.
//!
//! Receives the full snapshot on every update (a pass-through from the
//! card's update path) and derives only the configured entity's
//! availability for its border badge; entity data is not reprocessed here.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

use tide_proto::state::StateSnapshot;

use crate::theme::{style_chrome_border, style_chrome_title, C_BADGE_LIVE, C_BADGE_UNAVAILABLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Availability {
    #[default]
    Unknown,
    Available,
    Unavailable,
}

pub struct CardChrome {
    title: String,
    availability: Availability,
}

impl CardChrome {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            availability: Availability::Unknown,
        }
    }

    /// Pass-through from the card's update path.
    pub fn update(&mut self, entity_id: &str, snapshot: &StateSnapshot) {
        self.availability = if snapshot.get(entity_id).is_some() {
            Availability::Available
        } else {
            Availability::Unavailable
        };
    }

    /// The bordered block the dial is rendered inside.
    pub fn block(&self) -> Block<'_> {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style_chrome_border())
            .title(Line::from(Span::styled(
                self.title.as_str(),
                style_chrome_title(),
            )));

        let badge = match self.availability {
            Availability::Unknown => None,
            Availability::Available => Some((" LIVE ", C_BADGE_LIVE)),
            Availability::Unavailable => Some((" UNAV ", C_BADGE_UNAVAILABLE)),
        };

        match badge {
            Some((text, color)) => block.title_top(
                Line::from(Span::styled(
                    text,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
                .right_aligned(),
            ),
            None => block,
        }
    }
}
