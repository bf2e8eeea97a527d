//! Color palette and style constants for the tide card.
//!
//! Stand-ins for the theme variables the host would otherwise inject
//! (accent color for the face, primary text color for labels and readout).

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_FACE: Color = Color::Rgb(80, 140, 200);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_TICK: Color = Color::Rgb(115, 115, 138);
pub const C_POINTER: Color = Color::Rgb(255, 184, 80);
pub const C_CHROME_BORDER: Color = Color::Rgb(40, 40, 52);
pub const C_BADGE_LIVE: Color = Color::Rgb(80, 200, 120);
pub const C_BADGE_UNAVAILABLE: Color = Color::Rgb(255, 95, 95);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_label() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_readout() -> Style {
    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn style_chrome_border() -> Style {
    Style::default().fg(C_CHROME_BORDER)
}

pub fn style_chrome_title() -> Style {
    Style::default().fg(C_SECONDARY)
}
