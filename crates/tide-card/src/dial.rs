//! Dial geometry and drawing — tick schedule, pointer math, and the braille
//! canvas that renders the card's subtree.

use ratatui::{
    layout::Rect,
    symbols::Marker,
    text::{Line, Span},
    widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine, Points},
    Frame,
};

use crate::render::{Anchor, Node, RenderRoot};
use crate::theme::{style_label, style_readout, C_FACE, C_POINTER, C_TICK};

/// Dial radius in canvas units.
pub const DIAL_RADIUS: f64 = 100.0;

/// Pointer length as a fraction of the radius.
const POINTER_REACH: f64 = 0.8;

/// Outermost tick dot, as a fraction of the radius.
const TICK_OUTER: f64 = 0.92;

/// Radial spacing between tick dots, as a fraction of the radius.
const TICK_STEP: f64 = 0.05;

/// Fixed decorative tick schedule: (clockwise angle from 12 o'clock, dot
/// count).  A sinusoidal-like ladder — densest at the top, one silent
/// position at the bottom.  Built once at configuration time, never updated.
pub const TICK_SCHEDULE: [(u16, u8); 12] = [
    (0, 12),
    (30, 11),
    (60, 9),
    (90, 6),
    (120, 3),
    (150, 1),
    (180, 0),
    (210, 1),
    (240, 3),
    (270, 6),
    (300, 9),
    (330, 11),
];

/// Point at `radius` along the direction `angle_deg`, measured clockwise
/// from the 12-o'clock rest position.  Canvas y grows upward.
pub fn radial_point(angle_deg: f64, radius: f64) -> (f64, f64) {
    let rad = angle_deg.to_radians();
    (radius * rad.sin(), radius * rad.cos())
}

/// Build the full dial subtree for a freshly accepted configuration.
///
/// Labels sit a third of the radius above and below center, the readout to
/// the right of center, the pointer at rest.
pub fn build_nodes() -> Vec<Node> {
    let mut nodes = Vec::with_capacity(TICK_SCHEDULE.len() + 5);
    nodes.push(Node::Face);
    nodes.push(Node::Label {
        text: "High Tide",
        at: Anchor { x: -0.18, y: 0.30 },
    });
    nodes.push(Node::Label {
        text: "Low Tide",
        at: Anchor { x: -0.16, y: -0.30 },
    });
    nodes.push(Node::Readout {
        text: "0 m".to_string(),
        at: Anchor { x: 0.40, y: 0.0 },
    });
    for (angle_deg, dots) in TICK_SCHEDULE {
        nodes.push(Node::TickRow { angle_deg, dots });
    }
    nodes.push(Node::Pointer { angle_deg: 0.0 });
    nodes
}

/// Render the card's subtree into `area`.
pub fn draw_dial(frame: &mut Frame, area: Rect, root: &RenderRoot) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let bound = DIAL_RADIUS * 1.1;
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-bound, bound])
        .y_bounds([-bound, bound])
        .paint(|ctx| paint_nodes(ctx, root));
    frame.render_widget(canvas, area);
}

fn paint_nodes(ctx: &mut Context<'_>, root: &RenderRoot) {
    for node in root.nodes() {
        match node {
            Node::Face => {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: DIAL_RADIUS,
                    color: C_FACE,
                });
            }
            Node::TickRow { angle_deg, dots } => draw_tick_row(ctx, *angle_deg, *dots),
            Node::Label { text, at } => {
                ctx.print(
                    at.x * DIAL_RADIUS,
                    at.y * DIAL_RADIUS,
                    Line::from(Span::styled(*text, style_label())),
                );
            }
            Node::Readout { text, at } => {
                ctx.print(
                    at.x * DIAL_RADIUS,
                    at.y * DIAL_RADIUS,
                    Line::from(Span::styled(text.clone(), style_readout())),
                );
            }
            Node::Pointer { angle_deg } => {
                let (x2, y2) = radial_point(*angle_deg, DIAL_RADIUS * POINTER_REACH);
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: 0.0,
                    x2,
                    y2,
                    color: C_POINTER,
                });
            }
        }
    }
}

/// Dots run from just inside the rim towards the center, one dotted spoke
/// per schedule entry.  A zero count is the schedule's silent position.
fn draw_tick_row(ctx: &mut Context<'_>, angle_deg: u16, dots: u8) {
    if dots == 0 {
        return;
    }
    let coords: Vec<(f64, f64)> = (0..dots)
        .map(|i| {
            radial_point(
                angle_deg as f64,
                DIAL_RADIUS * (TICK_OUTER - TICK_STEP * i as f64),
            )
        })
        .collect();
    ctx.draw(&Points {
        coords: &coords,
        color: C_TICK,
    });
}
