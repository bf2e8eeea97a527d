//! card-lab — a minimal synthetic host that embeds the tide card.
//!
//! Not a dashboard: the real host (state store, event bus, detail panel)
//! stays external to the card crates.  This harness exists to exercise the
//! whole lifecycle by hand — it feeds the card a sine-driven tide entity,
//! routes clicks to it, and renders whatever arrives on the notifier seam
//! as a "more info" overlay.
//!
//! Keys: `q` quit · `u` toggle entity availability · `Esc` close overlay.

use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use tide_card::card::{DashboardCard, TideCard};
use tide_card::theme::{C_BADGE_LIVE, C_POINTER, C_PRIMARY, C_SECONDARY};
use tide_proto::config::CardConfig;
use tide_proto::event::{HostEvent, HostNotifier};
use tide_proto::state::{EntityState, StateSnapshot, ATTR_DEGREE};

/// Everything the lab's event loop reacts to.
enum LabMessage {
    Event(Event),
    Tick,
    Bus(HostEvent),
}

/// Stand-in for the host event bus: forwards dispatched events into the
/// lab's own loop so the overlay can show them.
struct BusNotifier {
    tx: mpsc::UnboundedSender<HostEvent>,
}

impl HostNotifier for BusNotifier {
    fn dispatch(&self, event: &HostEvent) {
        let _ = self.tx.send(event.clone());
    }
}

/// Synthetic tide entity: one dial revolution per minute of lab time,
/// water level following the cosine of the angle (high tide at the top).
fn synth_tide(elapsed: Duration) -> EntityState {
    let degree = (elapsed.as_secs_f64() * 6.0) % 360.0;
    let level = 1.0 + 0.8 * degree.to_radians().cos();

    let mut attributes = HashMap::new();
    attributes.insert(ATTR_DEGREE.to_string(), serde_json::json!(degree.round()));
    EntityState {
        state: format!("{:.2}", level),
        attributes,
    }
}

fn card_config() -> CardConfig {
    let path = dirs::config_dir()
        .map(|p| p.join("card-lab").join("card.toml"))
        .filter(|p| p.exists());
    match path.and_then(|p| std::fs::read_to_string(p).ok()) {
        Some(content) => {
            CardConfig::from_toml_str(&content).unwrap_or_else(|_| CardConfig::new("sensor.tide"))
        }
        None => CardConfig::new("sensor.tide"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = dirs::data_dir()
        .map(|p| p.join("card-lab"))
        .unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("lab.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();
    eprintln!("card-lab log: {}", log_path.display());

    info!("card-lab starting…");

    let (bus_tx, mut bus_rx) = mpsc::unbounded_channel::<HostEvent>();
    let notifier = Arc::new(BusNotifier { tx: bus_tx });

    let mut card = TideCard::new(notifier);
    let config = card_config();
    let entity_id = config.entity.clone();
    card.set_config(config)?;

    // ── Terminal setup ────────────────────────────────────────────────────────
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::channel::<LabMessage>(256);

    // ── Background task: keyboard/mouse events ────────────────────────────────
    let event_tx = tx.clone();
    tokio::task::spawn_blocking(move || loop {
        match event::read() {
            Ok(ev) => {
                if event_tx.blocking_send(LabMessage::Event(ev)).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    // ── Background task: store ticks ──────────────────────────────────────────
    let tick_tx = tx.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(250));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if tick_tx.send(LabMessage::Tick).await.is_err() {
                break;
            }
        }
    });

    // ── Event loop ────────────────────────────────────────────────────────────
    let started = Instant::now();
    let mut snapshot = StateSnapshot::default();
    let mut entity_available = true;
    let mut overlay: Option<HostEvent> = None;
    let mut card_area = Rect::default();

    loop {
        terminal.draw(|frame| {
            let full = frame.area();
            let outer = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    // One host grid row ≈ 8 terminal rows.
                    Constraint::Length(card.card_size() * 8),
                    Constraint::Min(0),
                    Constraint::Length(1),
                ])
                .split(full);

            card_area = outer[0];
            card.draw(frame, card_area);
            draw_status(frame, outer[2], &snapshot, entity_available);

            if let Some(ev) = &overlay {
                draw_more_info(frame, full, ev, &snapshot);
            }
        })?;

        let Some(msg) = recv_next(&mut rx, &mut bus_rx).await else {
            break;
        };

        match msg {
            LabMessage::Tick => {
                if entity_available {
                    snapshot.set(entity_id.clone(), synth_tide(started.elapsed()));
                } else {
                    snapshot.remove(&entity_id);
                }
                card.update(&snapshot);
            }
            LabMessage::Bus(event) => {
                debug!(name = %event.name, "host-bus event received");
                overlay = Some(event);
            }
            LabMessage::Event(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char('u') => entity_available = !entity_available,
                    KeyCode::Esc => {
                        if overlay.take().is_none() {
                            break;
                        }
                    }
                    _ => {}
                }
            }
            LabMessage::Event(Event::Mouse(mouse)) => {
                if is_click_within(mouse, card_area) {
                    // The returned events also arrive via the bus; the lab
                    // reacts on the bus side like a real host would.
                    let _ = card.handle_mouse(mouse, card_area);
                }
            }
            LabMessage::Event(_) => {}
        }
    }

    // ── Teardown ──────────────────────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    info!("card-lab exiting");
    Ok(())
}

/// Await the next message from either the lab channel or the notifier bus.
async fn recv_next(
    rx: &mut mpsc::Receiver<LabMessage>,
    bus_rx: &mut mpsc::UnboundedReceiver<HostEvent>,
) -> Option<LabMessage> {
    tokio::select! {
        msg = rx.recv() => msg,
        event = bus_rx.recv() => event.map(LabMessage::Bus),
    }
}

fn is_click_within(mouse: MouseEvent, area: Rect) -> bool {
    matches!(mouse.kind, MouseEventKind::Down(_))
        && mouse.column >= area.x
        && mouse.column < area.x + area.width
        && mouse.row >= area.y
        && mouse.row < area.y + area.height
}

fn draw_status(
    frame: &mut ratatui::Frame,
    area: Rect,
    snapshot: &StateSnapshot,
    entity_available: bool,
) {
    let availability = if entity_available { "live" } else { "removed" };
    let line = Line::from(vec![
        Span::styled(
            format!(" rev {}  entity {} ", snapshot.rev, availability),
            Style::default().fg(C_SECONDARY),
        ),
        Span::styled(
            " q quit · u toggle availability · click the card for more info",
            Style::default().fg(C_SECONDARY),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the payload of a notifier event the way a host detail panel would.
fn draw_more_info(
    frame: &mut ratatui::Frame,
    area: Rect,
    event: &HostEvent,
    snapshot: &StateSnapshot,
) {
    let popup = centered_rect(44, 8, area);
    frame.render_widget(Clear, popup);

    let entity_id = event.entity_id().unwrap_or("?");
    let record = snapshot.get(entity_id);
    let state = record.map(|r| r.state.as_str()).unwrap_or("unavailable");
    let degree = record
        .and_then(|r| r.degree())
        .map(|d| format!("{d}"))
        .unwrap_or_else(|| "—".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled("event   ", Style::default().fg(C_SECONDARY)),
            Span::styled(event.name.clone(), Style::default().fg(C_PRIMARY)),
        ]),
        Line::from(vec![
            Span::styled("entity  ", Style::default().fg(C_SECONDARY)),
            Span::styled(
                entity_id.to_string(),
                Style::default()
                    .fg(C_BADGE_LIVE)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("state   ", Style::default().fg(C_SECONDARY)),
            Span::styled(format!("{state} m"), Style::default().fg(C_PRIMARY)),
        ]),
        Line::from(vec![
            Span::styled("degree  ", Style::default().fg(C_SECONDARY)),
            Span::styled(degree, Style::default().fg(C_POINTER)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" More info — Esc to close ");
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
