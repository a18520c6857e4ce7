// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use droidcfg_app::view::{self, BadgeTone, Modal, Panel, Screen, Tone};
use droidcfg_app::{App, AppEvent, Arrangement, DocumentStore, Key, StatusLevel};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span as TextSpan};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(120);
const FALLBACK_STATUS_TTL: Duration = Duration::from_secs(4);

const PRIMARY: Color = Color::Indexed(39);
const SECONDARY: Color = Color::Indexed(240);
const MUTED: Color = Color::Indexed(242);
const ERROR: Color = Color::Indexed(196);
const SUCCESS: Color = Color::Indexed(82);
const WARNING: Color = Color::Indexed(214);
const BADGE_ANTHROPIC: Color = Color::Indexed(141);
const BADGE_OPENAI: Color = Color::Indexed(82);
const BADGE_GENERIC: Color = Color::Indexed(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InternalEvent {
    StatusExpired { token: u64 },
}

/// Loop bookkeeping that lives outside [`App`].
#[derive(Debug)]
struct Session {
    status_token: u64,
    needs_redraw: bool,
    internal_tx: Sender<InternalEvent>,
}

impl Session {
    fn new(internal_tx: Sender<InternalEvent>) -> Self {
        Self {
            status_token: 0,
            needs_redraw: true,
            internal_tx,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run_app<S: DocumentStore>(app: &mut App, store: &mut S) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let (width, height) = terminal::size().context("query terminal size")?;
    app.resize(usize::from(width), usize::from(height));

    let (internal_tx, internal_rx) = mpsc::channel();
    let mut session = Session::new(internal_tx);
    if let Some((_, level)) = app.status().visible(OffsetDateTime::now_utc()) {
        announce_status(&mut session, std_ttl(level.default_ttl()));
    }

    let result = event_loop(&mut terminal, app, store, &mut session, &internal_rx);

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn event_loop<S: DocumentStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &mut S,
    session: &mut Session,
    internal_rx: &Receiver<InternalEvent>,
) -> Result<()> {
    loop {
        process_internal_events(session, internal_rx);

        if session.needs_redraw {
            let screen = view::render(app, OffsetDateTime::now_utc());
            terminal
                .draw(|frame| draw(frame, &screen))
                .context("draw frame")?;
            session.needs_redraw = false;
        }

        if !event::poll(POLL_INTERVAL).context("poll event")? {
            continue;
        }
        let event = event::read().context("read event")?;
        if handle_terminal_event(app, store, session, event, OffsetDateTime::now_utc())
            == Flow::Quit
        {
            info!(dirty = app.is_dirty(), "quitting");
            return Ok(());
        }
    }
}

fn process_internal_events(session: &mut Session, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::StatusExpired { token } if token == session.status_token => {
                session.needs_redraw = true;
            }
            InternalEvent::StatusExpired { .. } => {}
        }
    }
}

fn handle_terminal_event<S: DocumentStore>(
    app: &mut App,
    store: &mut S,
    session: &mut Session,
    event: Event,
    now: OffsetDateTime,
) -> Flow {
    match event {
        Event::Key(key) => {
            if key.kind != KeyEventKind::Press {
                return Flow::Continue;
            }
            let Some(key) = decode_key(key) else {
                return Flow::Continue;
            };
            session.needs_redraw = true;
            apply_events(session, app.handle_key(store, key, now))
        }
        Event::Resize(width, height) => {
            debug!(width, height, "terminal resized");
            app.resize(usize::from(width), usize::from(height));
            session.needs_redraw = true;
            Flow::Continue
        }
        _ => Flow::Continue,
    }
}

fn apply_events(session: &mut Session, events: Vec<AppEvent>) -> Flow {
    let mut flow = Flow::Continue;
    for event in events {
        match event {
            AppEvent::Quit => flow = Flow::Quit,
            AppEvent::StatusUpdated { ttl, .. } => {
                announce_status(session, std_ttl(ttl));
            }
            other => debug!(?other, "app event"),
        }
    }
    flow
}

fn std_ttl(ttl: time::Duration) -> Duration {
    Duration::try_from(ttl).unwrap_or(FALLBACK_STATUS_TTL)
}

fn announce_status(session: &mut Session, ttl: Duration) {
    session.status_token = session.status_token.saturating_add(1);
    schedule_status_expiry(&session.internal_tx, session.status_token, ttl);
}

fn schedule_status_expiry(internal_tx: &Sender<InternalEvent>, token: u64, ttl: Duration) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(ttl);
        let _ = sender.send(InternalEvent::StatusExpired { token });
    });
}

/// Maps a terminal key press onto the editor's key vocabulary.
pub fn decode_key(key: KeyEvent) -> Option<Key> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let decoded = match key.code {
        KeyCode::Up if ctrl => Key::CtrlUp,
        KeyCode::Down if ctrl => Key::CtrlDown,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Key::BackTab,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Char(ch) if ctrl => Key::Ctrl(ch.to_ascii_lowercase()),
        KeyCode::Char(ch) => Key::Char(ch),
        _ => return None,
    };
    Some(decoded)
}

fn draw(frame: &mut ratatui::Frame<'_>, screen: &Screen) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(droidcfg_app::STATUS_BAR_ROWS as u16),
            Constraint::Length(droidcfg_app::HELP_ROWS as u16),
        ])
        .split(frame.area());

    let (sidebar_area, form_area) = split_content(rows[0], screen);
    draw_panel(frame, sidebar_area, &screen.sidebar);
    draw_panel(frame, form_area, &screen.form);

    let status = Paragraph::new(to_text_line(&screen.status)).block(
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(SECONDARY))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(status, rows[1]);

    let help = Paragraph::new(to_text_line(&screen.help))
        .block(Block::new().padding(Padding::horizontal(1)));
    frame.render_widget(help, rows[2]);

    if let Some(modal) = &screen.modal {
        draw_modal(frame, modal);
    }
}

fn split_content(area: Rect, screen: &Screen) -> (Rect, Rect) {
    let (direction, first) = match screen.arrangement {
        Arrangement::SideBySide => (Direction::Horizontal, screen.sidebar.width),
        Arrangement::Stacked => (Direction::Vertical, screen.sidebar.height),
    };
    let parts = Layout::default()
        .direction(direction)
        .constraints([Constraint::Length(clamp_u16(first)), Constraint::Min(0)])
        .split(area);
    (parts[0], parts[1])
}

fn draw_panel(frame: &mut ratatui::Frame<'_>, area: Rect, panel: &Panel) {
    let border = if panel.focused { PRIMARY } else { SECONDARY };
    let lines: Vec<TextLine<'_>> = panel.lines.iter().map(to_text_line).collect();
    let widget = Paragraph::new(lines).block(
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn draw_modal(frame: &mut ratatui::Frame<'_>, modal: &Modal) {
    // Border and one padding row above and below the text.
    let height = clamp_u16(modal.lines.len() + 4);
    let area = centered_rect(clamp_u16(modal.width), height, frame.area());
    frame.render_widget(Clear, area);

    let lines: Vec<TextLine<'_>> = modal.lines.iter().map(to_text_line).collect();
    let widget = Paragraph::new(lines).block(
        Block::bordered()
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(WARNING))
            .padding(Padding::symmetric(2, 1)),
    );
    frame.render_widget(widget, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn clamp_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn to_text_line(line: &view::Line) -> TextLine<'_> {
    TextLine::from(
        line.spans
            .iter()
            .map(|span| TextSpan::styled(span.text.as_str(), style_for(span.tone)))
            .collect::<Vec<_>>(),
    )
}

fn style_for(tone: Tone) -> Style {
    let base = Style::default();
    match tone {
        Tone::Normal => base,
        Tone::Dim | Tone::Track => base.fg(MUTED),
        Tone::Accent | Tone::Edge => base.fg(PRIMARY),
        Tone::Title => base.fg(PRIMARY).add_modifier(Modifier::BOLD),
        Tone::Highlight => base.fg(Color::Black).bg(PRIMARY).add_modifier(Modifier::BOLD),
        Tone::Strong => base.add_modifier(Modifier::BOLD),
        Tone::Checked => base.fg(SUCCESS).add_modifier(Modifier::BOLD),
        Tone::Badge(badge) => base.fg(badge_color(badge)),
        Tone::Label => base.add_modifier(Modifier::BOLD),
        Tone::Error => base.fg(ERROR),
        Tone::Hint | Tone::Placeholder => base.fg(MUTED).add_modifier(Modifier::ITALIC),
        Tone::Caret => base.add_modifier(Modifier::REVERSED),
        Tone::Thumb => base.fg(PRIMARY),
        Tone::Status(level) => base.fg(status_color(level)),
        Tone::Idle => base.fg(SECONDARY),
        Tone::Warning => base.fg(WARNING).add_modifier(Modifier::BOLD),
    }
}

fn badge_color(badge: BadgeTone) -> Color {
    match badge {
        BadgeTone::Anthropic => BADGE_ANTHROPIC,
        BadgeTone::OpenAi => BADGE_OPENAI,
        BadgeTone::Generic => BADGE_GENERIC,
        BadgeTone::Unknown => MUTED,
    }
}

fn status_color(level: StatusLevel) -> Color {
    match level {
        StatusLevel::Info => PRIMARY,
        StatusLevel::Success => SUCCESS,
        StatusLevel::Error => ERROR,
        StatusLevel::Warning => WARNING,
    }
}
