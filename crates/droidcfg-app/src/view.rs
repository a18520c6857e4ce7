// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Backend-free description of one frame. Terminal drawing lives elsewhere.

use time::OffsetDateTime;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    App, Arrangement, CONFIRM_BUTTONS, CONFIRM_TITLE, EditForm, Field, FormBody, Pane, Provider,
    StatusLevel,
};

pub const SIDEBAR_ACTIONS: &str = "[N] New  [D] Delete";
pub const SIDEBAR_TITLE: &str = "YOUR MODELS";
pub const EMPTY_LIST_LINES: [&str; 2] = [
    "  No models configured",
    "  Press 'N' to create your first model",
];
pub const SIDEBAR_HELP: &str = "tab: form | \u{2191}\u{2193}/jk: nav | space: select | a: all | n: new | d: del | ctrl+\u{2191}\u{2193}: move | ctrl+s: save | ctrl+c: quit";
pub const FORM_HELP: &str = "tab/\u{2191}\u{2193}: fields | \u{2190}\u{2192}: provider | ctrl+v: show key | ctrl+s: save | esc: back | ctrl+c: quit";
const INPUT_PROMPT: &str = "> ";
const SCROLLBAR_TRACK: &str = "\u{2591}";
const SCROLLBAR_THUMB: &str = "\u{2588}";
const EDGE_UP: &str = "\u{25b2}";
const EDGE_DOWN: &str = "\u{25bc}";
/// Gutter reserved to the right of each row for the scrollbar.
const SCROLLBAR_COLS: usize = 2;
/// Checkbox, badge and number punctuation around a row's name.
const ROW_CHROME_COLS: usize = 10;
/// Modal border plus two columns of padding per side.
const MODAL_CHROME_COLS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Dim,
    Accent,
    Title,
    /// Cursor row while the sidebar has focus.
    Highlight,
    /// Cursor row while focus is elsewhere.
    Strong,
    Checked,
    Badge(BadgeTone),
    Label,
    Error,
    Hint,
    Placeholder,
    Caret,
    Thumb,
    Track,
    Edge,
    Status(StatusLevel),
    Idle,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Anthropic,
    OpenAi,
    Generic,
    Unknown,
}

impl BadgeTone {
    fn for_provider(provider: &Provider) -> Self {
        match provider {
            Provider::Anthropic => Self::Anthropic,
            Provider::OpenAi => Self::OpenAi,
            Provider::GenericChatCompletionApi => Self::Generic,
            Provider::Unrecognized(_) => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
}

impl Span {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn single(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            spans: vec![Span::new(text, tone)],
        }
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    pub fn width(&self) -> usize {
        self.spans.iter().map(|span| span.text.width()).sum()
    }
}

/// A bordered pane: outer size plus its content rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub width: usize,
    pub height: usize,
    pub focused: bool,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub width: usize,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub width: usize,
    pub height: usize,
    pub arrangement: Arrangement,
    pub sidebar: Panel,
    pub form: Panel,
    pub status: Line,
    pub help: Line,
    pub modal: Option<Modal>,
}

pub fn render(app: &App, now: OffsetDateTime) -> Screen {
    let layout = app.layout();
    let sidebar_focused = app.pane() == Pane::Sidebar;
    Screen {
        width: layout.terminal.width,
        height: layout.terminal.height,
        arrangement: layout.arrangement,
        sidebar: Panel {
            width: layout.sidebar.width,
            height: layout.sidebar.height,
            focused: sidebar_focused,
            lines: sidebar_lines(app, sidebar_focused),
        },
        form: Panel {
            width: layout.form.width,
            height: layout.form.height,
            focused: !sidebar_focused,
            lines: form_lines(app, !sidebar_focused),
        },
        status: status_line(app, now),
        help: help_line(app),
        modal: modal(app),
    }
}

fn sidebar_lines(app: &App, focused: bool) -> Vec<Line> {
    let list = app.list();
    let width = list.width().max(1);
    let header = list.header_lines();
    let mut lines = Vec::with_capacity(list.height());

    if header >= 1 {
        lines.push(Line::single(fit_width(SIDEBAR_ACTIONS, width), Tone::Accent));
    }
    if header >= 2 {
        let toggle = if list.all_selected() {
            "[A] Deselect All"
        } else {
            "[A] Select All"
        };
        lines.push(Line::single(fit_width(toggle, width), Tone::Dim));
    }
    if header >= 3 {
        lines.push(Line::single("\u{2500}".repeat(width), Tone::Dim));
    }
    if header >= 4 {
        let title = if app.is_dirty() {
            format!("{SIDEBAR_TITLE} *")
        } else {
            SIDEBAR_TITLE.to_owned()
        };
        lines.push(Line::single(fit_width(&title, width), Tone::Title));
    }

    let visible = list.visible_height();
    if visible == 0 {
        return lines;
    }
    if list.is_empty() {
        lines.extend(
            EMPTY_LIST_LINES
                .iter()
                .take(visible)
                .map(|text| Line::single(fit_width(text, width), Tone::Hint)),
        );
        return lines;
    }

    let window = list.visible_window();
    let row_width = width.saturating_sub(SCROLLBAR_COLS);
    let last_row = window.rows.len().saturating_sub(1);
    for (row, item) in window.rows.iter().enumerate() {
        let index = window.first_index + row;
        let number = (index + 1).to_string();
        let name_room = row_width
            .saturating_sub(number.len() + ROW_CHROME_COLS)
            .max(5);
        let name = ellipsize(item.record.list_label(), name_room);

        let (checkbox, checkbox_tone) = if item.selected {
            ("[x]", Tone::Checked)
        } else {
            ("[ ]", Tone::Dim)
        };
        let row_tone = match (list.cursor() == Some(index), focused) {
            (true, true) => Tone::Highlight,
            (true, false) => Tone::Strong,
            _ => Tone::Normal,
        };
        let lead = format!("{checkbox} {} ", item.record.provider.badge());
        let rest = fit_width(
            &format!("{number}. {name}"),
            row_width.saturating_sub(lead.width()),
        );

        let gutter = if row == 0 && window.has_above {
            Span::new(EDGE_UP, Tone::Edge)
        } else if row == last_row && window.has_below {
            Span::new(EDGE_DOWN, Tone::Edge)
        } else {
            match window.scrollbar {
                Some(bar) if bar.is_thumb(row) => Span::new(SCROLLBAR_THUMB, Tone::Thumb),
                Some(_) => Span::new(SCROLLBAR_TRACK, Tone::Track),
                None => Span::new(" ", Tone::Normal),
            }
        };

        let line = Line {
            spans: vec![
                Span::new(checkbox, checkbox_tone),
                Span::new(" ", row_tone),
                Span::new(
                    item.record.provider.badge(),
                    Tone::Badge(BadgeTone::for_provider(&item.record.provider)),
                ),
                Span::new(" ", row_tone),
                Span::new(rest, row_tone),
                gutter,
            ],
        };
        lines.push(clip_line(line, width));
    }
    lines
}

fn form_lines(app: &App, focused: bool) -> Vec<Line> {
    let form = app.form();
    let width = form.width().max(1);
    let page = form.page(focused);

    let title = match app.list().current() {
        Some(record) if !record.display_name.is_empty() => {
            format!("EDITING: {}", record.display_name)
        }
        _ => "NEW MODEL".to_owned(),
    };
    let mut lines = vec![Line::single(fit_width(&title, width), Tone::Title)];
    if page.header_rows > 1 {
        lines.push(Line::blank());
    }
    lines.truncate(page.header_rows);

    match page.body {
        FormBody::Empty => {}
        FormBody::Fields(window) => {
            for index in window.start..window.end {
                if index > window.start {
                    lines.extend((0..page.gap).map(|_| Line::blank()));
                }
                let field = Field::from_index(index);
                lines.extend(field_block(form, field, focused && form.focus() == field, width));
            }
        }
        FormBody::Clipped { field, rows } => {
            let mut block = field_block(form, field, focused, width);
            block.truncate(rows);
            lines.extend(block);
        }
    }
    lines
}

fn field_block(form: &EditForm, field: Field, active: bool, width: usize) -> Vec<Line> {
    let mut label = Line::single(field.label(), Tone::Label);
    if let Some(error) = form.error(field).filter(|_| field.is_text()) {
        label.spans.push(Span::new(format!(" ! {error}"), Tone::Error));
    }
    let label = clip_line(label, width);

    let border = if active { Tone::Accent } else { Tone::Dim };
    let inner = width.saturating_sub(4).max(1);
    let rule = "\u{2500}".repeat(width.saturating_sub(2));
    let mut middle = vec![Span::new("\u{2502} ", border)];
    middle.extend(input_spans(form, field, active, inner));
    middle.push(Span::new(" \u{2502}", border));

    let mut block = vec![
        label,
        Line::single(format!("\u{256d}{rule}\u{256e}"), border),
        Line { spans: middle },
        Line::single(format!("\u{2570}{rule}\u{256f}"), border),
    ];
    if active {
        block.push(Line::single(
            fit_width(&format!("  {}", field.hint()), width),
            Tone::Hint,
        ));
    }
    block
}

/// Content of one input box, exactly `inner` columns wide.
fn input_spans(form: &EditForm, field: Field, active: bool, inner: usize) -> Vec<Span> {
    if field == Field::Provider {
        let text = format!("< {} >", form.provider().as_str());
        return vec![Span::new(fit_width(&text, inner), Tone::Normal)];
    }

    let prompt_width = INPUT_PROMPT.width().min(inner);
    let room = inner - prompt_width;
    let mut spans = vec![Span::new(&INPUT_PROMPT[..prompt_width], Tone::Accent)];
    let input = form.input(field);

    if input.value().is_empty() {
        if active && room > 0 {
            spans.push(Span::new(" ", Tone::Caret));
            spans.push(Span::new(
                fit_width(field.placeholder(), room - 1),
                Tone::Placeholder,
            ));
        } else {
            spans.push(Span::new(fit_width(field.placeholder(), room), Tone::Placeholder));
        }
        return spans;
    }

    let chars: Vec<char> = if field == Field::ApiKey && !form.credential_visible() {
        vec!['*'; input.char_len()]
    } else {
        input.value().chars().collect()
    };
    let cursor = input.cursor().min(chars.len());
    let start = if active && cursor >= room {
        cursor + 1 - room
    } else {
        0
    };

    let mut used = 0;
    let mut before = String::new();
    let mut caret = None;
    let mut after = String::new();
    for (index, ch) in chars.iter().enumerate().skip(start) {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > room {
            break;
        }
        used += ch_width;
        if active && index == cursor {
            caret = Some(ch.to_string());
        } else if caret.is_some() {
            after.push(*ch);
        } else {
            before.push(*ch);
        }
    }
    spans.push(Span::new(before, Tone::Normal));
    if active && caret.is_none() && used < room {
        caret = Some(" ".to_owned());
        used += 1;
    }
    if let Some(caret) = caret {
        spans.push(Span::new(caret, Tone::Caret));
    }
    spans.push(Span::new(after, Tone::Normal));
    spans.push(Span::new(" ".repeat(room.saturating_sub(used)), Tone::Normal));
    spans
}

fn status_line(app: &App, now: OffsetDateTime) -> Line {
    let width = app.status().width().saturating_sub(4);
    let (text, tone) = match app.status().visible(now) {
        Some((message, level)) => (message, Tone::Status(level)),
        None => (crate::IDLE_STATUS, Tone::Idle),
    };
    let line = Line {
        spans: vec![Span::new("Status: ", Tone::Normal), Span::new(text, tone)],
    };
    pad_line(clip_line(line, width), width)
}

fn help_line(app: &App) -> Line {
    let text = match app.pane() {
        Pane::Sidebar => SIDEBAR_HELP,
        Pane::Form => FORM_HELP,
    };
    let width = app.layout().terminal.width.saturating_sub(2);
    Line::single(fit_width(text, width), Tone::Dim)
}

fn modal(app: &App) -> Option<Modal> {
    let overlay = app.overlay();
    let message = overlay.message()?;
    let inner = overlay.width().saturating_sub(MODAL_CHROME_COLS).max(1);
    let mut lines = vec![Line::single(CONFIRM_TITLE, Tone::Warning), Line::blank()];
    lines.extend(
        wrap_words(message, inner)
            .into_iter()
            .map(|text| Line::single(text, Tone::Label)),
    );
    lines.push(Line::blank());
    lines.push(Line::single(truncate_width(CONFIRM_BUTTONS, inner), Tone::Dim));
    Some(Modal {
        width: overlay.width(),
        lines,
    })
}

/// Longest prefix of `text` no wider than `width` columns.
pub fn truncate_width(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width {
            break;
        }
        used += ch_width;
        out.push(ch);
    }
    out
}

/// Truncates or right-pads `text` to exactly `width` columns.
pub fn fit_width(text: &str, width: usize) -> String {
    let mut out = truncate_width(text, width);
    let used = out.width();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}

/// Shortens `text` to `max` columns, marking the cut with `...`.
pub fn ellipsize(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_owned();
    }
    let mut out = truncate_width(text, max.saturating_sub(3));
    out.push_str("...");
    out
}

fn clip_line(line: Line, width: usize) -> Line {
    let mut used = 0;
    let mut spans = Vec::with_capacity(line.spans.len());
    for span in line.spans {
        let room = width.saturating_sub(used);
        if room == 0 {
            break;
        }
        let text = truncate_width(&span.text, room);
        used += text.width();
        spans.push(Span::new(text, span.tone));
    }
    Line { spans }
}

fn pad_line(mut line: Line, width: usize) -> Line {
    let used = line.width();
    if used < width {
        line.spans.push(Span::new(" ".repeat(width - used), Tone::Normal));
    }
    line
}

fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let word = truncate_width(word, width);
        if !current.is_empty() && current.width() + 1 + word.width() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
