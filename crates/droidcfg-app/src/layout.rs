// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub const STATUS_BAR_ROWS: usize = 3;
pub const HELP_ROWS: usize = 1;
pub const MIN_CONTENT_ROWS: usize = 4;
pub const MIN_SIDEBAR_WIDTH: usize = 28;
pub const MIN_FORM_WIDTH: usize = 44;
pub const MIN_PANEL_ROWS: usize = 4;
/// Border plus one column of padding on each side.
pub const PANEL_CHROME_COLS: usize = 4;
pub const PANEL_CHROME_ROWS: usize = 2;
pub const MODAL_MAX_WIDTH: usize = 40;
pub const MODAL_MIN_WIDTH: usize = 20;
pub const MODAL_MARGIN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    SideBySide,
    Stacked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Usable interior once panel border and padding are removed.
    pub fn inner(self) -> Self {
        Self {
            width: self.width.saturating_sub(PANEL_CHROME_COLS).max(1),
            height: self.height.saturating_sub(PANEL_CHROME_ROWS).max(1),
        }
    }
}

/// Pane geometry for one terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneLayout {
    pub terminal: Size,
    pub arrangement: Arrangement,
    pub content_rows: usize,
    pub sidebar: Size,
    pub form: Size,
    pub status_width: usize,
    pub modal_width: usize,
}

impl Default for PaneLayout {
    fn default() -> Self {
        Self::compute(0, 0)
    }
}

impl PaneLayout {
    pub fn compute(width: usize, height: usize) -> Self {
        let content_rows = height
            .saturating_sub(STATUS_BAR_ROWS + HELP_ROWS)
            .max(MIN_CONTENT_ROWS);

        let (arrangement, sidebar, form) = if width >= MIN_SIDEBAR_WIDTH + MIN_FORM_WIDTH {
            let sidebar_width = (width / 3)
                .max(MIN_SIDEBAR_WIDTH)
                .min(width - MIN_FORM_WIDTH);
            (
                Arrangement::SideBySide,
                Size::new(sidebar_width, content_rows),
                Size::new(width - sidebar_width, content_rows),
            )
        } else {
            let (sidebar_rows, form_rows) = split_stacked(content_rows);
            (
                Arrangement::Stacked,
                Size::new(width, sidebar_rows),
                Size::new(width, form_rows),
            )
        };

        Self {
            terminal: Size::new(width, height),
            arrangement,
            content_rows,
            sidebar,
            form,
            status_width: width,
            modal_width: width
                .saturating_sub(MODAL_MARGIN)
                .clamp(MODAL_MIN_WIDTH, MODAL_MAX_WIDTH),
        }
    }

    pub fn list_area(&self) -> Size {
        self.sidebar.inner()
    }

    pub fn form_area(&self) -> Size {
        self.form.inner()
    }
}

fn split_stacked(content: usize) -> (usize, usize) {
    let sidebar = (content / 3).max(MIN_PANEL_ROWS);
    let form = content.saturating_sub(sidebar);
    if form >= MIN_PANEL_ROWS {
        return (sidebar, form);
    }
    let sidebar = content.saturating_sub(MIN_PANEL_ROWS);
    if sidebar >= MIN_PANEL_ROWS {
        return (sidebar, MIN_PANEL_ROWS);
    }
    let sidebar = content / 2;
    (sidebar, content - sidebar)
}
