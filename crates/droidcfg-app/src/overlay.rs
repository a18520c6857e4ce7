// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Destructive action held by the overlay until the user answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteCurrent,
    DeleteSelected,
}

impl ConfirmAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeleteCurrent => "delete_current",
            Self::DeleteSelected => "delete_selected",
        }
    }
}

pub const CONFIRM_TITLE: &str = "CONFIRM";
pub const CONFIRM_BUTTONS: &str = "[Yes (y)]  [No (n/esc)]";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmOverlay {
    pending: Option<(ConfirmAction, String)>,
    width: usize,
}

impl ConfirmOverlay {
    /// Arms the overlay, replacing anything already pending.
    pub fn show(&mut self, action: ConfirmAction, message: impl Into<String>) {
        self.pending = Some((action, message.into()));
    }

    pub const fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.pending.as_ref().map(|(_, message)| message.as_str())
    }

    pub fn action(&self) -> Option<ConfirmAction> {
        self.pending.as_ref().map(|(action, _)| *action)
    }

    /// Disarms and hands back the action to run.
    pub fn confirm(&mut self) -> Option<ConfirmAction> {
        self.pending.take().map(|(action, _)| action)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }
}
