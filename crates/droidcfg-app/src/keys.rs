// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// A decoded key press, independent of the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Home,
    End,
    Char(char),
    /// Control-modified letter, stored lower-case.
    Ctrl(char),
    CtrlUp,
    CtrlDown,
}

impl Key {
    pub const fn is_confirm(self) -> bool {
        matches!(self, Self::Char('y' | 'Y'))
    }

    pub const fn is_cancel(self) -> bool {
        matches!(self, Self::Char('n' | 'N') | Self::Esc)
    }
}

#[cfg(test)]
mod tests {
    use super::Key;

    #[test]
    fn overlay_answers_accept_both_cases() {
        assert!(Key::Char('y').is_confirm());
        assert!(Key::Char('Y').is_confirm());
        assert!(Key::Char('N').is_cancel());
        assert!(Key::Esc.is_cancel());
        assert!(!Key::Enter.is_confirm());
        assert!(!Key::Enter.is_cancel());
    }
}
