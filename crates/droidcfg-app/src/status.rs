// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::{Duration, OffsetDateTime};

pub const IDLE_STATUS: &str = "Ready";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
    Warning,
}

impl StatusLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }

    pub const fn default_ttl(self) -> Duration {
        match self {
            Self::Info | Self::Success => Duration::seconds(3),
            Self::Error => Duration::seconds(5),
            Self::Warning => Duration::seconds(4),
        }
    }
}

/// One leveled message that stops showing once its expiry passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    message: String,
    level: StatusLevel,
    expires_at: OffsetDateTime,
    width: usize,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: String::new(),
            level: StatusLevel::Info,
            expires_at: OffsetDateTime::UNIX_EPOCH,
            width: 0,
        }
    }
}

impl StatusLine {
    pub fn set(
        &mut self,
        message: impl Into<String>,
        level: StatusLevel,
        ttl: Duration,
        now: OffsetDateTime,
    ) {
        self.message = message.into();
        self.level = level;
        self.expires_at = now + ttl;
    }

    pub fn warning(&mut self, message: impl Into<String>, now: OffsetDateTime) {
        self.set(message, StatusLevel::Warning, StatusLevel::Warning.default_ttl(), now);
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }

    /// The message while it is live, otherwise `None`.
    pub fn visible(&self, now: OffsetDateTime) -> Option<(&str, StatusLevel)> {
        if self.message.is_empty() || self.is_expired(now) {
            return None;
        }
        Some((&self.message, self.level))
    }

    pub fn text(&self, now: OffsetDateTime) -> &str {
        self.visible(now).map_or(IDLE_STATUS, |(message, _)| message)
    }

    pub const fn level(&self) -> StatusLevel {
        self.level
    }

    pub const fn expires_at(&self) -> OffsetDateTime {
        self.expires_at
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }
}
