// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use anyhow::{Result, bail};

use crate::window::{Window, fit_blocks};
use crate::{Key, ModelRecord, Provider};

pub const INPUT_CHAR_LIMIT: usize = 256;
/// Forms at least this tall get a blank row between field blocks.
pub const FIELD_GAP_MIN_HEIGHT: usize = 31;
/// Forms at least this tall get a blank row under the title.
pub const TITLE_GAP_MIN_HEIGHT: usize = 12;
/// Label row plus the bordered three-row input.
pub const FIELD_BLOCK_ROWS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    DisplayName,
    ModelId,
    BaseUrl,
    ApiKey,
    Provider,
    MaxTokens,
}

impl Field {
    pub const ALL: [Self; 6] = [
        Self::DisplayName,
        Self::ModelId,
        Self::BaseUrl,
        Self::ApiKey,
        Self::Provider,
        Self::MaxTokens,
    ];
    pub const COUNT: usize = Self::ALL.len();

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::COUNT]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DisplayName => "Display Name:",
            Self::ModelId => "Model ID:",
            Self::BaseUrl => "Base URL:",
            Self::ApiKey => "API Key:",
            Self::Provider => "Provider:",
            Self::MaxTokens => "Max Tokens:",
        }
    }

    pub const fn hint(self) -> &'static str {
        match self {
            Self::DisplayName => "Name displayed in the UI",
            Self::ModelId => "Identifier (e.g., gpt-4-turbo)",
            Self::BaseUrl => "API endpoint, usually ends in /v1",
            Self::ApiKey => "Provider API key (Ctrl+V to toggle)",
            Self::Provider => "\u{2190} \u{2192} to switch providers",
            Self::MaxTokens => "Maximum tokens per request",
        }
    }

    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::DisplayName => "Display Name (required)",
            Self::ModelId => "e.g., gpt-4, claude-3-opus",
            Self::BaseUrl => "https://api.example.com/v1",
            Self::ApiKey => "sk-...",
            Self::Provider => "",
            Self::MaxTokens => "e.g., 4096",
        }
    }

    /// Every field except the provider selector takes typed text.
    pub const fn is_text(self) -> bool {
        !matches!(self, Self::Provider)
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Self {
        Self::from_index(self.index() + Self::COUNT - 1)
    }

    pub const fn is_last(self) -> bool {
        matches!(self, Self::MaxTokens)
    }
}

/// Single-line editable value with a character cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in characters.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Replaces the value (truncated to the limit) and parks the cursor at the end.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().take(INPUT_CHAR_LIMIT).collect();
        self.cursor = self.char_len();
    }

    pub fn insert(&mut self, ch: char) -> bool {
        if ch.is_control() || self.char_len() >= INPUT_CHAR_LIMIT {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.value.remove(at);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.value.remove(at);
        true
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn delete_to_start(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.value.replace_range(..at, "");
        self.cursor = 0;
        true
    }

    pub fn delete_to_end(&mut self) -> bool {
        let at = self.byte_offset(self.cursor);
        if at >= self.value.len() {
            return false;
        }
        self.value.truncate(at);
        true
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map_or(self.value.len(), |(offset, _)| offset)
    }
}

/// Which field blocks the form draws for the current height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormBody {
    Empty,
    Fields(Window),
    /// Only the focused block, cut to `rows`.
    Clipped { field: Field, rows: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormPage {
    /// Title row, plus a blank row on taller forms, limited to the height.
    pub header_rows: usize,
    pub gap: usize,
    pub body: FormBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    inputs: [TextInput; Field::COUNT],
    provider_index: usize,
    unrecognized_provider: Option<String>,
    focus: Field,
    show_credential: bool,
    errors: BTreeMap<Field, String>,
    width: usize,
    height: usize,
}

impl Default for EditForm {
    fn default() -> Self {
        Self {
            inputs: Default::default(),
            provider_index: 0,
            unrecognized_provider: None,
            focus: Field::DisplayName,
            show_credential: false,
            errors: BTreeMap::new(),
            width: 0,
            height: 0,
        }
    }
}

impl EditForm {
    /// Fills every field from `record`, or blanks them when `None`.
    pub fn load_record(&mut self, record: Option<&ModelRecord>) {
        self.errors.clear();
        let Some(record) = record else {
            for input in &mut self.inputs {
                input.set_value("");
            }
            self.provider_index = 0;
            self.unrecognized_provider = None;
            return;
        };

        self.input_mut(Field::DisplayName).set_value(&record.display_name);
        self.input_mut(Field::ModelId).set_value(&record.model_id);
        self.input_mut(Field::BaseUrl).set_value(&record.base_url);
        self.input_mut(Field::ApiKey).set_value(&record.api_key);
        let max_tokens = record
            .max_tokens
            .map(|value| value.to_string())
            .unwrap_or_default();
        self.input_mut(Field::MaxTokens).set_value(&max_tokens);

        match record.provider.position() {
            Some(index) => {
                self.provider_index = index;
                self.unrecognized_provider = None;
            }
            None => {
                self.provider_index = 0;
                self.unrecognized_provider = Some(record.provider.as_str().to_owned());
            }
        }
    }

    /// Snapshot of the current field contents. Unparsable max tokens read as unset.
    pub fn current_model(&self) -> ModelRecord {
        let max_tokens =
            parse_max_tokens(self.input(Field::MaxTokens).value()).filter(|value| *value > 0);
        ModelRecord {
            display_name: self.input(Field::DisplayName).value().to_owned(),
            model_id: self.input(Field::ModelId).value().to_owned(),
            base_url: self.input(Field::BaseUrl).value().to_owned(),
            api_key: self.input(Field::ApiKey).value().to_owned(),
            provider: self.provider(),
            max_tokens,
        }
    }

    /// Checks the fields in order; the first failure is recorded against its
    /// field and returned.
    pub fn validate(&mut self) -> Result<()> {
        self.errors.clear();
        if self.input(Field::DisplayName).value().is_empty() {
            self.errors.insert(Field::DisplayName, "Required".to_owned());
            bail!("Display Name is required");
        }
        let max_tokens = self.input(Field::MaxTokens).value();
        if !max_tokens.is_empty() && parse_max_tokens(max_tokens).is_none() {
            self.errors
                .insert(Field::MaxTokens, "Must be positive integer".to_owned());
            bail!("Max Tokens must be a positive integer");
        }
        Ok(())
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub const fn focus(&self) -> Field {
        self.focus
    }

    pub fn set_focus(&mut self, field: Field) {
        self.focus = field;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn provider(&self) -> Provider {
        match &self.unrecognized_provider {
            Some(raw) => Provider::Unrecognized(raw.clone()),
            None => Provider::known(self.provider_index),
        }
    }

    /// An unrecognized provider is replaced by the first known one.
    pub fn next_provider(&mut self) {
        if self.unrecognized_provider.take().is_some() {
            self.provider_index = 0;
            return;
        }
        self.provider_index = (self.provider_index + 1) % Provider::KNOWN.len();
    }

    /// An unrecognized provider is replaced by the last known one.
    pub fn prev_provider(&mut self) {
        let count = Provider::KNOWN.len();
        if self.unrecognized_provider.take().is_some() {
            self.provider_index = count - 1;
            return;
        }
        self.provider_index = (self.provider_index + count - 1) % count;
    }

    pub fn toggle_credential_mask(&mut self) {
        self.show_credential = !self.show_credential;
    }

    pub const fn credential_visible(&self) -> bool {
        self.show_credential
    }

    pub fn input(&self, field: Field) -> &TextInput {
        &self.inputs[field.index()]
    }

    fn input_mut(&mut self, field: Field) -> &mut TextInput {
        &mut self.inputs[field.index()]
    }

    /// Applies an editing key to the focused text field. Returns whether the
    /// key was consumed.
    pub fn edit_focused(&mut self, key: Key) -> bool {
        if !self.focus.is_text() {
            return false;
        }
        let input = self.input_mut(self.focus);
        match key {
            Key::Char(ch) => {
                input.insert(ch);
            }
            Key::Backspace => {
                input.backspace();
            }
            Key::Delete => {
                input.delete();
            }
            Key::Left => input.left(),
            Key::Right => input.right(),
            Key::Home | Key::Ctrl('a') => input.home(),
            Key::End | Key::Ctrl('e') => input.end(),
            Key::Ctrl('u') => {
                input.delete_to_start();
            }
            Key::Ctrl('k') => {
                input.delete_to_end();
            }
            _ => return false,
        }
        true
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Rows drawn for `field`; the hint row shows only under pane focus.
    pub fn block_rows(&self, field: Field, pane_focused: bool) -> usize {
        FIELD_BLOCK_ROWS + usize::from(pane_focused && field == self.focus)
    }

    /// Decides which whole field blocks fit in the current height.
    pub fn page(&self, pane_focused: bool) -> FormPage {
        let header = if self.height >= TITLE_GAP_MIN_HEIGHT { 2 } else { 1 };
        let gap = usize::from(self.height >= FIELD_GAP_MIN_HEIGHT);
        if self.height <= header {
            return FormPage {
                header_rows: self.height,
                gap,
                body: FormBody::Empty,
            };
        }

        let available = self.height - header;
        let heights = Field::ALL.map(|field| self.block_rows(field, pane_focused));
        let body = match fit_blocks(&heights, self.focus.index(), available, gap) {
            Some(window) => FormBody::Fields(window),
            None => FormBody::Clipped {
                field: self.focus,
                rows: heights[self.focus.index()].min(available),
            },
        };
        FormPage {
            header_rows: header,
            gap,
            body,
        }
    }
}

/// Max Tokens accepts a non-negative integer within the signed 64-bit range.
fn parse_max_tokens(raw: &str) -> Option<u64> {
    raw.parse::<i64>()
        .ok()
        .and_then(|value| u64::try_from(value).ok())
}
