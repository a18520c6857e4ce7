// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use time::{Duration, OffsetDateTime};
use tracing::{debug, error, warn};

use crate::{
    ConfirmAction, ConfirmOverlay, DEFAULT_SCROLL_PADDING, Document, DocumentStore, EditForm,
    Field, Key, ModelList, ModelRecord, PaneLayout, StatusLevel, StatusLine,
};

pub const RECOVERY_WARNING: &str = "Config unreadable; starting with no custom models";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Sidebar,
    Form,
}

/// Where keys go when no overlay is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Form(Field),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    FocusChanged(Focus),
    SelectionChanged(Option<usize>),
    StatusUpdated { level: StatusLevel, ttl: Duration },
    Persisted { records: usize },
    PersistFailed(String),
    OverlayOpened(ConfirmAction),
    OverlayClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppSettings {
    pub scroll_padding: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            scroll_padding: DEFAULT_SCROLL_PADDING,
        }
    }
}

/// Root of the editor: owns the document and every component.
#[derive(Debug, Clone)]
pub struct App {
    document: Document,
    list: ModelList,
    form: EditForm,
    overlay: ConfirmOverlay,
    status: StatusLine,
    layout: PaneLayout,
    pane: Pane,
    dirty: bool,
}

impl App {
    pub fn new(document: Document, settings: AppSettings) -> Self {
        let mut list = ModelList::new(settings.scroll_padding);
        list.load(document.custom_models.clone());
        let mut form = EditForm::default();
        form.load_record(list.current());
        Self {
            document,
            list,
            form,
            overlay: ConfirmOverlay::default(),
            status: StatusLine::default(),
            layout: PaneLayout::default(),
            pane: Pane::Sidebar,
            dirty: false,
        }
    }

    /// Builds the app from a storage load. Missing documents start empty and
    /// unreadable ones start empty with a warning.
    pub fn from_load(
        loaded: Result<Option<Document>>,
        settings: AppSettings,
        now: OffsetDateTime,
    ) -> Self {
        match loaded {
            Ok(Some(document)) => Self::new(document, settings),
            Ok(None) => Self::new(Document::default(), settings),
            Err(load_error) => {
                warn!("starting with an empty document: {load_error:#}");
                let mut app = Self::new(Document::default(), settings);
                app.status.warning(RECOVERY_WARNING, now);
                app
            }
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn list(&self) -> &ModelList {
        &self.list
    }

    pub fn form(&self) -> &EditForm {
        &self.form
    }

    pub fn overlay(&self) -> &ConfirmOverlay {
        &self.overlay
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn layout(&self) -> &PaneLayout {
        &self.layout
    }

    pub const fn pane(&self) -> Pane {
        self.pane
    }

    pub fn focus(&self) -> Focus {
        match self.pane {
            Pane::Sidebar => Focus::Sidebar,
            Pane::Form => Focus::Form(self.form.focus()),
        }
    }

    /// True while the in-memory records differ from the last successful save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.layout = PaneLayout::compute(width, height);
        let list_area = self.layout.list_area();
        let form_area = self.layout.form_area();
        self.list.set_size(list_area.width, list_area.height);
        self.form.set_size(form_area.width, form_area.height);
        self.status.set_width(self.layout.status_width);
        self.overlay.set_width(self.layout.modal_width);
    }

    pub fn handle_key<S: DocumentStore>(
        &mut self,
        store: &mut S,
        key: Key,
        now: OffsetDateTime,
    ) -> Vec<AppEvent> {
        if self.overlay.is_active() {
            return self.handle_overlay_key(store, key, now);
        }

        match key {
            Key::Ctrl('c') => return vec![AppEvent::Quit],
            Key::Tab => return self.tab_forward(),
            Key::BackTab => return self.tab_backward(),
            Key::Esc => {
                if self.pane == Pane::Form {
                    return self.return_to_sidebar();
                }
                return Vec::new();
            }
            Key::Ctrl('s') => return self.save_current(store, now),
            Key::Ctrl('v') => {
                if self.pane == Pane::Form {
                    self.form.toggle_credential_mask();
                }
                return Vec::new();
            }
            Key::CtrlUp | Key::CtrlDown => {
                if self.pane == Pane::Sidebar {
                    return self.reorder(store, key == Key::CtrlUp, now);
                }
                return Vec::new();
            }
            _ => {}
        }

        match self.pane {
            Pane::Sidebar => self.handle_sidebar_key(store, key, now),
            Pane::Form => self.handle_form_key(store, key, now),
        }
    }

    fn handle_overlay_key<S: DocumentStore>(
        &mut self,
        store: &mut S,
        key: Key,
        now: OffsetDateTime,
    ) -> Vec<AppEvent> {
        if key.is_cancel() {
            self.overlay.cancel();
            return vec![AppEvent::OverlayClosed];
        }
        if !key.is_confirm() {
            return Vec::new();
        }

        let mut events = vec![AppEvent::OverlayClosed];
        match self.overlay.confirm() {
            Some(ConfirmAction::DeleteCurrent) => {
                if self.list.delete_current() {
                    debug!(remaining = self.list.len(), "deleted current model");
                    self.form.load_record(self.list.current());
                    events.push(AppEvent::SelectionChanged(self.list.cursor()));
                    events.extend(self.commit(store, StatusLevel::Success, "Model deleted", now));
                }
            }
            Some(ConfirmAction::DeleteSelected) => {
                let count = self.list.delete_selected();
                if count > 0 {
                    debug!(count, "deleted selected models");
                    self.form.load_record(self.list.current());
                    events.push(AppEvent::SelectionChanged(self.list.cursor()));
                    let message = format!("Deleted {count} model(s)");
                    events.extend(self.commit(store, StatusLevel::Success, &message, now));
                }
            }
            None => {}
        }
        events
    }

    fn handle_sidebar_key<S: DocumentStore>(
        &mut self,
        store: &mut S,
        key: Key,
        now: OffsetDateTime,
    ) -> Vec<AppEvent> {
        match key {
            Key::Up | Key::Char('k') => self.move_cursor(-1),
            Key::Down | Key::Char('j') => self.move_cursor(1),
            Key::Char(' ') => {
                self.list.toggle_selected();
                Vec::new()
            }
            Key::Char('a') => {
                self.list.toggle_select_all();
                Vec::new()
            }
            Key::Char('n') => self.add_model(store, now),
            Key::Char('d') => self.request_delete(),
            Key::Enter => {
                self.pane = Pane::Form;
                vec![AppEvent::FocusChanged(self.focus())]
            }
            _ => Vec::new(),
        }
    }

    fn handle_form_key<S: DocumentStore>(
        &mut self,
        store: &mut S,
        key: Key,
        now: OffsetDateTime,
    ) -> Vec<AppEvent> {
        if self.form.focus() == Field::Provider {
            match key {
                Key::Left | Key::Char('h') => self.form.prev_provider(),
                Key::Right | Key::Char('l') => self.form.next_provider(),
                Key::Up | Key::Char('k') => return self.shift_field(false),
                Key::Down | Key::Char('j') | Key::Enter => return self.shift_field(true),
                _ => {}
            }
            return Vec::new();
        }

        match key {
            Key::Up => self.shift_field(false),
            Key::Down => self.shift_field(true),
            Key::Enter if self.form.focus().is_last() => self.save_current(store, now),
            Key::Enter => self.shift_field(true),
            other => {
                self.form.edit_focused(other);
                Vec::new()
            }
        }
    }

    fn move_cursor(&mut self, delta: isize) -> Vec<AppEvent> {
        if !self.list.move_cursor(delta) {
            return Vec::new();
        }
        self.form.load_record(self.list.current());
        vec![AppEvent::SelectionChanged(self.list.cursor())]
    }

    fn shift_field(&mut self, forward: bool) -> Vec<AppEvent> {
        if forward {
            self.form.focus_next();
        } else {
            self.form.focus_prev();
        }
        vec![AppEvent::FocusChanged(self.focus())]
    }

    fn tab_forward(&mut self) -> Vec<AppEvent> {
        match self.pane {
            Pane::Sidebar => {
                self.pane = Pane::Form;
                self.form.set_focus(Field::DisplayName);
                vec![AppEvent::FocusChanged(self.focus())]
            }
            Pane::Form => self.shift_field(true),
        }
    }

    fn tab_backward(&mut self) -> Vec<AppEvent> {
        match self.pane {
            Pane::Sidebar => Vec::new(),
            Pane::Form if self.form.focus() == Field::DisplayName => self.return_to_sidebar(),
            Pane::Form => self.shift_field(false),
        }
    }

    /// Leaves the form, throwing away edits that were never saved.
    fn return_to_sidebar(&mut self) -> Vec<AppEvent> {
        self.pane = Pane::Sidebar;
        self.form.load_record(self.list.current());
        vec![AppEvent::FocusChanged(Focus::Sidebar)]
    }

    fn add_model<S: DocumentStore>(
        &mut self,
        store: &mut S,
        now: OffsetDateTime,
    ) -> Vec<AppEvent> {
        self.list.add(ModelRecord::placeholder());
        self.form.load_record(self.list.current());
        self.pane = Pane::Form;
        self.form.set_focus(Field::DisplayName);
        debug!(count = self.list.len(), "added model");

        let mut events = vec![
            AppEvent::SelectionChanged(self.list.cursor()),
            AppEvent::FocusChanged(self.focus()),
        ];
        events.extend(self.commit(
            store,
            StatusLevel::Info,
            "New model created - edit and save",
            now,
        ));
        events
    }

    fn request_delete(&mut self) -> Vec<AppEvent> {
        let selected = self.list.selected_indices().len();
        let (action, message) = if selected > 0 {
            (
                ConfirmAction::DeleteSelected,
                format!("Delete {selected} selected model(s)?"),
            )
        } else if let Some(current) = self.list.current() {
            let name = if current.display_name.is_empty() {
                "this model"
            } else {
                current.display_name.as_str()
            };
            (ConfirmAction::DeleteCurrent, format!("Delete \"{name}\"?"))
        } else {
            return Vec::new();
        };
        debug!(action = action.as_str(), "confirmation armed");
        self.overlay.show(action, message);
        vec![AppEvent::OverlayOpened(action)]
    }

    fn reorder<S: DocumentStore>(
        &mut self,
        store: &mut S,
        up: bool,
        now: OffsetDateTime,
    ) -> Vec<AppEvent> {
        let (moved, message) = if up {
            (self.list.move_current_up(), "Model moved up")
        } else {
            (self.list.move_current_down(), "Model moved down")
        };
        if !moved {
            return Vec::new();
        }
        let mut events = vec![AppEvent::SelectionChanged(self.list.cursor())];
        events.extend(self.commit(store, StatusLevel::Success, message, now));
        events
    }

    fn save_current<S: DocumentStore>(
        &mut self,
        store: &mut S,
        now: OffsetDateTime,
    ) -> Vec<AppEvent> {
        if self.list.is_empty() {
            return vec![self.set_status(StatusLevel::Warning, "No model selected", now)];
        }
        if let Err(invalid) = self.form.validate() {
            debug!(reason = %invalid, "form rejected");
            return vec![self.set_status(StatusLevel::Error, &invalid.to_string(), now)];
        }
        self.list.update_current(self.form.current_model());
        self.commit(store, StatusLevel::Success, "Changes saved!", now)
    }

    /// Writes the records through `store` after a mutation, then reports the
    /// outcome on the status line.
    fn commit<S: DocumentStore>(
        &mut self,
        store: &mut S,
        level: StatusLevel,
        message: &str,
        now: OffsetDateTime,
    ) -> Vec<AppEvent> {
        self.dirty = true;
        self.document.custom_models = self.list.records();
        match store.save(&self.document) {
            Ok(()) => {
                self.dirty = false;
                let records = self.document.custom_models.len();
                debug!(records, "document saved");
                vec![
                    AppEvent::Persisted { records },
                    self.set_status(level, message, now),
                ]
            }
            Err(save_error) => {
                let cause = format!("{save_error:#}");
                error!(%cause, "failed to save document");
                vec![
                    AppEvent::PersistFailed(cause.clone()),
                    self.set_status(StatusLevel::Error, &format!("Failed to save: {cause}"), now),
                ]
            }
        }
    }

    fn set_status(&mut self, level: StatusLevel, message: &str, now: OffsetDateTime) -> AppEvent {
        let ttl = level.default_ttl();
        debug!(level = level.as_str(), text = message, "status updated");
        self.status.set(message, level, ttl, now);
        AppEvent::StatusUpdated { level, ttl }
    }
}

#[cfg(test)]
mod tests {
    use super::{App, AppEvent, AppSettings, Focus, Pane, RECOVERY_WARNING};
    use crate::{ConfirmAction, Document, DocumentStore, Field, Key, ModelRecord, Provider};
    use anyhow::{Result, anyhow};
    use serde_json::json;
    use time::{OffsetDateTime, macros::datetime};

    const NOW: OffsetDateTime = datetime!(2026-05-04 9:30 UTC);

    #[derive(Default)]
    struct TestStore {
        saved: Vec<Document>,
        fail_with: Option<&'static str>,
    }

    impl DocumentStore for TestStore {
        fn load(&mut self) -> Result<Option<Document>> {
            Ok(self.saved.last().cloned())
        }

        fn save(&mut self, document: &Document) -> Result<()> {
            if let Some(message) = self.fail_with {
                return Err(anyhow!(message));
            }
            self.saved.push(document.clone());
            Ok(())
        }
    }

    fn named(name: &str) -> ModelRecord {
        ModelRecord {
            display_name: name.to_owned(),
            model_id: format!("{name}-id"),
            ..ModelRecord::placeholder()
        }
    }

    fn app_with(names: &[&str]) -> App {
        let mut app = App::new(
            Document::new(names.iter().map(|name| named(name)).collect()),
            AppSettings::default(),
        );
        app.resize(100, 30);
        app
    }

    fn press(app: &mut App, store: &mut TestStore, keys: &[Key]) -> Vec<AppEvent> {
        keys.iter()
            .flat_map(|key| app.handle_key(store, *key, NOW))
            .collect()
    }

    fn type_text(app: &mut App, store: &mut TestStore, text: &str) {
        for ch in text.chars() {
            app.handle_key(store, Key::Char(ch), NOW);
        }
    }

    fn display_names(app: &App) -> Vec<String> {
        app.list()
            .records()
            .into_iter()
            .map(|record| record.display_name)
            .collect()
    }

    #[test]
    fn new_model_from_an_empty_list() {
        let mut app = app_with(&[]);
        let mut store = TestStore::default();
        let events = press(&mut app, &mut store, &[Key::Char('n')]);

        assert_eq!(app.list().len(), 1);
        assert_eq!(app.list().cursor(), Some(0));
        let record = app.list().current().cloned().expect("new record");
        assert_eq!(record.display_name, "New Model");
        assert_eq!(record.provider, Provider::OpenAi);
        assert_eq!(app.focus(), Focus::Form(Field::DisplayName));
        assert_eq!(app.status().text(NOW), "New model created - edit and save");
        assert_eq!(store.saved.len(), 1);
        assert!(events.contains(&AppEvent::Persisted { records: 1 }));
        assert!(!app.is_dirty());
    }

    #[test]
    fn cancelled_delete_leaves_everything_alone() {
        let mut app = app_with(&["a", "b", "c", "d"]);
        let mut store = TestStore::default();
        press(
            &mut app,
            &mut store,
            &[Key::Char('a'), Key::Char(' '), Key::Char('d')],
        );
        assert_eq!(app.list().selected_indices(), vec![1, 2, 3]);
        assert_eq!(app.overlay().action(), Some(ConfirmAction::DeleteSelected));
        assert_eq!(app.overlay().message(), Some("Delete 3 selected model(s)?"));

        let events = press(&mut app, &mut store, &[Key::Esc]);
        assert_eq!(events, vec![AppEvent::OverlayClosed]);
        assert!(!app.overlay().is_active());
        assert_eq!(app.list().len(), 4);
        assert!(store.saved.is_empty());
    }

    #[test]
    fn confirmed_bulk_delete_persists() {
        let mut app = app_with(&["a", "b", "c"]);
        let mut store = TestStore::default();
        press(
            &mut app,
            &mut store,
            &[
                Key::Char(' '),
                Key::Down,
                Key::Down,
                Key::Char(' '),
                Key::Char('d'),
                Key::Char('Y'),
            ],
        );
        assert_eq!(display_names(&app), vec!["b"]);
        assert!(app.list().selected_indices().is_empty());
        assert_eq!(app.status().text(NOW), "Deleted 2 model(s)");
        assert_eq!(store.saved.len(), 1);
        assert_eq!(store.saved[0].custom_models.len(), 1);
        assert_eq!(app.form().current_model().display_name, "b");
    }

    #[test]
    fn delete_current_names_the_model() {
        let mut app = app_with(&["alpha", ""]);
        let mut store = TestStore::default();
        press(&mut app, &mut store, &[Key::Char('d')]);
        assert_eq!(app.overlay().message(), Some("Delete \"alpha\"?"));
        press(&mut app, &mut store, &[Key::Char('n'), Key::Down, Key::Char('d')]);
        assert_eq!(app.overlay().message(), Some("Delete \"this model\"?"));
        press(&mut app, &mut store, &[Key::Char('y')]);
        assert_eq!(display_names(&app), vec!["alpha"]);
        assert_eq!(app.status().text(NOW), "Model deleted");
    }

    #[test]
    fn overlay_swallows_unrelated_keys() {
        let mut app = app_with(&["a"]);
        let mut store = TestStore::default();
        press(&mut app, &mut store, &[Key::Char('d')]);
        let events = press(&mut app, &mut store, &[Key::Ctrl('c'), Key::Char('q'), Key::Enter]);
        assert!(events.is_empty());
        assert!(app.overlay().is_active());
    }

    #[test]
    fn delete_on_an_empty_list_does_nothing() {
        let mut app = app_with(&[]);
        let mut store = TestStore::default();
        assert!(press(&mut app, &mut store, &[Key::Char('d')]).is_empty());
        assert!(!app.overlay().is_active());
    }

    #[test]
    fn invalid_form_blocks_the_save() {
        let mut app = app_with(&["a"]);
        let mut store = TestStore::default();
        press(
            &mut app,
            &mut store,
            &[Key::Tab, Key::Ctrl('a'), Key::Ctrl('k'), Key::Ctrl('s')],
        );
        assert!(store.saved.is_empty());
        assert_eq!(app.status().text(NOW), "Display Name is required");
        assert_eq!(app.form().error(Field::DisplayName), Some("Required"));
        assert_eq!(display_names(&app), vec!["a"]);
    }

    #[test]
    fn enter_on_the_last_field_saves() {
        let mut app = app_with(&["a"]);
        let mut store = TestStore::default();
        press(&mut app, &mut store, &[Key::Tab, Key::BackTab, Key::Enter]);
        assert_eq!(app.focus(), Focus::Form(Field::DisplayName));
        for _ in 0..5 {
            press(&mut app, &mut store, &[Key::Enter]);
        }
        assert_eq!(app.focus(), Focus::Form(Field::MaxTokens));
        type_text(&mut app, &mut store, "4096");
        press(&mut app, &mut store, &[Key::Enter]);

        assert_eq!(app.status().text(NOW), "Changes saved!");
        assert_eq!(store.saved.len(), 1);
        assert_eq!(store.saved[0].custom_models[0].max_tokens, Some(4096));
    }

    #[test]
    fn out_of_range_max_tokens_is_rejected_and_in_range_reloads() -> Result<()> {
        let mut app = app_with(&["a", "b"]);
        let mut store = TestStore::default();
        press(&mut app, &mut store, &[Key::Tab]);
        for _ in 0..5 {
            press(&mut app, &mut store, &[Key::Down]);
        }
        assert_eq!(app.focus(), Focus::Form(Field::MaxTokens));

        type_text(&mut app, &mut store, "9223372036854775808");
        press(&mut app, &mut store, &[Key::Ctrl('s')]);
        assert!(store.saved.is_empty());
        assert_eq!(app.status().text(NOW), "Max Tokens must be a positive integer");

        press(&mut app, &mut store, &[Key::Backspace]);
        type_text(&mut app, &mut store, "7");
        press(&mut app, &mut store, &[Key::Ctrl('s')]);
        assert_eq!(app.status().text(NOW), "Changes saved!");

        let saved = store.load()?.expect("saved document");
        let reloaded = Document::parse_lenient(&saved.to_json_pretty()?)?;
        assert_eq!(reloaded.custom_models.len(), 2);
        assert_eq!(reloaded.custom_models[0].max_tokens, Some(i64::MAX as u64));
        Ok(())
    }

    #[test]
    fn escape_discards_unsaved_edits() {
        let mut app = app_with(&["a"]);
        let mut store = TestStore::default();
        press(&mut app, &mut store, &[Key::Tab]);
        type_text(&mut app, &mut store, "xyz");
        assert_eq!(app.form().current_model().display_name, "axyz");

        press(&mut app, &mut store, &[Key::Esc]);
        assert_eq!(app.pane(), Pane::Sidebar);
        assert_eq!(app.form().current_model().display_name, "a");
        assert!(store.saved.is_empty());
    }

    #[test]
    fn shift_tab_from_the_first_field_returns_and_reloads() {
        let mut app = app_with(&["a"]);
        let mut store = TestStore::default();
        press(&mut app, &mut store, &[Key::Tab, Key::Tab]);
        assert_eq!(app.focus(), Focus::Form(Field::ModelId));
        type_text(&mut app, &mut store, "!");
        press(&mut app, &mut store, &[Key::BackTab]);
        assert_eq!(app.focus(), Focus::Form(Field::DisplayName));
        press(&mut app, &mut store, &[Key::BackTab]);
        assert_eq!(app.focus(), Focus::Sidebar);
        assert_eq!(app.form().current_model().model_id, "a-id");
    }

    #[test]
    fn provider_field_cycles_with_arrows_and_letters() {
        let mut app = app_with(&["a"]);
        let mut store = TestStore::default();
        press(&mut app, &mut store, &[Key::Tab]);
        for _ in 0..4 {
            press(&mut app, &mut store, &[Key::Down]);
        }
        assert_eq!(app.focus(), Focus::Form(Field::Provider));
        press(&mut app, &mut store, &[Key::Right, Key::Char('l')]);
        assert_eq!(app.form().provider(), Provider::Anthropic);
        press(&mut app, &mut store, &[Key::Char('h')]);
        assert_eq!(app.form().provider(), Provider::GenericChatCompletionApi);
        press(&mut app, &mut store, &[Key::Char('j')]);
        assert_eq!(app.focus(), Focus::Form(Field::MaxTokens));
        press(&mut app, &mut store, &[Key::Up, Key::Char('k')]);
        assert_eq!(app.focus(), Focus::Form(Field::ApiKey));
    }

    #[test]
    fn reorder_only_from_the_sidebar() {
        let mut app = app_with(&["a", "b"]);
        let mut store = TestStore::default();
        press(&mut app, &mut store, &[Key::CtrlDown]);
        assert_eq!(display_names(&app), vec!["b", "a"]);
        assert_eq!(app.status().text(NOW), "Model moved down");
        assert_eq!(store.saved.len(), 1);

        press(&mut app, &mut store, &[Key::Enter, Key::CtrlUp]);
        assert_eq!(display_names(&app), vec!["b", "a"]);
        assert_eq!(store.saved.len(), 1);

        press(&mut app, &mut store, &[Key::Esc, Key::CtrlDown]);
        assert_eq!(store.saved.len(), 1);
        press(&mut app, &mut store, &[Key::CtrlUp]);
        assert_eq!(display_names(&app), vec!["a", "b"]);
        assert_eq!(app.status().text(NOW), "Model moved up");
    }

    #[test]
    fn failed_save_keeps_memory_and_reports_cause() {
        let mut app = app_with(&["a"]);
        let mut store = TestStore {
            fail_with: Some("disk full"),
            ..TestStore::default()
        };
        let events = press(&mut app, &mut store, &[Key::Char('n')]);
        assert_eq!(app.list().len(), 2);
        assert!(app.is_dirty());
        assert!(events.contains(&AppEvent::PersistFailed("disk full".to_owned())));
        assert_eq!(app.status().text(NOW), "Failed to save: disk full");

        store.fail_with = None;
        press(&mut app, &mut store, &[Key::Ctrl('s')]);
        assert!(!app.is_dirty());
        assert_eq!(store.saved[0].custom_models.len(), 2);
    }

    #[test]
    fn save_with_no_models_warns() {
        let mut app = app_with(&[]);
        let mut store = TestStore::default();
        press(&mut app, &mut store, &[Key::Tab, Key::Ctrl('s')]);
        assert_eq!(app.status().text(NOW), "No model selected");
        assert!(store.saved.is_empty());
    }

    #[test]
    fn cursor_moves_reload_the_form() {
        let mut app = app_with(&["a", "b"]);
        let mut store = TestStore::default();
        let events = press(&mut app, &mut store, &[Key::Char('j')]);
        assert_eq!(events, vec![AppEvent::SelectionChanged(Some(1))]);
        assert_eq!(app.form().current_model().display_name, "b");
        assert!(press(&mut app, &mut store, &[Key::Down]).is_empty());
        press(&mut app, &mut store, &[Key::Char('k')]);
        assert_eq!(app.form().current_model().display_name, "a");
    }

    #[test]
    fn credential_toggle_needs_form_focus() {
        let mut app = app_with(&["a"]);
        let mut store = TestStore::default();
        press(&mut app, &mut store, &[Key::Ctrl('v')]);
        assert!(!app.form().credential_visible());
        press(&mut app, &mut store, &[Key::Enter, Key::Ctrl('v')]);
        assert!(app.form().credential_visible());
    }

    #[test]
    fn quit_is_reported() {
        let mut app = app_with(&[]);
        let mut store = TestStore::default();
        assert_eq!(
            press(&mut app, &mut store, &[Key::Ctrl('c')]),
            vec![AppEvent::Quit]
        );
    }

    #[test]
    fn unreadable_document_recovers_empty() {
        let app = App::from_load(Err(anyhow!("bad json")), AppSettings::default(), NOW);
        assert!(app.list().is_empty());
        assert_eq!(app.status().text(NOW), RECOVERY_WARNING);

        let missing = App::from_load(Ok(None), AppSettings::default(), NOW);
        assert!(missing.list().is_empty());
        assert_eq!(missing.status().text(NOW), "Ready");
    }

    #[test]
    fn saving_keeps_the_rest_of_the_document() -> Result<()> {
        let raw = json!({
            "theme": "dark",
            "custom_models": [{"model_display_name": "a", "model": "m", "base_url": "",
                               "api_key": "", "provider": "anthropic", "max_tokens": 0}],
            "nested": {"keep": [1, 2, 3]}
        });
        let document = Document::parse(&raw.to_string())?;
        let mut app = App::new(document, AppSettings::default());
        app.resize(100, 30);
        let mut store = TestStore::default();
        press(&mut app, &mut store, &[Key::Ctrl('s')]);

        let saved = store.load()?.expect("saved document").to_value()?;
        assert_eq!(saved, raw);
        Ok(())
    }

    #[test]
    fn resize_pushes_sizes_into_components() {
        let mut app = app_with(&["a"]);
        app.resize(60, 40);
        assert_eq!(app.list().height(), 10);
        assert_eq!(app.form().height(), 22);
        assert_eq!(app.overlay().width(), 40);
        assert_eq!(app.status().width(), 60);
    }
}
