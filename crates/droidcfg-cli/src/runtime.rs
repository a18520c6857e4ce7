// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use droidcfg_app::{Document, DocumentStore};
use droidcfg_store::FileStore;
use tracing::{error, warn};

pub struct FileRuntime<'a> {
    store: &'a FileStore,
}

impl<'a> FileRuntime<'a> {
    pub fn new(store: &'a FileStore) -> Self {
        Self { store }
    }
}

impl DocumentStore for FileRuntime<'_> {
    fn load(&mut self) -> Result<Option<Document>> {
        self.store.load().inspect_err(|load_error| {
            warn!(path = %self.store.path().display(), "load failed: {load_error:#}");
        })
    }

    fn save(&mut self, document: &Document) -> Result<()> {
        self.store.save(document).inspect_err(|save_error| {
            error!(path = %self.store.path().display(), "save failed: {save_error:#}");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::FileRuntime;
    use anyhow::Result;
    use droidcfg_app::{App, AppSettings, DocumentStore, Key, RECOVERY_WARNING};
    use droidcfg_store::FileStore;
    use droidcfg_testkit::{fixture_now, sample_document_json, temp_document_path};
    use serde_json::Value;
    use std::fs;

    #[test]
    fn new_model_is_written_through_to_disk() -> Result<()> {
        let (_dir, path) = temp_document_path()?;
        let store = FileStore::open(&path)?;
        let mut runtime = FileRuntime::new(&store);

        let mut app = App::from_load(runtime.load(), AppSettings::default(), fixture_now());
        app.resize(120, 40);
        app.handle_key(&mut runtime, Key::Char('n'), fixture_now());
        app.handle_key(&mut runtime, Key::Ctrl('u'), fixture_now());
        for ch in "Mine".chars() {
            app.handle_key(&mut runtime, Key::Char(ch), fixture_now());
        }
        app.handle_key(&mut runtime, Key::Ctrl('s'), fixture_now());

        let saved: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        let models = saved["custom_models"].as_array().expect("model list");
        assert_eq!(models.len(), 1);
        assert_eq!(models[0]["model_display_name"], "Mine");
        assert_eq!(models[0]["provider"], "openai");
        assert!(!app.is_dirty());
        Ok(())
    }

    #[test]
    fn unknown_keys_survive_an_edit_session() -> Result<()> {
        let (_dir, path) = temp_document_path()?;
        fs::create_dir_all(path.parent().expect("temp path has a parent"))?;
        fs::write(&path, serde_json::to_string_pretty(&sample_document_json())?)?;

        let store = FileStore::open(&path)?;
        let mut runtime = FileRuntime::new(&store);
        let mut app = App::from_load(runtime.load(), AppSettings::default(), fixture_now());
        app.resize(120, 40);
        app.handle_key(&mut runtime, Key::CtrlDown, fixture_now());
        app.handle_key(&mut runtime, Key::Char('n'), fixture_now());
        app.handle_key(&mut runtime, Key::Ctrl('s'), fixture_now());

        let saved: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(saved["other_field"], "should be preserved");
        assert_eq!(saved["theme"], "dark");
        assert_eq!(saved["custom_models"].as_array().map(Vec::len), Some(2));
        Ok(())
    }

    #[test]
    fn unreadable_document_starts_empty_with_a_warning() -> Result<()> {
        let (_dir, path) = temp_document_path()?;
        fs::create_dir_all(path.parent().expect("temp path has a parent"))?;
        fs::write(&path, "\"just a string\"")?;

        let store = FileStore::open(&path)?;
        let mut runtime = FileRuntime::new(&store);
        let app = App::from_load(runtime.load(), AppSettings::default(), fixture_now());

        assert!(app.list().is_empty());
        assert_eq!(app.status().text(fixture_now()), RECOVERY_WARNING);
        Ok(())
    }
}
