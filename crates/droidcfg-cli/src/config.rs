// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use droidcfg_app::DEFAULT_SCROLL_PADDING;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const CONFIG_VERSION: i64 = 1;
pub const CONFIG_PATH_ENV: &str = "DROIDCFG_CONFIG_PATH";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub document_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub scroll_padding: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;
        Ok(config_root.join(droidcfg_store::APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and keep values under [storage], [ui], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(document_path) = &self.storage.document_path {
            droidcfg_store::validate_document_path(document_path)
                .with_context(|| format!("storage.document_path in {}", path.display()))?;
        }

        if let Some(padding) = self.ui.scroll_padding
            && padding < 0
        {
            bail!(
                "ui.scroll_padding in {} must be non-negative, got {}",
                path.display(),
                padding
            );
        }

        if let Some(level) = &self.log.level {
            EnvFilter::try_new(level).with_context(|| {
                format!(
                    "log.level in {} is not a valid filter: {level:?}; use one of trace, debug, info, warn, error",
                    path.display()
                )
            })?;
        }

        Ok(())
    }

    /// `[storage].document_path`, then `DROIDCFG_DOCUMENT_PATH`, then `~/.factory/config.json`.
    pub fn document_path(&self) -> Result<PathBuf> {
        match &self.storage.document_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => droidcfg_store::default_document_path(),
        }
    }

    pub fn scroll_padding(&self) -> usize {
        self.ui
            .scroll_padding
            .and_then(|padding| usize::try_from(padding).ok())
            .unwrap_or(DEFAULT_SCROLL_PADDING)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.log.file.as_deref().map(PathBuf::from)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# droid-config settings\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is ~/.factory/config.json\n# document_path = \"/absolute/path/to/config.json\"\n\n[ui]\nscroll_padding = {}\n\n[log]\nlevel = \"{}\"\n# file = \"/absolute/path/to/droid-config.log\"\n",
            path.display(),
            DEFAULT_SCROLL_PADDING,
            DEFAULT_LOG_LEVEL,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{CONFIG_PATH_ENV, Config};
    use anyhow::Result;
    use droidcfg_store::DOCUMENT_PATH_ENV;
    use std::path::PathBuf;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.scroll_padding(), 1);
        assert_eq!(config.log_level(), "info");
        assert!(config.log_file().is_none());
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[ui]\nscroll_padding = 2\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[storage], [ui], and [log]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[storage]\ndocument_path = \"/tmp/droid/config.json\"\n[ui]\nscroll_padding = 3\n[log]\nlevel = \"debug\"\nfile = \"/tmp/droid.log\"\n",
        )?;
        let config = Config::load(&path)?;
        assert_eq!(config.document_path()?, PathBuf::from("/tmp/droid/config.json"));
        assert_eq!(config.scroll_padding(), 3);
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.log_file(), Some(PathBuf::from("/tmp/droid.log")));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 7\n")?;
        let error = Config::load(&path).expect_err("v7 config should fail");
        assert!(error.to_string().contains("unsupported config version 7"));
        Ok(())
    }

    #[test]
    fn negative_scroll_padding_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nscroll_padding = -1\n")?;
        let error = Config::load(&path).expect_err("negative padding should fail");
        assert!(error.to_string().contains("must be non-negative"));
        Ok(())
    }

    #[test]
    fn bogus_log_level_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[log]\nlevel = \"loud=[\"\n")?;
        let error = Config::load(&path).expect_err("bad filter should fail");
        assert!(error.to_string().contains("log.level"));
        Ok(())
    }

    #[test]
    fn uri_style_document_path_is_rejected() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[storage]\ndocument_path = \"https://evil.example/config.json\"\n",
        )?;
        let error = Config::load(&path).expect_err("URI document_path should fail validation");
        let message = format!("{error:#}");
        assert!(message.contains("looks like a URI"), "unexpected message: {message}");
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn document_path_prefers_storage_config_over_env_override() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) =
            write_config("version = 1\n[storage]\ndocument_path = \"/explicit/config.json\"\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(DOCUMENT_PATH_ENV, "/from/env.json");
        }
        let config = Config::load(&path)?;
        let resolved = config.document_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(DOCUMENT_PATH_ENV);
        }
        assert_eq!(resolved, PathBuf::from("/explicit/config.json"));
        Ok(())
    }

    #[test]
    fn document_path_uses_env_override_when_storage_path_missing() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(DOCUMENT_PATH_ENV, "/from/env-only.json");
        }
        let config = Config::load(&path)?;
        let resolved = config.document_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(DOCUMENT_PATH_ENV);
        }
        assert_eq!(resolved, PathBuf::from("/from/env-only.json"));
        Ok(())
    }

    #[test]
    fn document_path_defaults_under_factory_dir() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var(DOCUMENT_PATH_ENV);
        }
        let config = Config::default();
        let resolved = config.document_path()?;
        assert!(
            resolved.ends_with(".factory/config.json"),
            "got {}",
            resolved.display()
        );
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, Config::example_config(&path))?;
        let config = Config::load(&path)?;
        assert_eq!(config.scroll_padding(), 1);
        assert_eq!(config.log_level(), "info");
        Ok(())
    }
}
