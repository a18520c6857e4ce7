// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub const LOG_FILTER_ENV: &str = "DROIDCFG_LOG";
const LOG_FILE_NAME: &str = "droid-config.log";

pub fn default_log_path() -> Result<PathBuf> {
    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve local data directory; set [log].file in the config")
    })?;
    Ok(data_root.join(droidcfg_store::APP_NAME).join(LOG_FILE_NAME))
}

/// `DROIDCFG_LOG` wins over the configured level.
pub fn build_filter(env_value: Option<&str>, configured: &str) -> Result<EnvFilter> {
    if let Some(raw) = env_value.filter(|raw| !raw.trim().is_empty()) {
        return EnvFilter::try_new(raw)
            .with_context(|| format!("parse {LOG_FILTER_ENV}={raw:?} as a log filter"));
    }
    EnvFilter::try_new(configured)
        .with_context(|| format!("parse log level {configured:?}"))
}

/// File-only logging; the terminal belongs to the UI. Keep the guard alive
/// until exit so buffered lines are flushed.
pub fn init(path: &Path, level: &str) -> Result<WorkerGuard> {
    let env_value = std::env::var(LOG_FILTER_ENV).ok();
    let filter = build_filter(env_value.as_deref(), level)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("create log directory {}", dir.display()))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log path {} has no file name", path.display()))?;

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .context("install log subscriber")?;
    Ok(guard)
}
