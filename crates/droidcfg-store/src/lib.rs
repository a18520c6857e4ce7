// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use droidcfg_app::Document;
use std::env;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub const APP_NAME: &str = "droid-config";
pub const DOCUMENT_PATH_ENV: &str = "DROIDCFG_DOCUMENT_PATH";
pub const FACTORY_DIR: &str = ".factory";
pub const DOCUMENT_FILE_NAME: &str = "config.json";

/// `~/.factory/config.json`, unless `DROIDCFG_DOCUMENT_PATH` is set.
pub fn default_document_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os(DOCUMENT_PATH_ENV) {
        return Ok(PathBuf::from(override_path));
    }

    let home = dirs::home_dir().ok_or_else(|| {
        anyhow!("cannot resolve home directory; set {DOCUMENT_PATH_ENV} to the config.json path")
    })?;
    Ok(home.join(FACTORY_DIR).join(DOCUMENT_FILE_NAME))
}

pub fn validate_document_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        bail!("document path must not be empty");
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "document path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("document path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    Ok(())
}

/// The JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        validate_document_path(&path.to_string_lossy())?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when the file does not exist yet.
    pub fn load(&self) -> Result<Option<Document>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no document yet");
                return Ok(None);
            }
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("read document {}", self.path.display()));
            }
        };

        let document = Document::parse_lenient(&raw)
            .with_context(|| format!("parse document {}", self.path.display()))?;
        debug!(
            path = %self.path.display(),
            models = document.custom_models.len(),
            "loaded document"
        );
        Ok(Some(document))
    }

    /// Writes a sibling temp file, then renames it over the target.
    ///
    /// A symlinked target is followed so the link survives and the file it
    /// points at is replaced. An existing target keeps its permissions; a new
    /// file gets the temp file's owner-only mode.
    pub fn save(&self, document: &Document) -> Result<()> {
        let target = self.resolve_target()?;
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("create directory {}", dir.display()))?;

        let mut body = document.to_json_pretty()?;
        body.push('\n');

        let mut staged = NamedTempFile::new_in(&dir)
            .with_context(|| format!("create temporary file in {}", dir.display()))?;
        staged
            .write_all(body.as_bytes())
            .context("write temporary document")?;
        staged.as_file().sync_all().context("flush temporary document")?;
        match fs::metadata(&target) {
            Ok(existing) => staged
                .as_file()
                .set_permissions(existing.permissions())
                .with_context(|| format!("copy permissions of {}", target.display()))?,
            Err(error) if error.kind() == ErrorKind::NotFound => {}
            Err(error) => {
                return Err(error).with_context(|| format!("stat {}", target.display()));
            }
        }
        staged
            .persist(&target)
            .with_context(|| format!("replace {}", target.display()))?;

        info!(
            path = %self.path.display(),
            models = document.custom_models.len(),
            "saved document"
        );
        Ok(())
    }

    /// The file a save should replace: the symlink's target when the
    /// document path is a link, the path itself otherwise.
    fn resolve_target(&self) -> Result<PathBuf> {
        match fs::symlink_metadata(&self.path) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let target = match fs::canonicalize(&self.path) {
                    Ok(target) => target,
                    // Dangling link: create the file it names.
                    Err(error) if error.kind() == ErrorKind::NotFound => {
                        let link = fs::read_link(&self.path)
                            .with_context(|| format!("read link {}", self.path.display()))?;
                        match self.path.parent() {
                            Some(parent) if link.is_relative() => parent.join(link),
                            _ => link,
                        }
                    }
                    Err(error) => {
                        return Err(error)
                            .with_context(|| format!("resolve link {}", self.path.display()));
                    }
                };
                debug!(
                    path = %self.path.display(),
                    target = %target.display(),
                    "saving through symlink"
                );
                Ok(target)
            }
            Ok(_) => Ok(self.path.clone()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(self.path.clone()),
            Err(error) => Err(error).with_context(|| format!("stat {}", self.path.display())),
        }
    }
}
