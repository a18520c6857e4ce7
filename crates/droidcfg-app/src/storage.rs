// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Document;
use anyhow::Result;

/// Durable home of the [`Document`].
///
/// `load` returns `Ok(None)` when nothing has been saved yet. `save` must
/// replace the stored document atomically.
pub trait DocumentStore {
    fn load(&mut self) -> Result<Option<Document>>;
    fn save(&mut self, document: &Document) -> Result<()>;
}
