//! Traits for the store's external collaborators (storage slot, view) to
//! enable testing with mocks.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::store::Sheet;

#[cfg(any(test, feature = "test-mocks"))]
use mockall::automock;

/// A single persistent slot holding the whole serialized collection.
///
/// Whole-blob semantics: every save replaces the previous value, last
/// writer wins. There is no partial or incremental persistence.
#[cfg_attr(any(test, feature = "test-mocks"), automock)]
pub trait SlotStorage {
    /// Read the slot. `None` means the slot has never been written.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the slot contents.
    fn save(&self, blob: &str) -> Result<()>;
}

/// View-side contract the store renders through.
///
/// Indices are 1-based display positions. `render_all` follows structural
/// changes (sheet added or deleted); `render_sheet` follows task-level
/// changes and recoloring, where only one sheet's display is stale.
#[cfg_attr(any(test, feature = "test-mocks"), automock)]
pub trait RenderPort {
    /// Rebuild the entire view from the full collection.
    fn render_all(&self, sheets: &[Sheet]);

    /// Rebuild a single sheet's display.
    fn render_sheet(&self, index: usize, sheet: &Sheet);
}

/// Real slot implementation backed by one JSON file.
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SlotStorage for FileSlot {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let blob = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read sheets from {:?}", self.path))?;
        Ok(Some(blob))
    }

    fn save(&self, blob: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, blob)
            .with_context(|| format!("Failed to write sheets to {:?}", self.path))?;
        Ok(())
    }
}
