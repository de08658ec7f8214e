//! The sheet/task store: the authoritative in-memory collection and its
//! synchronization with the persistent slot and the view.

mod models;

pub use models::{Sheet, Task};

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ports::{RenderPort, SlotStorage};

/// Errors surfaced to the invoking user action. Nothing propagates past
/// the operation that triggered it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Task title was empty after trimming whitespace.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// An operation addressed a sheet position that no longer exists.
    #[error("sheet {0} not found")]
    SheetNotFound(usize),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Owns the sheet collection and the two injected ports.
///
/// Every mutating operation is a synchronous read-modify-persist-render
/// cycle: mutate the in-memory collection, write the whole serialized
/// collection to the slot, then tell the view what went stale. Operations
/// take 1-based indices matching current display numbering; identity is
/// purely positional.
pub struct SheetStore {
    sheets: Vec<Sheet>,
    slot: Arc<dyn SlotStorage>,
    view: Arc<dyn RenderPort>,
}

impl SheetStore {
    pub fn new(slot: Arc<dyn SlotStorage>, view: Arc<dyn RenderPort>) -> Self {
        Self {
            sheets: vec![],
            slot,
            view,
        }
    }

    /// Current collection, in display order.
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Sheet at a 1-based display position.
    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        index.checked_sub(1).and_then(|i| self.sheets.get(i))
    }

    /// Load the persisted collection from the slot.
    ///
    /// An absent slot, an empty collection, and an unparseable blob are all
    /// treated the same: start over with a single default sheet, which is
    /// persisted immediately. Ends with a full render.
    pub fn load(&mut self) -> Result<(), StoreError> {
        let blob = self.slot.load()?;
        self.sheets = match blob {
            Some(ref raw) => match Self::deserialize(raw) {
                Ok(sheets) => sheets,
                Err(err) => {
                    warn!("discarding unreadable sheet data: {err}");
                    vec![]
                }
            },
            None => vec![],
        };

        if self.sheets.is_empty() {
            self.sheets.push(Sheet::new());
            self.persist()?;
        }

        info!(sheets = self.sheets.len(), "loaded sheet collection");
        self.view.render_all(&self.sheets);
        Ok(())
    }

    /// Append a new empty sheet. No limit on sheet count.
    pub fn add_sheet(&mut self) -> Result<(), StoreError> {
        self.sheets.push(Sheet::new());
        self.persist()?;
        debug!(sheets = self.sheets.len(), "added sheet");
        self.view.render_all(&self.sheets);
        Ok(())
    }

    /// Append a task to the sheet at `sheet_index` (1-based).
    ///
    /// The title is trimmed; an empty result rejects the whole operation
    /// before anything is mutated.
    pub fn add_task(
        &mut self,
        sheet_index: usize,
        title: &str,
        date: &str,
    ) -> Result<(), StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }

        let sheet = self
            .sheet_mut(sheet_index)
            .ok_or(StoreError::SheetNotFound(sheet_index))?;
        sheet.tasks.push(Task::new(title, date));
        self.persist()?;
        debug!(sheet = sheet_index, title, "added task");
        self.view
            .render_sheet(sheet_index, &self.sheets[sheet_index - 1]);
        Ok(())
    }

    /// Remove the task at `task_index` (1-based display position) from the
    /// sheet at `sheet_index`. Completing a task and removing it are the
    /// same operation.
    ///
    /// A missing sheet is a silent no-op. A valid sheet with an
    /// out-of-range task index still persists and re-renders, removing
    /// nothing.
    pub fn remove_task(&mut self, sheet_index: usize, task_index: usize) -> Result<(), StoreError> {
        let Some(sheet) = self.sheet_mut(sheet_index) else {
            debug!(sheet = sheet_index, "remove_task on missing sheet, ignoring");
            return Ok(());
        };

        if task_index >= 1 && task_index <= sheet.tasks.len() {
            sheet.tasks.remove(task_index - 1);
            debug!(sheet = sheet_index, task = task_index, "removed task");
        }
        self.persist()?;
        self.view
            .render_sheet(sheet_index, &self.sheets[sheet_index - 1]);
        Ok(())
    }

    /// Set the background color of the sheet at `sheet_index`.
    pub fn set_sheet_color(&mut self, sheet_index: usize, color: &str) -> Result<(), StoreError> {
        let sheet = self
            .sheet_mut(sheet_index)
            .ok_or(StoreError::SheetNotFound(sheet_index))?;
        sheet.color = Some(color.to_string());
        self.persist()?;
        debug!(sheet = sheet_index, color, "recolored sheet");
        self.view
            .render_sheet(sheet_index, &self.sheets[sheet_index - 1]);
        Ok(())
    }

    /// Remove the sheet at `sheet_index`. Every later sheet shifts down one
    /// display position, so the view is rebuilt in full.
    ///
    /// A missing sheet is a silent no-op.
    pub fn delete_sheet(&mut self, sheet_index: usize) -> Result<(), StoreError> {
        if sheet_index < 1 || sheet_index > self.sheets.len() {
            debug!(sheet = sheet_index, "delete_sheet on missing sheet, ignoring");
            return Ok(());
        }
        self.sheets.remove(sheet_index - 1);
        self.persist()?;
        info!(sheet = sheet_index, remaining = self.sheets.len(), "deleted sheet");
        self.view.render_all(&self.sheets);
        Ok(())
    }

    /// Serialize the whole collection to its persistent text form.
    pub fn serialize(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(&self.sheets).map_err(anyhow::Error::from)?)
    }

    /// Parse a persisted blob back into a collection. Exact fidelity:
    /// `deserialize(serialize(s))` reconstructs `s` field for field.
    pub fn deserialize(blob: &str) -> Result<Vec<Sheet>, serde_json::Error> {
        serde_json::from_str(blob)
    }

    fn sheet_mut(&mut self, index: usize) -> Option<&mut Sheet> {
        index.checked_sub(1).and_then(|i| self.sheets.get_mut(i))
    }

    fn persist(&self) -> Result<(), StoreError> {
        let blob = self.serialize()?;
        self.slot.save(&blob)?;
        Ok(())
    }
}
