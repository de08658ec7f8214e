//! Retained view model the TUI draws from.
//!
//! The store pushes state changes through `RenderPort`; the app reads
//! snapshots when drawing. Display numbering ("Sheet 3", "2. Buy milk") is
//! recomputed on every rebuild from current positions, never stored, so it
//! stays dense after deletions.

use std::sync::Mutex;

use crate::ports::RenderPort;
use crate::store::Sheet;

/// One rendered task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLine {
    /// 1-based display number within the sheet.
    pub number: usize,
    pub title: String,
    pub date: String,
    pub checked: bool,
}

/// One rendered sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetView {
    /// Heading derived from display position, e.g. "Sheet 2".
    pub heading: String,
    pub color: Option<String>,
    pub tasks: Vec<TaskLine>,
}

/// Real `RenderPort` implementation. Interior mutability lets the store
/// hold it as `Arc<dyn RenderPort>` while the app keeps its own handle for
/// reading.
#[derive(Default)]
pub struct ViewModel {
    sheets: Mutex<Vec<SheetView>>,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current rendered state, for drawing.
    pub fn snapshot(&self) -> Vec<SheetView> {
        self.sheets.lock().expect("view lock poisoned").clone()
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.lock().expect("view lock poisoned").len()
    }

    fn build_sheet(position: usize, sheet: &Sheet) -> SheetView {
        SheetView {
            heading: format!("Sheet {position}"),
            color: sheet.color.clone(),
            tasks: sheet
                .tasks
                .iter()
                .enumerate()
                .map(|(i, task)| TaskLine {
                    number: i + 1,
                    title: task.title.clone(),
                    date: task.date.clone(),
                    checked: task.is_done,
                })
                .collect(),
        }
    }
}

impl RenderPort for ViewModel {
    fn render_all(&self, sheets: &[Sheet]) {
        let rebuilt = sheets
            .iter()
            .enumerate()
            .map(|(i, sheet)| Self::build_sheet(i + 1, sheet))
            .collect();
        *self.sheets.lock().expect("view lock poisoned") = rebuilt;
    }

    fn render_sheet(&self, index: usize, sheet: &Sheet) {
        let mut sheets = self.sheets.lock().expect("view lock poisoned");
        if index >= 1 && index <= sheets.len() {
            sheets[index - 1] = Self::build_sheet(index, sheet);
        }
    }
}
