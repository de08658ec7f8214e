use std::sync::Arc;

use tasksheet::ports::FileSlot;
use tasksheet::store::{Sheet, SheetStore, StoreError, Task};
use tasksheet::tui::view::ViewModel;

fn store_in(dir: &tempfile::TempDir) -> (SheetStore, Arc<ViewModel>) {
    let slot = Arc::new(FileSlot::new(dir.path().join("sheets.json")));
    let view = Arc::new(ViewModel::new());
    let store = SheetStore::new(slot, view.clone());
    (store, view)
}

fn loaded_store(dir: &tempfile::TempDir) -> (SheetStore, Arc<ViewModel>) {
    let (mut store, view) = store_in(dir);
    store.load().unwrap();
    (store, view)
}

// === Load ===

#[test]
fn test_load_empty_storage_creates_one_default_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _view) = store_in(&dir);

    store.load().unwrap();

    assert_eq!(store.sheets().len(), 1);
    assert!(store.sheets()[0].tasks.is_empty());
    assert!(store.sheets()[0].color.is_none());
    // The default sheet is persisted immediately
    assert!(dir.path().join("sheets.json").exists());
}

#[test]
fn test_load_corrupt_blob_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sheets.json"), "{not json at all").unwrap();
    let (mut store, _view) = store_in(&dir);

    store.load().unwrap();

    assert_eq!(store.sheets().len(), 1);
    assert!(store.sheets()[0].tasks.is_empty());
}

#[test]
fn test_load_empty_array_blob_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sheets.json"), "[]").unwrap();
    let (mut store, _view) = store_in(&dir);

    store.load().unwrap();

    assert_eq!(store.sheets().len(), 1);
}

#[test]
fn test_load_reads_previously_persisted_state() {
    let dir = tempfile::tempdir().unwrap();
    {
        let (mut store, _view) = loaded_store(&dir);
        store.add_sheet().unwrap();
        store.add_task(2, "Water plants", "5/3/2026").unwrap();
        store.set_sheet_color(1, "#55B4B0").unwrap();
    }

    let (mut store, _view) = store_in(&dir);
    store.load().unwrap();

    assert_eq!(store.sheets().len(), 2);
    assert_eq!(store.sheets()[0].color.as_deref(), Some("#55B4B0"));
    assert_eq!(store.sheets()[1].tasks.len(), 1);
    assert_eq!(store.sheets()[1].tasks[0].title, "Water plants");
}

// === AddSheet ===

#[test]
fn test_add_sheet_appends_default_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _view) = loaded_store(&dir);

    store.add_sheet().unwrap();
    store.add_sheet().unwrap();

    assert_eq!(store.sheets().len(), 3);
    assert!(store.sheets()[2].tasks.is_empty());
    assert!(store.sheets()[2].color.is_none());
}

// === AddTask ===

#[test]
fn test_add_task_appends_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _view) = loaded_store(&dir);

    store.add_task(1, "First", "1/1/2026").unwrap();
    store.add_task(1, "Second", "2/1/2026").unwrap();

    let tasks = &store.sheets()[0].tasks;
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0], Task::new("First", "1/1/2026"));
    assert_eq!(tasks[1], Task::new("Second", "2/1/2026"));
    assert!(!tasks[1].is_done);
}

#[test]
fn test_add_task_trims_title() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _view) = loaded_store(&dir);

    store.add_task(1, "  Buy milk  ", "1/1/2026").unwrap();

    assert_eq!(store.sheets()[0].tasks[0].title, "Buy milk");
}

#[test]
fn test_add_task_empty_title_rejected_without_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _view) = loaded_store(&dir);

    let err = store.add_task(1, "", "1/1/2026").unwrap_err();
    assert!(matches!(err, StoreError::EmptyTitle));

    let err = store.add_task(1, "   ", "1/1/2026").unwrap_err();
    assert!(matches!(err, StoreError::EmptyTitle));

    assert!(store.sheets()[0].tasks.is_empty());
}

#[test]
fn test_add_task_missing_sheet_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _view) = loaded_store(&dir);

    let err = store.add_task(2, "Orphan", "1/1/2026").unwrap_err();
    assert!(matches!(err, StoreError::SheetNotFound(2)));

    let err = store.add_task(0, "Orphan", "1/1/2026").unwrap_err();
    assert!(matches!(err, StoreError::SheetNotFound(0)));
}

// === RemoveTask ===

#[test]
fn test_remove_task_removes_exactly_that_position() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _view) = loaded_store(&dir);
    store.add_task(1, "First", "1/1/2026").unwrap();
    store.add_task(1, "Second", "1/1/2026").unwrap();
    store.add_task(1, "Third", "1/1/2026").unwrap();

    store.remove_task(1, 2).unwrap();

    let titles: Vec<&str> = store.sheets()[0]
        .tasks
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(titles, ["First", "Third"]);
}

#[test]
fn test_remove_task_missing_sheet_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _view) = loaded_store(&dir);
    store.add_task(1, "Keep", "1/1/2026").unwrap();

    store.remove_task(5, 1).unwrap();

    assert_eq!(store.sheets()[0].tasks.len(), 1);
}

#[test]
fn test_remove_task_out_of_range_index_removes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _view) = loaded_store(&dir);
    store.add_task(1, "Keep", "1/1/2026").unwrap();

    store.remove_task(1, 9).unwrap();
    store.remove_task(1, 0).unwrap();

    assert_eq!(store.sheets()[0].tasks.len(), 1);
}

// === SetSheetColor ===

#[test]
fn test_set_sheet_color_persists_in_serialized_output() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _view) = loaded_store(&dir);
    store.add_sheet().unwrap();

    store.set_sheet_color(1, "#f28b82").unwrap();

    let blob = store.serialize().unwrap();
    let sheets = SheetStore::deserialize(&blob).unwrap();
    assert_eq!(sheets[0].color.as_deref(), Some("#f28b82"));
    assert!(sheets[1].color.is_none());
}

#[test]
fn test_set_sheet_color_missing_sheet_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _view) = loaded_store(&dir);

    let err = store.set_sheet_color(3, "#f28b82").unwrap_err();
    assert!(matches!(err, StoreError::SheetNotFound(3)));
}

// === DeleteSheet ===

#[test]
fn test_delete_sheet_shifts_later_sheets_down() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _view) = loaded_store(&dir);
    store.add_sheet().unwrap();
    store.add_sheet().unwrap();
    store.set_sheet_color(1, "#111111").unwrap();
    store.set_sheet_color(2, "#222222").unwrap();
    store.set_sheet_color(3, "#333333").unwrap();

    store.delete_sheet(2).unwrap();

    assert_eq!(store.sheets().len(), 2);
    assert_eq!(store.sheets()[0].color.as_deref(), Some("#111111"));
    assert_eq!(store.sheets()[1].color.as_deref(), Some("#333333"));
}

#[test]
fn test_delete_sheet_missing_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _view) = loaded_store(&dir);

    store.delete_sheet(9).unwrap();
    store.delete_sheet(0).unwrap();

    assert_eq!(store.sheets().len(), 1);
}

// === Serialize / Deserialize ===

#[test]
fn test_round_trip_reconstructs_equal_collection() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _view) = loaded_store(&dir);
    store.add_sheet().unwrap();
    store.add_task(1, "Buy milk", "12/11/2025").unwrap();
    store.add_task(1, "Call mom", "13/11/2025").unwrap();
    store.add_task(2, "Ship release", "1/2/2026").unwrap();
    store.set_sheet_color(2, "#6667AB").unwrap();

    let blob = store.serialize().unwrap();
    let back = SheetStore::deserialize(&blob).unwrap();

    assert_eq!(back, store.sheets().to_vec());
}

#[test]
fn test_deserialize_accepts_original_wire_format() {
    let blob = r##"[{"tasks":[{"title":"Buy milk","date":"3/4/2026","isDone":false}],"color":"#cbf0f8"},{"tasks":[]}]"##;

    let sheets: Vec<Sheet> = SheetStore::deserialize(blob).unwrap();

    assert_eq!(sheets.len(), 2);
    assert_eq!(sheets[0].tasks[0].title, "Buy milk");
    assert!(!sheets[0].tasks[0].is_done);
    assert_eq!(sheets[0].color.as_deref(), Some("#cbf0f8"));
    assert!(sheets[1].color.is_none());
}

// === Scenarios ===

#[test]
fn test_scenario_first_run_add_and_complete_task() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _view) = store_in(&dir);

    // Empty storage: exactly one sheet, zero tasks
    store.load().unwrap();
    assert_eq!(store.sheets().len(), 1);
    assert!(store.sheets()[0].tasks.is_empty());

    // Add a task
    store.add_task(1, "Buy milk", "12/11/2025").unwrap();
    assert_eq!(store.sheets()[0].tasks.len(), 1);
    assert_eq!(store.sheets()[0].tasks[0].title, "Buy milk");
    assert!(!store.sheets()[0].tasks[0].is_done);

    // Completing the task removes it
    store.remove_task(1, 1).unwrap();
    assert!(store.sheets()[0].tasks.is_empty());
}

#[test]
fn test_scenario_delete_first_of_two_sheets() {
    let dir = tempfile::tempdir().unwrap();
    let (mut store, _view) = loaded_store(&dir);
    store.add_sheet().unwrap();
    store.add_task(2, "Survivor", "1/1/2026").unwrap();

    store.delete_sheet(1).unwrap();

    // The remaining sheet is the old sheet 2, now at position 1
    assert_eq!(store.sheets().len(), 1);
    assert_eq!(store.sheets()[0].tasks[0].title, "Survivor");
    assert_eq!(store.sheet(1).unwrap().tasks.len(), 1);
    assert!(store.sheet(2).is_none());
}
