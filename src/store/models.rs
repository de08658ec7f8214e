use serde::{Deserialize, Serialize};

/// A single task on a sheet.
///
/// The wire format keeps the historical field names: `isDone` rather than
/// `is_done`, so existing data files keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    /// Creation date as a display string (d/m/yyyy). Not used for ordering.
    pub date: String,
    #[serde(rename = "isDone")]
    pub is_done: bool,
}

impl Task {
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            is_done: false,
        }
    }
}

/// A sheet: an ordered list of tasks plus an optional background color.
///
/// Sheets have no stable identity. A sheet is addressed by its current
/// position in the collection, and display numbering ("Sheet 3") is derived
/// from that position at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Hex color like "#f28b82". Absent means the default background.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Sheet {
    pub fn new() -> Self {
        Self {
            tasks: vec![],
            color: None,
        }
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_wire_format_uses_is_done_key() {
        let task = Task::new("Buy milk", "1/2/2026");
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"isDone\":false"));
        assert!(!json.contains("is_done"));
    }

    #[test]
    fn sheet_omits_absent_color() {
        let sheet = Sheet::new();
        let json = serde_json::to_string(&sheet).unwrap();
        assert_eq!(json, r#"{"tasks":[]}"#);
    }

    #[test]
    fn sheet_with_color_round_trips() {
        let mut sheet = Sheet::new();
        sheet.color = Some("#f28b82".to_string());
        sheet.tasks.push(Task::new("Water plants", "3/4/2026"));

        let json = serde_json::to_string(&sheet).unwrap();
        let back: Sheet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sheet);
    }

    #[test]
    fn sheet_deserializes_without_color_field() {
        let sheet: Sheet = serde_json::from_str(r#"{"tasks":[]}"#).unwrap();
        assert!(sheet.color.is_none());
        assert!(sheet.tasks.is_empty());
    }
}
