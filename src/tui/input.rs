/// Input mode for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - navigating sheets and tasks
    #[default]
    Normal,
    /// Entering a task title in the prompt popup
    InputTask,
}
