use serde::{Deserialize, Serialize};

/// Lifecycle status of a single task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Paused,
    Completed,
}

impl TaskStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Flow-level status: stopped, running while viewing the list, or running focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoStatus {
    Stop,
    StartOnTodo,
    StartOnProgress,
}

impl TodoStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Stop => "Stop",
            Self::StartOnTodo | Self::StartOnProgress => "Start",
        }
    }

    /// Whether the focused single-task view is active
    pub fn is_focused(&self) -> bool {
        matches!(self, Self::StartOnProgress)
    }
}

/// Direction for moving the current task pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    Modal,
    EditingNote,
    AddingTask,
    EditingTask,
    AddingSubtask,
}
