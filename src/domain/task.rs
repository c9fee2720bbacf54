use super::enums::TaskStatus;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id prefix carried by break tasks on disk
pub const BREAK_PREFIX: &str = "break-";

/// Title given to synthesized break tasks
pub const BREAK_TITLE: &str = "Take a break";

/// Whether a task is real work or a synthetic break
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskKind {
    #[default]
    Regular,
    Break,
}

/// A checklist entry under a task (no timer interaction)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl SubTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            completed: false,
        }
    }
}

/// A unit of work in a flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Target duration in seconds
    pub estimated_time: u64,
    /// Seconds spent (regular) or seconds remaining (break)
    pub actual_time: u64,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub kind: TaskKind,
    pub sub_tasks: Vec<SubTask>,
    pub completed_at: Option<DateTime<Local>>,
}

impl Task {
    pub fn new(title: impl Into<String>, estimated_time: u64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            estimated_time,
            actual_time: 0,
            description: None,
            status: TaskStatus::NotStarted,
            kind: TaskKind::Regular,
            sub_tasks: Vec::new(),
            completed_at: None,
        }
    }

    /// Build a break task that counts down from `seconds`
    pub fn new_break(seconds: u64) -> Self {
        let seconds = seconds.max(1);
        Self {
            id: format!("{}{}", BREAK_PREFIX, Uuid::new_v4()),
            title: BREAK_TITLE.to_string(),
            estimated_time: seconds,
            actual_time: seconds,
            description: None,
            status: TaskStatus::NotStarted,
            kind: TaskKind::Break,
            sub_tasks: Vec::new(),
            completed_at: None,
        }
    }

    pub fn is_break(&self) -> bool {
        self.kind == TaskKind::Break
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Seconds actually spent on this task.
    /// A break stores its remaining time, so the spent part is estimate minus remaining.
    pub fn time_spent(&self) -> u64 {
        match self.kind {
            TaskKind::Regular => self.actual_time,
            TaskKind::Break => self.estimated_time.saturating_sub(self.actual_time),
        }
    }

    /// Set status, stamping or clearing the completion time
    pub fn set_status(&mut self, status: TaskStatus) {
        if status == TaskStatus::Completed && self.status != TaskStatus::Completed {
            self.completed_at = Some(Local::now());
        } else if status != TaskStatus::Completed {
            self.completed_at = None;
        }
        self.status = status;
    }

    /// Back to not started with no time spent
    pub fn reset(&mut self) {
        self.status = TaskStatus::NotStarted;
        self.actual_time = 0;
        self.completed_at = None;
    }

    /// Whether the timer has reached the estimate (regular tasks only)
    pub fn is_over_estimate(&self) -> bool {
        !self.is_break() && self.estimated_time > 0 && self.actual_time >= self.estimated_time
    }

    /// Ratio of time spent to estimate (0.0 to 1.0+)
    pub fn progress_ratio(&self) -> f64 {
        if self.estimated_time == 0 {
            return 0.0;
        }
        self.time_spent() as f64 / self.estimated_time as f64
    }

    pub fn has_empty_title(&self) -> bool {
        self.title.trim().is_empty()
    }

    pub fn completed_sub_tasks(&self) -> usize {
        self.sub_tasks.iter().filter(|st| st.completed).count()
    }
}

/// Partial update merged into a task; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub estimated_time: Option<u64>,
    pub actual_time: Option<u64>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub sub_tasks: Option<Vec<SubTask>>,
}

impl TaskUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn estimated_time(seconds: u64) -> Self {
        Self {
            estimated_time: Some(seconds),
            ..Self::default()
        }
    }

    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(estimated_time) = self.estimated_time {
            task.estimated_time = estimated_time;
        }
        if let Some(actual_time) = self.actual_time {
            task.actual_time = actual_time;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.set_status(status);
        }
        if let Some(sub_tasks) = self.sub_tasks {
            task.sub_tasks = sub_tasks;
        }
    }
}

/// On-disk shape of a task, field names kept stable across versions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    estimated_time: u64,
    #[serde(default)]
    actual_time: u64,
    #[serde(default)]
    description: Option<String>,
    status: TaskStatus,
    #[serde(default)]
    is_task_break: Option<bool>,
    #[serde(default)]
    sub_tasks: Vec<SubTask>,
    #[serde(default)]
    completed_at: Option<DateTime<Local>>,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        // Older records only carry the id prefix, newer ones the flag
        let kind = if record.is_task_break.unwrap_or(false) || record.id.starts_with(BREAK_PREFIX) {
            TaskKind::Break
        } else {
            TaskKind::Regular
        };

        Self {
            id: record.id,
            title: record.title,
            estimated_time: record.estimated_time,
            actual_time: record.actual_time,
            description: record.description,
            status: record.status,
            kind,
            sub_tasks: record.sub_tasks,
            completed_at: record.completed_at,
        }
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        Self {
            is_task_break: Some(task.is_break()),
            id: task.id,
            title: task.title,
            estimated_time: task.estimated_time,
            actual_time: task.actual_time,
            description: task.description,
            status: task.status,
            sub_tasks: task.sub_tasks,
            completed_at: task.completed_at,
        }
    }
}
