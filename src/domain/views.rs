use super::flow::TodoFlow;
use super::task::Task;

/// A flattened row for rendering the task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRow {
    /// Index in the flattened list
    pub index: usize,
    /// Depth in the tree (0 = task, 1 = subtask)
    pub depth: usize,
    /// Whether this is the last subtask of its task
    pub is_last: bool,
    /// Position of the owning task in the flow order
    pub task_index: usize,
    /// Subtask index (None for tasks)
    pub subtask_index: Option<usize>,
}

/// Flatten the flow into rows, subtasks listed under their task
pub fn flatten_tasks(flow: &TodoFlow, show_subtasks: bool) -> Vec<FlatRow> {
    let mut rows = Vec::new();

    for (task_idx, task) in flow.ordered_tasks().enumerate() {
        rows.push(FlatRow {
            index: rows.len(),
            depth: 0,
            is_last: false,
            task_index: task_idx,
            subtask_index: None,
        });

        if show_subtasks {
            let count = task.sub_tasks.len();
            for st_idx in 0..count {
                rows.push(FlatRow {
                    index: rows.len(),
                    depth: 1,
                    is_last: st_idx + 1 == count,
                    task_index: task_idx,
                    subtask_index: Some(st_idx),
                });
            }
        }
    }

    rows
}

/// Format seconds as HH:MM:SS
pub fn format_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Parse "SS", "MM:SS" or "HH:MM:SS" into seconds
pub fn parse_time(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    parts.iter().try_fold(0u64, |acc, part| {
        let value: u64 = part.trim().parse().ok()?;
        acc.checked_mul(60)?.checked_add(value)
    })
}

/// Completed share of the flow, 0.0 to 1.0
pub fn completion_ratio(flow: &TodoFlow) -> f64 {
    if flow.task_total == 0 {
        return 0.0;
    }
    flow.task_completed as f64 / flow.task_total as f64
}

/// Whether the flow has used more time than it planned
pub fn is_over_budget(flow: &TodoFlow) -> bool {
    flow.actual_time_todo > flow.estimated_time_todo
}

/// Countdown or count-up label for the focused task
pub fn timer_label(task: &Task, time_left: u64) -> String {
    if task.is_break() {
        format!("{} left", format_time(time_left))
    } else if task.estimated_time > 0 {
        format!("{} / {}", format_time(time_left), format_time(task.estimated_time))
    } else {
        format_time(time_left)
    }
}

/// Get status badge text
pub fn status_badge(task: &Task) -> &'static str {
    use super::enums::TaskStatus;

    if task.is_break() {
        return "☕ BREAK";
    }
    match task.status {
        TaskStatus::InProgress => "⏱ RUNNING",
        TaskStatus::Paused => "⏸ PAUSED",
        TaskStatus::NotStarted => "· TODO",
        TaskStatus::Completed => "✓ DONE",
    }
}

/// Get tree connector for subtasks
pub fn tree_connector(is_last: bool) -> &'static str {
    if is_last {
        "└─"
    } else {
        "├─"
    }
}
