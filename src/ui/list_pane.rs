use crate::app::AppState;
use crate::domain::{format_time, status_badge, tree_connector, SubTask, Task, TaskStatus};
use crate::ui::styles::{
    border_style, break_style, default_style, done_style, idle_style, over_estimate_style,
    paused_style, running_style, selected_style, title_style, tree_style,
};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the task list pane
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let tasks: Vec<&Task> = app.flow.ordered_tasks().collect();
    let current_id = app.flow.current_task_id.as_deref();

    let items: Vec<ListItem> = app
        .rows()
        .iter()
        .map(|row| {
            let task = tasks[row.task_index];
            let line = match row.subtask_index {
                Some(st_idx) => create_subtask_line(&task.sub_tasks[st_idx], row.is_last),
                None => {
                    let is_current = current_id == Some(task.id.as_str());
                    let remaining = if is_current { Some(app.flow.time_left) } else { None };
                    create_task_line(task, is_current, remaining)
                }
            };
            let style = if row.index == app.selected_index {
                selected_style()
            } else {
                default_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let title = format!(" Tasks ({}/{}) ", app.flow.task_completed, app.flow.task_total);
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(title, title_style())),
    );

    f.render_widget(list, area);
}

/// Create a single line for a task
/// Format: ▶ Write proposal  ⏱ 00:12:00 / 00:30:00 ⏱ RUNNING
fn create_task_line(task: &Task, is_current: bool, remaining: Option<u64>) -> Line<'static> {
    let mut spans = Vec::new();

    spans.push(Span::raw(if is_current { "▶ " } else { "  " }));

    let title_style = if task.is_completed() {
        done_style()
    } else {
        default_style()
    };
    spans.push(Span::styled(task.title.clone(), title_style));
    spans.push(Span::raw("  "));

    // Breaks show their countdown, regular tasks spent against estimate
    let time_str = match (task.is_break(), remaining) {
        (true, Some(left)) => format!("⏱ {} ", format_time(left)),
        (true, None) => format!("⏱ {} ", format_time(task.actual_time)),
        (false, _) => format!(
            "⏱ {} / {} ",
            format_time(task.time_spent()),
            format_time(task.estimated_time)
        ),
    };
    let time_style = if task.is_over_estimate() {
        over_estimate_style()
    } else {
        Style::default()
    };
    spans.push(Span::styled(time_str, time_style));

    spans.push(Span::styled(status_badge(task).to_string(), badge_style(task)));

    if !task.sub_tasks.is_empty() {
        spans.push(Span::styled(
            format!("  [{}/{}]", task.completed_sub_tasks(), task.sub_tasks.len()),
            tree_style(),
        ));
    }

    Line::from(spans)
}

fn create_subtask_line(sub_task: &SubTask, is_last: bool) -> Line<'static> {
    let check = if sub_task.completed { "[x] " } else { "[ ] " };
    let style = if sub_task.completed {
        done_style()
    } else {
        default_style()
    };

    Line::from(vec![
        Span::styled("     ".to_string(), tree_style()),
        Span::styled(tree_connector(is_last).to_string(), tree_style()),
        Span::raw(" "),
        Span::raw(check),
        Span::styled(sub_task.title.clone(), style),
    ])
}

fn badge_style(task: &Task) -> Style {
    if task.is_break() {
        return break_style();
    }
    match task.status {
        TaskStatus::InProgress => running_style(),
        TaskStatus::Paused => paused_style(),
        TaskStatus::Completed => done_style(),
        TaskStatus::NotStarted => idle_style(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_create_task_line() {
        let mut task = Task::new("Write proposal", 1800);
        task.actual_time = 720;
        task.status = TaskStatus::InProgress;

        let line = text(&create_task_line(&task, true, Some(1080)));
        assert!(line.starts_with("▶ Write proposal"));
        assert!(line.contains("00:12:00 / 00:30:00"));
        assert!(line.contains("RUNNING"));
    }

    #[test]
    fn test_break_line_shows_countdown() {
        let task = Task::new_break(300);
        let line = text(&create_task_line(&task, true, Some(42)));
        assert!(line.contains("00:00:42"));
        assert!(line.contains("BREAK"));
    }

    #[test]
    fn test_create_subtask_line() {
        let mut sub_task = SubTask::new("Outline");
        sub_task.completed = true;
        let line = text(&create_subtask_line(&sub_task, true));
        assert!(line.contains("└─"));
        assert!(line.contains("[x] Outline"));
    }
}
