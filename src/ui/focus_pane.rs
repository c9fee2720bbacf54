use crate::app::AppState;
use crate::domain::{completion_ratio, timer_label, Task};
use crate::ui::styles::{
    border_style, break_style, done_style, gauge_style, hint_style, over_estimate_style,
    paused_style, running_style, title_style,
};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

/// Render the focused view of the current task
pub fn render_focus_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Focus ", title_style()));

    let lines = match app.flow.current_task() {
        Some(task) => focus_lines(task, app.flow.time_left, app.flow.is_timer_running()),
        None => vec![
            Line::raw(""),
            Line::styled("Nothing left to work on", done_style()),
            Line::styled("Esc to return to the list", hint_style()),
        ],
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn focus_lines(task: &Task, time_left: u64, running: bool) -> Vec<Line<'static>> {
    let timer_style = if task.is_break() {
        break_style()
    } else if task.is_over_estimate() {
        over_estimate_style()
    } else if running {
        running_style()
    } else {
        paused_style()
    };

    let mut lines = vec![
        Line::raw(""),
        Line::styled(task.title.clone(), title_style()),
        Line::raw(""),
        Line::styled(timer_label(task, time_left), timer_style),
        Line::styled(if running { "running" } else { "paused" }, hint_style()),
    ];

    if !task.is_break() && task.estimated_time > 0 {
        lines.push(Line::styled(
            format!("{:.0}% of estimate", task.progress_ratio() * 100.0),
            hint_style(),
        ));
    }

    if !task.sub_tasks.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("Subtasks "),
            Span::styled(
                format!("{}/{}", task.completed_sub_tasks(), task.sub_tasks.len()),
                Style::default(),
            ),
        ]));
    }

    lines
}

/// Render the flow progress gauge under the focused task
pub fn render_progress_gauge(f: &mut Frame, app: &AppState, area: Rect) {
    let percent = (completion_ratio(&app.flow) * 100.0).round().clamp(0.0, 100.0) as u16;
    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .percent(percent)
        .label(format!(
            "{}/{} tasks",
            app.flow.task_completed, app.flow.task_total
        ));
    f.render_widget(gauge, area);
}
