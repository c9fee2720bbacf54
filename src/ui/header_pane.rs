use crate::app::AppState;
use crate::domain::{completion_ratio, format_time, is_over_budget, TodoStatus};
use crate::ui::styles::{
    border_style, default_style, error_style, hint_style, over_estimate_style, running_style,
    title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the flow header: name, status and time totals
pub fn render_header_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let flow = &app.flow;

    let name = if flow.note.trim().is_empty() {
        Span::styled("(unnamed flow, press n to name it)", hint_style())
    } else {
        Span::styled(flow.note.clone(), default_style())
    };
    let status_style = match flow.status {
        TodoStatus::Stop => hint_style(),
        _ => running_style(),
    };

    let totals_style = if is_over_budget(flow) {
        over_estimate_style()
    } else {
        default_style()
    };

    let lines = vec![
        Line::from(vec![
            name,
            Span::raw("  "),
            Span::styled(format!("[{}]", flow.status.label()), status_style),
        ]),
        Line::from(vec![
            Span::raw(format!("{:>3.0}% done   ", completion_ratio(flow) * 100.0)),
            Span::styled(
                format!(
                    "⏱ {} / {}",
                    format_time(flow.actual_time_todo),
                    format_time(flow.estimated_time_todo)
                ),
                totals_style,
            ),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" todoflow ", title_style())),
    );
    f.render_widget(paragraph, area);
}

/// Render the one-line status message, if any
pub fn render_status_line(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(message) = &app.message {
        let paragraph = Paragraph::new(Line::from(Span::styled(format!(" {}", message), error_style())));
        f.render_widget(paragraph, area);
    }
}
