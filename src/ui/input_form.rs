use crate::app::{AppState, FormTarget};
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the input form for tasks, subtasks and the flow name
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.input_form {
        let modal_area = create_modal_area(area);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let (title_text, title_label) = match form.target {
            FormTarget::NewTask => (" Add Task ", "Title:"),
            FormTarget::NewSubTask { .. } => (" Add Subtask ", "Title:"),
            FormTarget::EditTask { .. } => (" Edit Task ", "Title:"),
            FormTarget::Note => (" Name Flow ", "Name:"),
        };

        let mut lines = vec![Line::raw("")];
        lines.extend(field_lines(title_label, &form.title, form.editing_field == 0));

        if form.has_estimate() {
            lines.extend(field_lines(
                "Estimate (HH:MM:SS):",
                &form.estimate,
                form.editing_field == 1,
            ));
            lines.push(Line::raw("Tab to switch fields  ·  Enter to save  ·  Esc to cancel"));
        } else {
            lines.push(Line::raw("Enter to save  ·  Esc to cancel"));
        }

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(title_text, modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}

fn field_lines(label: &str, value: &str, editing: bool) -> Vec<Line<'static>> {
    let label = if editing {
        format!("{} (editing)", label)
    } else {
        label.to_string()
    };
    vec![
        Line::raw(label),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(value.to_string(), modal_title_style()),
            if editing {
                Span::styled("█", modal_title_style()) // Cursor
            } else {
                Span::raw("")
            },
        ]),
        Line::raw(""),
    ]
}
