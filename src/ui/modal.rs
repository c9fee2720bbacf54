use crate::app::{AppState, ModalKind};
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

/// Render the threshold modal (deadline reached or break over)
pub fn render_modal(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(modal) = &app.modal {
        let modal_area = create_modal_area(area);

        // Clear the area behind the modal
        f.render_widget(Clear, modal_area);

        let mut lines = vec![
            Line::raw(""),
            Line::raw(modal.message.clone()),
            Line::raw(""),
            Line::raw("What would you like to do?"),
            Line::raw(""),
        ];
        lines.push(choice_line(modal.kind));

        let icon = match modal.kind {
            ModalKind::Deadline => "⏱",
            ModalKind::BreakOver => "☕",
        };

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(
                        format!(" {} {} ", icon, modal.title),
                        modal_title_style(),
                    ))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}

fn choice_line(kind: ModalKind) -> Line<'static> {
    match kind {
        ModalKind::Deadline => Line::from(vec![
            Span::styled("[d]", modal_title_style()),
            Span::raw(" Done  "),
            Span::styled("[c]", modal_title_style()),
            Span::raw(" Continue  "),
            Span::styled("[b]", modal_title_style()),
            Span::raw(" Break  "),
        ]),
        ModalKind::BreakOver => Line::from(vec![
            Span::styled("[c]", modal_title_style()),
            Span::raw(" Back to work  "),
            Span::styled("[Esc]", modal_title_style()),
            Span::raw(" Stay paused  "),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_choices_depend_on_kind() {
        assert!(text(&choice_line(ModalKind::Deadline)).contains("[b] Break"));
        assert!(!text(&choice_line(ModalKind::BreakOver)).contains("[d]"));
    }
}
