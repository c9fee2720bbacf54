use crate::domain::TodoStatus;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar for the active view
pub fn render_keybindings(f: &mut Frame, status: TodoStatus, area: Rect) {
    let paragraph = Paragraph::new(hint_line(status)).style(hint_style());
    f.render_widget(paragraph, area);
}

fn hint_line(status: TodoStatus) -> Line<'static> {
    if status.is_focused() {
        return Line::from(vec![
            Span::raw(" space pause   "),
            Span::raw("d done+next   "),
            Span::raw("c complete   "),
            Span::raw("h/l skip   "),
            Span::raw("b break   "),
            Span::raw("m min   "),
            Span::raw("Esc list   "),
            Span::raw("q quit"),
        ]);
    }

    let start = match status {
        TodoStatus::Stop => "s start   ",
        _ => "s focus   ",
    };
    Line::from(vec![
        Span::raw(" ↑/↓ select   "),
        Span::raw("Shift+↑/↓ reorder   "),
        Span::raw(start),
        Span::raw("Enter work on   "),
        Span::raw("p pause   "),
        Span::raw("a add   "),
        Span::raw("A subtask   "),
        Span::raw("o/O insert   "),
        Span::raw("e edit   "),
        Span::raw("n name   "),
        Span::raw("+ / - est   "),
        Span::raw("x delete   "),
        Span::raw("R reset   "),
        Span::raw("q quit"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_hints_follow_view() {
        assert!(text(&hint_line(TodoStatus::Stop)).contains("s start"));
        assert!(text(&hint_line(TodoStatus::StartOnTodo)).contains("s focus"));
        assert!(text(&hint_line(TodoStatus::StartOnProgress)).contains("b break"));
    }
}
