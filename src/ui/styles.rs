use ratatui::style::{Color, Modifier, Style};

const ACCENT: Color = Color::Rgb(255, 179, 71);
const CALM: Color = Color::Rgb(94, 196, 182);
const MUTED: Color = Color::Rgb(118, 118, 130);
const PANEL: Color = Color::Rgb(38, 38, 48);
const ALERT: Color = Color::Rgb(236, 94, 94);

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::Reset)
}

/// Selected row: amber bar with dark text
pub fn selected_style() -> Style {
    Style::default()
        .fg(PANEL)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Running timer and badge
pub fn running_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Paused timer
pub fn paused_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::DIM)
}

pub fn idle_style() -> Style {
    Style::default().fg(MUTED)
}

/// Break badge and countdown
pub fn break_style() -> Style {
    Style::default().fg(CALM).add_modifier(Modifier::BOLD | Modifier::ITALIC)
}

pub fn over_estimate_style() -> Style {
    Style::default().fg(ALERT).add_modifier(Modifier::BOLD)
}

/// Subtask connectors
pub fn tree_style() -> Style {
    Style::default().fg(MUTED)
}

/// Pane titles and the focused task title
pub fn title_style() -> Style {
    Style::default().fg(CALM).add_modifier(Modifier::BOLD)
}

pub fn border_style() -> Style {
    Style::default().fg(MUTED)
}

/// Threshold modal body
pub fn modal_bg_style() -> Style {
    Style::default().bg(PANEL).fg(Color::White)
}

pub fn modal_title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Keybinding hints and secondary lines
pub fn hint_style() -> Style {
    Style::default().fg(MUTED).add_modifier(Modifier::ITALIC)
}

/// Flow progress gauge: teal fill on the panel color
pub fn gauge_style() -> Style {
    Style::default().fg(CALM).bg(PANEL)
}

pub fn error_style() -> Style {
    Style::default().fg(ALERT)
}

/// Completed tasks are struck through
pub fn done_style() -> Style {
    Style::default().fg(CALM).add_modifier(Modifier::CROSSED_OUT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_states_are_distinguishable() {
        let timers = [running_style(), paused_style(), break_style(), over_estimate_style()];
        for (i, a) in timers.iter().enumerate() {
            for b in &timers[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(selected_style().bg, Some(ACCENT));
        assert!(done_style().add_modifier.contains(Modifier::CROSSED_OUT));
    }
}
