use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// List view layout
pub struct ListLayout {
    pub keybindings_area: Rect,
    pub header_area: Rect,
    pub list_area: Rect,
    pub status_area: Rect,
}

/// Focus view layout
pub struct FocusLayout {
    pub keybindings_area: Rect,
    pub focus_area: Rect,
    pub progress_area: Rect,
}

/// Create the list layout
/// - Top bar: keybindings (1 row)
/// - Header: flow note and totals (4 rows)
/// - Main area: task list
/// - Bottom bar: status message (1 row)
pub fn create_list_layout(area: Rect) -> ListLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Length(4), // Header
            Constraint::Min(0),    // Task list
            Constraint::Length(1), // Status message
        ])
        .split(area);

    ListLayout {
        keybindings_area: chunks[0],
        header_area: chunks[1],
        list_area: chunks[2],
        status_area: chunks[3],
    }
}

/// Create the focus layout, sized for a small always-on-top window
pub fn create_focus_layout(area: Rect) -> FocusLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // Current task
            Constraint::Length(1), // Flow progress gauge
        ])
        .split(area);

    FocusLayout {
        keybindings_area: chunks[0],
        focus_area: chunks[1],
        progress_area: chunks[2],
    }
}

/// Create centered modal area (for threshold modals and forms)
pub fn create_modal_area(area: Rect) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(12),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(15),
            Constraint::Percentage(70),
            Constraint::Percentage(15),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}
