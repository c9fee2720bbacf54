pub mod focus_pane;
pub mod header_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod styles;

use crate::app::AppState;
use focus_pane::{render_focus_pane, render_progress_gauge};
use header_pane::{render_header_pane, render_status_line};
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::{create_focus_layout, create_list_layout};
use list_pane::render_list_pane;
use modal::render_modal;
use ratatui::Frame;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();

    if app.flow.status.is_focused() {
        let layout = create_focus_layout(size);
        render_keybindings(f, app.flow.status, layout.keybindings_area);
        render_focus_pane(f, app, layout.focus_area);
        render_progress_gauge(f, app, layout.progress_area);
    } else {
        let layout = create_list_layout(size);
        render_keybindings(f, app.flow.status, layout.keybindings_area);
        render_header_pane(f, app, layout.header_area);
        render_list_pane(f, app, layout.list_area);
        render_status_line(f, app, layout.status_area);
    }

    // Render modal if active
    if app.modal.is_some() {
        render_modal(f, app, size);
    }

    // Render input form if active
    if app.input_form.is_some() {
        render_input_form(f, app, size);
    }
}
