use crate::app::{AppState, ModalKind};
use crate::domain::{Direction, TodoStatus, UiMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    // Any key clears the last status message
    if app.ui_mode == UiMode::Normal {
        app.message = None;
    }

    match app.ui_mode {
        UiMode::Normal if app.flow.status.is_focused() => handle_focus_mode(app, key),
        UiMode::Normal => handle_list_mode(app, key),
        UiMode::Modal => handle_modal_mode(app, key),
        UiMode::AddingTask | UiMode::AddingSubtask | UiMode::EditingTask | UiMode::EditingNote => {
            handle_input_form_mode(app, key)
        }
    }
}

/// Handle keys on the task list
fn handle_list_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Navigation (with Shift modifier for reordering)
        KeyCode::Up | KeyCode::Char('k') => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.move_task_up();
            } else {
                app.move_selection_up();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.move_task_down();
            } else {
                app.move_selection_down();
            }
        }
        KeyCode::Char('K') => app.move_task_up(),
        KeyCode::Char('J') => app.move_task_down(),

        // Editing
        KeyCode::Char('a') => app.start_add_task(),
        KeyCode::Char('A') => app.start_add_subtask(),
        KeyCode::Char('o') => app.insert_task(true),
        KeyCode::Char('O') => app.insert_task(false),
        KeyCode::Char('e') | KeyCode::Char('E') => app.start_edit_task(),
        KeyCode::Char('n') | KeyCode::Char('N') => app.start_edit_note(),
        KeyCode::Char('x') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char(' ') => app.toggle_selected_subtask(),
        KeyCode::Char('t') => app.toggle_subtasks(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.increase_estimate(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.decrease_estimate(),

        // Flow control
        KeyCode::Char('s') | KeyCode::Char('S') => {
            if app.flow.status == TodoStatus::Stop {
                app.commit_start();
            } else {
                app.focus();
            }
        }
        KeyCode::Enter => app.start_selected(),
        KeyCode::Char('p') | KeyCode::Char('P') => app.toggle_timer(),
        KeyCode::Char('R') => app.reset(),

        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
        _ => {}
    }
    Ok(false)
}

/// Handle keys on the focused single-task view
fn handle_focus_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char(' ') | KeyCode::Char('p') => app.toggle_timer(),
        KeyCode::Char('d') | KeyCode::Enter => app.done_and_next(),
        KeyCode::Char('c') => app.complete_current(),
        KeyCode::Char('l') | KeyCode::Right => app.skip(Direction::Next),
        KeyCode::Char('h') | KeyCode::Left => app.skip(Direction::Previous),
        KeyCode::Char('b') => app.take_break(),
        KeyCode::Char('m') => app.minimize(),
        KeyCode::Char('R') => app.reset(),
        KeyCode::Esc | KeyCode::Backspace => app.back_to_list(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in modal mode
fn handle_modal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let kind = app.modal.as_ref().map(|m| m.kind);
    match (kind, key.code) {
        (Some(ModalKind::Deadline), KeyCode::Char('d') | KeyCode::Char('D')) => app.modal_done(),
        (Some(ModalKind::Deadline), KeyCode::Char('b') | KeyCode::Char('B')) => app.modal_break(),
        (_, KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Enter) => app.modal_continue(),
        (_, KeyCode::Esc) => app.close_modal(),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in input form mode (adding or editing)
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_input_form(),
        KeyCode::Esc => app.cancel_input_form(),
        // Switch between title and estimate
        KeyCode::Tab => app.input_form_toggle_field(),
        KeyCode::Backspace => app.input_form_backspace(),
        KeyCode::Char(c) => app.input_form_add_char(c),
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Services;
    use crate::domain::{Task, TodoFlow};
    use crate::notifications::testing::RecordingNotifier;
    use crate::persistence::store::testing::MemoryStore;
    use crate::persistence::AppSettings;
    use crate::ticker::ManualScheduler;
    use crate::window::testing::RecordingWindow;

    fn create_test_app() -> AppState {
        let mut flow = TodoFlow::new("flow-1");
        flow.set_note("Monday");
        flow.add_task(Task::new("Task 1", 60));
        flow.add_task(Task::new("Task 2", 30));
        let services = Services {
            flows: Box::new(MemoryStore::<TodoFlow>::default()),
            tasks: Box::new(MemoryStore::<Task>::default()),
            notifier: Box::new(RecordingNotifier::default()),
            window: Box::new(RecordingWindow::default()),
            scheduler: Box::new(ManualScheduler::new()),
        };
        AppState::new(flow, AppSettings::default(), services)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit() {
        let mut app = create_test_app();
        assert!(handle_key(&mut app, press(KeyCode::Char('q'))).unwrap());
    }

    #[test]
    fn test_start_then_back_to_list() {
        let mut app = create_test_app();
        handle_key(&mut app, press(KeyCode::Char('s'))).unwrap();
        assert_eq!(app.flow.status, TodoStatus::StartOnProgress);

        handle_key(&mut app, press(KeyCode::Esc)).unwrap();
        assert_eq!(app.flow.status, TodoStatus::StartOnTodo);

        handle_key(&mut app, press(KeyCode::Char('s'))).unwrap();
        assert_eq!(app.flow.status, TodoStatus::StartOnProgress);
    }

    #[test]
    fn test_focus_keys_drive_timer() {
        let mut app = create_test_app();
        handle_key(&mut app, press(KeyCode::Char('s'))).unwrap();

        handle_key(&mut app, press(KeyCode::Char(' '))).unwrap();
        assert!(!app.flow.is_timer_running());

        handle_key(&mut app, press(KeyCode::Char('d'))).unwrap();
        assert_eq!(app.flow.current_task().unwrap().title, "Task 2");
    }

    #[test]
    fn test_form_typing() {
        let mut app = create_test_app();
        handle_key(&mut app, press(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::AddingTask);

        // 'q' is text while the form is open
        for c in "quiz".chars() {
            assert!(!handle_key(&mut app, press(KeyCode::Char(c))).unwrap());
        }
        handle_key(&mut app, press(KeyCode::Enter)).unwrap();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.flow.ordered_tasks().last().unwrap().title, "quiz");
    }
}
