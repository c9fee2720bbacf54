use crate::domain::{
    flatten_tasks, parse_time, validate_for_start, Advance, Direction, FlatRow, SubTask, Task,
    TaskStatus, TaskUpdate, ThresholdEvent, TodoFlow, TodoStatus, UiMode,
};
use crate::notifications::Notifier;
use crate::persistence::{AppSettings, Repository};
use crate::ticker::TickScheduler;
use crate::window::WindowControl;

/// Terminal size used by the focused single-task view (columns, rows)
pub const FOCUS_WINDOW: (u16, u16) = (64, 14);

/// Default estimate step for +/- in seconds
const ESTIMATE_STEP: u64 = 5 * 60;

/// Collaborators the controller talks to
pub struct Services {
    pub flows: Box<dyn Repository<TodoFlow>>,
    pub tasks: Box<dyn Repository<Task>>,
    pub notifier: Box<dyn Notifier>,
    pub window: Box<dyn WindowControl>,
    pub scheduler: Box<dyn TickScheduler>,
}

/// What raised the modal, which decides the choices offered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Deadline,
    BreakOver,
}

/// Modal state for threshold prompts
#[derive(Debug, Clone)]
pub struct ModalState {
    pub kind: ModalKind,
    pub title: String,
    pub message: String,
}

/// What the input form edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    NewTask,
    NewSubTask { task_id: String },
    EditTask { task_id: String },
    Note,
}

/// Input form state for adding and editing
#[derive(Debug, Clone)]
pub struct InputFormState {
    pub target: FormTarget,
    pub title: String,
    /// Estimate as typed, HH:MM:SS
    pub estimate: String,
    pub editing_field: usize, // 0 = title, 1 = estimate
}

impl InputFormState {
    fn new(target: FormTarget, title: String, estimate: String) -> Self {
        Self {
            target,
            title,
            estimate,
            editing_field: 0,
        }
    }

    /// Only tasks carry an estimate
    pub fn has_estimate(&self) -> bool {
        matches!(self.target, FormTarget::NewTask | FormTarget::EditTask { .. })
    }
}

/// Main application state
pub struct AppState {
    pub flow: TodoFlow,
    pub settings: AppSettings,
    pub services: Services,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub modal: Option<ModalState>,
    pub input_form: Option<InputFormState>,
    /// One-line feedback shown in the status bar
    pub message: Option<String>,
    pub show_subtasks: bool,
    pub needs_save: bool,
    /// Terminal size to return to when leaving the focused view
    pub list_window: Option<(u16, u16)>,
}

impl AppState {
    pub fn new(mut flow: TodoFlow, settings: AppSettings, services: Services) -> Self {
        flow.restore();
        Self {
            flow,
            settings,
            services,
            selected_index: 0,
            ui_mode: UiMode::Normal,
            modal: None,
            input_form: None,
            message: None,
            show_subtasks: true,
            needs_save: false,
            list_window: None,
        }
    }

    // ----- selection -----

    pub fn rows(&self) -> Vec<FlatRow> {
        flatten_tasks(&self.flow, self.show_subtasks)
    }

    /// The selected row, if the list is not empty
    pub fn selected_row(&self) -> Option<FlatRow> {
        self.rows().into_iter().nth(self.selected_index)
    }

    /// Id of the task owning the selected row
    pub fn selected_task_id(&self) -> Option<String> {
        let row = self.selected_row()?;
        self.flow.task_ids.get(row.task_index).cloned()
    }

    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.rows().len() {
            self.selected_index += 1;
        }
    }

    /// Put the cursor on a task's row
    pub fn select_task(&mut self, task_id: &str) {
        let Some(task_index) = self.flow.index_of(task_id) else {
            return;
        };
        if let Some(row) = self
            .rows()
            .iter()
            .find(|r| r.task_index == task_index && r.subtask_index.is_none())
        {
            self.selected_index = row.index;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.rows().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    pub fn toggle_subtasks(&mut self) {
        let selected = self.selected_task_id();
        self.show_subtasks = !self.show_subtasks;
        match selected {
            Some(id) => self.select_task(&id),
            None => self.clamp_selection(),
        }
    }

    // ----- list editing -----

    /// Move selected task up in the list
    pub fn move_task_up(&mut self) {
        let Some(row) = self.selected_row().filter(|r| r.subtask_index.is_none()) else {
            return;
        };
        if row.task_index == 0 {
            return;
        }
        if let Some(id) = self.flow.reorder(row.task_index, row.task_index - 1) {
            self.select_task(&id);
            self.needs_save = true;
        }
    }

    /// Move selected task down in the list
    pub fn move_task_down(&mut self) {
        let Some(row) = self.selected_row().filter(|r| r.subtask_index.is_none()) else {
            return;
        };
        if let Some(id) = self.flow.reorder(row.task_index, row.task_index + 1) {
            self.select_task(&id);
            self.needs_save = true;
        }
    }

    /// Insert an empty task next to the selection and start editing it
    pub fn insert_task(&mut self, below: bool) {
        let index = self.selected_row().map(|r| r.task_index).unwrap_or(0);
        if let Some(id) = self.flow.insert_task_at(index, below) {
            self.select_task(&id);
            self.needs_save = true;
            self.start_edit_task();
        }
    }

    /// Delete the selected task or subtask
    pub fn delete_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let Some(task_id) = self.flow.task_ids.get(row.task_index).cloned() else {
            return;
        };

        match row.subtask_index {
            Some(st_idx) => self.flow.remove_sub_task(&task_id, st_idx),
            None => {
                if let Some(focus) = self.flow.remove_task(&task_id) {
                    self.select_task(&focus);
                }
            }
        }
        self.clamp_selection();
        self.needs_save = true;
    }

    /// Tick or untick the selected subtask
    pub fn toggle_selected_subtask(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let (Some(st_idx), Some(task_id)) =
            (row.subtask_index, self.flow.task_ids.get(row.task_index).cloned())
        else {
            return;
        };
        self.flow.toggle_sub_task(&task_id, st_idx);
        self.needs_save = true;
    }

    pub fn increase_estimate(&mut self) {
        self.adjust_estimate(|est| est.saturating_add(ESTIMATE_STEP));
    }

    pub fn decrease_estimate(&mut self) {
        self.adjust_estimate(|est| est.saturating_sub(ESTIMATE_STEP));
    }

    fn adjust_estimate(&mut self, f: impl Fn(u64) -> u64) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let Some(task) = self.flow.task(&id).filter(|t| !t.is_break()) else {
            return;
        };
        let estimate = f(task.estimated_time);
        self.flow.update_task(&id, TaskUpdate::estimated_time(estimate));
        self.needs_save = true;
    }

    // ----- input form -----

    /// Start adding a new task (opens input form)
    pub fn start_add_task(&mut self) {
        self.input_form = Some(InputFormState::new(
            FormTarget::NewTask,
            String::new(),
            String::new(),
        ));
        self.ui_mode = UiMode::AddingTask;
    }

    /// Start adding a subtask under the selected task
    pub fn start_add_subtask(&mut self) {
        let Some(task_id) = self.selected_task_id() else {
            return;
        };
        if self.flow.task(&task_id).is_some_and(|t| t.is_break()) {
            return;
        }
        self.input_form = Some(InputFormState::new(
            FormTarget::NewSubTask { task_id },
            String::new(),
            String::new(),
        ));
        self.ui_mode = UiMode::AddingSubtask;
    }

    /// Edit title and estimate of the selected task
    pub fn start_edit_task(&mut self) {
        let Some(task) = self
            .selected_task_id()
            .and_then(|id| self.flow.task(&id))
            .filter(|t| !t.is_break())
        else {
            return;
        };
        let estimate = if task.estimated_time > 0 {
            crate::domain::format_time(task.estimated_time)
        } else {
            String::new()
        };
        self.input_form = Some(InputFormState::new(
            FormTarget::EditTask {
                task_id: task.id.clone(),
            },
            task.title.clone(),
            estimate,
        ));
        self.ui_mode = UiMode::EditingTask;
    }

    pub fn start_edit_note(&mut self) {
        self.input_form = Some(InputFormState::new(
            FormTarget::Note,
            self.flow.note.clone(),
            String::new(),
        ));
        self.ui_mode = UiMode::EditingNote;
    }

    /// Toggle between title and estimate fields
    pub fn input_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.input_form {
            if form.has_estimate() {
                form.editing_field = (form.editing_field + 1) % 2;
            }
        }
    }

    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            match form.editing_field {
                0 => form.title.push(c),
                _ => form.estimate.push(c),
            }
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            match form.editing_field {
                0 => {
                    form.title.pop();
                }
                _ => {
                    form.estimate.pop();
                }
            }
        }
    }

    /// Apply the form. A task estimate that does not parse keeps the form open.
    pub fn submit_input_form(&mut self) {
        let Some(form) = self.input_form.take() else {
            return;
        };

        let estimate = if form.has_estimate() && !form.estimate.trim().is_empty() {
            match parse_time(&form.estimate) {
                Some(seconds) => Some(seconds),
                None => {
                    self.message = Some(format!("Invalid time '{}', use HH:MM:SS", form.estimate));
                    self.input_form = Some(form);
                    return;
                }
            }
        } else {
            None
        };

        match form.target {
            FormTarget::NewTask => {
                let task = Task::new(form.title.trim(), estimate.unwrap_or(0));
                if let Some(id) = self.flow.add_task(task) {
                    self.select_task(&id);
                }
            }
            FormTarget::NewSubTask { task_id } => {
                self.flow.add_sub_task(&task_id, SubTask::new(form.title.trim()));
            }
            FormTarget::EditTask { task_id } => {
                self.flow.update_task(
                    &task_id,
                    TaskUpdate {
                        title: Some(form.title.trim().to_string()),
                        estimated_time: estimate,
                        ..TaskUpdate::default()
                    },
                );
            }
            FormTarget::Note => self.flow.set_note(form.title.trim()),
        }

        self.needs_save = true;
        self.ui_mode = UiMode::Normal;
    }

    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }

    // ----- flow lifecycle -----

    /// Validate and start the flow on its first open task
    pub fn commit_start(&mut self) -> bool {
        if let Err(issues) = validate_for_start(&self.flow) {
            if let Some(first) = issues.first() {
                self.message = Some(first.to_string());
                if let Some(task_id) = first.task_id() {
                    let task_id = task_id.to_string();
                    self.select_task(&task_id);
                }
            }
            log::info!("start blocked by {} validation issue(s)", issues.len());
            return false;
        }

        self.flow.set_status(TodoStatus::StartOnProgress);
        self.flow.ensure_current_task();
        self.flow.start_timer(self.services.scheduler.as_mut());

        for id in self.flow.regular_task_ids() {
            self.persist_task(&id);
        }
        self.after_status_change();
        self.message = None;
        true
    }

    /// Pause a running timer, or resume on the current (or first open) task.
    /// A stopped flow only starts through `commit_start`.
    pub fn toggle_timer(&mut self) {
        if self.flow.is_timer_running() {
            self.flow.stop_timer();
        } else if self.flow.status == TodoStatus::Stop {
            self.message = Some("Press s to start the flow".to_string());
            return;
        } else if self.flow.ensure_current_task() {
            self.flow.start_timer(self.services.scheduler.as_mut());
        }
        self.needs_save = true;
    }

    /// Mark the current task done and stop the flow
    pub fn complete_current(&mut self) {
        let finished = self
            .flow
            .current_task()
            .filter(|t| !t.is_break())
            .map(|t| t.id.clone());

        self.flow.complete_current();
        if let Some(id) = finished {
            self.persist_task(&id);
        }
        self.change_status(TodoStatus::Stop);
    }

    /// Complete the current task and keep going with the next one
    pub fn done_and_next(&mut self) {
        let outgoing = self.flow.current_task().filter(|t| !t.is_break()).cloned();

        match self.flow.done_and_advance() {
            Advance::Moved { task_id } => {
                if let Some(task) = outgoing.and_then(|t| self.flow.task(&t.id).cloned()) {
                    self.upsert_task(&task);
                }
                self.flow.start_timer(self.services.scheduler.as_mut());
                self.select_task(&task_id);
                self.after_status_change();
            }
            Advance::FlowFinished => {
                if let Some(mut task) = outgoing {
                    task.set_status(TaskStatus::Completed);
                    self.upsert_task(&task);
                }
                self.message = Some("All tasks done. The flow has been reset.".to_string());
                self.after_status_change();
            }
            Advance::Reset => self.after_status_change(),
            Advance::Idle => {}
        }
    }

    /// Skip to the neighbouring open task, leaving the current one Paused
    pub fn skip(&mut self, direction: Direction) {
        if self.flow.is_on_break() {
            self.message = Some("Finish or end the break first".to_string());
            return;
        }
        if self.flow.change_current_task(direction, TaskStatus::Paused) {
            self.flow.start_timer(self.services.scheduler.as_mut());
            if let Some(id) = self.flow.current_task_id.clone() {
                self.select_task(&id);
            }
            self.needs_save = true;
        } else {
            self.message = Some("No task in that direction".to_string());
        }
    }

    pub fn take_break(&mut self) {
        let seconds = self.settings.break_time;
        self.flow.take_break(seconds, self.services.scheduler.as_mut());
        self.needs_save = true;
    }

    /// Select a specific task as current and run it
    pub fn start_selected(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let runnable = self
            .flow
            .task(&id)
            .is_some_and(|t| !t.is_completed() && !t.is_break());
        if !runnable || self.flow.status == TodoStatus::Stop {
            return;
        }
        if self.flow.current_task_id.as_deref() != Some(id.as_str()) {
            self.flow.stop_timer();
            self.flow.set_current_task(Some(&id));
        }
        self.flow.start_timer(self.services.scheduler.as_mut());
        self.change_status(TodoStatus::StartOnProgress);
    }

    pub fn reset(&mut self) {
        self.flow.reset();
        self.modal = None;
        self.ui_mode = UiMode::Normal;
        self.after_status_change();
    }

    /// Leave the focused view; the timer keeps running
    pub fn back_to_list(&mut self) {
        self.change_status(TodoStatus::StartOnTodo);
    }

    /// Return to the focused view of a running flow
    pub fn focus(&mut self) {
        if !self.flow.is_timer_running() || validate_for_start(&self.flow).is_err() {
            return;
        }
        self.change_status(TodoStatus::StartOnProgress);
    }

    pub fn minimize(&self) {
        if let Err(e) = self.services.window.minimize() {
            log::warn!("minimize failed: {:#}", e);
        }
    }

    // ----- ticks and modals -----

    /// Apply a tick from the tick source and raise a modal on a threshold
    pub fn on_tick(&mut self, timer_id: u64) {
        let Some(event) = self.flow.on_tick(timer_id, &*self.services.notifier) else {
            return;
        };

        let task_title = self
            .flow
            .task(event.task_id())
            .map(|t| t.title.clone())
            .unwrap_or_default();
        let kind = match event {
            ThresholdEvent::DeadlineApproaching { .. } => ModalKind::Deadline,
            ThresholdEvent::BreakOver { .. } => ModalKind::BreakOver,
        };
        let message = match kind {
            ModalKind::Deadline => format!("\"{}\": {}", task_title, event.body()),
            ModalKind::BreakOver => event.body().to_string(),
        };

        self.modal = Some(ModalState {
            kind,
            title: event.title().to_string(),
            message,
        });
        self.ui_mode = UiMode::Modal;
        self.needs_save = true;
    }

    /// Modal choice: complete the task and move on
    pub fn modal_done(&mut self) {
        self.close_modal();
        self.done_and_next();
    }

    /// Modal choice: keep working (restarts the timer)
    pub fn modal_continue(&mut self) {
        self.close_modal();
        if self.flow.ensure_current_task() {
            self.flow.start_timer(self.services.scheduler.as_mut());
        }
    }

    /// Modal choice: take a break now
    pub fn modal_break(&mut self) {
        self.close_modal();
        self.take_break();
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.ui_mode = UiMode::Normal;
    }

    // ----- persistence -----

    /// Save the flow if anything changed since the last save
    pub fn save(&mut self) {
        if self.needs_save {
            self.persist_flow();
        }
    }

    fn change_status(&mut self, status: TodoStatus) {
        self.flow.set_status(status);
        self.after_status_change();
    }

    /// Persist the flow and fit the window to the new view
    fn after_status_change(&mut self) {
        self.persist_flow();

        let focused = self.flow.status.is_focused();
        let window = &self.services.window;
        if let Err(e) = window.set_always_on_top(focused) {
            log::warn!("always-on-top request failed: {:#}", e);
        }
        let size = if focused {
            Some(FOCUS_WINDOW)
        } else {
            self.list_window
        };
        if let Some((width, height)) = size {
            if let Err(e) = window.resize_and_move(width, height, 0, 0, 0) {
                log::warn!("window resize failed: {:#}", e);
            }
        }
    }

    fn persist_flow(&mut self) {
        match self.services.flows.upsert(&self.flow) {
            Ok(_) => self.needs_save = false,
            Err(e) => log::warn!("failed to save flow {}: {}", self.flow.id, e),
        }
    }

    fn persist_task(&self, id: &str) {
        if let Some(task) = self.flow.task(id) {
            self.upsert_task(task);
        }
    }

    fn upsert_task(&self, task: &Task) {
        if let Err(e) = self.services.tasks.upsert(task) {
            log::warn!("failed to save task {}: {}", task.id, e);
        }
    }
}
