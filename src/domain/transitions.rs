use super::enums::{Direction, TaskStatus, TodoStatus};
use super::flow::TodoFlow;

/// What `done_and_advance` ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Everything was already done; the flow was reset
    Reset,
    /// The last open task was completed and the flow reset
    FlowFinished,
    /// A new task became current
    Moved { task_id: String },
    /// No current task to complete
    Idle,
}

impl TodoFlow {
    /// Set the status of the current task. No-op without one.
    pub fn set_task_status(&mut self, status: TaskStatus) {
        let Some(task) = self.current_task_mut() else {
            return;
        };
        task.set_status(status);
        self.recalculate();
    }

    /// Mark the current task done. A finished break is dropped from the flow.
    pub fn complete_current(&mut self) {
        // Cancel without the InProgress -> Paused step
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }

        let Some(task) = self.current_task_mut() else {
            return;
        };
        task.set_status(TaskStatus::Completed);
        let finished_break = task.is_break().then(|| task.id.clone());

        if let Some(id) = finished_break {
            self.tasks.remove(&id);
            self.task_ids.retain(|t| *t != id);
            self.current_task_id = None;
            self.time_left = 0;
        }
        self.recalculate();
    }

    /// Move the current pointer to the neighbouring open task.
    /// The task being left gets `outgoing`. Returns false at either end.
    pub fn change_current_task(&mut self, direction: Direction, outgoing: TaskStatus) -> bool {
        let Some(current_id) = self.current_task_id.clone() else {
            return false;
        };
        let open = self.incomplete_task_ids();
        let Some(position) = open.iter().position(|id| *id == current_id) else {
            return false;
        };

        let target = match direction {
            Direction::Next => position.checked_add(1),
            Direction::Previous => position.checked_sub(1),
        };
        let Some(next_id) = target.and_then(|i| open.get(i)).cloned() else {
            return false;
        };

        if let Some(task) = self.tasks.get_mut(&current_id) {
            task.set_status(outgoing);
        }
        self.set_current_task(Some(&next_id));
        self.recalculate();
        true
    }

    /// Complete the current task and move on to the next open one.
    pub fn done_and_advance(&mut self) -> Advance {
        if self.is_all_completed() {
            self.reset();
            return Advance::Reset;
        }
        if self.current_task().is_none() {
            return Advance::Idle;
        }

        // The caller restarts the timer on the next task
        self.stop_timer();

        if !self.change_current_task(Direction::Next, TaskStatus::Completed) {
            self.complete_current();
            if self.is_all_completed() {
                self.reset();
                return Advance::FlowFinished;
            }
            // Earlier tasks were skipped; go back to the first of them
            self.current_task_id = None;
            self.ensure_current_task();
        }

        self.purge_breaks();
        self.status = TodoStatus::StartOnProgress;

        match self.current_task_id.clone() {
            Some(task_id) => Advance::Moved { task_id },
            None => Advance::Idle,
        }
    }

    /// Change the flow status. Starting a finished flow resets it first.
    pub fn set_status(&mut self, status: TodoStatus) {
        if status == TodoStatus::StartOnProgress && self.is_all_completed() {
            self.reset();
        }
        self.status = status;
    }

    /// Make sure the pointer names an open task, picking the first one if not.
    /// Returns whether there is a current task afterwards.
    pub fn ensure_current_task(&mut self) -> bool {
        if self.current_task().is_some_and(|t| !t.is_completed()) {
            return true;
        }
        let first_open = self.incomplete_task_ids().into_iter().next();
        self.set_current_task(first_open.as_deref());
        self.current_task_id.is_some()
    }

    /// Point at `id` (or nothing); `time_left` follows the task's stored time
    pub fn set_current_task(&mut self, id: Option<&str>) {
        match id.and_then(|id| self.tasks.get(id)) {
            Some(task) => {
                self.time_left = task.actual_time;
                self.current_task_id = Some(task.id.clone());
            }
            None => {
                self.current_task_id = None;
                self.time_left = 0;
            }
        }
    }

    /// Back to the start: stopped, no breaks, every task untouched
    pub fn reset(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        self.status = TodoStatus::Stop;
        self.current_task_id = None;
        self.time_left = 0;
        self.purge_breaks();

        for task in self.tasks.values_mut() {
            task.reset();
        }
        self.recalculate();
    }
}
