use super::enums::{TaskStatus, TodoStatus};
use super::task::{SubTask, Task, TaskUpdate};
use crate::ticker::TimerHandle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A day's ordered set of tasks with aggregate progress.
///
/// `task_ids` is the canonical order; `tasks` is only a lookup table.
/// The four counters are derived and rebuilt by [`TodoFlow::recalculate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoFlow {
    pub id: String,
    #[serde(default)]
    pub note: String,
    pub status: TodoStatus,
    #[serde(default)]
    pub task_completed: u32,
    #[serde(default)]
    pub task_total: u32,
    #[serde(default)]
    pub estimated_time_todo: u64,
    #[serde(default)]
    pub actual_time_todo: u64,
    #[serde(default)]
    pub task_ids: Vec<String>,
    #[serde(default)]
    pub tasks: HashMap<String, Task>,
    /// Written as `null` when cleared so a merge into the stored record drops it
    #[serde(default)]
    pub current_task_id: Option<String>,
    #[serde(default)]
    pub time_left: u64,
    #[serde(skip)]
    pub(super) timer: Option<TimerHandle>,
}

impl Default for TodoFlow {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl TodoFlow {
    /// An empty, stopped flow
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            note: String::new(),
            status: TodoStatus::Stop,
            task_completed: 0,
            task_total: 0,
            estimated_time_todo: 0,
            actual_time_todo: 0,
            task_ids: Vec::new(),
            tasks: HashMap::new(),
            current_task_id: None,
            time_left: 0,
            timer: None,
        }
    }

    /// Normalize a flow loaded from disk: nothing runs after a load
    pub fn restore(&mut self) {
        self.timer = None;
        self.task_ids.retain(|id| self.tasks.contains_key(id));
        let listed: Vec<String> = self.task_ids.clone();
        self.tasks.retain(|id, _| listed.contains(id));

        for task in self.tasks.values_mut() {
            if task.status == TaskStatus::InProgress {
                task.status = TaskStatus::Paused;
            }
        }
        if self.status == TodoStatus::StartOnProgress {
            self.status = TodoStatus::StartOnTodo;
        }

        match self.current_task().map(|t| t.actual_time) {
            Some(actual) => self.time_left = actual,
            None => {
                self.current_task_id = None;
                self.time_left = 0;
            }
        }
        self.recalculate();
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    /// The task receiving ticks, if the pointer resolves
    pub fn current_task(&self) -> Option<&Task> {
        self.current_task_id.as_deref().and_then(|id| self.tasks.get(id))
    }

    pub fn current_task_mut(&mut self) -> Option<&mut Task> {
        let id = self.current_task_id.as_deref()?;
        self.tasks.get_mut(id)
    }

    /// Tasks in list order
    pub fn ordered_tasks(&self) -> impl Iterator<Item = &Task> {
        self.task_ids.iter().filter_map(|id| self.tasks.get(id))
    }

    /// Ids of tasks that are not breaks, in list order
    pub fn regular_task_ids(&self) -> Vec<String> {
        self.ordered_tasks()
            .filter(|t| !t.is_break())
            .map(|t| t.id.clone())
            .collect()
    }

    /// Ids of tasks still to do, in list order
    pub fn incomplete_task_ids(&self) -> Vec<String> {
        self.ordered_tasks()
            .filter(|t| !t.is_completed())
            .map(|t| t.id.clone())
            .collect()
    }

    pub fn break_task_ids(&self) -> Vec<String> {
        self.ordered_tasks()
            .filter(|t| t.is_break())
            .map(|t| t.id.clone())
            .collect()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.task_ids.iter().position(|t| t == id)
    }

    pub fn is_all_completed(&self) -> bool {
        self.task_completed == self.task_total
    }

    /// Rebuild the derived counters from the task data.
    /// Breaks never count toward totals, but the time spent on them does.
    pub fn recalculate(&mut self) {
        let mut estimated = 0u64;
        let mut completed = 0u32;
        let mut total = 0u32;
        let mut actual = 0u64;

        for task in self.task_ids.iter().filter_map(|id| self.tasks.get(id)) {
            actual = actual.saturating_add(task.time_spent());
            if task.is_break() {
                continue;
            }
            total += 1;
            estimated = estimated.saturating_add(task.estimated_time);
            if task.is_completed() {
                completed += 1;
            }
        }

        self.estimated_time_todo = estimated;
        self.task_completed = completed;
        self.task_total = total;
        self.actual_time_todo = actual;
    }

    /// Append a task. Returns the id to focus.
    pub fn add_task(&mut self, task: Task) -> Option<String> {
        let id = task.id.clone();
        if self.tasks.contains_key(&id) {
            return None;
        }
        self.tasks.insert(id.clone(), task);
        self.task_ids.push(id.clone());
        self.recalculate();
        Some(id)
    }

    /// Insert an empty task at `index`, or just after it when `below`.
    /// Returns the id to focus.
    pub fn insert_task_at(&mut self, index: usize, below: bool) -> Option<String> {
        let position = (if below { index.saturating_add(1) } else { index }).min(self.task_ids.len());
        let task = Task::new("", 0);
        let id = task.id.clone();
        self.tasks.insert(id.clone(), task);
        self.task_ids.insert(position, id.clone());
        self.recalculate();
        Some(id)
    }

    /// Delete a task. Returns the id to focus: the previous regular task,
    /// or the first remaining one when the removed task led the list.
    pub fn remove_task(&mut self, id: &str) -> Option<String> {
        let removed_was_break = self.tasks.get(id)?.is_break();
        let regular_before = self.regular_task_ids();
        let original_index = regular_before.iter().position(|t| t == id);

        if self.current_task_id.as_deref() == Some(id) {
            self.stop_timer();
            self.current_task_id = None;
            self.time_left = 0;
        }

        self.tasks.remove(id);
        self.task_ids.retain(|t| t != id);
        self.recalculate();

        if removed_was_break {
            return None;
        }

        match original_index {
            Some(idx) if idx > 0 => regular_before.get(idx - 1).cloned(),
            _ => self.regular_task_ids().into_iter().next(),
        }
    }

    /// Shallow-merge fields into a task. Unknown ids are ignored.
    pub fn update_task(&mut self, id: &str, update: TaskUpdate) {
        let is_current = self.current_task_id.as_deref() == Some(id);
        let Some(task) = self.task_mut(id) else {
            return;
        };
        update.apply(task);
        if is_current {
            self.time_left = task.actual_time;
        }
        self.recalculate();
    }

    /// Move a task within the list order. Returns the id to focus.
    pub fn reorder(&mut self, from: usize, to: usize) -> Option<String> {
        let len = self.task_ids.len();
        if from >= len || to >= len || from == to {
            return None;
        }
        let moved = self.task_ids.remove(from);
        self.task_ids.insert(to, moved.clone());
        Some(moved)
    }

    pub fn add_sub_task(&mut self, task_id: &str, sub_task: SubTask) {
        if let Some(task) = self.task_mut(task_id) {
            task.sub_tasks.push(sub_task);
        }
    }

    pub fn toggle_sub_task(&mut self, task_id: &str, index: usize) {
        if let Some(sub_task) = self
            .task_mut(task_id)
            .and_then(|t| t.sub_tasks.get_mut(index))
        {
            sub_task.completed = !sub_task.completed;
        }
    }

    pub fn remove_sub_task(&mut self, task_id: &str, index: usize) {
        if let Some(task) = self.task_mut(task_id) {
            if index < task.sub_tasks.len() {
                task.sub_tasks.remove(index);
            }
        }
    }

    /// Drop every break task from the map and the order
    pub(super) fn purge_breaks(&mut self) {
        let breaks = self.break_task_ids();
        if breaks.is_empty() {
            return;
        }
        if let Some(current) = self.current_task_id.as_deref() {
            if breaks.iter().any(|b| b == current) {
                self.current_task_id = None;
                self.time_left = 0;
            }
        }
        for id in &breaks {
            self.tasks.remove(id);
        }
        self.task_ids.retain(|id| !breaks.contains(id));
        self.recalculate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::TaskKind;
    use pretty_assertions::assert_eq;

    fn flow_with(estimates: &[u64]) -> TodoFlow {
        let mut flow = TodoFlow::new("flow-1");
        flow.set_note("Monday");
        for (i, est) in estimates.iter().enumerate() {
            flow.add_task(Task::new(format!("T{}", i + 1), *est));
        }
        flow
    }

    /// Recount from scratch, independent of `recalculate`
    fn assert_counters_consistent(flow: &TodoFlow) {
        let regular: Vec<&Task> = flow.ordered_tasks().filter(|t| !t.is_break()).collect();
        assert_eq!(flow.task_total as usize, regular.len());
        assert_eq!(
            flow.task_completed as usize,
            regular.iter().filter(|t| t.is_completed()).count()
        );
        assert_eq!(
            flow.estimated_time_todo,
            regular.iter().map(|t| t.estimated_time).sum::<u64>()
        );
        assert!(flow.task_completed <= flow.task_total);
    }

    #[test]
    fn test_new_flow_is_empty_and_stopped() {
        let flow = TodoFlow::new("abc");
        assert_eq!(flow.id, "abc");
        assert_eq!(flow.status, TodoStatus::Stop);
        assert!(flow.task_ids.is_empty());
        assert_eq!(flow.task_total, 0);
        assert!(flow.current_task_id.is_none());
    }

    #[test]
    fn test_add_task_updates_counters() {
        let mut flow = TodoFlow::new("f");
        let focus = flow.add_task(Task::new("A", 60));
        assert_eq!(focus.as_deref(), Some(flow.task_ids[0].as_str()));
        flow.add_task(Task::new("B", 30));

        assert_eq!(flow.task_total, 2);
        assert_eq!(flow.estimated_time_todo, 90);
        assert_eq!(flow.task_completed, 0);
    }

    #[test]
    fn test_add_duplicate_id_is_ignored() {
        let mut flow = TodoFlow::new("f");
        let task = Task::new("A", 60);
        flow.add_task(task.clone());
        assert!(flow.add_task(task).is_none());
        assert_eq!(flow.task_ids.len(), 1);
    }

    #[test]
    fn test_counter_consistency_across_mutations() {
        let mut flow = flow_with(&[60, 30, 45]);
        assert_counters_consistent(&flow);

        let second = flow.task_ids[1].clone();
        flow.update_task(&second, TaskUpdate::status(TaskStatus::Completed));
        assert_counters_consistent(&flow);
        assert_eq!(flow.task_completed, 1);

        flow.update_task(&second, TaskUpdate::estimated_time(100));
        assert_counters_consistent(&flow);
        assert_eq!(flow.estimated_time_todo, 205);

        flow.add_task(Task::new_break(300));
        assert_counters_consistent(&flow);
        assert_eq!(flow.task_total, 3);

        let first = flow.task_ids[0].clone();
        flow.remove_task(&first);
        assert_counters_consistent(&flow);
        assert_eq!(flow.task_total, 2);

        flow.insert_task_at(0, false);
        assert_counters_consistent(&flow);
        assert_eq!(flow.task_total, 3);
    }

    #[test]
    fn test_actual_time_includes_break_time_spent() {
        let mut flow = flow_with(&[60]);
        let first = flow.task_ids[0].clone();
        flow.update_task(
            &first,
            TaskUpdate {
                actual_time: Some(20),
                ..TaskUpdate::default()
            },
        );
        let mut pause = Task::new_break(10);
        pause.actual_time = 7;
        flow.add_task(pause);

        assert_eq!(flow.actual_time_todo, 23);
        assert_eq!(flow.estimated_time_todo, 60);
    }

    #[test]
    fn test_remove_task_focuses_previous_regular() {
        let mut flow = flow_with(&[10, 20, 30]);
        let ids = flow.task_ids.clone();

        let focus = flow.remove_task(&ids[2]);
        assert_eq!(focus.as_deref(), Some(ids[1].as_str()));
    }

    #[test]
    fn test_remove_first_task_focuses_new_first() {
        let mut flow = flow_with(&[10, 20, 30]);
        let ids = flow.task_ids.clone();

        let focus = flow.remove_task(&ids[0]);
        assert_eq!(focus.as_deref(), Some(ids[1].as_str()));
    }

    #[test]
    fn test_remove_break_gives_no_focus() {
        let mut flow = flow_with(&[10]);
        let pause = Task::new_break(5);
        let pause_id = pause.id.clone();
        flow.add_task(pause);

        assert!(flow.remove_task(&pause_id).is_none());
        assert_eq!(flow.task_ids.len(), 1);
    }

    #[test]
    fn test_remove_unknown_task_is_noop() {
        let mut flow = flow_with(&[10]);
        assert!(flow.remove_task("missing").is_none());
        assert_eq!(flow.task_ids.len(), 1);
    }

    #[test]
    fn test_remove_current_task_clears_pointer() {
        let mut flow = flow_with(&[10, 20]);
        let first = flow.task_ids[0].clone();
        flow.current_task_id = Some(first.clone());
        flow.time_left = 3;

        flow.remove_task(&first);
        assert!(flow.current_task_id.is_none());
        assert_eq!(flow.time_left, 0);
    }

    #[test]
    fn test_update_unknown_task_is_noop() {
        let mut flow = flow_with(&[10]);
        flow.update_task("missing", TaskUpdate::title("x"));
        assert_eq!(flow.tasks.len(), 1);
    }

    #[test]
    fn test_reorder() {
        let mut flow = flow_with(&[10, 20, 30]);
        let ids = flow.task_ids.clone();

        let focus = flow.reorder(0, 2);
        assert_eq!(focus.as_deref(), Some(ids[0].as_str()));
        assert_eq!(flow.task_ids, vec![ids[1].clone(), ids[2].clone(), ids[0].clone()]);
    }

    #[test]
    fn test_reorder_rejects_bad_indices() {
        let mut flow = flow_with(&[10, 20]);
        let before = flow.task_ids.clone();

        assert!(flow.reorder(0, 2).is_none());
        assert!(flow.reorder(5, 0).is_none());
        assert!(flow.reorder(1, 1).is_none());
        assert_eq!(flow.task_ids, before);
    }

    #[test]
    fn test_insert_task_at_position() {
        let mut flow = flow_with(&[10, 20]);
        let ids = flow.task_ids.clone();

        let above = flow.insert_task_at(1, false).unwrap();
        assert_eq!(flow.task_ids[1], above);

        let below = flow.insert_task_at(0, true).unwrap();
        assert_eq!(flow.task_ids[1], below);
        assert_eq!(flow.task_ids[0], ids[0]);

        // Past the end clamps to append
        let tail = flow.insert_task_at(99, true).unwrap();
        assert_eq!(flow.task_ids.last(), Some(&tail));
        assert!(flow.task(&tail).unwrap().has_empty_title());
    }

    #[test]
    fn test_sub_task_editing() {
        let mut flow = flow_with(&[10]);
        let id = flow.task_ids[0].clone();

        flow.add_sub_task(&id, SubTask::new("outline"));
        flow.add_sub_task(&id, SubTask::new("draft"));
        flow.toggle_sub_task(&id, 1);
        assert!(flow.task(&id).unwrap().sub_tasks[1].completed);

        flow.remove_sub_task(&id, 0);
        let task = flow.task(&id).unwrap();
        assert_eq!(task.sub_tasks.len(), 1);
        assert_eq!(task.sub_tasks[0].title, "draft");

        // Out of range is ignored
        flow.toggle_sub_task(&id, 9);
        flow.remove_sub_task(&id, 9);
        assert_eq!(flow.task(&id).unwrap().sub_tasks.len(), 1);
    }

    #[test]
    fn test_restore_normalizes_running_state() {
        let mut flow = flow_with(&[10, 20]);
        let first = flow.task_ids[0].clone();
        flow.status = TodoStatus::StartOnProgress;
        flow.current_task_id = Some(first.clone());
        flow.tasks.get_mut(&first).unwrap().status = TaskStatus::InProgress;
        flow.tasks.get_mut(&first).unwrap().actual_time = 12;
        flow.task_total = 99;

        flow.restore();

        assert_eq!(flow.status, TodoStatus::StartOnTodo);
        assert_eq!(flow.task(&first).unwrap().status, TaskStatus::Paused);
        assert_eq!(flow.time_left, 12);
        assert_eq!(flow.task_total, 2);
        assert!(flow.timer.is_none());
    }

    #[test]
    fn test_restore_clears_dangling_pointer() {
        let mut flow = flow_with(&[10]);
        flow.current_task_id = Some("gone".to_string());
        flow.time_left = 5;
        flow.task_ids.push("also-gone".to_string());

        flow.restore();

        assert!(flow.current_task_id.is_none());
        assert_eq!(flow.time_left, 0);
        assert_eq!(flow.task_ids.len(), 1);
    }

    #[test]
    fn test_serialized_shape() {
        let mut flow = flow_with(&[60]);
        flow.add_task(Task::new_break(5));
        let value = serde_json::to_value(&flow).unwrap();

        assert_eq!(value["id"], "flow-1");
        assert_eq!(value["note"], "Monday");
        assert_eq!(value["status"], "Stop");
        assert_eq!(value["taskTotal"], 1);
        assert_eq!(value["estimatedTimeTodo"], 60);
        assert_eq!(value["taskIds"].as_array().unwrap().len(), 2);
        assert!(value.get("timer").is_none());

        let back: TodoFlow = serde_json::from_value(value).unwrap();
        assert_eq!(back.task_ids, flow.task_ids);
        let break_id = &back.task_ids[1];
        assert_eq!(back.task(break_id).unwrap().kind, TaskKind::Break);
    }
}
