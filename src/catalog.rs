use crate::domain::{format_time, Task, TodoFlow};
use crate::persistence::store::StoreResult;
use crate::persistence::Repository;

/// What `remove_record` deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removed {
    Flow,
    Task,
    Nothing,
}

/// Case-insensitive substring match; an empty query matches everything
fn matches_query(text: &str, query: Option<&str>) -> bool {
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => text.to_lowercase().contains(&q.to_lowercase()),
        None => true,
    }
}

/// Saved flows whose name contains `query`
pub fn search_flows(flows: &dyn Repository<TodoFlow>, query: Option<&str>) -> StoreResult<Vec<TodoFlow>> {
    Ok(flows
        .get_all()?
        .into_iter()
        .filter(|flow| matches_query(&flow.note, query))
        .collect())
}

/// Saved work tasks whose title contains `query`. Breaks are never listed.
pub fn search_tasks(tasks: &dyn Repository<Task>, query: Option<&str>) -> StoreResult<Vec<Task>> {
    Ok(tasks
        .get_all()?
        .into_iter()
        .filter(|task| !task.is_break() && matches_query(&task.title, query))
        .collect())
}

/// Delete one saved flow or task by id, flows first
pub fn remove_record(
    flows: &dyn Repository<TodoFlow>,
    tasks: &dyn Repository<Task>,
    id: &str,
) -> StoreResult<Removed> {
    if flows.remove(id)? {
        log::info!("removed flow {}", id);
        return Ok(Removed::Flow);
    }
    if tasks.remove(id)? {
        log::info!("removed task {}", id);
        return Ok(Removed::Task);
    }
    Ok(Removed::Nothing)
}

/// One line per flow: id, name, progress, time, status
pub fn flow_line(flow: &TodoFlow) -> String {
    let name = if flow.note.trim().is_empty() {
        "(unnamed)"
    } else {
        flow.note.as_str()
    };
    format!(
        "{}  {:<24} {:>3}/{:<3} {} / {}  {}",
        flow.id,
        name,
        flow.task_completed,
        flow.task_total,
        format_time(flow.actual_time_todo),
        format_time(flow.estimated_time_todo),
        flow.status.label()
    )
}

/// One line per task: id, title, estimate, status
pub fn task_line(task: &Task) -> String {
    format!(
        "{}  {:<32} {}  {:?}",
        task.id,
        task.title,
        format_time(task.estimated_time),
        task.status
    )
}
