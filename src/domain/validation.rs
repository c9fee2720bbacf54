use super::flow::TodoFlow;
use thiserror::Error;

/// Why a flow cannot be started yet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("Give this flow a name before starting")]
    EmptyNote,
    #[error("Add at least one task before starting")]
    NoTasks,
    #[error("A task has no title")]
    EmptyTaskTitle { task_id: String },
    #[error("A subtask has no title")]
    EmptySubTaskTitle { task_id: String, sub_task_id: String },
}

impl ValidationIssue {
    /// Task the UI should scroll to, if the issue belongs to one
    pub fn task_id(&self) -> Option<&str> {
        match self {
            Self::EmptyTaskTitle { task_id } | Self::EmptySubTaskTitle { task_id, .. } => {
                Some(task_id)
            }
            Self::EmptyNote | Self::NoTasks => None,
        }
    }
}

/// Check that a flow is ready to start. Issues come back in list order.
pub fn validate_for_start(flow: &TodoFlow) -> Result<(), Vec<ValidationIssue>> {
    let regular: Vec<_> = flow.ordered_tasks().filter(|t| !t.is_break()).collect();
    if regular.is_empty() {
        return Err(vec![ValidationIssue::NoTasks]);
    }

    let mut issues = Vec::new();
    if flow.note.trim().is_empty() {
        issues.push(ValidationIssue::EmptyNote);
    }

    for task in regular {
        if task.has_empty_title() {
            issues.push(ValidationIssue::EmptyTaskTitle {
                task_id: task.id.clone(),
            });
        }
        for sub_task in task.sub_tasks.iter().filter(|st| st.title.trim().is_empty()) {
            issues.push(ValidationIssue::EmptySubTaskTitle {
                task_id: task.id.clone(),
                sub_task_id: sub_task.id.clone(),
            });
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
