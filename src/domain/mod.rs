pub mod breaks;
pub mod enums;
pub mod flow;
pub mod task;
pub mod timer;
pub mod transitions;
pub mod validation;
pub mod views;

pub use enums::{Direction, TaskStatus, TodoStatus, UiMode};
pub use flow::TodoFlow;
pub use task::{SubTask, Task, TaskUpdate};
pub use timer::ThresholdEvent;
pub use transitions::Advance;
pub use validation::validate_for_start;
pub use views::{
    completion_ratio, flatten_tasks, format_time, is_over_budget, parse_time, status_badge,
    timer_label, tree_connector, FlatRow,
};
