use super::flow::TodoFlow;
use super::task::Task;
use crate::ticker::TickScheduler;

impl TodoFlow {
    /// Swap in a fresh break task and start counting it down.
    /// Any earlier break is discarded; the interrupted task is left Paused.
    pub fn take_break(&mut self, break_seconds: u64, scheduler: &mut dyn TickScheduler) -> String {
        self.stop_timer();
        self.purge_breaks();

        let pause = Task::new_break(break_seconds);
        let id = pause.id.clone();
        self.tasks.insert(id.clone(), pause);
        self.task_ids.push(id.clone());

        self.set_current_task(Some(&id));
        self.start_timer(scheduler);
        log::debug!("break {} started for {}s", id, self.time_left);
        id
    }

    pub fn is_on_break(&self) -> bool {
        self.current_task().is_some_and(|t| t.is_break())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enums::TaskStatus;
    use crate::domain::task::BREAK_PREFIX;
    use crate::domain::timer::ThresholdEvent;
    use crate::notifications::testing::RecordingNotifier;
    use crate::ticker::ManualScheduler;
    use pretty_assertions::assert_eq;

    fn started_flow(scheduler: &mut ManualScheduler) -> TodoFlow {
        let mut flow = TodoFlow::new("flow");
        flow.set_note("note");
        flow.add_task(Task::new("T1", 60));
        flow.add_task(Task::new("T2", 30));
        flow.ensure_current_task();
        flow.start_timer(scheduler);
        flow
    }

    #[test]
    fn test_break_counts_down_and_is_purged() {
        let mut scheduler = ManualScheduler::new();
        let mut flow = started_flow(&mut scheduler);
        let t1 = flow.task_ids[0].clone();
        flow.stop_timer();
        assert_eq!(flow.task(&t1).unwrap().status, TaskStatus::Paused);

        let break_id = flow.take_break(5, &mut scheduler);

        let breaks: Vec<&String> = flow
            .task_ids
            .iter()
            .filter(|id| id.starts_with(BREAK_PREFIX))
            .collect();
        assert_eq!(breaks, vec![&break_id]);
        assert_eq!(flow.task_total, 2);
        assert!(flow.is_timer_running());
        assert!(flow.is_on_break());
        assert_eq!(flow.time_left, 5);

        let notifier = RecordingNotifier::default();
        let timer_id = flow.timer_id().unwrap();
        let mut seen = Vec::new();
        for _ in 0..4 {
            assert!(flow.on_tick(timer_id, &notifier).is_none());
            seen.push(flow.time_left);
        }
        assert_eq!(seen, vec![4, 3, 2, 1]);

        let event = flow.on_tick(timer_id, &notifier);
        assert_eq!(
            event,
            Some(ThresholdEvent::BreakOver {
                task_id: break_id.clone()
            })
        );
        assert_eq!(notifier.titles(), vec!["Break Time Over".to_string()]);
        assert!(flow.task(&break_id).is_none());
        assert!(flow.break_task_ids().is_empty());
        assert!(flow.current_task_id.is_none());
        assert!(!flow.is_timer_running());
        assert_eq!(flow.task(&t1).unwrap().status, TaskStatus::Paused);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_break_interrupts_running_task() {
        let mut scheduler = ManualScheduler::new();
        let mut flow = started_flow(&mut scheduler);
        let t1 = flow.task_ids[0].clone();

        flow.take_break(300, &mut scheduler);

        assert_eq!(flow.task(&t1).unwrap().status, TaskStatus::Paused);
        assert_eq!(scheduler.active_count(), 1);
        assert_eq!(flow.current_task().unwrap().status, TaskStatus::InProgress);
    }

    #[test]
    fn test_at_most_one_break() {
        let mut scheduler = ManualScheduler::new();
        let mut flow = started_flow(&mut scheduler);

        flow.take_break(300, &mut scheduler);
        flow.take_break(300, &mut scheduler);
        let last = flow.take_break(60, &mut scheduler);

        assert_eq!(flow.break_task_ids(), vec![last]);
        assert_eq!(flow.tasks.len(), 3);
        assert_eq!(flow.task_total, 2);
        assert_eq!(flow.estimated_time_todo, 90);
        assert_eq!(scheduler.active_count(), 1);
    }

    #[test]
    fn test_break_time_counts_toward_actual_total() {
        let mut scheduler = ManualScheduler::new();
        let mut flow = started_flow(&mut scheduler);
        let notifier = RecordingNotifier::default();
        let timer_id = flow.timer_id().unwrap();
        flow.on_tick(timer_id, &notifier);
        flow.on_tick(timer_id, &notifier);

        flow.take_break(10, &mut scheduler);
        let timer_id = flow.timer_id().unwrap();
        flow.on_tick(timer_id, &notifier);
        flow.on_tick(timer_id, &notifier);
        flow.on_tick(timer_id, &notifier);

        assert_eq!(flow.actual_time_todo, 5);
    }

    #[test]
    fn test_reset_discards_break() {
        let mut scheduler = ManualScheduler::new();
        let mut flow = started_flow(&mut scheduler);
        flow.take_break(30, &mut scheduler);

        flow.reset();

        assert!(flow.break_task_ids().is_empty());
        assert!(!flow.is_on_break());
        assert_eq!(scheduler.active_count(), 0);
    }
}
