use super::enums::TaskStatus;
use super::flow::TodoFlow;
use crate::notifications::Notifier;
use crate::ticker::{TickScheduler, TICK_PERIOD};

/// Raised when the running task crosses its time threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThresholdEvent {
    /// A work task reached its estimate
    DeadlineApproaching { task_id: String },
    /// A break counted down to zero
    BreakOver { task_id: String },
}

impl ThresholdEvent {
    pub fn task_id(&self) -> &str {
        match self {
            Self::DeadlineApproaching { task_id } | Self::BreakOver { task_id } => task_id,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::DeadlineApproaching { .. } => "Deadline Approaching",
            Self::BreakOver { .. } => "Break Time Over",
        }
    }

    pub fn body(&self) -> &'static str {
        match self {
            Self::DeadlineApproaching { .. } => {
                "You are getting close to the deadline. Please complete your task on time."
            }
            Self::BreakOver { .. } => "Your break time is over. Time to get back to work!",
        }
    }
}

impl TodoFlow {
    pub fn is_timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    pub fn timer_id(&self) -> Option<u64> {
        self.timer.as_ref().map(|t| t.id())
    }

    /// Start ticking the current task. Any previous tick source is cancelled first.
    /// Returns false (and leaves no timer) when there is nothing to run.
    pub fn start_timer(&mut self, scheduler: &mut dyn TickScheduler) -> bool {
        if let Some(previous) = self.timer.take() {
            previous.cancel();
        }

        if !self.current_task().is_some_and(|t| !t.is_completed()) {
            return false;
        }
        self.set_task_status(TaskStatus::InProgress);

        self.timer = Some(scheduler.schedule_every(TICK_PERIOD));
        true
    }

    /// Cancel the tick source. A running task becomes Paused; any other
    /// status (e.g. Completed) is left alone.
    pub fn stop_timer(&mut self) {
        let Some(timer) = self.timer.take() else {
            return;
        };
        timer.cancel();

        if let Some(task) = self.current_task_mut() {
            if task.status == TaskStatus::InProgress {
                task.set_status(TaskStatus::Paused);
            }
        }
        self.recalculate();
    }

    /// Advance the current task by one second.
    /// Work tasks count up, breaks count down and stop at zero.
    pub fn tick(&mut self) {
        let time_left = self.time_left;
        let Some(task) = self.current_task_mut() else {
            return;
        };

        let next = if task.is_break() {
            time_left.saturating_sub(1)
        } else {
            time_left.saturating_add(1)
        };
        task.actual_time = next;
        self.time_left = next;
        self.recalculate();
    }

    /// Look at the current task after a tick and report a threshold crossing
    pub fn check_threshold(&self) -> Option<ThresholdEvent> {
        let task = self.current_task()?;
        if task.status != TaskStatus::InProgress {
            return None;
        }

        if task.is_break() {
            if self.time_left == 0 {
                return Some(ThresholdEvent::BreakOver {
                    task_id: task.id.clone(),
                });
            }
            return None;
        }

        if task.estimated_time > 0
            && (self.time_left == task.estimated_time || self.time_left == 0)
        {
            return Some(ThresholdEvent::DeadlineApproaching {
                task_id: task.id.clone(),
            });
        }
        None
    }

    /// Apply one tick from the tick source identified by `timer_id`.
    ///
    /// Ticks from a cancelled or replaced source are dropped. On a threshold
    /// crossing the timer stops, the notifier is told, and a finished break
    /// is completed (which removes it).
    pub fn on_tick(&mut self, timer_id: u64, notifier: &dyn Notifier) -> Option<ThresholdEvent> {
        if !self.is_timer_running() || self.timer_id() != Some(timer_id) {
            log::trace!("dropping stale tick from source {}", timer_id);
            return None;
        }

        self.tick();
        let event = self.check_threshold()?;

        self.stop_timer();
        if !notifier.notify(event.title(), event.body()) {
            log::warn!("notification for '{}' was not delivered", event.title());
        }
        if matches!(event, ThresholdEvent::BreakOver { .. }) {
            self.complete_current();
        }
        Some(event)
    }
}
