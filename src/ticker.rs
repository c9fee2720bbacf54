use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How long the UI loop waits for input before redrawing, in milliseconds
pub const DEFAULT_POLL_MS: u64 = 250;

/// Period of the task timer
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Get the UI poll duration
pub fn poll_duration() -> Duration {
    Duration::from_millis(DEFAULT_POLL_MS)
}

/// A tick delivered by a running tick source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEvent {
    pub timer_id: u64,
}

/// Handle to a recurring tick source. Cancelling stops further deliveries.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Something that can install a recurring tick source
pub trait TickScheduler {
    fn schedule_every(&mut self, period: Duration) -> TimerHandle;
}

/// Spawns one sleeper thread per tick source; ticks are queued on a channel
/// and applied by whoever owns the receiver.
pub struct ThreadScheduler {
    sender: Sender<TickEvent>,
    next_id: Arc<AtomicU64>,
}

impl ThreadScheduler {
    pub fn new() -> (Self, Receiver<TickEvent>) {
        let (sender, receiver) = mpsc::channel();
        let scheduler = Self {
            sender,
            next_id: Arc::new(AtomicU64::new(1)),
        };
        (scheduler, receiver)
    }
}

impl TickScheduler for ThreadScheduler {
    fn schedule_every(&mut self, period: Duration) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let handle = TimerHandle::new(id);
        let worker_handle = handle.clone();
        let sender = self.sender.clone();

        thread::spawn(move || loop {
            thread::sleep(period);
            if worker_handle.is_cancelled() {
                break;
            }
            if sender.send(TickEvent { timer_id: id }).is_err() {
                // Receiver dropped, app is shutting down
                break;
            }
        });

        log::debug!("scheduled tick source {} every {:?}", id, period);
        handle
    }
}

/// Scheduler that never fires on its own; tests drive ticks by hand
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    handles: Vec<TimerHandle>,
}

#[cfg(test)]
impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles that have not been cancelled
    pub fn active_count(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_cancelled()).count()
    }

    pub fn scheduled_count(&self) -> usize {
        self.handles.len()
    }
}

#[cfg(test)]
impl TickScheduler for ManualScheduler {
    fn schedule_every(&mut self, _period: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle::new(self.next_id);
        self.handles.push(handle.clone());
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_duration() {
        assert_eq!(poll_duration(), Duration::from_millis(250));
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let handle = TimerHandle::new(7);
        let clone = handle.clone();
        assert!(!clone.is_cancelled());

        handle.cancel();
        assert!(clone.is_cancelled());
        assert_eq!(clone.id(), 7);
    }

    #[test]
    fn test_thread_scheduler_delivers_ticks() {
        let (mut scheduler, receiver) = ThreadScheduler::new();
        let handle = scheduler.schedule_every(Duration::from_millis(5));

        let event = receiver
            .recv_timeout(Duration::from_secs(2))
            .expect("tick should arrive");
        assert_eq!(event.timer_id, handle.id());
        handle.cancel();
    }

    #[test]
    fn test_thread_scheduler_ids_are_unique() {
        let (mut scheduler, _receiver) = ThreadScheduler::new();
        let first = scheduler.schedule_every(Duration::from_secs(60));
        let second = scheduler.schedule_every(Duration::from_secs(60));
        assert_ne!(first.id(), second.id());
        first.cancel();
        second.cancel();
    }

    #[test]
    fn test_manual_scheduler_counts_active_handles() {
        let mut scheduler = ManualScheduler::new();
        let first = scheduler.schedule_every(TICK_PERIOD);
        let _second = scheduler.schedule_every(TICK_PERIOD);
        assert_eq!(scheduler.active_count(), 2);

        first.cancel();
        assert_eq!(scheduler.active_count(), 1);
        assert_eq!(scheduler.scheduled_count(), 2);
    }
}
