use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::Waker;
use std::time::Instant;

/// State shared between a sleep future and its entry in the timer heap.
///
/// The sleep future keeps the waker up to date on every poll, so a single
/// heap entry always wakes the task that polled last.
pub(crate) struct TimerShared {
    /// Waker notified when the deadline is reached.
    waker: Mutex<Option<Waker>>,

    /// Set when the sleep future is dropped before firing.
    cancelled: AtomicBool,
}

impl TimerShared {
    pub(crate) fn new(waker: &Waker) -> Self {
        Self {
            waker: Mutex::new(Some(waker.clone())),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Replaces the stored waker unless it already wakes the same task.
    pub(crate) fn set_waker(&self, waker: &Waker) {
        let mut slot = self.lock();

        match slot.as_ref() {
            Some(current) if current.will_wake(waker) => {}
            _ => *slot = Some(waker.clone()),
        }
    }

    pub(crate) fn take_waker(&self) -> Option<Waker> {
        self.lock().take()
    }

    pub(crate) fn cancel(&self) {
        self.cancelled.store(true, AtomicOrdering::Release);
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(AtomicOrdering::Acquire)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Waker>> {
        self.waker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An entry in the scheduler timer heap.
///
/// `TimerEntry` represents a scheduled wake-up at a specific deadline.
/// It is stored in a `BinaryHeap` ordered by deadline. Each sleep future
/// owns at most one entry.
///
/// The entry may be cancelled before it fires.
pub(crate) struct TimerEntry {
    /// The time at which the timer should fire.
    pub(crate) deadline: Instant,

    /// Waker and cancellation flag, shared with the sleep future.
    pub(crate) shared: Arc<TimerShared>,
}

impl TimerEntry {
    pub(crate) fn is_cancelled(&self) -> bool {
        self.shared.is_cancelled()
    }
}

impl Eq for TimerEntry {}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline.eq(&other.deadline)
    }
}

impl Ord for TimerEntry {
    /// Reversed so that a `BinaryHeap<TimerEntry>` pops the earliest
    /// deadline first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.deadline.cmp(&self.deadline)
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
