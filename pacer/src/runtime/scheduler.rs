use crate::collections::Queue;
use crate::runtime::task::Runnable;
use crate::runtime::timer::TimerEntry;

use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::task::Waker;
use std::time::Instant;

use tracing::trace;

/// Shared handle to a scheduler.
pub(crate) type SchedulerHandle = Arc<Scheduler>;

/// Current-thread task scheduler.
///
/// The scheduler owns:
/// - a FIFO run queue of tasks ready to be polled,
/// - a min-heap of pending timers,
/// - a condition variable used to park the driving thread when there is
///   nothing to do.
///
/// Tasks are only ever polled by the thread inside
/// [`Runtime::block_on`](crate::Runtime::block_on). Other threads may
/// still wake tasks or register timers; they are pushed into the shared
/// queues and the parked thread is notified.
pub(crate) struct Scheduler {
    /// Tasks ready to be polled, in wake-up order.
    run_queue: Mutex<Queue<Arc<dyn Runnable>>>,

    /// Pending timers, earliest deadline first.
    timers: Mutex<BinaryHeap<TimerEntry>>,

    /// Notified whenever the run queue or the timer heap changes.
    ///
    /// Always paired with the `run_queue` mutex.
    unparked: Condvar,

    /// Number of tasks polled before timers and the `block_on` future are
    /// looked at again.
    event_interval: usize,
}

// Lock order: `run_queue` before `timers`. Nothing holds `timers` while
// acquiring `run_queue`.
impl Scheduler {
    pub(crate) fn new(event_interval: usize) -> Self {
        Self {
            run_queue: Mutex::new(Queue::new()),
            timers: Mutex::new(BinaryHeap::new()),
            unparked: Condvar::new(),
            event_interval,
        }
    }

    /// Pushes a runnable task at the back of the run queue.
    pub(crate) fn schedule(&self, task: Arc<dyn Runnable>) {
        self.lock_run_queue().push(task);
        self.unparked.notify_all();
    }

    /// Registers a timer that wakes the waker stored in `entry` once its
    /// deadline is reached.
    pub(crate) fn register_timer(&self, entry: TimerEntry) {
        trace!(deadline = ?entry.deadline, "timer registered");

        self.lock_timers().push(entry);
        self.unpark();
    }

    /// Wakes the driving threads if they are parked.
    ///
    /// Every parked thread is notified: several threads may be inside
    /// `block_on` on the same runtime and only one of them may own the
    /// future that was woken.
    pub(crate) fn unpark(&self) {
        let _queue = self.lock_run_queue();
        self.unparked.notify_all();
    }

    /// Polls up to `event_interval` tasks from the run queue.
    ///
    /// Returns the number of tasks that were polled.
    pub(crate) fn tick(&self) -> usize {
        let mut polled = 0;

        while polled < self.event_interval {
            // The lock is released before running the task: polling may
            // wake or spawn other tasks.
            let Some(task) = self.lock_run_queue().pop() else {
                break;
            };

            task.run();
            polled += 1;
        }

        polled
    }

    /// Wakes every timer whose deadline has passed.
    ///
    /// Cancelled timers are discarded without being woken. Returns the
    /// number of wakers notified.
    pub(crate) fn fire_timers(&self) -> usize {
        let now = Instant::now();
        let mut expired: Vec<Waker> = Vec::new();

        {
            let mut timers = self.lock_timers();

            while let Some(entry) = timers.peek() {
                if entry.deadline > now {
                    break;
                }

                if let Some(entry) = timers.pop()
                    && !entry.is_cancelled()
                    && let Some(waker) = entry.shared.take_waker()
                {
                    expired.push(waker);
                }
            }
        }

        let fired = expired.len();
        for waker in expired {
            waker.wake();
        }

        fired
    }

    /// Parks the driving thread until a task is scheduled, `woken` is set,
    /// or the next timer deadline is reached.
    ///
    /// Returns immediately if there is already something to do.
    pub(crate) fn park(&self, woken: &AtomicBool) {
        let queue = self.lock_run_queue();

        if !queue.is_empty() || woken.load(Ordering::Acquire) {
            return;
        }

        match self.next_deadline() {
            Some(deadline) => {
                let timeout = deadline.saturating_duration_since(Instant::now());
                if timeout.is_zero() {
                    return;
                }

                let _queue = self
                    .unparked
                    .wait_timeout(queue, timeout)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            None => {
                let _queue = self
                    .unparked
                    .wait(queue)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        }
    }

    /// Drops every queued task and pending timer.
    ///
    /// Returns the number of tasks that were still queued.
    pub(crate) fn shutdown(&self) -> usize {
        // Dropping a task may run arbitrary destructors that wake other
        // tasks, so nothing is dropped while a lock is held.
        let queued = std::mem::take(&mut *self.lock_run_queue());
        let timers = std::mem::take(&mut *self.lock_timers());

        let pending = queued.len();
        drop(queued);
        drop(timers);

        pending
    }

    /// Earliest live deadline, discarding cancelled timers on the way.
    fn next_deadline(&self) -> Option<Instant> {
        let mut timers = self.lock_timers();

        while let Some(entry) = timers.peek() {
            if !entry.is_cancelled() {
                return Some(entry.deadline);
            }

            timers.pop();
        }

        None
    }

    // A panic inside a task never happens while one of these locks is held,
    // so a poisoned lock still guards consistent data.
    fn lock_run_queue(&self) -> MutexGuard<'_, Queue<Arc<dyn Runnable>>> {
        self.run_queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_timers(&self) -> MutexGuard<'_, BinaryHeap<TimerEntry>> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
