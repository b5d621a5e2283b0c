use super::Condvar;

use std::fmt;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

/// Runs async tasks with a bound on how many are in flight at once.
///
/// [`push`](Self::push) waits until fewer than `max_inflight` tasks are
/// running, then builds the task from its factory and drives it to
/// completion. The slot is released when the task settles, whatever its
/// outcome, or when the `push` future is dropped.
///
/// Waiting submissions are all woken when a slot frees up and race for it;
/// the order in which they are admitted is unspecified.
///
/// # Examples
///
/// ```rust
/// use pacer::sync::TaskQueue;
///
/// let runtime = pacer::RuntimeBuilder::new().build();
/// let queue = TaskQueue::new(2);
///
/// let result = runtime.block_on(queue.push(|| async { Err::<u32, &str>("boom") }));
///
/// assert_eq!(result, Err("boom"));
/// assert_eq!(queue.num_inflight(), 0);
/// ```
pub struct TaskQueue {
    counters: Mutex<Counters>,
    max_inflight: usize,

    /// Signaled every time a task leaves its slot.
    slot_freed: Condvar,
}

struct Counters {
    /// Tasks admitted and not settled yet.
    inflight: usize,

    /// Submissions currently suspended waiting for a slot.
    waiting: usize,
}

impl TaskQueue {
    /// Creates a queue running at most `max_inflight` tasks at once.
    ///
    /// # Panics
    ///
    /// Panics if `max_inflight == 0`.
    pub fn new(max_inflight: usize) -> Self {
        assert!(max_inflight > 0, "max_inflight must be > 0");

        Self {
            counters: Mutex::new(Counters {
                inflight: 0,
                waiting: 0,
            }),
            max_inflight,
            slot_freed: Condvar::new(),
        }
    }

    /// Waits for a free slot, then runs the task built by `factory` and
    /// returns its output unchanged, errors included.
    ///
    /// `factory` is only called once the task has been admitted.
    pub async fn push<F, Fut>(&self, factory: F) -> Fut::Output
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        self.admit().await;
        let _slot = InflightSlot { queue: self };

        factory().await
    }

    /// Number of tasks currently running.
    pub fn num_inflight(&self) -> usize {
        self.lock().inflight
    }

    /// Number of submissions waiting for a slot.
    pub fn num_waiting(&self) -> usize {
        self.lock().waiting
    }

    /// Maximum number of tasks running at once.
    pub fn max_inflight(&self) -> usize {
        self.max_inflight
    }

    async fn admit(&self) {
        loop {
            let wait = {
                let mut counters = self.lock();

                if counters.inflight < self.max_inflight {
                    counters.inflight += 1;
                    trace!(inflight = counters.inflight, "task admitted");
                    return;
                }

                counters.waiting += 1;
                self.slot_freed.wait()
            };

            let _waiting = WaitingSlot { queue: self };
            wait.await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Counters> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counters = self.lock();

        f.debug_struct("TaskQueue")
            .field("inflight", &counters.inflight)
            .field("waiting", &counters.waiting)
            .field("max_inflight", &self.max_inflight)
            .finish()
    }
}

/// Held while a task runs. Frees the slot and wakes waiting submissions.
struct InflightSlot<'a> {
    queue: &'a TaskQueue,
}

impl Drop for InflightSlot<'_> {
    fn drop(&mut self) {
        let inflight = {
            let mut counters = self.queue.lock();
            counters.inflight -= 1;
            counters.inflight
        };

        trace!(inflight, "task settled");
        self.queue.slot_freed.signal();
    }
}

/// Held while a submission is suspended in `admit`.
struct WaitingSlot<'a> {
    queue: &'a TaskQueue,
}

impl Drop for WaitingSlot<'_> {
    fn drop(&mut self) {
        self.queue.lock().waiting -= 1;
    }
}
