/// Task is idle and not scheduled.
///
/// The task is suspended on some other future and waits for its waker.
pub(crate) const IDLE: usize = 0;

/// Task is queued for execution in the scheduler run queue.
pub(crate) const QUEUED: usize = 1;

/// Task is currently being polled.
///
/// Only the scheduler thread may observe a task in this state.
pub(crate) const RUNNING: usize = 2;

/// Task has completed execution.
///
/// The future has returned `Poll::Ready` and has been dropped.
pub(crate) const COMPLETED: usize = 3;

/// Task has been woken while it was being polled.
///
/// It is re-queued as soon as the current poll returns.
pub(crate) const NOTIFIED: usize = 4;
