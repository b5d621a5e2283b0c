use crate::runtime::scheduler::SchedulerHandle;

use std::cell::RefCell;

thread_local! {
    /// Thread-local handle to the scheduler currently driving this thread.
    ///
    /// This is set while a runtime is inside `block_on` and allows
    /// runtime components (spawning, timers) to reach the scheduler
    /// without explicit parameter passing.
    static CURRENT_SCHEDULER: RefCell<Option<SchedulerHandle>> =
        const { RefCell::new(None) };
}

/// Restores the previously installed scheduler when dropped, including
/// when the closure passed to [`enter_context`] unwinds.
struct ContextGuard {
    previous: Option<SchedulerHandle>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_SCHEDULER.with(|cell| cell.replace(previous));
    }
}

/// Enters the runtime execution context for the current thread.
///
/// The scheduler stays installed for the duration of the closure `f`.
/// Afterwards, the previous context (if any) is restored.
pub(crate) fn enter_context<R>(scheduler: SchedulerHandle, f: impl FnOnce() -> R) -> R {
    let previous = CURRENT_SCHEDULER.with(|cell| cell.replace(Some(scheduler)));
    let _guard = ContextGuard { previous };

    f()
}

/// Returns the scheduler installed on this thread, if any.
pub(crate) fn current() -> Option<SchedulerHandle> {
    CURRENT_SCHEDULER.with(|cell| cell.borrow().clone())
}
