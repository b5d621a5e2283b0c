use super::context::enter_context;
use super::scheduler::{Scheduler, SchedulerHandle};
use super::task::{self, JoinHandle};

use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, Wake, Waker};

use tracing::debug;

/// The main runtime handle.
///
/// `Runtime` is responsible for:
/// - spawning asynchronous tasks,
/// - driving them cooperatively on the thread that calls
///   [`block_on`](Self::block_on),
/// - firing timers registered by [`sleep`](crate::time::sleep).
///
/// Dropping the runtime discards every task that has not completed.
pub struct Runtime {
    scheduler: SchedulerHandle,
}

impl Runtime {
    /// Creates a new runtime instance.
    ///
    /// # Arguments
    ///
    /// * `event_interval` - Number of tasks polled between two checks of
    ///   timers and of the `block_on` future.
    pub(crate) fn new(event_interval: usize) -> Self {
        debug!(event_interval, "runtime started");

        Self {
            scheduler: Arc::new(Scheduler::new(event_interval)),
        }
    }

    /// Spawns a future onto the runtime.
    ///
    /// The task is queued immediately but only makes progress while some
    /// thread is inside [`block_on`](Self::block_on).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pacer::RuntimeBuilder;
    ///
    /// let runtime = RuntimeBuilder::new().build();
    /// let handle = runtime.spawn(async { 21 * 2 });
    ///
    /// assert_eq!(runtime.block_on(handle), 42);
    /// ```
    pub fn spawn<F, T>(&self, future: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        task::core::spawn_on(&self.scheduler, future)
    }

    /// Runs a future to completion on the current thread.
    ///
    /// Spawned tasks are polled in between polls of `future`. When neither
    /// `future` nor any task can make progress, the thread is parked until
    /// the next timer deadline or until something is woken.
    ///
    /// The future does not need to be `Send`: it never leaves the calling
    /// thread.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        enter_context(self.scheduler.clone(), || {
            let mut future = pin!(future);

            let signal = Arc::new(BlockOnSignal {
                woken: AtomicBool::new(true),
                scheduler: self.scheduler.clone(),
            });
            let waker = Waker::from(signal.clone());
            let mut cx = Context::from_waker(&waker);

            loop {
                if signal.woken.swap(false, Ordering::AcqRel)
                    && let Poll::Ready(output) = future.as_mut().poll(&mut cx)
                {
                    return output;
                }

                self.scheduler.fire_timers();

                if self.scheduler.tick() == 0 {
                    self.scheduler.park(&signal.woken);
                }
            }
        })
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        let pending = self.scheduler.shutdown();

        debug!(pending, "runtime shut down");
    }
}

/// Waker of the future driven by [`Runtime::block_on`].
///
/// That future is not a task: waking it only raises a flag and unparks the
/// driving thread, which polls it on its next loop iteration.
struct BlockOnSignal {
    woken: AtomicBool,
    scheduler: SchedulerHandle,
}

impl Wake for BlockOnSignal {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.woken.store(true, Ordering::Release);
        self.scheduler.unpark();
    }
}
