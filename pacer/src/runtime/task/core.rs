use super::JoinHandle;
use super::state::{COMPLETED, IDLE, NOTIFIED, QUEUED, RUNNING};
use crate::runtime::context;
use crate::runtime::scheduler::SchedulerHandle;

use std::cell::UnsafeCell;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, Wake, Waker};

use tracing::trace;

/// A runnable unit of work that can be executed by the scheduler.
///
/// The `Runnable` trait abstracts the specific return type of a task,
/// allowing the scheduler to manage a heterogeneous run queue through
/// `Arc<dyn Runnable>`.
pub(crate) trait Runnable: Send + Sync {
    /// Polls the task once.
    fn run(self: Arc<Self>);
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Where a finished task leaves its output for the [`JoinHandle`].
pub(crate) struct JoinSlot<T> {
    /// Output of the future, until the join handle takes it.
    pub(crate) output: Option<T>,

    /// Waker of the task awaiting the join handle, if any.
    pub(crate) waker: Option<Waker>,
}

/// A spawned asynchronous task managed by the runtime.
///
/// A `Task` owns a future and coordinates its lifecycle: execution state,
/// rescheduling on wake-up, and hand-off of the output to its
/// [`JoinHandle`].
pub(crate) struct Task<T> {
    /// The underlying future, dropped as soon as it completes.
    ///
    /// Only accessed while the task is `RUNNING`.
    future: UnsafeCell<Option<BoxFuture<T>>>,

    /// The current lifecycle state of the task (IDLE, RUNNING, etc.).
    pub(crate) state: AtomicUsize,

    /// Scheduler the task is re-queued on when woken.
    scheduler: SchedulerHandle,

    /// Output hand-off with the join handle.
    join: Mutex<JoinSlot<T>>,
}

// Safety: the future is only touched by the thread that moved the task into
// the RUNNING state, and every other field is synchronized.
unsafe impl<T: Send> Send for Task<T> {}
unsafe impl<T: Send> Sync for Task<T> {}

impl<T: Send + 'static> Task<T> {
    /// Creates a new task in the `QUEUED` state.
    ///
    /// The caller is responsible for pushing it into the run queue.
    fn new<F>(future: F, scheduler: SchedulerHandle) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            future: UnsafeCell::new(Some(Box::pin(future))),
            state: AtomicUsize::new(QUEUED),
            scheduler,
            join: Mutex::new(JoinSlot {
                output: None,
                waker: None,
            }),
        }
    }

    /// Polls the task once.
    ///
    /// - `Poll::Pending`: back to `IDLE`, or re-queued right away if the
    ///   task was woken while it was running.
    /// - `Poll::Ready`: the output is stored, the future dropped and the
    ///   join handle woken.
    fn poll(self: Arc<Self>) {
        // Exclusive access to the future starts here.
        if self
            .state
            .compare_exchange(QUEUED, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let waker = Waker::from(self.clone());
        let mut cx = Context::from_waker(&waker);

        // Safety: the RUNNING state guarantees nobody else touches the future.
        let slot = unsafe { &mut *self.future.get() };
        let Some(future) = slot.as_mut() else {
            return;
        };

        match future.as_mut().poll(&mut cx) {
            Poll::Pending => {
                if self
                    .state
                    .compare_exchange(RUNNING, IDLE, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    // Woken while running.
                    self.state.store(QUEUED, Ordering::Release);
                    self.scheduler.schedule(self.clone());
                }
            }
            Poll::Ready(output) => {
                *slot = None;

                let joiner = {
                    let mut join = self.lock_join();
                    join.output = Some(output);
                    self.state.store(COMPLETED, Ordering::Release);
                    join.waker.take()
                };

                if let Some(waker) = joiner {
                    waker.wake();
                }
            }
        }
    }
}

impl<T> Task<T> {
    pub(crate) fn lock_join(&self) -> MutexGuard<'_, JoinSlot<T>> {
        self.join.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.state.load(Ordering::Acquire) == COMPLETED
    }
}

impl<T: Send + 'static> Wake for Task<T> {
    /// Signals the task to be rescheduled.
    ///
    /// If the task is `IDLE`, it moves to `QUEUED` and is pushed to the run
    /// queue. If it is `RUNNING`, it moves to `NOTIFIED` so that it is
    /// re-queued as soon as the current poll returns.
    fn wake(self: Arc<Self>) {
        loop {
            match self.state.load(Ordering::Acquire) {
                IDLE => {
                    if self
                        .state
                        .compare_exchange(IDLE, QUEUED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        self.scheduler.schedule(self.clone());
                        return;
                    }
                }
                RUNNING => {
                    if self
                        .state
                        .compare_exchange(RUNNING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                _ => return,
            }
        }
    }
}

impl<T: Send + 'static> Runnable for Task<T> {
    fn run(self: Arc<Self>) {
        Task::poll(self)
    }
}

/// Creates a task for `future` and queues it on `scheduler`.
pub(crate) fn spawn_on<F, T>(scheduler: &SchedulerHandle, future: F) -> JoinHandle<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let task = Arc::new(Task::new(future, scheduler.clone()));
    scheduler.schedule(task.clone());

    trace!("task spawned");

    JoinHandle { task }
}

/// Spawns a future as a task onto the current runtime.
///
/// The task starts running the next time the scheduler gets control, in
/// spawn order relative to other runnable tasks. The returned
/// [`JoinHandle`] resolves to the future's output.
///
/// # Panics
///
/// Panics if called outside the context of a running runtime.
pub fn spawn<F, T>(future: F) -> JoinHandle<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let scheduler =
        context::current().expect("spawn must be called within the context of a runtime");

    spawn_on(&scheduler, future)
}
