use crate::runtime::task::Task;

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// A handle to a spawned task.
///
/// A `JoinHandle` allows awaiting the result of a task spawned onto the
/// runtime. It implements [`Future`] and resolves once the task has
/// completed.
///
/// Dropping the `JoinHandle` does **not** cancel the task; it only
/// discards the ability to observe its result.
pub struct JoinHandle<T> {
    /// Shared reference to the underlying task.
    pub(crate) task: Arc<Task<T>>,
}

impl<T> JoinHandle<T> {
    /// Returns `true` once the task has produced its output.
    pub fn is_finished(&self) -> bool {
        self.task.is_completed()
    }
}

impl<T> Future for JoinHandle<T> {
    type Output = T;

    /// Resolves to the task output, or registers the current waker.
    ///
    /// The check and the registration happen under the same lock as the
    /// output hand-off, so a completion cannot slip in between.
    ///
    /// # Panics
    ///
    /// Panics if polled again after it returned `Poll::Ready`.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut join = self.task.lock_join();

        if let Some(output) = join.output.take() {
            return Poll::Ready(output);
        }

        assert!(
            !self.task.is_completed(),
            "JoinHandle polled after completion"
        );

        join.waker = Some(cx.waker().clone());

        Poll::Pending
    }
}

impl<T> fmt::Debug for JoinHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinHandle")
            .field("finished", &self.is_finished())
            .finish()
    }
}
