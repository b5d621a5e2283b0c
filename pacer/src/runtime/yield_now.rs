use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A future that yields execution back to the scheduler exactly once.
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    /// On the first poll the task re-schedules itself at the back of the
    /// run queue and returns `Poll::Pending`. The second poll completes.
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.yielded {
            return Poll::Ready(());
        }

        self.yielded = true;
        cx.waker().wake_by_ref();

        Poll::Pending
    }
}

/// Yields execution back to the scheduler.
///
/// Every task that was already runnable gets polled before the current
/// task continues. Tests use it to let spawned tasks reach their next
/// suspension point.
///
/// # Examples
///
/// ```rust,ignore
/// let handle = task::spawn(async { queue.push(3).await });
/// yield_now().await;
/// assert_eq!(queue.len(), 2); // the push is still suspended
/// ```
pub async fn yield_now() {
    YieldNow { yielded: false }.await
}
