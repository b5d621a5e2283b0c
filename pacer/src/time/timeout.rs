use super::error::Elapsed;
use super::sleep::{Sleep, sleep};

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use pin_project_lite::pin_project;

/// Requires `future` to complete within `duration`.
///
/// If the deadline passes first, the wrapped future is dropped and
/// `Err(Elapsed)` is returned. This is the only way to bound a wait on one
/// of the [`sync`](crate::sync) primitives; none of them time out on their
/// own.
///
/// # Examples
///
/// ```rust,ignore
/// let queue = WaitQueue::<u32>::new(1);
///
/// // Nothing is ever pushed.
/// assert!(timeout(Duration::from_millis(10), queue.pop()).await.is_err());
/// ```
pub fn timeout<F>(duration: Duration, future: F) -> Timeout<F>
where
    F: Future,
{
    Timeout {
        future,
        sleep: sleep(duration),
    }
}

pin_project! {
    /// Future returned by [`timeout`].
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct Timeout<F> {
        #[pin]
        future: F,
        sleep: Sleep,
    }
}

impl<F> Future for Timeout<F>
where
    F: Future,
{
    type Output = Result<F::Output, Elapsed>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        if let Poll::Ready(output) = this.future.poll(cx) {
            return Poll::Ready(Ok(output));
        }

        match Pin::new(this.sleep).poll(cx) {
            Poll::Ready(()) => Poll::Ready(Err(Elapsed::new())),
            Poll::Pending => Poll::Pending,
        }
    }
}
