use crate::runtime::context;
use crate::runtime::timer::{TimerEntry, TimerShared};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Creates a future that completes after the given duration.
///
/// # Panics
///
/// The returned future panics if polled outside of a running runtime.
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
///
/// sleep(Duration::from_millis(10)).await;
/// ```
pub fn sleep(duration: Duration) -> Sleep {
    Sleep::new(duration)
}

/// Deadline used when `now + duration` does not fit in an `Instant`.
///
/// About thirty years ahead, which is as good as never for a sleep.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// A future that completes once a specific deadline is reached.
///
/// `Sleep` registers a timer with the current scheduler on first poll.
/// Later polls only update the waker of that timer. The timer is cancelled
/// if the future is dropped before completion.
pub struct Sleep {
    /// Absolute point in time when the sleep completes.
    deadline: Instant,

    /// Timer registered on first poll.
    timer: Option<Arc<TimerShared>>,
}

impl Sleep {
    pub(crate) fn new(duration: Duration) -> Self {
        let now = Instant::now();

        Self {
            deadline: now
                .checked_add(duration)
                .unwrap_or_else(|| now + FAR_FUTURE),
            timer: None,
        }
    }

    /// Point in time at which the sleep completes.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Returns `true` once the deadline has passed.
    pub fn is_elapsed(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

impl Future for Sleep {
    type Output = ();

    /// Completes once the deadline has passed; otherwise makes sure the
    /// timer will wake the task that polled last.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if this.is_elapsed() {
            return Poll::Ready(());
        }

        match &this.timer {
            Some(timer) => timer.set_waker(cx.waker()),
            None => {
                let scheduler = context::current().expect("Sleep polled outside of runtime");
                let timer = Arc::new(TimerShared::new(cx.waker()));

                scheduler.register_timer(TimerEntry {
                    deadline: this.deadline,
                    shared: timer.clone(),
                });
                this.timer = Some(timer);
            }
        }

        Poll::Pending
    }
}

impl Drop for Sleep {
    /// Cancels the timer so that no spurious wake-up happens after the
    /// future has been abandoned.
    fn drop(&mut self) {
        if let Some(timer) = &self.timer {
            timer.cancel();
        }
    }
}
