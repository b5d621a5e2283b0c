use std::fmt;

use thiserror::Error;

/// Error returned by [`WaitQueue::try_push`](super::WaitQueue::try_push)
/// when the queue has no free slot.
///
/// The rejected value is handed back.
#[derive(PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be pushed.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Full(..)")
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("wait queue is full")
    }
}

impl<T> std::error::Error for Full<T> {}

/// Error returned by [`WaitQueue::try_pop`](super::WaitQueue::try_pop).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TryPopError {
    #[error("wait queue is empty")]
    Empty,
}

/// Error returned by [`Semaphore::try_acquire`](super::Semaphore::try_acquire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TryAcquireError {
    #[error("no permits available")]
    NoPermits,
}
