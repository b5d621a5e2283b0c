use super::Condvar;
use super::error::{Full, TryPopError};
use crate::collections::Queue;

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A bounded FIFO channel with cooperative backpressure.
///
/// Producers calling [`push`](Self::push) are suspended while the queue
/// holds `capacity` elements; consumers calling [`pop`](Self::pop) are
/// suspended while it is empty. Every successful push wakes the suspended
/// consumers and every successful pop wakes the suspended producers. Woken
/// callers re-check the queue and go back to sleep if another caller got
/// there first.
///
/// A capacity of `0` turns the queue into a rendezvous channel: a push
/// completes only once a consumer has taken its value.
///
/// Waiters are not served in FIFO order.
///
/// # Examples
///
/// ```rust
/// use pacer::sync::WaitQueue;
/// use pacer::task;
/// use std::sync::Arc;
///
/// let runtime = pacer::RuntimeBuilder::new().build();
///
/// runtime.block_on(async {
///     let queue = Arc::new(WaitQueue::new(1));
///
///     let producer = {
///         let queue = queue.clone();
///         task::spawn(async move {
///             for i in 0..3 {
///                 queue.push(i).await;
///             }
///         })
///     };
///
///     assert_eq!(queue.pop().await, 0);
///     assert_eq!(queue.pop().await, 1);
///     assert_eq!(queue.pop().await, 2);
///     producer.await;
/// });
/// ```
pub struct WaitQueue<T> {
    state: Mutex<State<T>>,

    /// Maximum number of buffered elements. `usize::MAX` when unbounded.
    capacity: usize,

    /// Signaled after every pop.
    not_full: Condvar,

    /// Signaled after every push.
    not_empty: Condvar,
}

struct State<T> {
    items: Queue<T>,

    /// Total number of values ever admitted.
    pushed: u64,

    /// Total number of values ever taken.
    popped: u64,
}

impl<T> WaitQueue<T> {
    /// Creates a queue holding at most `capacity` elements.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(State {
                items: Queue::new(),
                pushed: 0,
                popped: 0,
            }),
            capacity,
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        }
    }

    /// Creates a queue without capacity bound: pushes never suspend.
    pub fn unbounded() -> Self {
        Self::new(usize::MAX)
    }

    /// Appends `value`, waiting for a free slot if the queue is full.
    ///
    /// With a capacity of `0`, also waits until a consumer has taken the
    /// value.
    pub async fn push(&self, value: T) {
        let ticket = loop {
            let wait = {
                let mut state = self.lock();

                if state.items.len() < self.slots() {
                    state.items.push(value);
                    state.pushed += 1;
                    let ticket = state.pushed;
                    drop(state);

                    self.not_empty.signal();
                    break ticket;
                }

                self.not_full.wait()
            };

            wait.await;
        };

        if self.capacity == 0 {
            self.handed_off(ticket).await;
        }
    }

    /// Removes the front element, waiting for one if the queue is empty.
    pub async fn pop(&self) -> T {
        loop {
            let wait = {
                let mut state = self.lock();

                if let Some(value) = state.items.pop() {
                    state.popped += 1;
                    drop(state);

                    self.not_full.signal();
                    return value;
                }

                self.not_empty.wait()
            };

            wait.await;
        }
    }

    /// Appends `value` if a slot is free, without waiting.
    ///
    /// A rendezvous queue (capacity `0`) has no slot to offer and always
    /// returns the value back.
    pub fn try_push(&self, value: T) -> Result<(), Full<T>> {
        {
            let mut state = self.lock();

            if state.items.len() >= self.capacity {
                return Err(Full(value));
            }

            state.items.push(value);
            state.pushed += 1;
        }

        self.not_empty.signal();
        Ok(())
    }

    /// Removes the front element if there is one, without waiting.
    pub fn try_pop(&self) -> Result<T, TryPopError> {
        let value = {
            let mut state = self.lock();
            let value = state.items.pop().ok_or(TryPopError::Empty)?;
            state.popped += 1;
            value
        };

        self.not_full.signal();
        Ok(value)
    }

    /// Number of buffered elements.
    ///
    /// Never more than [`capacity`](Self::capacity), except for a
    /// rendezvous queue: a value being handed over occupies its single slot,
    /// so `len` may be `1` while `capacity` is `0`.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Returns `true` if no element is buffered.
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Maximum number of buffered elements; `usize::MAX` when unbounded.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots producers may fill before waiting. A rendezvous
    /// queue still needs one slot to hand a value over.
    fn slots(&self) -> usize {
        self.capacity.max(1)
    }

    /// Waits until the value admitted as `ticket` has been popped.
    async fn handed_off(&self, ticket: u64) {
        loop {
            let wait = {
                let state = self.lock();

                if state.popped >= ticket {
                    return;
                }

                self.not_full.wait()
            };

            wait.await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for WaitQueue<T> {
    /// Returns an unbounded queue.
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T> fmt::Debug for WaitQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitQueue")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
