use std::fmt;
use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, Waker};

use tracing::trace;

/// An asynchronous, broadcast-only condition variable.
///
/// Tasks call [`wait`](Self::wait) to obtain a future that resolves on the
/// next [`signal`](Self::signal). A single `signal` wakes **every** wait
/// created since the previous signal. A `signal` issued while nobody is
/// waiting is lost: it is not remembered for later waits.
///
/// Wake-ups carry no information. Callers re-check their predicate in a
/// loop after every wake-up, and must create the `Wait` future while still
/// holding the lock that protects that predicate:
///
/// ```rust,ignore
/// loop {
///     let wait = {
///         let state = self.state.lock().unwrap();
///         if state.is_ready() {
///             break;
///         }
///         self.changed.wait()
///     };
///     wait.await;
/// }
/// ```
///
/// Internally the condition variable keeps a generation number. `wait`
/// captures the current generation and `signal` bumps it, so every wait
/// created before a signal observes it, even if the wait had not been
/// polled yet when the signal happened.
pub struct Condvar {
    state: Mutex<State>,
}

struct State {
    /// Bumped by every `signal`.
    generation: u64,

    /// Tasks suspended on the current generation, keyed by wait.
    waiters: Vec<(u64, Waker)>,

    /// Key handed to the next wait that registers.
    next_key: u64,
}

impl Condvar {
    /// Creates a condition variable with no pending wait.
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(State {
                generation: 0,
                waiters: Vec::new(),
                next_key: 0,
            }),
        }
    }

    /// Returns a future that resolves on the next call to
    /// [`signal`](Self::signal).
    ///
    /// The future never resolves on its own: there is no timeout.
    pub fn wait(&self) -> Wait<'_> {
        Wait {
            condvar: self,
            generation: self.lock().generation,
            key: None,
        }
    }

    /// Wakes every task waiting on this condition variable.
    ///
    /// Does nothing observable if no wait is outstanding.
    pub fn signal(&self) {
        let waiters = {
            let mut state = self.lock();
            state.generation = state.generation.wrapping_add(1);
            mem::take(&mut state.waiters)
        };

        if !waiters.is_empty() {
            trace!(woken = waiters.len(), "condvar signaled");
        }

        for (_, waker) in waiters {
            waker.wake();
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Condvar {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Condvar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();

        f.debug_struct("Condvar")
            .field("generation", &state.generation)
            .field("waiters", &state.waiters.len())
            .finish()
    }
}

/// Future returned by [`Condvar::wait`].
///
/// Resolves once the condition variable has been signaled after this
/// future was created. Dropping it before completion removes its waker, so
/// abandoned waits do not pile up on a condition variable that is never
/// signaled.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Wait<'a> {
    condvar: &'a Condvar,

    /// Generation observed when the wait was created.
    generation: u64,

    /// Key of the registered waker, once polled.
    key: Option<u64>,
}

impl Future for Wait<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        let mut state = this.condvar.lock();

        if state.generation != this.generation {
            return Poll::Ready(());
        }

        let registered = match this.key {
            Some(key) => state.waiters.iter_mut().find(|(k, _)| *k == key),
            None => None,
        };

        match registered {
            Some((_, waker)) => {
                if !waker.will_wake(cx.waker()) {
                    *waker = cx.waker().clone();
                }
            }
            None => {
                let key = state.next_key;
                state.next_key = state.next_key.wrapping_add(1);
                state.waiters.push((key, cx.waker().clone()));
                this.key = Some(key);
            }
        }

        Poll::Pending
    }
}

impl Drop for Wait<'_> {
    fn drop(&mut self) {
        let Some(key) = self.key else {
            return;
        };

        let mut state = self.condvar.lock();

        // A signal already drained the list.
        if state.generation == self.generation {
            state.waiters.retain(|(k, _)| *k != key);
        }
    }
}
