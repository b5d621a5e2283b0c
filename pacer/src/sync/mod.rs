//! Synchronization primitives.
//!
//! This module provides async-aware coordination tools built around one
//! broadcast condition variable:
//! - [`Condvar`]: wakes every current waiter on `signal`, keeps no history.
//! - [`WaitQueue`]: a bounded FIFO channel with backpressure.
//! - [`Semaphore`]: a counting semaphore with RAII permits.
//! - [`TaskQueue`]: runs async tasks with a bound on how many are in flight.
//!
//! ## Design notes
//!
//! - The primitives never spawn or block threads. A task that cannot make
//!   progress is suspended and woken by the operation that may unblock it.
//! - Every check of a predicate and the creation of the matching
//!   [`Wait`] future happen under the same mutex, and every mutation is
//!   followed by a `signal`, so no wake-up is lost even if the primitives
//!   are shared between threads.
//! - Wake-ups are broadcast: several waiters may race for one freed slot
//!   and the losers go back to sleep. No FIFO fairness is provided.
//! - There is no timeout or cancellation. Wrap a call in
//!   [`time::timeout`](crate::time::timeout) to bound it explicitly.

mod condvar;
mod error;
mod semaphore;
mod task_queue;
mod wait_queue;

pub use condvar::{Condvar, Wait};
pub use error::{Full, TryAcquireError, TryPopError};
pub use semaphore::{OwnedPermit, Permit, Semaphore};
pub use task_queue::TaskQueue;
pub use wait_queue::WaitQueue;
