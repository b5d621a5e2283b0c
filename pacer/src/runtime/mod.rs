//! Core runtime components.
//!
//! This module contains the single-threaded cooperative scheduler that
//! drives every future in the crate.
//!
//! It is responsible for:
//! - executing spawned tasks in FIFO order on the thread calling
//!   [`Runtime::block_on`],
//! - keeping track of pending timers and parking the thread until the next
//!   deadline when nothing is runnable,
//! - providing the runtime context used by [`task::spawn`] and
//!   [`time::sleep`](crate::time::sleep),
//! - enabling cooperative multitasking via yielding.
//!
//! There is no background thread: suspended tasks only resume when the
//! owner of the runtime is inside `block_on`.

mod core;
pub(crate) mod scheduler;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod timer;
pub(crate) mod yield_now;

pub mod task;

pub use self::core::Runtime;
