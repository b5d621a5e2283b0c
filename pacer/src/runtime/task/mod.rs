//! Asynchronous task primitives.
//!
//! This module defines the abstractions used by the runtime to represent,
//! schedule and execute asynchronous tasks, and the helpers built on top of
//! them:
//! - [`spawn`] and [`JoinHandle`] for running futures concurrently,
//! - [`join_all`] to collect many handles in order,
//! - [`map_async_pool`] to map an async function over a collection with
//!   bounded parallelism.

pub(crate) mod handle;
pub(crate) mod state;

mod join;
mod pool;

pub(crate) use self::core::{Runnable, Task};

pub mod core;

pub use self::core::spawn;
pub use handle::JoinHandle;
pub use join::join_all;
pub use pool::map_async_pool;
