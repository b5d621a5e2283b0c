//! # Pacer
//!
//! **Pacer** is a small cooperative concurrency toolkit for Rust. It gives
//! async code the few coordination tools needed to bound resource usage:
//!
//! - [`collections::Queue`]: a FIFO with amortized O(1) push/pop and O(1)
//!   random access, built from two stacks,
//! - [`sync::Condvar`]: a broadcast condition variable without history,
//! - [`sync::WaitQueue`]: a bounded FIFO channel with backpressure,
//! - [`sync::Semaphore`]: a counting semaphore with RAII permits,
//! - [`sync::TaskQueue`]: runs async tasks with at most N in flight,
//! - [`task::map_async_pool`]: maps an async function over a collection
//!   with bounded parallelism.
//!
//! The toolkit ships with the scheduler it is designed for: a
//! current-thread runtime that multiplexes many suspended tasks on one
//! thread, with timers and cooperative yielding. Suspension only happens at
//! `.await` points and resumption only happens when another operation on
//! the same primitive signals it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pacer::sync::WaitQueue;
//! use pacer::task;
//! use std::sync::Arc;
//!
//! #[pacer::main]
//! async fn main() {
//!     let queue = Arc::new(WaitQueue::new(2));
//!
//!     let producer = {
//!         let queue = queue.clone();
//!         task::spawn(async move {
//!             for i in 0..10 {
//!                 // Suspends while two values are already buffered.
//!                 queue.push(i).await;
//!             }
//!         })
//!     };
//!
//!     for _ in 0..10 {
//!         println!("got {}", queue.pop().await);
//!     }
//!
//!     producer.await;
//! }
//! ```
//!
//! ## Modules
//!
//! - [`collections`]: Plain data structures
//! - [`sync`]: Condition variable, wait queue, semaphore, task queue
//! - [`task`]: Spawning, join handles, pooled async map
//! - [`time`]: Sleep and timeout

mod runtime;

pub mod collections;
pub mod sync;
pub mod time;

pub use runtime::Runtime;
pub use runtime::builder::RuntimeBuilder;
pub use runtime::task;
pub use runtime::yield_now::yield_now;

pub use pacer_macros::*;
