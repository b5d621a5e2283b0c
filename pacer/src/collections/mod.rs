//! Plain data structures used by the rest of the toolkit.
//!
//! - [`Queue`]: a FIFO built from two stacks, with amortized O(1)
//!   push/pop and O(1) random access from the logical front.
//!
//! Nothing in this module is concurrency-aware. The blocking types in
//! [`sync`](crate::sync) wrap these structures behind a mutex.

mod queue;

pub use queue::{IntoIter, Iter, Queue};
