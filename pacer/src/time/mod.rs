//! Time utilities.
//!
//! This module provides timers backed by the runtime scheduler:
//! - [`sleep`] completes once a duration has elapsed,
//! - [`timeout`] bounds how long a future may take.
//!
//! Both must be polled from within a runtime.

pub mod error;

mod sleep;
mod timeout;

#[doc(inline)]
pub use sleep::{Sleep, sleep};

#[doc(inline)]
pub use timeout::{Timeout, timeout};
