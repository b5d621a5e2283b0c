//! Time related errors.

use thiserror::Error;

/// Error returned by [`timeout`](super::timeout) when the deadline passes
/// before the wrapped future completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline has elapsed")]
pub struct Elapsed(());

impl Elapsed {
    pub(crate) fn new() -> Self {
        Self(())
    }
}
