use super::Runtime;

/// Default number of tasks polled between two checks of the timers and of
/// the `block_on` future.
const DEFAULT_EVENT_INTERVAL: usize = 61;

/// Builder for configuring and creating a runtime.
///
/// # Examples
///
/// ```rust
/// use pacer::RuntimeBuilder;
///
/// let runtime = RuntimeBuilder::new()
///     .event_interval(16)
///     .build();
///
/// assert_eq!(runtime.block_on(async { 1 + 1 }), 2);
/// ```
pub struct RuntimeBuilder {
    /// Number of tasks polled before timers are fired again.
    event_interval: usize,
}

impl RuntimeBuilder {
    /// Creates a new `RuntimeBuilder` with default configuration.
    pub fn new() -> Self {
        Self {
            event_interval: DEFAULT_EVENT_INTERVAL,
        }
    }

    /// Sets how many spawned tasks are polled before the scheduler looks at
    /// expired timers and at the future passed to `block_on` again.
    ///
    /// Lower values make timers and the main future more responsive at the
    /// cost of more bookkeeping per task.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn event_interval(mut self, n: usize) -> Self {
        assert!(n > 0, "event_interval must be > 0");

        self.event_interval = n;
        self
    }

    /// Builds the runtime with the configured options.
    pub fn build(self) -> Runtime {
        Runtime::new(self.event_interval)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
