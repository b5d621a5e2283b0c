use super::Condvar;
use super::error::TryAcquireError;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

/// An asynchronous counting semaphore.
///
/// A semaphore limits how many holders may use a resource at once. Each
/// holder owns a permit; dropping the permit gives it back and wakes the
/// tasks waiting in [`acquire`](Self::acquire), which race for it.
///
/// The semaphore is not fair: a released permit goes to whichever waiter
/// re-checks first.
pub struct Semaphore {
    permits: Mutex<usize>,

    /// Signaled every time a permit is released.
    released: Condvar,
}

impl Semaphore {
    /// Creates a semaphore with `permits` initially available permits.
    pub fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            released: Condvar::new(),
        }
    }

    /// Number of permits that can be acquired right now.
    pub fn available_permits(&self) -> usize {
        *self.lock()
    }

    /// Acquires a permit, waiting until one is released if none is left.
    pub async fn acquire(&self) -> Permit<'_> {
        self.acquire_raw().await;

        Permit { semaphore: self }
    }

    /// Acquires a permit that keeps the semaphore alive, so it can be moved
    /// into a spawned task.
    pub async fn acquire_owned(self: Arc<Self>) -> OwnedPermit {
        self.acquire_raw().await;

        OwnedPermit { semaphore: self }
    }

    /// Acquires a permit if one is available, without waiting.
    pub fn try_acquire(&self) -> Result<Permit<'_>, TryAcquireError> {
        let mut permits = self.lock();

        if *permits == 0 {
            return Err(TryAcquireError::NoPermits);
        }

        *permits -= 1;
        Ok(Permit { semaphore: self })
    }

    async fn acquire_raw(&self) {
        loop {
            let wait = {
                let mut permits = self.lock();

                if *permits > 0 {
                    *permits -= 1;
                    return;
                }

                trace!("semaphore exhausted, waiting for a release");
                self.released.wait()
            };

            wait.await;
        }
    }

    fn release(&self) {
        *self.lock() += 1;
        self.released.signal();
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.permits.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Semaphore")
            .field("available_permits", &self.available_permits())
            .finish()
    }
}

/// A permit borrowed from a [`Semaphore`]. Released on drop.
#[must_use = "the permit is released as soon as it is dropped"]
pub struct Permit<'a> {
    semaphore: &'a Semaphore,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.semaphore.release();
    }
}

impl fmt::Debug for Permit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Permit").finish_non_exhaustive()
    }
}

/// A permit from a shared [`Semaphore`]. Released on drop.
#[must_use = "the permit is released as soon as it is dropped"]
pub struct OwnedPermit {
    semaphore: Arc<Semaphore>,
}

impl Drop for OwnedPermit {
    fn drop(&mut self) {
        self.semaphore.release();
    }
}

impl fmt::Debug for OwnedPermit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedPermit").finish_non_exhaustive()
    }
}
