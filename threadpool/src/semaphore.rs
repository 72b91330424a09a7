use parking_lot::{Condvar, Mutex};

/// A counting semaphore.
///
/// Permits released before anyone waits are kept, so a release can never be lost. The
/// mutex hand-off between `release` and `acquire` also orders every write made before
/// the release ahead of every read made after the matching acquire.
#[derive(Debug, Default)]
pub struct Semaphore {
    permits: Mutex<usize>,
    available: Condvar,
}

impl Semaphore {
    /// Creates a new `Semaphore`.
    ///
    /// # Arguments
    /// * `permits` - The amount of permits initially available.
    ///
    /// # Returns
    /// A new `Semaphore` instance.
    pub fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    /// Makes `n` more permits available and wakes up the waiters.
    ///
    /// # Arguments
    /// * `n` - The amount of permits to release.
    pub fn release(&self, n: usize) {
        if n == 0 {
            return;
        }

        *self.permits.lock() += n;

        // Waiters may be asking for different amounts, waking only one of them could
        // leave a satisfiable waiter asleep.
        self.available.notify_all();
    }

    /// Blocks until a permit is available and takes it.
    pub fn acquire(&self) {
        self.acquire_many(1);
    }

    /// Blocks until `n` permits are available and takes all of them at once.
    ///
    /// # Arguments
    /// * `n` - The amount of permits to take.
    pub fn acquire_many(&self, n: usize) {
        let mut permits = self.permits.lock();

        while *permits < n {
            self.available.wait(&mut permits);
        }

        *permits -= n;
    }

    #[cfg(test)]
    fn available(&self) -> usize {
        *self.permits.lock()
    }
}
