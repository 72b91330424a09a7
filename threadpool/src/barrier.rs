use std::{num::NonZeroUsize, sync::Barrier};

/// A reusable rendezvous point for a fixed amount of threads.
///
/// Every call to `arrive_and_wait` blocks until all the parties of the current
/// generation have arrived, then the barrier is ready for the next one. The same
/// barrier can separate any amount of phases inside an iteration and across them.
#[derive(Debug)]
pub struct RendezvousBarrier {
    inner: Barrier,
}

impl RendezvousBarrier {
    /// Creates a new `RendezvousBarrier`.
    ///
    /// # Arguments
    /// * `parties` - The amount of threads that must arrive before any is released.
    ///
    /// # Returns
    /// A new `RendezvousBarrier` instance.
    pub fn new(parties: NonZeroUsize) -> Self {
        Self {
            inner: Barrier::new(parties.get()),
        }
    }

    /// Blocks until every party of the current generation has arrived.
    ///
    /// # Returns
    /// Whether this thread is the generation's leader, exactly one party is.
    pub fn arrive_and_wait(&self) -> bool {
        self.inner.wait().is_leader()
    }
}
