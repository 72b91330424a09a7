//! Fixed-size, lock-step worker pools.
//!
//! A `CoordinatedPool` repeatedly runs one callback on a fixed set of threads, each
//! thread bound to a single argument for its whole life. The controlling thread drives
//! the pool one iteration at a time through `trigger` / `sync`, and the callbacks order
//! their inner phases with a shared `RendezvousBarrier`. Partial results are reduced
//! into an `AtomicF64`.

mod barrier;
mod pool;
mod semaphore;

pub use atomic_float::AtomicF64;
pub use barrier::RendezvousBarrier;
pub use pool::CoordinatedPool;
pub use semaphore::Semaphore;
