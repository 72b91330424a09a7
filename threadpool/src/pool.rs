use std::{
    io,
    panic::{self, AssertUnwindSafe},
    process,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
};

use log::{debug, error, trace, warn};

use crate::Semaphore;

/// The signals shared between the controlling thread and the workers of a pool.
#[derive(Debug, Default)]
struct Signals {
    start: Semaphore,
    finish: Semaphore,
    stop: AtomicBool,
}

/// Repeatedly runs one callback, in lock-step, on a fixed set of threads.
///
/// Each worker is bound at construction to one argument and calls the callback with
/// it once per iteration. A single controlling thread starts iterations with
/// `trigger` and waits for them with `sync`; the workers never run on their own.
///
/// Triggers may be queued: every `trigger` releases one start permit per worker and
/// `sync` waits for the completions of every outstanding iteration. A queued release
/// can be taken by any worker, so "every argument exactly once per iteration" only
/// holds under queuing when the callback rendezvouses at a barrier sized `size()`.
///
/// Dropping the pool waits for the outstanding iterations, asks the workers to stop,
/// wakes them up one last time so they can notice it and joins them.
#[derive(Debug)]
pub struct CoordinatedPool {
    name: String,
    workers: Vec<JoinHandle<()>>,
    signals: Arc<Signals>,
    outstanding: usize,
}

impl CoordinatedPool {
    /// Creates a new `CoordinatedPool` with the default thread name prefix.
    ///
    /// # Arguments
    /// * `callback` - The function every worker runs once per iteration.
    /// * `args` - One argument per worker, the amount of workers is its length.
    ///
    /// # Returns
    /// A new `CoordinatedPool` instance or an io error if a thread couldn't be spawned.
    pub fn new<A, I, F>(callback: F, args: I) -> io::Result<Self>
    where
        A: Send + 'static,
        I: IntoIterator<Item = A>,
        F: Fn(&A) + Send + Sync + 'static,
    {
        Self::named("pool", callback, args)
    }

    /// Creates a new `CoordinatedPool`.
    ///
    /// # Arguments
    /// * `name` - The prefix of the worker thread names, each one is `{name}-{index}`.
    /// * `callback` - The function every worker runs once per iteration.
    /// * `args` - One argument per worker, the amount of workers is its length.
    ///
    /// # Returns
    /// A new `CoordinatedPool` instance or an io error if a thread couldn't be spawned.
    /// The workers spawned before the failure are shut down before returning.
    pub fn named<A, I, F>(name: &str, callback: F, args: I) -> io::Result<Self>
    where
        A: Send + 'static,
        I: IntoIterator<Item = A>,
        F: Fn(&A) + Send + Sync + 'static,
    {
        let callback = Arc::new(callback);
        let mut pool = Self {
            name: name.to_string(),
            workers: Vec::new(),
            signals: Arc::new(Signals::default()),
            outstanding: 0,
        };

        for (idx, arg) in args.into_iter().enumerate() {
            let signals = Arc::clone(&pool.signals);
            let callback = Arc::clone(&callback);

            let handle = thread::Builder::new()
                .name(format!("{name}-{idx}"))
                .spawn(move || work(idx, &signals, &*callback, arg))?;

            pool.workers.push(handle);
        }

        debug!(pool = name, workers = pool.size(); "spawned coordinated pool");
        Ok(pool)
    }

    /// Returns the amount of workers in the pool.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Returns whether every triggered iteration has been waited for.
    pub fn is_synced(&self) -> bool {
        self.outstanding == 0
    }

    /// Launches an iteration without waiting for it.
    pub fn trigger(&mut self) {
        self.signals.start.release(self.workers.len());
        self.outstanding += 1;
        trace!(pool = self.name.as_str(), outstanding = self.outstanding; "triggered iteration");
    }

    /// Blocks until every worker finished every triggered iteration.
    ///
    /// Returns immediately if there's nothing to wait for.
    pub fn sync(&mut self) {
        if self.outstanding == 0 {
            return;
        }

        self.signals
            .finish
            .acquire_many(self.workers.len() * self.outstanding);

        trace!(pool = self.name.as_str(), iterations = self.outstanding; "synced");
        self.outstanding = 0;
    }

    /// Launches an iteration and waits for it to complete.
    pub fn trigger_sync(&mut self) {
        self.trigger();
        self.sync();
    }
}

impl Drop for CoordinatedPool {
    fn drop(&mut self) {
        self.sync();

        self.signals.stop.store(true, Ordering::Release);
        self.signals.start.release(self.workers.len());

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!(pool = self.name.as_str(); "worker thread terminated abnormally");
            }
        }

        debug!(pool = self.name.as_str(); "coordinated pool shut down");
    }
}

/// The body of every worker thread.
///
/// # Arguments
/// * `idx` - The position of the worker in the pool.
/// * `signals` - The pool's shared signals.
/// * `callback` - The function to run once per iteration.
/// * `arg` - The argument this worker is bound to.
fn work<A, F>(idx: usize, signals: &Signals, callback: &F, arg: A)
where
    F: Fn(&A),
{
    loop {
        signals.start.acquire();

        if signals.stop.load(Ordering::Acquire) {
            trace!(worker = idx; "stop requested, exiting");
            return;
        }

        // A half-run iteration leaves the shared state inconsistent and the other
        // workers waiting forever, there's nothing to recover.
        if panic::catch_unwind(AssertUnwindSafe(|| callback(&arg))).is_err() {
            error!(worker = idx; "worker callback panicked, aborting");
            process::abort();
        }

        signals.finish.release(1);
    }
}
