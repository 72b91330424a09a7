use std::{
    num::NonZeroUsize,
    sync::{Arc, atomic::Ordering},
};

use log::debug;
use threadpool::{AtomicF64, CoordinatedPool, RendezvousBarrier};

use crate::{
    error::Result,
    partition::Partition,
    solver::Solver,
    terrain::{SharedField, Terrain},
};

/// The values the controller hands over to the workers on every iteration.
///
/// Both are written by the controller strictly before a trigger, the start signal of
/// the pool orders those writes before the workers' reads.
#[derive(Debug, Default)]
struct IterationState {
    time_step: AtomicF64,
    steepness: AtomicF64,
}

/// A solver that splits the terrain among a fixed pool of worker threads.
///
/// Every worker owns one partition of the terrain for the solver's whole life. Two
/// pools are kept, one per kernel: the steepness reduction and the two-phase step.
/// Both are driven with `trigger_sync`, so there's never more than one iteration in
/// flight and the fields are only read by the controller while the workers sleep.
pub struct ThreadedSolver {
    field: Arc<SharedField>,
    state: Arc<IterationState>,
    steepness_workers: CoordinatedPool,
    step_workers: CoordinatedPool,
    t: f64,
}

impl ThreadedSolver {
    /// Creates a new `ThreadedSolver` and brings the erosion rates up to date.
    ///
    /// # Arguments
    /// * `terrain` - The initial state of the mountain range.
    /// * `workers` - The amount of worker threads per kernel.
    ///
    /// # Returns
    /// A new `ThreadedSolver` instance, or an error if a worker couldn't be spawned.
    pub fn new(terrain: Terrain, workers: NonZeroUsize) -> Result<Self> {
        let cells = terrain.len();
        let field = Arc::new(SharedField::new(terrain));
        let state = Arc::new(IterationState::default());

        let steepness_workers = {
            let field = Arc::clone(&field);
            let state = Arc::clone(&state);
            let barrier = RendezvousBarrier::new(workers);

            CoordinatedPool::named(
                "steepness",
                move |part: &Partition| {
                    // SAFETY: Nobody writes heights during a steepness iteration.
                    let partial = unsafe { field.partial_steepness(part) };
                    state.steepness.fetch_add(partial, Ordering::AcqRel);

                    // Keeps a queued reduction from starting before this one is done.
                    barrier.arrive_and_wait();
                },
                Partition::plan(cells, workers),
            )?
        };

        let step_workers = {
            let field = Arc::clone(&field);
            let state = Arc::clone(&state);
            let barrier = RendezvousBarrier::new(workers);

            CoordinatedPool::named(
                "step",
                move |part: &Partition| {
                    let dt = state.time_step.load(Ordering::Relaxed);

                    // SAFETY: Partitions are disjoint and the height phase only reads the
                    //         erosion rates of its own partition.
                    unsafe { field.update_height(part, dt) };

                    // Every height must be final before any neighbour is read.
                    barrier.arrive_and_wait();

                    // SAFETY: Heights are read-only until the next iteration and erosion
                    //         rates are only written inside each worker's partition.
                    unsafe { field.update_growth(part) };

                    // Keeps a queued step from writing heights that are still being read.
                    barrier.arrive_and_wait();
                },
                Partition::plan(cells, workers),
            )?
        };

        debug!(cells = cells, workers = workers.get(); "built threaded solver");

        let mut solver = Self {
            field,
            state,
            steepness_workers,
            step_workers,
            t: 0.,
        };

        solver.step(0.);
        Ok(solver)
    }

    /// Returns the amount of worker threads per kernel.
    pub fn workers(&self) -> usize {
        self.step_workers.size()
    }
}

impl Solver for ThreadedSolver {
    fn step(&mut self, dt: f64) -> f64 {
        self.state.time_step.store(dt, Ordering::Relaxed);
        self.step_workers.trigger_sync();

        self.t += dt;
        self.t
    }

    fn steepness(&mut self) -> f64 {
        self.state.steepness.store(0., Ordering::Relaxed);
        self.steepness_workers.trigger_sync();

        self.state.steepness.load(Ordering::Acquire) / self.field.len() as f64
    }

    fn time(&self) -> f64 {
        self.t
    }

    fn heights(&self) -> &[f64] {
        // SAFETY: Every iteration is synced before `step` returns and a new one needs
        //         `&mut self`, so no worker runs while this borrow lives.
        unsafe { self.field.height() }
    }

    fn growth(&self) -> &[f64] {
        // SAFETY: Same as `heights`.
        unsafe { self.field.growth() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workers(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_construction_initializes_growth() {
        let terrain = Terrain::new(vec![1.; 3], vec![0., 1., 0.]).unwrap();
        let solver = ThreadedSolver::new(terrain, workers(2)).unwrap();

        assert_eq!(solver.workers(), 2);
        assert_eq!(solver.time(), 0.);
        assert_eq!(solver.growth(), &[-0.5, 2., -0.5]);
    }

    #[test]
    fn test_steepness_can_be_asked_repeatedly() {
        let height: Vec<f64> = (0..7).map(|i| 2. * i as f64).collect();
        let terrain = Terrain::new(vec![0.; 7], height).unwrap();
        let mut solver = ThreadedSolver::new(terrain, workers(3)).unwrap();

        for _ in 0..5 {
            assert!((solver.steepness() - 22. / 7.).abs() < 1e-12);
        }
    }
}
