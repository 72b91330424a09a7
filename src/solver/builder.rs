use log::info;

use super::{Backend, SerialSolver, Solver, ThreadedSolver};
use crate::{config::SolverConfig, error::Result, terrain::Terrain};

/// Builds a `Solver` out of a `SolverConfig`, hiding which backend was chosen.
#[derive(Debug, Default)]
pub struct SolverBuilder;

impl SolverBuilder {
    /// Creates a new `SolverBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds the solver selected by `config` for `terrain`.
    ///
    /// # Arguments
    /// * `config` - The backend and amount of workers.
    /// * `terrain` - The initial state of the mountain range.
    ///
    /// # Returns
    /// The solver, or an error if its workers couldn't be spawned.
    pub fn build(&self, config: &SolverConfig, terrain: Terrain) -> Result<Box<dyn Solver>> {
        let cells = terrain.len();

        let solver: Box<dyn Solver> = match config.backend() {
            Backend::Serial => Box::new(SerialSolver::new(terrain)),
            Backend::Threaded => Box::new(ThreadedSolver::new(terrain, config.workers())?),
        };

        info!(
            backend:? = config.backend(),
            workers = config.workers().get(),
            cells = cells;
            "solver ready"
        );

        Ok(solver)
    }
}
