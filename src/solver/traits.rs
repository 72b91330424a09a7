use log::debug;

use crate::error::{Result, SolverErr};

/// Advances a mountain range through time.
///
/// Every implementation runs the same kernels and must agree on the resulting fields,
/// only the way the work is scheduled differs.
pub trait Solver {
    /// Advances the simulation by one step.
    ///
    /// # Arguments
    /// * `dt` - The time step.
    ///
    /// # Returns
    /// The total simulated time after the step.
    fn step(&mut self, dt: f64) -> f64;

    /// Returns the mean steepness over every cell of the terrain.
    fn steepness(&mut self) -> f64;

    /// Returns the total simulated time.
    fn time(&self) -> f64;

    /// Returns the current heights.
    fn heights(&self) -> &[f64];

    /// Returns the current erosion rates.
    fn growth(&self) -> &[f64];

    /// Returns the amount of cells of the terrain.
    fn len(&self) -> usize {
        self.heights().len()
    }

    /// Steps until the simulated time reaches `end_time`.
    ///
    /// The last step is shortened so the run lands exactly on `end_time`; nothing is
    /// done if the simulation is already past it.
    ///
    /// # Arguments
    /// * `end_time` - The simulated time to reach.
    /// * `dt` - The regular time step.
    ///
    /// # Returns
    /// The total simulated time, or an error if `dt` isn't positive and finite or
    /// `end_time` isn't finite.
    fn solve(&mut self, end_time: f64, dt: f64) -> Result<f64> {
        if !(dt.is_finite() && dt > 0.) {
            return Err(SolverErr::InvalidTimeStep(dt));
        }

        if !end_time.is_finite() {
            return Err(SolverErr::InvalidEndTime(end_time));
        }

        let mut steps = 0usize;

        while self.time() < end_time {
            let remaining = end_time - self.time();
            self.step(dt.min(remaining));
            steps += 1;
        }

        debug!(steps = steps; "solved up to t={}", self.time());
        Ok(self.time())
    }
}

/// The available `Solver` implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Runs every kernel on the calling thread.
    Serial,
    /// Runs the kernels on a fixed pool of coordinated worker threads.
    Threaded,
}

impl Backend {
    /// Parses a backend name, case insensitive.
    ///
    /// # Arguments
    /// * `name` - Either `serial` or `threaded`.
    ///
    /// # Returns
    /// The backend, or `None` if the name is unknown.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "serial" => Some(Self::Serial),
            "threaded" => Some(Self::Threaded),
            _ => None,
        }
    }
}
