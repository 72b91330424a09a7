use std::{cell::RefCell, rc::Rc};

use rand::Rng;
use rand_distr::{Distribution, Uniform};

use super::TerrainGen;
use crate::error::{Result, SolverErr};

/// Per-cell values drawn independently from a distribution.
///
/// The rng is shared so that both fields of a terrain can be drawn from a single
/// seeded stream, one after the other.
pub struct RandTerrainGen<R: Rng, D: Distribution<f64>> {
    rng: Rc<RefCell<R>>,
    distribution: D,
}

impl<R: Rng, D: Distribution<f64>> RandTerrainGen<R, D> {
    /// Creates a new `RandTerrainGen`.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `distribution` - The distribution every cell is drawn from.
    pub fn new(rng: Rc<RefCell<R>>, distribution: D) -> Self {
        Self { rng, distribution }
    }
}

impl<R: Rng> RandTerrainGen<R, Uniform<f64>> {
    /// Creates a new `RandTerrainGen` drawing uniformly from `[low, high)`.
    ///
    /// # Returns
    /// A new instance, or `SolverErr::InvalidRange` if the range is empty or not finite.
    pub fn uniform(rng: Rc<RefCell<R>>, low: f64, high: f64) -> Result<Self> {
        let distribution =
            Uniform::new(low, high).map_err(|_| SolverErr::InvalidRange { low, high })?;

        Ok(Self::new(rng, distribution))
    }
}

impl<R: Rng, D: Distribution<f64>> TerrainGen for RandTerrainGen<R, D> {
    fn generate(&mut self, cells: usize) -> Vec<f64> {
        let mut rng = self.rng.borrow_mut();
        (0..cells)
            .map(|_| self.distribution.sample(&mut *rng))
            .collect()
    }
}
