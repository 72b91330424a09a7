use std::f64::consts::PI;

use super::TerrainGen;

/// A single smooth ridge centered on the terrain.
///
/// Cell `i` of `n` gets `base + peak * sin(pi * (i + 0.5) / n)`, so the profile is
/// symmetric, lowest at the borders and highest in the middle. Used for uplift rates
/// that push the center of the range up faster than its foothills.
#[derive(Debug, Clone, Copy)]
pub struct RidgeTerrainGen {
    base: f64,
    peak: f64,
}

impl RidgeTerrainGen {
    /// Creates a new `RidgeTerrainGen`.
    ///
    /// # Arguments
    /// * `base` - The value the profile rises from.
    /// * `peak` - How far above `base` the center of the ridge gets.
    pub fn new(base: f64, peak: f64) -> Self {
        Self { base, peak }
    }
}

impl TerrainGen for RidgeTerrainGen {
    fn generate(&mut self, cells: usize) -> Vec<f64> {
        let n = cells as f64;

        (0..cells)
            .map(|i| self.base + self.peak * (PI * (i as f64 + 0.5) / n).sin())
            .collect()
    }
}
