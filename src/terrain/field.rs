use crate::{
    error::{Result, SolverErr},
    initialization::TerrainGen,
};

/// A one-dimensional mountain range.
///
/// Holds three equally sized fields: the uplift rate of every cell, its height and its
/// erosion rate. The erosion rate is derived from the heights, it starts zeroed and is
/// brought up to date by the solvers on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    uplift: Vec<f64>,
    height: Vec<f64>,
    growth: Vec<f64>,
}

impl Terrain {
    /// Creates a new `Terrain`.
    ///
    /// # Arguments
    /// * `uplift` - The uplift rate of every cell.
    /// * `height` - The initial height of every cell.
    ///
    /// # Returns
    /// A new `Terrain` instance, or an error if the fields are empty or their lengths
    /// don't match.
    pub fn new(uplift: Vec<f64>, height: Vec<f64>) -> Result<Self> {
        if uplift.len() != height.len() {
            return Err(SolverErr::LengthMismatch {
                uplift: uplift.len(),
                height: height.len(),
            });
        }

        if height.is_empty() {
            return Err(SolverErr::EmptyTerrain);
        }

        let growth = vec![0.; height.len()];

        Ok(Self {
            uplift,
            height,
            growth,
        })
    }

    /// Creates a new `Terrain` of `cells` cells out of two generators.
    ///
    /// # Arguments
    /// * `cells` - The amount of cells of the terrain.
    /// * `uplift_gen` - Generates the uplift rates.
    /// * `height_gen` - Generates the initial heights.
    ///
    /// # Returns
    /// A new `Terrain` instance, or an error if `cells` is zero or a generator doesn't
    /// produce exactly `cells` values.
    pub fn generate<U, H>(cells: usize, mut uplift_gen: U, mut height_gen: H) -> Result<Self>
    where
        U: TerrainGen,
        H: TerrainGen,
    {
        if cells == 0 {
            return Err(SolverErr::EmptyTerrain);
        }

        let uplift = uplift_gen.generate(cells);
        let height = height_gen.generate(cells);

        if uplift.len() != cells || height.len() != cells {
            return Err(SolverErr::LengthMismatch {
                uplift: uplift.len(),
                height: height.len(),
            });
        }

        Self::new(uplift, height)
    }

    pub fn len(&self) -> usize {
        self.height.len()
    }

    /// Always false, a terrain has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.height.is_empty()
    }

    pub fn uplift(&self) -> &[f64] {
        &self.uplift
    }

    pub fn height(&self) -> &[f64] {
        &self.height
    }

    pub fn growth(&self) -> &[f64] {
        &self.growth
    }

    /// Splits the terrain into its `(uplift, height, growth)` fields.
    pub(crate) fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (self.uplift, self.height, self.growth)
    }
}
