/// A `TerrainGen` produces one field of a new terrain, uplift or height.
pub trait TerrainGen {
    /// Generates the value of every cell of a terrain.
    ///
    /// # Arguments
    /// * `cells` - The amount of cells of the terrain.
    ///
    /// # Returns
    /// Exactly `cells` values, ordered by position.
    fn generate(&mut self, cells: usize) -> Vec<f64>;
}
