mod random;
mod ridge;
mod terrain_gen;

pub use random::RandTerrainGen;
pub use ridge::RidgeTerrainGen;
pub use terrain_gen::TerrainGen;
