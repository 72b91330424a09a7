use std::{cell::RefCell, io, rc::Rc, time::Instant};

use log::info;
use rand::{SeedableRng, rngs::StdRng};

use mountain_range::{
    RunConfig, SolverBuilder, SolverConfig, Terrain,
    initialization::{RandTerrainGen, RidgeTerrainGen},
};

fn main() -> io::Result<()> {
    env_logger::init();

    let solver_config = SolverConfig::from_env();
    let run = RunConfig::from_env();
    info!("run parameters: {run:?}");

    let rng = Rc::new(RefCell::new(StdRng::seed_from_u64(run.seed)));
    let uplift_gen = RidgeTerrainGen::new(0.5, 1.);
    let height_gen = RandTerrainGen::uniform(rng, 0., 0.1)?;
    let terrain = Terrain::generate(run.cells.get(), uplift_gen, height_gen)?;

    let mut solver = SolverBuilder::new().build(&solver_config, terrain)?;
    info!("initial steepness: {}", solver.steepness());

    let start = Instant::now();
    let t = solver.solve(run.end_time, run.time_step)?;
    let elapsed = start.elapsed();

    info!(
        "reached t={t} in {:.3}s, steepness: {}",
        elapsed.as_secs_f64(),
        solver.steepness()
    );

    Ok(())
}
