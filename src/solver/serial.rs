use crate::{
    solver::Solver,
    terrain::{Terrain, kernels},
};

/// A solver that runs every kernel on the calling thread.
///
/// It is the reference the parallel solvers are checked against.
#[derive(Debug, Clone)]
pub struct SerialSolver {
    uplift: Vec<f64>,
    height: Vec<f64>,
    growth: Vec<f64>,
    t: f64,
}

impl SerialSolver {
    /// Creates a new `SerialSolver` and brings the erosion rates up to date.
    ///
    /// # Arguments
    /// * `terrain` - The initial state of the mountain range.
    pub fn new(terrain: Terrain) -> Self {
        let (uplift, height, growth) = terrain.into_parts();

        let mut solver = Self {
            uplift,
            height,
            growth,
            t: 0.,
        };

        solver.step(0.);
        solver
    }
}

impl Solver for SerialSolver {
    fn step(&mut self, dt: f64) -> f64 {
        kernels::update_height(&mut self.height, &self.uplift, &self.growth, dt);
        kernels::update_growth(&mut self.growth, &self.height, 0);

        self.t += dt;
        self.t
    }

    fn steepness(&mut self) -> f64 {
        let sum = kernels::steepness_sum(&self.height, 0, self.height.len());
        sum / self.height.len() as f64
    }

    fn time(&self) -> f64 {
        self.t
    }

    fn heights(&self) -> &[f64] {
        &self.height
    }

    fn growth(&self) -> &[f64] {
        &self.growth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverErr;

    #[test]
    fn test_construction_initializes_growth() {
        let solver = SerialSolver::new(Terrain::new(vec![1.; 3], vec![0., 1., 0.]).unwrap());

        assert_eq!(solver.time(), 0.);
        assert_eq!(solver.heights(), &[0., 1., 0.]);
        assert_eq!(solver.growth(), &[-0.5, 2., -0.5]);
    }

    #[test]
    fn test_solve_lands_on_end_time() {
        let mut solver = SerialSolver::new(Terrain::new(vec![0.; 4], vec![0.; 4]).unwrap());

        let t = solver.solve(1., 0.3).unwrap();
        assert_eq!(t, solver.time());
        assert!((t - 1.).abs() < 1e-12);
    }

    #[test]
    fn test_solve_rejects_invalid_time_steps() {
        let mut solver = SerialSolver::new(Terrain::new(vec![0.], vec![0.]).unwrap());

        for dt in [0., -1., f64::NAN, f64::INFINITY] {
            assert!(solver.solve(1., dt).is_err(), "dt={dt}");
        }
        assert_eq!(solver.time(), 0.);
    }

    #[test]
    fn test_solve_rejects_unbounded_end_times() {
        let mut solver = SerialSolver::new(Terrain::new(vec![0.], vec![0.]).unwrap());

        for end_time in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let err = solver.solve(end_time, 0.1).unwrap_err();
            assert!(matches!(err, SolverErr::InvalidEndTime(_)), "end_time={end_time}");
        }
        assert_eq!(solver.time(), 0.);
    }
}
