//! Erosion of a one-dimensional mountain range.
//!
//! The terrain is advanced in time by a `Solver`. The threaded solver splits it into
//! one partition per worker and drives a fixed pool of threads through every step,
//! the serial solver runs the same kernels on the calling thread.

pub mod config;
pub mod error;
pub mod initialization;
pub mod partition;
pub mod solver;
pub mod terrain;

pub use config::{RunConfig, SolverConfig};
pub use error::{Result, SolverErr};
pub use partition::{Partition, divided_cell_range};
pub use solver::{Backend, SerialSolver, Solver, SolverBuilder, ThreadedSolver};
pub use terrain::Terrain;
