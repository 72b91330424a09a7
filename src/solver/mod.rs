mod builder;
mod serial;
mod traits;
mod threaded;

pub use builder::SolverBuilder;
pub use serial::SerialSolver;
pub use traits::{Backend, Solver};
pub use threaded::ThreadedSolver;
