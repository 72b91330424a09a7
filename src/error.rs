use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The crate's result type.
pub type Result<T> = std::result::Result<T, SolverErr>;

/// Failures building a terrain or a solver, or driving a simulation.
///
/// Nothing past construction fails recoverably: a panicking kernel aborts the process.
#[derive(Debug)]
pub enum SolverErr {
    /// The terrain has no cells.
    EmptyTerrain,
    /// The uplift and height fields have different lengths.
    LengthMismatch { uplift: usize, height: usize },
    /// A worker thread couldn't be spawned.
    Spawn(io::Error),
    /// `solve` was asked to advance with a step that never reaches the end time.
    InvalidTimeStep(f64),
    /// `solve` was asked to reach a time that doesn't exist.
    InvalidEndTime(f64),
    /// A random field was asked for an empty or unbounded range of values.
    InvalidRange { low: f64, high: f64 },
}

impl Display for SolverErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverErr::EmptyTerrain => f.write_str("the terrain must have at least one cell"),
            SolverErr::LengthMismatch { uplift, height } => write!(
                f,
                "field length mismatch: uplift has {uplift} cells, height has {height}"
            ),
            SolverErr::Spawn(e) => write!(f, "couldn't spawn worker thread: {e}"),
            SolverErr::InvalidTimeStep(dt) => {
                write!(f, "invalid time step {dt}: must be positive and finite")
            }
            SolverErr::InvalidEndTime(t) => write!(f, "invalid end time {t}: must be finite"),
            SolverErr::InvalidRange { low, high } => {
                write!(f, "invalid value range [{low}, {high}): must be finite and non-empty")
            }
        }
    }
}

impl Error for SolverErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SolverErr::Spawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SolverErr {
    fn from(value: io::Error) -> Self {
        Self::Spawn(value)
    }
}

/// Boundary conversion for the binary.
impl From<SolverErr> for io::Error {
    fn from(value: SolverErr) -> Self {
        match value {
            SolverErr::Spawn(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidInput, other),
        }
    }
}
