use std::{env, num::NonZeroUsize};

use log::warn;

use crate::solver::Backend;

/// Environment variable holding the amount of worker threads.
pub const NUM_THREADS_VAR: &str = "SOLVER_NUM_THREADS";
/// Environment variable selecting the solver backend.
pub const BACKEND_VAR: &str = "SOLVER_BACKEND";
/// Environment variable holding the amount of terrain cells.
pub const CELLS_VAR: &str = "MOUNTAIN_CELLS";
/// Environment variable holding the simulated end time.
pub const END_TIME_VAR: &str = "MOUNTAIN_END_TIME";
/// Environment variable holding the integration time step.
pub const TIME_STEP_VAR: &str = "MOUNTAIN_TIME_STEP";
/// Environment variable holding the seed of the initial terrain.
pub const SEED_VAR: &str = "MOUNTAIN_SEED";

/// Parses an unsigned integer made only of ascii digits.
///
/// # Arguments
/// * `value` - The raw value.
///
/// # Returns
/// `None` if the value is empty or has anything other than digits, including signs and
/// surrounding whitespace.
fn parse_digits(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    value.parse().ok()
}

/// Reads `key` through `lookup` and parses it, falling back to `default`.
///
/// A missing key silently falls back, a malformed one is reported.
fn read_or<T, L, P>(lookup: &L, key: &str, default: T, parse: P) -> T
where
    L: Fn(&str) -> Option<String>,
    P: FnOnce(&str) -> Option<T>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    match parse(&raw) {
        Some(value) => value,
        None => {
            warn!("malformed {key}={raw:?}, using the default");
            default
        }
    }
}

fn parse_positive_f64(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.)
}

/// How a solver is built: which backend runs it and with how many workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    workers: NonZeroUsize,
    backend: Backend,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            workers: NonZeroUsize::MIN,
            backend: Backend::Threaded,
        }
    }
}

impl SolverConfig {
    /// Creates a new `SolverConfig`.
    ///
    /// # Arguments
    /// * `workers` - The amount of worker threads.
    /// * `backend` - The solver implementation to use.
    ///
    /// # Returns
    /// A new `SolverConfig` instance.
    pub fn new(workers: NonZeroUsize, backend: Backend) -> Self {
        Self { workers, backend }
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// A worker count that isn't made only of digits, or that is zero, falls back to a
    /// single worker. An unknown backend falls back to the threaded one.
    ///
    /// # Arguments
    /// * `lookup` - Resolves a variable name to its raw value.
    ///
    /// # Returns
    /// A new `SolverConfig` instance.
    pub fn from_lookup<L>(lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let workers = read_or(&lookup, NUM_THREADS_VAR, default.workers, |raw| {
            parse_digits(raw)
                .and_then(|n| usize::try_from(n).ok())
                .and_then(NonZeroUsize::new)
        });

        let backend = read_or(&lookup, BACKEND_VAR, default.backend, Backend::parse);

        Self { workers, backend }
    }

    /// Returns the amount of worker threads.
    pub fn workers(&self) -> NonZeroUsize {
        self.workers
    }

    /// Returns the selected backend.
    pub fn backend(&self) -> Backend {
        self.backend
    }
}

/// Parameters of a simulation run driven by the binary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunConfig {
    pub cells: NonZeroUsize,
    pub end_time: f64,
    pub time_step: f64,
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            cells: NonZeroUsize::new(1 << 16).unwrap_or(NonZeroUsize::MIN),
            end_time: 1.,
            time_step: 0.01,
            seed: 0,
        }
    }
}

impl RunConfig {
    /// Reads the run parameters from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the run parameters through `lookup`, each malformed value falls back to
    /// its default.
    ///
    /// # Arguments
    /// * `lookup` - Resolves a variable name to its raw value.
    ///
    /// # Returns
    /// A new `RunConfig` instance.
    pub fn from_lookup<L>(lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        Self {
            cells: read_or(&lookup, CELLS_VAR, default.cells, |raw| {
                parse_digits(raw)
                    .and_then(|n| usize::try_from(n).ok())
                    .and_then(NonZeroUsize::new)
            }),
            end_time: read_or(&lookup, END_TIME_VAR, default.end_time, parse_positive_f64),
            time_step: read_or(&lookup, TIME_STEP_VAR, default.time_step, parse_positive_f64),
            seed: read_or(&lookup, SEED_VAR, default.seed, parse_digits),
        }
    }
}
