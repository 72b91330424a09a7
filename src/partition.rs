use std::{num::NonZeroUsize, ops::Range};

/// Splits `[0, total)` into `workers` contiguous ranges and returns the one of `worker`.
///
/// The first `total % workers` ranges get one extra cell, so sizes differ by at most
/// one. When there are more workers than cells the trailing ranges are empty.
///
/// # Arguments
/// * `total` - The amount of cells to split.
/// * `worker` - The index of the worker, in `[0, workers)`.
/// * `workers` - The amount of workers.
///
/// # Returns
/// The half-open `(first, last)` bounds of the worker's range.
pub fn divided_cell_range(total: usize, worker: usize, workers: NonZeroUsize) -> (usize, usize) {
    let workers = workers.get();
    let base = total / workers;
    let extra = total % workers;

    let first = worker * base + worker.min(extra);
    let last = first + base + usize::from(worker < extra);

    (first.min(total), last.min(total))
}

/// The contiguous range of cells a single worker is allowed to write.
///
/// Partitions can't be cloned: each one is moved into exactly one worker, and the
/// partitions of a plan never overlap.
#[derive(Debug, PartialEq, Eq)]
pub struct Partition {
    first: usize,
    last: usize,
}

impl Partition {
    /// Builds the partitions of every worker over `[0, total)`.
    ///
    /// # Arguments
    /// * `total` - The amount of cells to split.
    /// * `workers` - The amount of workers.
    ///
    /// # Returns
    /// One partition per worker, ordered by worker index.
    pub fn plan(total: usize, workers: NonZeroUsize) -> Vec<Partition> {
        (0..workers.get())
            .map(|worker| {
                let (first, last) = divided_cell_range(total, worker, workers);
                Partition { first, last }
            })
            .collect()
    }

    /// Returns the range of cells of this partition.
    pub fn range(&self) -> Range<usize> {
        self.first..self.last
    }
}
