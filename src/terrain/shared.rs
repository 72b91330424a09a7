use std::{cell::UnsafeCell, ops::Range, slice};

use super::{Terrain, kernels};
use crate::partition::Partition;

/// A field whose cells can be written from several threads at once, as long as no two
/// threads touch the same cell.
struct Cells(Box<[UnsafeCell<f64>]>);

impl Cells {
    fn new(values: Vec<f64>) -> Self {
        Self(values.into_iter().map(UnsafeCell::new).collect())
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    /// # Safety
    /// No thread may write a cell of `range` while the returned slice lives.
    unsafe fn slice(&self, range: Range<usize>) -> &[f64] {
        let cells = &self.0[range];

        // SAFETY: `UnsafeCell<f64>` has the same layout as `f64`, the caller guarantees
        //         there are no writes to these cells.
        unsafe { slice::from_raw_parts(UnsafeCell::raw_get(cells.as_ptr()), cells.len()) }
    }

    /// # Safety
    /// No other thread may read or write a cell of `range` while the returned slice lives.
    #[allow(clippy::mut_from_ref)]
    unsafe fn slice_mut(&self, range: Range<usize>) -> &mut [f64] {
        let cells = &self.0[range];

        // SAFETY: `UnsafeCell<f64>` has the same layout as `f64`, the caller guarantees
        //         this is the only access to these cells.
        unsafe { slice::from_raw_parts_mut(UnsafeCell::raw_get(cells.as_ptr()), cells.len()) }
    }
}

/// The terrain of the threaded solver, lent to the workers one partition at a time.
///
/// Workers only ever write the cells of their own partition, and the solver's
/// iteration protocol keeps readers of a whole field away from its writers:
///
/// * height phase: writes `height[p]`, reads `uplift[p]` and `growth[p]`.
/// * growth phase: writes `growth[p]`, reads all of `height`.
/// * steepness: reads all of `height`.
///
/// The phases are separated by barriers and the controller only looks at the fields
/// while no iteration is in flight.
pub(crate) struct SharedField {
    uplift: Box<[f64]>,
    height: Cells,
    growth: Cells,
}

// SAFETY: The only interior mutability is in `Cells`, and every access to them goes
//         through the unsafe methods below whose contracts rule out data races.
unsafe impl Sync for SharedField {}

impl SharedField {
    pub fn new(terrain: Terrain) -> Self {
        let (uplift, height, growth) = terrain.into_parts();

        Self {
            uplift: uplift.into_boxed_slice(),
            height: Cells::new(height),
            growth: Cells::new(growth),
        }
    }

    pub fn len(&self) -> usize {
        self.height.len()
    }

    /// Advances the heights of `part` by `dt`.
    ///
    /// # Safety
    /// No other thread may access `height[part]` nor write `growth[part]` meanwhile.
    pub unsafe fn update_height(&self, part: &Partition, dt: f64) {
        let range = part.range();

        // SAFETY: Guaranteed by the caller.
        let (height, growth) = unsafe {
            (
                self.height.slice_mut(range.clone()),
                self.growth.slice(range.clone()),
            )
        };

        kernels::update_height(height, &self.uplift[range], growth, dt);
    }

    /// Recomputes the erosion rates of `part` from the current heights.
    ///
    /// # Safety
    /// No thread may write any height, nor access `growth[part]`, meanwhile.
    pub unsafe fn update_growth(&self, part: &Partition) {
        let range = part.range();

        // SAFETY: Guaranteed by the caller.
        let (growth, height) = unsafe {
            (
                self.growth.slice_mut(range.clone()),
                self.height.slice(0..self.len()),
            )
        };

        kernels::update_growth(growth, height, range.start);
    }

    /// Sums the steepness of the cells of `part`.
    ///
    /// # Safety
    /// No thread may write any height meanwhile.
    pub unsafe fn partial_steepness(&self, part: &Partition) -> f64 {
        let range = part.range();

        // SAFETY: Guaranteed by the caller.
        let height = unsafe { self.height.slice(0..self.len()) };
        kernels::steepness_sum(height, range.start, range.end)
    }

    /// # Safety
    /// No thread may write any height while the returned slice lives.
    pub unsafe fn height(&self) -> &[f64] {
        // SAFETY: Guaranteed by the caller.
        unsafe { self.height.slice(0..self.len()) }
    }

    /// # Safety
    /// No thread may write any erosion rate while the returned slice lives.
    pub unsafe fn growth(&self) -> &[f64] {
        // SAFETY: Guaranteed by the caller.
        unsafe { self.growth.slice(0..self.len()) }
    }
}
