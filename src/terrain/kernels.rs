//! The numerical kernels of the erosion model.
//!
//! Every kernel works on a contiguous section `[first, first + section.len())` of the
//! terrain, so the serial solver runs them once on the whole domain and the threaded
//! solver runs them once per partition. Neighbours outside the domain are clamped to
//! the border cell.

/// Applies one explicit Euler step to the heights of a section.
///
/// `h[i] += dt * (r[i] - g[i])`
///
/// # Arguments
/// * `height` - The heights of the section, updated in place.
/// * `uplift` - The uplift rates of the same section.
/// * `growth` - The erosion rates of the same section.
/// * `dt` - The time step.
pub fn update_height(height: &mut [f64], uplift: &[f64], growth: &[f64], dt: f64) {
    for ((h, r), g) in height.iter_mut().zip(uplift).zip(growth) {
        *h += dt * (r - g);
    }
}

/// Recomputes the erosion rate of a section from the heights of the whole domain.
///
/// `g[i] = h[i]^3 - ((h[i-1] + h[i+1]) / 2 - h[i])`
///
/// # Arguments
/// * `growth` - The erosion rates of the section, overwritten.
/// * `height` - The heights of the whole domain.
/// * `first` - The index of the first cell of the section.
pub fn update_growth(growth: &mut [f64], height: &[f64], first: usize) {
    for (offset, g) in growth.iter_mut().enumerate() {
        let i = first + offset;
        let (left, right) = neighbours(height, i);
        let curvature = (left + right) / 2. - height[i];
        *g = height[i].powi(3) - curvature;
    }
}

/// Sums the steepness of the cells `[first, last)`.
///
/// `s[i] = ((h[i+1] - h[i-1]) / 2)^2`
///
/// # Arguments
/// * `height` - The heights of the whole domain.
/// * `first` - The index of the first cell to sum.
/// * `last` - The index past the last cell to sum.
///
/// # Returns
/// The sum, accumulated left to right.
pub fn steepness_sum(height: &[f64], first: usize, last: usize) -> f64 {
    (first..last)
        .map(|i| {
            let (left, right) = neighbours(height, i);
            let slope = (right - left) / 2.;
            slope * slope
        })
        .sum()
}

fn neighbours(height: &[f64], i: usize) -> (f64, f64) {
    let left = height[i.saturating_sub(1)];
    let right = height[(i + 1).min(height.len() - 1)];
    (left, right)
}
