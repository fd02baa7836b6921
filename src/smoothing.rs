//! Variable-window box blur.

use crate::error::TextureError;
use crate::field::ScalarField;

/// Replace every cell with the mean of the `(2r+1) x (2r+1)` window around it.
///
/// The window is clipped to the field, and the divisor ("damping") is the
/// number of cells that were actually summed, so edges and corners average
/// fewer samples instead of being padded with zeros. `radius == 0` returns an
/// unchanged copy.
pub fn smooth(field: &ScalarField, radius: usize) -> Result<ScalarField, TextureError> {
    let size = field.size();
    let data = field.as_slice();

    ScalarField::from_rows_par(size, |x, out| {
        let k_lo = x.saturating_sub(radius);
        let k_hi = (x + radius).min(size - 1);

        for (y, value) in out.iter_mut().enumerate() {
            let l_lo = y.saturating_sub(radius);
            let l_hi = (y + radius).min(size - 1);

            let mut sum = 0.0;
            for k in k_lo..=k_hi {
                sum += data[k * size + l_lo..=k * size + l_hi].iter().sum::<f64>();
            }
            *value = sum / damping(size, radius, x, y) as f64;
        }
    })
}

/// Number of in-bounds cells in the window around `(x, y)`.
fn damping(size: usize, radius: usize, x: usize, y: usize) -> usize {
    let rows = (x + radius).min(size - 1) - x.saturating_sub(radius) + 1;
    let cols = (y + radius).min(size - 1) - y.saturating_sub(radius) + 1;
    rows * cols
}
