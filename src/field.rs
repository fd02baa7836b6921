use rayon::prelude::*;

use crate::error::{ConfigError, TextureError};

/// A square grid of samples stored row-major in one contiguous buffer.
///
/// Raw random fields hold whole numbers in `0..=255`; composites and smoothed
/// fields hold arbitrary reals, so every sample is an `f64`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    size: usize,
    data: Vec<f64>,
}

impl ScalarField {
    /// Zero-filled field of `size x size` samples.
    pub fn new(size: usize) -> Result<Self, TextureError> {
        Self::new_with(size, 0.0)
    }

    pub fn new_with(size: usize, value: f64) -> Result<Self, TextureError> {
        let data = allocate(size, value)?;
        Ok(Self { size, data })
    }

    /// Build a field by evaluating `f(row, col)` for every cell.
    #[cfg(test)]
    pub(crate) fn from_fn<F>(size: usize, f: F) -> Result<Self, TextureError>
    where
        F: Fn(usize, usize) -> f64,
    {
        let mut field = Self::new(size)?;
        for (idx, sample) in field.data.iter_mut().enumerate() {
            *sample = f(idx / size, idx % size);
        }
        Ok(field)
    }

    /// Build a field row by row in parallel. `fill(row, out)` writes one row.
    ///
    /// Rows are disjoint so the result does not depend on scheduling.
    pub fn from_rows_par<F>(size: usize, fill: F) -> Result<Self, TextureError>
    where
        F: Fn(usize, &mut [f64]) + Sync,
    {
        let mut field = Self::new(size)?;
        field
            .data
            .par_chunks_mut(size)
            .enumerate()
            .for_each(|(row, out)| fill(row, out));
        Ok(field)
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.size && col < self.size);
        row * self.size + col
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[self.index(row, col)]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Iterate over all cells with their coordinates.
    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let size = self.size;
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, &val)| (idx / size, idx % size, val))
    }

    /// Smallest and largest sample.
    pub fn min_max(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}

/// Bring a sample into `[0, 255]`: values inside pass through, anything
/// outside wraps modulo 255. Non-finite samples become 0.
pub fn wrap_sample(value: f64) -> f64 {
    if (0.0..=255.0).contains(&value) {
        value
    } else if value.is_finite() {
        value.rem_euclid(255.0)
    } else {
        0.0
    }
}

/// Convert a sample to a pixel byte, truncating after [`wrap_sample`].
pub fn sample_to_byte(value: f64) -> u8 {
    wrap_sample(value) as u8
}

fn allocate(size: usize, value: f64) -> Result<Vec<f64>, TextureError> {
    if size == 0 {
        return Err(ConfigError::ZeroSize.into());
    }
    let cells = size
        .checked_mul(size)
        .ok_or(TextureError::Allocation { cells: usize::MAX })?;

    let mut data = Vec::new();
    data.try_reserve_exact(cells)
        .map_err(|_| TextureError::Allocation { cells })?;
    data.resize(cells, value);
    Ok(data)
}
