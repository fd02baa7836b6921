//! Octave composition of value noise.
//!
//! Each octave samples the random field on a control grid whose density is
//! `frequency^(n+1)` and fills the cells in between with a smoothstep blend of
//! the four surrounding control points. Octaves are weighted by
//! `persistence^n`, summed, and divided by the total weight once at the end.

use log::debug;
use rayon::prelude::*;

use crate::config::NoiseParameters;
use crate::error::{ConfigError, TextureError};
use crate::field::ScalarField;

/// Cubic smoothstep `3a^2 - 2a^3`.
pub fn smoothstep(a: f64) -> f64 {
    a * a * (3.0 - 2.0 * a)
}

/// Blend `y1` towards `y2` by the smoothstep of `a`.
///
/// Exact at the end points: `a == 0` gives `y1`, `a == 1` gives `y2`.
pub fn interpolate(y1: f64, y2: f64, a: f64) -> f64 {
    y1 * smoothstep(1.0 - a) + y2 * smoothstep(a)
}

/// Octave weights `persistence^n` for `n` in `0..octaves`.
pub fn persistence_weights(octaves: u32, persistence: f64) -> Vec<f64> {
    let mut weights = Vec::with_capacity(octaves as usize);
    let mut w = 1.0;
    for _ in 0..octaves {
        weights.push(w);
        w *= persistence;
    }
    weights
}

/// Position of one coordinate between two control points along an axis.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Bracket {
    lo: usize,
    hi: usize,
    frac: f64,
}

impl Bracket {
    /// Control points sit at `floor(k * step)`; the far one is clamped to the
    /// last valid index.
    fn locate(i: usize, step: f64, size: usize) -> Self {
        let cell = (i as f64 / step).floor();
        let lo = ((cell * step).floor() as usize).min(i);
        let hi = (((cell + 1.0) * step).floor() as usize).min(size - 1).max(i);
        let frac = if hi == lo {
            0.0
        } else {
            (i - lo) as f64 / (hi - lo) as f64
        };
        Self { lo, hi, frac }
    }
}

/// Builds the weighted multi-octave composite from a random field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OctaveCompositor {
    frequency: u32,
    octaves: u32,
    persistence: f64,
}

impl OctaveCompositor {
    pub fn new(frequency: u32, octaves: u32, persistence: f64) -> Result<Self, ConfigError> {
        if octaves == 0 {
            return Err(ConfigError::ZeroOctaves);
        }
        if frequency == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        if !persistence.is_finite() || persistence <= 0.0 {
            return Err(ConfigError::InvalidPersistence(persistence));
        }
        Ok(Self {
            frequency,
            octaves,
            persistence,
        })
    }

    pub fn from_params(params: &NoiseParameters) -> Result<Self, ConfigError> {
        Self::new(params.frequency as u32, params.octaves as u32, params.persistence)
    }

    pub fn weights(&self) -> Vec<f64> {
        persistence_weights(self.octaves, self.persistence)
    }

    /// Control-grid spacing for octave `n` on a field of side `size`.
    pub fn octave_step(&self, size: usize, n: u32) -> f64 {
        let effective = (self.frequency as f64).powi(n as i32 + 1);
        size as f64 / effective
    }

    /// The interpolated layer for a single octave.
    ///
    /// Once the grid spacing drops below one sample the octave is the random
    /// field itself.
    pub fn octave_layer(&self, random: &ScalarField, n: u32) -> Result<ScalarField, TextureError> {
        let size = random.size();
        let step = self.octave_step(size, n);
        debug!("Octave {}: control step {:.3}", n, step);

        if step < 1.0 {
            return ScalarField::from_rows_par(size, |i, out| {
                out.copy_from_slice(&random.as_slice()[i * size..(i + 1) * size]);
            });
        }

        let columns: Vec<Bracket> = (0..size).map(|j| Bracket::locate(j, step, size)).collect();

        ScalarField::from_rows_par(size, |i, out| {
            let bi = Bracket::locate(i, step, size);
            for (value, bj) in out.iter_mut().zip(&columns) {
                let b11 = random.get(bi.lo, bj.lo);
                let b12 = random.get(bi.lo, bj.hi);
                let b21 = random.get(bi.hi, bj.lo);
                let b22 = random.get(bi.hi, bj.hi);

                let v1 = interpolate(b11, b12, bj.frac);
                let v2 = interpolate(b21, b22, bj.frac);
                *value = interpolate(v1, v2, bi.frac);
            }
        })
    }

    /// Sum every octave with its weight, then normalize by the total weight.
    pub fn compose(&self, random: &ScalarField) -> Result<ScalarField, TextureError> {
        let mut sum = ScalarField::new(random.size())?;
        let mut total_weight = 0.0;

        for (n, weight) in self.weights().into_iter().enumerate() {
            let layer = self.octave_layer(random, n as u32)?;
            sum.as_mut_slice()
                .par_iter_mut()
                .zip(layer.as_slice().par_iter())
                .for_each(|(acc, &v)| *acc += v * weight);
            total_weight += weight;
        }

        sum.as_mut_slice()
            .par_iter_mut()
            .for_each(|acc| *acc /= total_weight);

        Ok(sum)
    }
}

/// Compose `random` with the given octave settings.
pub fn compose(
    random: &ScalarField,
    frequency: u32,
    octaves: u32,
    persistence: f64,
) -> Result<ScalarField, TextureError> {
    OctaveCompositor::new(frequency, octaves, persistence)?.compose(random)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;

    #[test]
    fn test_smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-12);
        assert!((smoothstep(0.25) - 0.15625).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate_is_cubic_not_linear() {
        assert_eq!(interpolate(10.0, 200.0, 0.0), 10.0);
        assert_eq!(interpolate(10.0, 200.0, 1.0), 200.0);
        // linear would give 57.5
        let v = interpolate(10.0, 200.0, 0.25);
        assert!((v - (10.0 * 0.84375 + 200.0 * 0.15625)).abs() < 1e-9);
    }

    #[test]
    fn test_weight_series() {
        let weights = persistence_weights(3, 0.5);
        assert_eq!(weights, vec![1.0, 0.5, 0.25]);
        assert!((weights.iter().sum::<f64>() - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_bracket_clamps_far_corner() {
        let b = Bracket::locate(1, 2.0, 2);
        assert_eq!(b, Bracket { lo: 0, hi: 1, frac: 1.0 });

        let b = Bracket::locate(5, 4.0, 8);
        assert_eq!((b.lo, b.hi), (4, 7));
        assert!((b.frac - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_bracket_fraction_stays_in_unit_range() {
        for &step in &[1.0, 1.5, 2.7, 3.0, 5.33, 16.0] {
            for i in 0..40 {
                let b = Bracket::locate(i, step, 40);
                assert!(b.lo <= i && i <= b.hi, "step {} i {}", step, i);
                assert!((0.0..=1.0).contains(&b.frac), "step {} i {}", step, i);
            }
        }
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(matches!(OctaveCompositor::new(2, 0, 0.5), Err(ConfigError::ZeroOctaves)));
        assert!(matches!(OctaveCompositor::new(0, 3, 0.5), Err(ConfigError::ZeroFrequency)));
        assert!(matches!(
            OctaveCompositor::new(2, 3, f64::NAN),
            Err(ConfigError::InvalidPersistence(_))
        ));
        assert!(OctaveCompositor::new(2, 3, -0.5).is_err());
    }

    #[test]
    fn test_single_base_octave_reproduces_random_field() {
        let random = rng::generate(2, 4242).unwrap();
        let composite = compose(&random, 1, 1, 1.0).unwrap();
        assert_eq!(composite, random);
    }

    #[test]
    fn test_control_points_are_exact() {
        let random = rng::generate(16, 7).unwrap();
        let compositor = OctaveCompositor::new(2, 1, 0.5).unwrap();
        let layer = compositor.octave_layer(&random, 0).unwrap();

        // step 8: control points at 0 and 8, far edge clamped to 15
        for &i in &[0, 8, 15] {
            for &j in &[0, 8, 15] {
                assert_eq!(layer.get(i, j), random.get(i, j), "corner ({}, {})", i, j);
            }
        }
    }

    #[test]
    fn test_degenerate_octave_uses_random_field() {
        let random = rng::generate(8, 3).unwrap();
        let compositor = OctaveCompositor::new(4, 3, 0.5).unwrap();
        // 8 / 4^2 = 0.5 < 1
        assert!(compositor.octave_step(8, 1) < 1.0);
        let layer = compositor.octave_layer(&random, 1).unwrap();
        assert_eq!(layer, random);
    }

    #[test]
    fn test_composite_stays_within_random_range() {
        let random = rng::generate(64, 2024).unwrap();
        let (lo, hi) = random.min_max();
        let composite = compose(&random, 2, 5, 0.6).unwrap();
        assert_eq!(composite.size(), 64);
        for (_, _, v) in composite.iter() {
            assert!(v >= lo - 1e-9 && v <= hi + 1e-9, "value {} outside [{}, {}]", v, lo, hi);
        }
    }

    #[test]
    fn test_normalization_matches_manual_weighted_average() {
        let random = rng::generate(12, 11).unwrap();
        let compositor = OctaveCompositor::new(2, 3, 0.5).unwrap();
        let layers: Vec<ScalarField> = (0..3)
            .map(|n| compositor.octave_layer(&random, n).unwrap())
            .collect();
        let composite = compositor.compose(&random).unwrap();

        for (i, j, v) in composite.iter() {
            let expected = (layers[0].get(i, j) + 0.5 * layers[1].get(i, j)
                + 0.25 * layers[2].get(i, j))
                / 1.75;
            assert!((v - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_field_composes_to_itself() {
        let random = ScalarField::new_with(10, 100.0).unwrap();
        let composite = compose(&random, 3, 4, 0.7).unwrap();
        for (_, _, v) in composite.iter() {
            assert!((v - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_compose_is_deterministic() {
        let random = rng::generate(33, 5).unwrap();
        let a = compose(&random, 2, 4, 0.5).unwrap();
        let b = compose(&random, 2, 4, 0.5).unwrap();
        assert_eq!(a, b);
    }
}
