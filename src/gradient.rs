//! Mapping scalar samples to colors.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::field::{sample_to_byte, wrap_sample};

/// An RGB triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    /// Per-channel `self * (1 - f) + other * f`, truncated.
    pub fn lerp(self, other: Color, f: f64) -> Color {
        let mix = |a: u8, b: u8| (a as f64 * (1.0 - f) + b as f64 * f) as u8;
        Color {
            red: mix(self.red, other.red),
            green: mix(self.green, other.green),
            blue: mix(self.blue, other.blue),
        }
    }
}

/// Anything that turns a sample into a pixel color.
pub trait ColorMap: Sync {
    fn map(&self, sample: f64) -> Color;
}

/// Plain grayscale: the sample byte on all three channels.
#[derive(Clone, Copy, Debug, Default)]
pub struct Grayscale;

impl ColorMap for Grayscale {
    fn map(&self, sample: f64) -> Color {
        Color::gray(sample_to_byte(sample))
    }
}

/// Piecewise-linear ramp through three colors, gated by three ascending
/// thresholds. Flat `c1` below the first threshold and flat `c3` from the last.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdGradient {
    pub thresholds: [u8; 3],
    pub colors: [Color; 3],
}

impl ThresholdGradient {
    pub fn new(thresholds: [u8; 3], colors: [Color; 3]) -> Self {
        Self { thresholds, colors }
    }
}

impl ColorMap for ThresholdGradient {
    fn map(&self, sample: f64) -> Color {
        threshold_gradient(sample, self.thresholds, self.colors)
    }
}

/// Cosine-eased bands alternating between two colors every `period` units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlternatingGradient {
    pub period: f64,
    pub c1: Color,
    pub c2: Color,
}

impl AlternatingGradient {
    pub fn new(period: f64, c1: Color, c2: Color) -> Self {
        Self { period, c1, c2 }
    }
}

impl ColorMap for AlternatingGradient {
    fn map(&self, sample: f64) -> Color {
        alternating_gradient(sample, self.period, self.c1, self.c2)
    }
}

/// Piecewise-linear ramp: flat `c1` below the first threshold, flat `c3` from
/// the last one up. Samples outside `[0, 255]` wrap modulo 255 first.
pub fn threshold_gradient(sample: f64, thresholds: [u8; 3], colors: [Color; 3]) -> Color {
    let sample = wrap_sample(sample);
    let [t_red, t_green, t_blue] = thresholds.map(|t| t as f64);
    let [c1, c2, c3] = colors;

    if sample < t_red {
        c1
    } else if sample < t_green {
        c1.lerp(c2, (sample - t_red) / (t_green - t_red))
    } else if sample < t_blue {
        c2.lerp(c3, (sample - t_green) / (t_blue - t_green))
    } else {
        c3
    }
}

/// Triangle-fold the sample into `[0, period/2]`, then ease with a half cosine.
///
/// The half period is real-valued, so an odd period peaks at `c2` between
/// two integer samples rather than on one. Samples wrap modulo 255 first and a
/// zero or non-finite period yields flat `c1`.
pub fn alternating_gradient(sample: f64, period: f64, c1: Color, c2: Color) -> Color {
    if period <= 0.0 || !period.is_finite() {
        return c1;
    }

    let sample = wrap_sample(sample);

    let half = period / 2.0;
    let mut value = sample.rem_euclid(period);
    if value > half {
        value = period - value;
    }

    let f = (1.0 - (PI * value / half).cos()) / 2.0;
    c1.lerp(c2, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Color = Color::new(0, 0, 0);
    const SEA: Color = Color::new(0, 64, 200);
    const SAND: Color = Color::new(230, 210, 120);
    const SNOW: Color = Color::new(250, 250, 250);

    fn ramp() -> ThresholdGradient {
        ThresholdGradient::new([60, 120, 200], [SEA, SAND, SNOW])
    }

    fn close(a: Color, b: Color) -> bool {
        a.to_array()
            .iter()
            .zip(b.to_array().iter())
            .all(|(&x, &y)| (x as i16 - y as i16).abs() <= 1)
    }

    #[test]
    fn test_threshold_flat_regions() {
        let g = ramp();
        assert_eq!(g.map(0.0), SEA);
        assert_eq!(g.map(59.0), SEA);
        assert_eq!(g.map(200.0), SNOW);
        assert_eq!(g.map(255.0), SNOW);
    }

    #[test]
    fn test_threshold_midpoint_blend() {
        let g = ramp();
        // halfway between 60 and 120
        assert_eq!(g.map(90.0), Color::new(115, 137, 160));
    }

    #[test]
    fn test_threshold_continuity() {
        let g = ramp();
        // f == 0 at each threshold matches the segment start
        assert_eq!(g.map(60.0), SEA);
        assert_eq!(g.map(120.0), SAND);
        // f -> 1 just below each threshold matches the next segment's start
        assert!(close(g.map(119.999), SAND));
        assert!(close(g.map(199.999), SNOW));
        assert_eq!(SAND.lerp(SNOW, 1.0), SNOW);
    }

    #[test]
    fn test_alternating_endpoints() {
        // at a multiple of the period f == 0, at the half period f == 1
        assert_eq!(alternating_gradient(0.0, 40.0, BLACK, SNOW), BLACK);
        assert_eq!(alternating_gradient(80.0, 40.0, BLACK, SNOW), BLACK);
        assert_eq!(alternating_gradient(20.0, 40.0, BLACK, SNOW), SNOW);
    }

    #[test]
    fn test_alternating_is_symmetric_fold() {
        for v in 0..20 {
            let up = alternating_gradient(v as f64, 40.0, SEA, SAND);
            let down = alternating_gradient(40.0 - v as f64, 40.0, SEA, SAND);
            assert_eq!(up, down);
        }
    }

    #[test]
    fn test_alternating_periodicity() {
        for period in [3.0, 17.0, 40.0, 255.0] {
            for s in 0..=255 {
                let s = s as f64;
                if s + period > 255.0 {
                    break;
                }
                assert_eq!(
                    alternating_gradient(s, period, SEA, SNOW),
                    alternating_gradient(s + period, period, SEA, SNOW),
                    "sample {} period {}",
                    s,
                    period
                );
            }
        }
    }

    #[test]
    fn test_out_of_range_samples_wrap() {
        let g = ramp();
        assert_eq!(g.map(400.0), g.map(145.0));
        assert_ne!(g.map(400.0), SNOW);
        assert_eq!(g.map(-10.0), g.map(245.0));

        assert_eq!(
            alternating_gradient(300.0, 40.0, SEA, SNOW),
            alternating_gradient(45.0, 40.0, SEA, SNOW)
        );
        assert_ne!(
            alternating_gradient(300.0, 40.0, SEA, SNOW),
            alternating_gradient(20.0, 40.0, SEA, SNOW)
        );
    }

    #[test]
    fn test_alternating_zero_period_is_flat() {
        assert_eq!(alternating_gradient(99.0, 0.0, SEA, SNOW), SEA);
    }

    #[test]
    fn test_grayscale() {
        assert_eq!(Grayscale.map(128.7), Color::gray(128));
    }
}
