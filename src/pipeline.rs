//! End-to-end texture synthesis: random field, octave composite, smoothing.

use log::{debug, info};

use crate::config::TextureConfig;
use crate::error::{ConfigError, TextureError};
use crate::field::ScalarField;
use crate::octaves::OctaveCompositor;
use crate::rng::{RandomFieldGenerator, RandomStrategy};
use crate::smoothing;

/// Every field produced by one pipeline run.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureFields {
    /// Raw per-cell random samples
    pub random: ScalarField,
    /// Normalized multi-octave composite
    pub composite: ScalarField,
    /// Box-blurred composite, present when the smoothing radius is non-zero
    pub smoothed: Option<ScalarField>,
}

/// A validated texture description ready to run.
#[derive(Clone, Copy, Debug)]
pub struct Pipeline {
    config: TextureConfig,
    generator: RandomFieldGenerator,
    compositor: OctaveCompositor,
}

impl Pipeline {
    pub fn new(config: TextureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            generator: RandomFieldGenerator::default(),
            compositor: OctaveCompositor::from_params(&config.noise)?,
        })
    }

    /// Use a different random sample source.
    pub fn with_strategy(mut self, strategy: RandomStrategy) -> Self {
        self.generator = RandomFieldGenerator::new(strategy);
        self
    }

    pub fn config(&self) -> &TextureConfig {
        &self.config
    }

    pub fn generate_random(&self) -> Result<ScalarField, TextureError> {
        let noise = &self.config.noise;
        info!("Random layer ({}x{}, seed {}, {})", noise.size, noise.size, noise.seed, self.generator.strategy());
        self.generator.generate(noise.size(), noise.seed)
    }

    pub fn compose(&self, random: &ScalarField) -> Result<ScalarField, TextureError> {
        let noise = &self.config.noise;
        info!(
            "Composing {} octaves (frequency {}, persistence {})",
            noise.octaves, noise.frequency, noise.persistence
        );
        let composite = self.compositor.compose(random)?;
        let (lo, hi) = composite.min_max();
        debug!("Composite range [{:.3}, {:.3}]", lo, hi);
        Ok(composite)
    }

    /// Smoothed copy of `composite`, or `None` when smoothing is disabled.
    pub fn smooth(&self, composite: &ScalarField) -> Result<Option<ScalarField>, TextureError> {
        match self.config.noise.smoothing_radius() {
            0 => Ok(None),
            radius => {
                info!("Smoothing with radius {}", radius);
                smoothing::smooth(composite, radius).map(Some)
            }
        }
    }

    pub fn run(&self) -> Result<TextureFields, TextureError> {
        let random = self.generate_random()?;
        let composite = self.compose(&random)?;
        let smoothed = self.smooth(&composite)?;
        Ok(TextureFields {
            random,
            composite,
            smoothed,
        })
    }
}
