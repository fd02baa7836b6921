//! Procedural texture generation library
//!
//! Value noise built from a seeded random field, composed over several
//! octaves, optionally smoothed, and mapped to color gradients.

pub mod config;
pub mod error;
pub mod export;
pub mod field;
pub mod gradient;
pub mod octaves;
pub mod pipeline;
pub mod rng;
pub mod smoothing;

pub use config::{GradientSpec, NoiseParameters, TextureConfig};
pub use error::{ConfigError, TextureError};
pub use field::ScalarField;
pub use gradient::Color;
pub use pipeline::{Pipeline, TextureFields};
