//! Texture description: noise parameters plus gradient colors.
//!
//! The canonical on-disk form is a fixed 34-byte little-endian record:
//!
//! | field | bytes |
//! |---|---|
//! | seed | 4 (u32) |
//! | octaves | 2 (u16) |
//! | frequency | 2 (u16) |
//! | persistence | 8 (f64) |
//! | width | 4 (u32) |
//! | threshold red, green, blue | 1 each |
//! | color1, color2, color3 (r, g, b) | 1 each |
//! | smoothing radius | 2 (u16) |
//!
//! A JSON form of the same record is accepted for hand editing.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gradient::{AlternatingGradient, Color, ThresholdGradient};

/// Exact length of a binary texture file.
pub const TEXTURE_FILE_SIZE: usize = 4 + 2 + 2 + 8 + 4 + 3 + 9 + 2;

/// Shape of the noise field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseParameters {
    pub seed: u32,
    /// Number of octaves (>= 1)
    pub octaves: u16,
    /// Base control-grid density (>= 1)
    pub frequency: u16,
    /// Amplitude decay per octave
    pub persistence: f64,
    /// Side length of the square field
    pub size: u32,
    /// Box blur radius, 0 disables smoothing
    pub smoothing: u16,
}

impl NoiseParameters {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.octaves == 0 {
            return Err(ConfigError::ZeroOctaves);
        }
        if self.frequency == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        if self.size == 0 {
            return Err(ConfigError::ZeroSize);
        }
        if !self.persistence.is_finite() || self.persistence <= 0.0 {
            return Err(ConfigError::InvalidPersistence(self.persistence));
        }
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    pub fn smoothing_radius(&self) -> usize {
        self.smoothing as usize
    }
}

/// Colors and thresholds for both gradient visualizations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientSpec {
    /// Red, green and blue thresholds, strictly ascending
    pub thresholds: [u8; 3],
    pub colors: [Color; 3],
}

impl GradientSpec {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [red, green, blue] = self.thresholds;
        if red < green && green < blue {
            Ok(())
        } else {
            Err(ConfigError::ThresholdsNotAscending { red, green, blue })
        }
    }

    pub fn threshold_gradient(&self) -> ThresholdGradient {
        ThresholdGradient::new(self.thresholds, self.colors)
    }

    /// Bands of `color1`/`color2` repeating every `threshold_red` units.
    pub fn alternating_gradient(&self) -> AlternatingGradient {
        AlternatingGradient::new(self.thresholds[0] as f64, self.colors[0], self.colors[1])
    }
}

/// A complete, validated texture description.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureConfig {
    pub noise: NoiseParameters,
    pub gradient: GradientSpec,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            noise: NoiseParameters {
                seed: 42,
                octaves: 6,
                frequency: 2,
                persistence: 0.5,
                size: 256,
                smoothing: 0,
            },
            gradient: GradientSpec {
                thresholds: [90, 140, 200],
                colors: [
                    Color::new(20, 40, 140),
                    Color::new(60, 160, 70),
                    Color::new(240, 240, 250),
                ],
            },
        }
    }
}

impl TextureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.noise.validate()?;
        self.gradient.validate()
    }

    /// Parse and validate a binary texture record.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() != TEXTURE_FILE_SIZE {
            return Err(ConfigError::WrongFileSize {
                expected: TEXTURE_FILE_SIZE,
                actual: bytes.len(),
            });
        }

        let mut reader = ByteReader::new(bytes);
        let seed = u32::from_le_bytes(reader.take()?);
        let octaves = u16::from_le_bytes(reader.take()?);
        let frequency = u16::from_le_bytes(reader.take()?);
        let persistence = f64::from_le_bytes(reader.take()?);
        let size = u32::from_le_bytes(reader.take()?);
        let thresholds: [u8; 3] = reader.take()?;
        let mut colors = [Color::default(); 3];
        for color in colors.iter_mut() {
            let [red, green, blue] = reader.take::<3>()?;
            *color = Color::new(red, green, blue);
        }
        let smoothing = u16::from_le_bytes(reader.take()?);

        let config = Self {
            noise: NoiseParameters {
                seed,
                octaves,
                frequency,
                persistence,
                size,
                smoothing,
            },
            gradient: GradientSpec { thresholds, colors },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_bytes(&self) -> [u8; TEXTURE_FILE_SIZE] {
        let mut out = [0u8; TEXTURE_FILE_SIZE];
        let mut pos = 0;
        let mut put = |bytes: &[u8]| {
            out[pos..pos + bytes.len()].copy_from_slice(bytes);
            pos += bytes.len();
        };

        put(&self.noise.seed.to_le_bytes());
        put(&self.noise.octaves.to_le_bytes());
        put(&self.noise.frequency.to_le_bytes());
        put(&self.noise.persistence.to_le_bytes());
        put(&self.noise.size.to_le_bytes());
        put(&self.gradient.thresholds);
        for color in &self.gradient.colors {
            put(&color.to_array());
        }
        put(&self.noise.smoothing.to_le_bytes());
        out
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path, self.to_bytes())?;
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], ConfigError> {
        let chunk = self
            .buf
            .get(self.pos..self.pos + N)
            .and_then(|slice| <[u8; N]>::try_from(slice).ok())
            .ok_or(ConfigError::WrongFileSize {
                expected: TEXTURE_FILE_SIZE,
                actual: self.buf.len(),
            })?;
        self.pos += N;
        Ok(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1234u32.to_le_bytes());
        bytes.extend_from_slice(&5u16.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&0.65f64.to_le_bytes());
        bytes.extend_from_slice(&128u32.to_le_bytes());
        bytes.extend_from_slice(&[70, 130, 210]);
        bytes.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        bytes.extend_from_slice(&3u16.to_le_bytes());
        bytes
    }

    #[test]
    fn test_file_size_constant() {
        assert_eq!(TEXTURE_FILE_SIZE, 34);
        assert_eq!(sample_bytes().len(), TEXTURE_FILE_SIZE);
    }

    #[test]
    fn test_parse_fields_in_order() {
        let config = TextureConfig::from_bytes(&sample_bytes()).unwrap();
        assert_eq!(config.noise.seed, 1234);
        assert_eq!(config.noise.octaves, 5);
        assert_eq!(config.noise.frequency, 2);
        assert_eq!(config.noise.persistence, 0.65);
        assert_eq!(config.noise.size, 128);
        assert_eq!(config.noise.smoothing, 3);
        assert_eq!(config.gradient.thresholds, [70, 130, 210]);
        assert_eq!(config.gradient.colors[0], Color::new(1, 2, 3));
        assert_eq!(config.gradient.colors[2], Color::new(7, 8, 9));
        assert_eq!(config.to_bytes().to_vec(), sample_bytes());
    }

    #[test]
    fn test_wrong_size_rejected() {
        let mut bytes = sample_bytes();
        bytes.push(0);
        assert!(matches!(
            TextureConfig::from_bytes(&bytes),
            Err(ConfigError::WrongFileSize { expected: 34, actual: 35 })
        ));
        assert!(matches!(
            TextureConfig::from_bytes(&bytes[..10]),
            Err(ConfigError::WrongFileSize { actual: 10, .. })
        ));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut bytes = sample_bytes();
        bytes[4..6].copy_from_slice(&0u16.to_le_bytes());
        assert!(matches!(TextureConfig::from_bytes(&bytes), Err(ConfigError::ZeroOctaves)));

        let mut bytes = sample_bytes();
        bytes[6..8].copy_from_slice(&0u16.to_le_bytes());
        assert!(matches!(TextureConfig::from_bytes(&bytes), Err(ConfigError::ZeroFrequency)));

        let mut bytes = sample_bytes();
        bytes[16..20].copy_from_slice(&0u32.to_le_bytes());
        assert!(matches!(TextureConfig::from_bytes(&bytes), Err(ConfigError::ZeroSize)));

        let mut bytes = sample_bytes();
        bytes[20..23].copy_from_slice(&[130, 130, 210]);
        assert!(matches!(
            TextureConfig::from_bytes(&bytes),
            Err(ConfigError::ThresholdsNotAscending { red: 130, green: 130, blue: 210 })
        ));

        let mut bytes = sample_bytes();
        bytes[8..16].copy_from_slice(&f64::INFINITY.to_le_bytes());
        assert!(matches!(
            TextureConfig::from_bytes(&bytes),
            Err(ConfigError::InvalidPersistence(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texture.bin");

        let config = TextureConfig::default();
        config.save(&path).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), TEXTURE_FILE_SIZE as u64);
        assert_eq!(TextureConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextureConfig::load(dir.path().join("missing.bin")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_json_form() {
        let config = TextureConfig::default();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"persistence\": 0.5"));
        assert_eq!(TextureConfig::from_json(&json).unwrap(), config);

        let bad = json.replace("\"octaves\": 6", "\"octaves\": 0");
        assert!(matches!(TextureConfig::from_json(&bad), Err(ConfigError::ZeroOctaves)));
    }

    #[test]
    fn test_alternating_uses_red_threshold_and_first_colors() {
        let config = TextureConfig::default();
        let alt = config.gradient.alternating_gradient();
        assert_eq!(alt.period, 90.0);
        assert_eq!(alt.c1, config.gradient.colors[0]);
        assert_eq!(alt.c2, config.gradient.colors[1]);
    }
}
