//! Error types for texture generation.

/// Malformed or out-of-range texture parameters.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Wrongly formatted texture file: expected {expected} bytes, found {actual}")]
    WrongFileSize { expected: usize, actual: usize },
    #[error("Octave count must be at least 1")]
    ZeroOctaves,
    #[error("Base frequency must be at least 1")]
    ZeroFrequency,
    #[error("Texture size must be at least 1")]
    ZeroSize,
    #[error("Thresholds must be strictly ascending, got red={red} green={green} blue={blue}")]
    ThresholdsNotAscending { red: u8, green: u8, blue: u8 },
    #[error("Persistence must be a finite positive number, got {0}")]
    InvalidPersistence(f64),
    #[error("Invalid linear congruential parameters: {0}")]
    InvalidLcg(String),
    #[error("Could not read texture file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse JSON texture description: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything that can stop the pipeline.
#[derive(thiserror::Error, Debug)]
pub enum TextureError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Could not allocate a field of {cells} samples")]
    Allocation { cells: usize },
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
