//! Profiling tool for the texture pipeline stages

use std::time::Instant;

use procedural_textures::gradient::Grayscale;
use procedural_textures::octaves::OctaveCompositor;
use procedural_textures::{export, rng, smoothing, TextureConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut config = TextureConfig::default();
    config.noise.size = 1024;
    config.noise.octaves = 8;
    config.noise.smoothing = 4;
    let noise = config.noise;

    println!("=== Performance Profiling ===");
    println!("Texture size: {}x{} ({} cells)", noise.size, noise.size, noise.size as u64 * noise.size as u64);
    println!("Octaves: {}, frequency: {}, persistence: {}", noise.octaves, noise.frequency, noise.persistence);
    println!();

    let start = Instant::now();
    let random = rng::generate(noise.size(), noise.seed)?;
    println!("Random field: {:?}", start.elapsed());

    let compositor = OctaveCompositor::from_params(&noise)?;
    let start = Instant::now();
    let composite = compositor.compose(&random)?;
    println!("Octave composition: {:?}", start.elapsed());

    let start = Instant::now();
    let smoothed = smoothing::smooth(&composite, noise.smoothing_radius())?;
    println!("Smoothing (radius {}): {:?}", noise.smoothing, start.elapsed());

    let start = Instant::now();
    let _gray = export::render(&smoothed, &Grayscale);
    let _rgb = export::render(&smoothed, &config.gradient.threshold_gradient());
    let _alt = export::render(&smoothed, &config.gradient.alternating_gradient());
    println!("Rendering (3 images): {:?}", start.elapsed());

    Ok(())
}
