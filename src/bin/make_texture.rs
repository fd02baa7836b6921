//! Write a texture description file from command-line values or JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use procedural_textures::{Color, ConfigError, TextureConfig};

#[derive(Parser, Debug)]
#[command(name = "make_texture")]
#[command(about = "Create a binary texture description for procedural_textures")]
struct Args {
    /// Output path
    output: PathBuf,

    /// Start from a JSON description instead of the defaults
    #[arg(long)]
    from_json: Option<PathBuf>,

    /// Write JSON instead of the 34-byte binary format
    #[arg(long)]
    json: bool,

    #[arg(long)]
    seed: Option<u32>,

    #[arg(long)]
    octaves: Option<u16>,

    #[arg(long)]
    frequency: Option<u16>,

    #[arg(long)]
    persistence: Option<f64>,

    /// Side length of the texture in pixels
    #[arg(long)]
    size: Option<u32>,

    /// Box blur radius (0 disables the smoothed images)
    #[arg(long)]
    smoothing: Option<u16>,

    /// Three ascending thresholds, e.g. 90,140,200
    #[arg(long, value_delimiter = ',', num_args = 3)]
    thresholds: Option<Vec<u8>>,

    /// Gradient colors as nine bytes r,g,b,r,g,b,r,g,b
    #[arg(long, value_delimiter = ',', num_args = 9)]
    colors: Option<Vec<u8>>,
}

fn build(args: &Args) -> Result<TextureConfig, ConfigError> {
    let mut config = match &args.from_json {
        Some(path) => TextureConfig::load_json(path)?,
        None => TextureConfig::default(),
    };

    let noise = &mut config.noise;
    noise.seed = args.seed.unwrap_or(noise.seed);
    noise.octaves = args.octaves.unwrap_or(noise.octaves);
    noise.frequency = args.frequency.unwrap_or(noise.frequency);
    noise.persistence = args.persistence.unwrap_or(noise.persistence);
    noise.size = args.size.unwrap_or(noise.size);
    noise.smoothing = args.smoothing.unwrap_or(noise.smoothing);

    if let Some(&[red, green, blue]) = args.thresholds.as_deref() {
        config.gradient.thresholds = [red, green, blue];
    }
    if let Some(c) = &args.colors {
        for (color, rgb) in config.gradient.colors.iter_mut().zip(c.chunks(3)) {
            *color = Color::new(rgb[0], rgb[1], rgb[2]);
        }
    }

    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> Result<(), ConfigError> {
    let config = build(args)?;
    if args.json {
        std::fs::write(&args.output, config.to_json()?)?;
    } else {
        config.save(&args.output)?;
    }
    info!("Wrote texture description to {}", args.output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
