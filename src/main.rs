use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{error, info};

use procedural_textures::export::{self, OutputFormat};
use procedural_textures::rng::{LcgParams, RandomStrategy};
use procedural_textures::{Pipeline, TextureConfig, TextureError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Generator {
    /// ChaCha8 stream (default)
    Chacha,
    /// Linear congruential generator
    Lcg,
}

#[derive(Parser, Debug)]
#[command(name = "procedural_textures")]
#[command(about = "Generate value-noise textures from a texture description file")]
struct Args {
    /// Texture description (34-byte binary file, or JSON with --json)
    file: PathBuf,

    /// Read FILE as JSON instead of the binary format
    #[arg(long)]
    json: bool,

    /// Directory the images are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Image encoding
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Bmp)]
    format: OutputFormat,

    /// Override the seed stored in the file
    #[arg(short, long)]
    seed: Option<u32>,

    /// Random sample source
    #[arg(long, value_enum, default_value_t = Generator::Chacha)]
    generator: Generator,

    /// LCG multiplier (with --generator lcg)
    #[arg(long)]
    lcg_factor: Option<u64>,

    /// LCG increment (with --generator lcg)
    #[arg(long)]
    lcg_offset: Option<u64>,

    /// LCG modulus (with --generator lcg)
    #[arg(long)]
    lcg_modulus: Option<u64>,

    /// Print the parsed description as JSON and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn strategy(&self) -> Result<RandomStrategy, TextureError> {
        match self.generator {
            Generator::Chacha => Ok(RandomStrategy::ChaCha),
            Generator::Lcg => {
                let default = LcgParams::default();
                let params = LcgParams::new(
                    self.lcg_factor.unwrap_or(default.factor()),
                    self.lcg_offset.unwrap_or(default.offset()),
                    self.lcg_modulus.unwrap_or(default.modulus()),
                )?;
                Ok(RandomStrategy::Lcg(params))
            }
        }
    }
}

fn run(args: &Args) -> Result<(), TextureError> {
    let mut config = if args.json {
        TextureConfig::load_json(&args.file)?
    } else {
        TextureConfig::load(&args.file)?
    };
    if let Some(seed) = args.seed {
        config.noise.seed = seed;
    }

    if args.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    info!("Init.");
    let pipeline = Pipeline::new(config)?.with_strategy(args.strategy()?);
    let fields = pipeline.run()?;

    let written = export::save_all(&fields, &config.gradient, &args.output_dir, args.format)?;
    info!("Wrote {} images to {}", written.len(), args.output_dir.display());
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
