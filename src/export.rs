//! Rendering fields to RGB images and writing them to disk.

use std::path::{Path, PathBuf};

use image::{ImageBuffer, ImageFormat, RgbImage};
use log::info;
use rayon::prelude::*;

use crate::config::GradientSpec;
use crate::error::TextureError;
use crate::field::ScalarField;
use crate::gradient::{ColorMap, Grayscale};
use crate::pipeline::TextureFields;

/// Encoding used for written images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Bmp,
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Bmp => "bmp",
            OutputFormat::Png => "png",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Png => ImageFormat::Png,
        }
    }
}

/// The images a run can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Output {
    Random,
    Grayscale,
    Rgb,
    Alternating,
    GrayscaleSmooth,
    RgbSmooth,
    AlternatingSmooth,
}

impl Output {
    pub fn file_stem(&self) -> &'static str {
        match self {
            Output::Random => "random",
            Output::Grayscale => "gs",
            Output::Rgb => "rgb",
            Output::Alternating => "alt",
            Output::GrayscaleSmooth => "gs_smooth",
            Output::RgbSmooth => "rgb_smooth",
            Output::AlternatingSmooth => "alt_smooth",
        }
    }

    pub fn file_name(&self, format: OutputFormat) -> String {
        format!("{}.{}", self.file_stem(), format.extension())
    }
}

/// Render `field` through `map`, one pixel per cell.
///
/// Field rows run along the image x axis: pixel `(x, y)` shows cell
/// `(row = x, col = y)`.
pub fn render(field: &ScalarField, map: &dyn ColorMap) -> RgbImage {
    let size = field.size();
    let mut img: RgbImage = ImageBuffer::new(size as u32, size as u32);

    img.par_chunks_mut(size * 3).enumerate().for_each(|(y, pixels)| {
        for (x, px) in pixels.chunks_mut(3).enumerate() {
            px.copy_from_slice(&map.map(field.get(x, y)).to_array());
        }
    });

    img
}

pub fn render_grayscale(field: &ScalarField) -> RgbImage {
    render(field, &Grayscale)
}

/// Every image for a finished run, in the order they are written.
pub fn render_all(fields: &TextureFields, gradient: &GradientSpec) -> Vec<(Output, RgbImage)> {
    let rgb = gradient.threshold_gradient();
    let alt = gradient.alternating_gradient();

    let mut images = vec![
        (Output::Random, render_grayscale(&fields.random)),
        (Output::Grayscale, render_grayscale(&fields.composite)),
        (Output::Rgb, render(&fields.composite, &rgb)),
        (Output::Alternating, render(&fields.composite, &alt)),
    ];

    if let Some(smoothed) = &fields.smoothed {
        images.push((Output::GrayscaleSmooth, render_grayscale(smoothed)));
        images.push((Output::RgbSmooth, render(smoothed, &rgb)));
        images.push((Output::AlternatingSmooth, render(smoothed, &alt)));
    }

    images
}

pub fn save_image<P: AsRef<Path>>(img: &RgbImage, path: P, format: OutputFormat) -> Result<(), TextureError> {
    img.save_with_format(path, format.image_format())?;
    Ok(())
}

/// Render and write every image into `dir`, returning the written paths.
pub fn save_all<P: AsRef<Path>>(
    fields: &TextureFields,
    gradient: &GradientSpec,
    dir: P,
    format: OutputFormat,
) -> Result<Vec<PathBuf>, TextureError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for (output, img) in render_all(fields, gradient) {
        let path = dir.join(output.file_name(format));
        info!("Writing {}", path.display());
        save_image(&img, &path, format)?;
        written.push(path);
    }
    Ok(written)
}
