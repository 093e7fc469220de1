use std::path::Path;

use anyhow::{anyhow, Context};
use image::{Rgb, RgbImage};
use painterly::raster::Image;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::procedural::procedural_source;

/// Side of the procedural source used when no input file is given.
const DEFAULT_SOURCE_SIZE: usize = 320;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Decode any supported file into a three-channel image with values in `[0, 1]`.
pub fn load_rgb(path: impl AsRef<Path>) -> anyhow::Result<Image> {
    let path = path.as_ref();
    let rgb = image::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .to_rgb8();
    let (width, height) = rgb.dimensions();
    let data = rgb
        .as_raw()
        .iter()
        .map(|v| f32::from(*v) / 255.0)
        .collect();
    Ok(Image::from_vec(width as usize, height as usize, 3, data)?)
}

/// Encode a three-channel `[0, 1]` image as an 8-bit PNG.
pub fn save_rgb_png(image: &Image, path: impl AsRef<Path>) -> anyhow::Result<()> {
    if image.channels() != 3 {
        return Err(anyhow!(
            "expected a three-channel image, got {} channels",
            image.channels()
        ));
    }
    let (width, height) = image.size();
    let mut out = RgbImage::new(width as u32, height as u32);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let src = image.pixel(x as usize, y as usize);
        *px = Rgb([to_u8(src[0]), to_u8(src[1]), to_u8(src[2])]);
    }
    let path = path.as_ref();
    out.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote {}.", path.display());
    Ok(())
}

/// The image named by the first command-line argument, or the procedural source.
pub fn source_from_args() -> anyhow::Result<Image> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading source {}.", path);
            load_rgb(path)
        }
        None => Ok(procedural_source(DEFAULT_SOURCE_SIZE, DEFAULT_SOURCE_SIZE)),
    }
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
