//! Separable Gaussian blur, Sobel gradients and luminance extraction.
//!
//! Every filter here works on any channel count and processes channels
//! independently, except [`luminance`] which always produces one channel.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::Image;
use crate::error::{Error, Result};

/// Truncation (in standard deviations) used when a blur does not specify one.
pub const DEFAULT_TRUNCATE: f32 = 3.0;

/// Luma weights used to collapse RGB into a single luminance channel.
pub const LUMINANCE_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

const SOBEL_X: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// How samples outside the image are treated by the blur.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Boundary {
    /// Replicate the nearest edge pixel.
    #[default]
    Clamp,
    /// Treat everything outside as black.
    Zero,
}

/// Normalized 1D Gaussian kernel with radius `ceil(sigma * truncate)`.
pub fn gaussian_kernel(sigma: f32, truncate: f32) -> Result<Vec<f32>> {
    if !(sigma > 0.0 && sigma.is_finite()) {
        return Err(Error::InvalidConfig(format!(
            "blur sigma must be > 0, got {sigma}"
        )));
    }
    if !(truncate > 0.0 && truncate.is_finite()) {
        return Err(Error::InvalidConfig(format!(
            "blur truncate must be > 0, got {truncate}"
        )));
    }

    let radius = (sigma * truncate).ceil() as isize;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for k in kernel.iter_mut() {
        *k /= sum;
    }
    Ok(kernel)
}

/// Separable Gaussian blur of every channel.
pub fn gaussian_blur(image: &Image, sigma: f32, truncate: f32, boundary: Boundary) -> Result<Image> {
    let kernel = gaussian_kernel(sigma, truncate)?;
    trace!(
        "Gaussian blur sigma={} taps={} on {}x{}x{}.",
        sigma,
        kernel.len(),
        image.width(),
        image.height(),
        image.channels()
    );
    let horizontal = convolve_axis(image, &kernel, boundary, Axis::X);
    Ok(convolve_axis(&horizontal, &kernel, boundary, Axis::Y))
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn convolve_axis(image: &Image, kernel: &[f32], boundary: Boundary, axis: Axis) -> Image {
    let (w, h, channels) = (image.width(), image.height(), image.channels());
    let mut out = Image::new(w, h, channels);
    if image.is_empty() {
        return out;
    }
    let radius = (kernel.len() / 2) as isize;
    let extent = match axis {
        Axis::X => w as isize,
        Axis::Y => h as isize,
    };

    for y in 0..h {
        for x in 0..w {
            let along = match axis {
                Axis::X => x as isize,
                Axis::Y => y as isize,
            };
            for c in 0..channels {
                let mut acc = 0.0;
                for (k, weight) in kernel.iter().enumerate() {
                    let mut pos = along + k as isize - radius;
                    if pos < 0 || pos >= extent {
                        match boundary {
                            Boundary::Zero => continue,
                            Boundary::Clamp => pos = pos.clamp(0, extent - 1),
                        }
                    }
                    let sample = match axis {
                        Axis::X => image.get(pos as usize, y, c),
                        Axis::Y => image.get(x, pos as usize, c),
                    };
                    acc += weight * sample;
                }
                out.set(x, y, c, acc);
            }
        }
    }
    out
}

fn convolve3x3(image: &Image, kernel: &[[f32; 3]; 3]) -> Image {
    let (w, h, channels) = (image.width(), image.height(), image.channels());
    let mut out = Image::new(w, h, channels);
    if image.is_empty() {
        return out;
    }

    for y in 0..h {
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
            for c in 0..channels {
                let mut sum = 0.0;
                for (row, &yy) in kernel.iter().zip(y_idx.iter()) {
                    for (&weight, &xx) in row.iter().zip(x_idx.iter()) {
                        sum += weight * image.get(xx, yy, c);
                    }
                }
                out.set(x, y, c, sum);
            }
        }
    }
    out
}

/// Horizontal derivative (Sobel, clamped borders).
pub fn gradient_x(image: &Image) -> Image {
    convolve3x3(image, &SOBEL_X)
}

/// Vertical derivative (Sobel, clamped borders).
pub fn gradient_y(image: &Image) -> Image {
    convolve3x3(image, &SOBEL_Y)
}

/// Collapse an RGB image to one luminance channel. Single-channel input is copied.
pub fn luminance(image: &Image) -> Result<Image> {
    match image.channels() {
        1 => Ok(image.clone()),
        3 => {
            let data: Vec<f32> = image
                .as_slice()
                .chunks_exact(3)
                .map(|px| {
                    px.iter()
                        .zip(LUMINANCE_WEIGHTS.iter())
                        .map(|(v, w)| v * w)
                        .sum::<f32>()
                })
                .collect();
            Image::from_vec(image.width(), image.height(), 1, data)
        }
        found => Err(Error::ChannelMismatch {
            role: "luminance input",
            expected: 3,
            found,
        }),
    }
}
