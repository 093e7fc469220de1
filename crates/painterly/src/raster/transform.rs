//! Geometric resampling: bilinear scale and rotation.
use glam::Vec2;

use super::Image;
use crate::error::{Error, Result};

/// Bilinear sample at continuous pixel coordinates; taps outside the image read as zero.
fn sample_bilinear(image: &Image, p: Vec2, c: usize) -> f32 {
    let (w, h) = (image.width() as isize, image.height() as isize);
    let x0 = p.x.floor();
    let y0 = p.y.floor();
    let fx = p.x - x0;
    let fy = p.y - y0;
    let (x0, y0) = (x0 as isize, y0 as isize);

    let tap = |x: isize, y: isize| -> f32 {
        if x < 0 || y < 0 || x >= w || y >= h {
            0.0
        } else {
            image.get(x as usize, y as usize, c)
        }
    };

    let top = tap(x0, y0) * (1.0 - fx) + tap(x0 + 1, y0) * fx;
    let bottom = tap(x0, y0 + 1) * (1.0 - fx) + tap(x0 + 1, y0 + 1) * fx;
    top * (1.0 - fy) + bottom * fy
}

/// Resample to `max(1, round(w * factor)) x max(1, round(h * factor))` with bilinear filtering.
pub fn scale_linear(image: &Image, factor: f32) -> Result<Image> {
    image.ensure_non_empty("scaled image")?;
    if !(factor > 0.0 && factor.is_finite()) {
        return Err(Error::InvalidConfig(format!(
            "scale factor must be > 0, got {factor}"
        )));
    }

    let (w, h) = (image.width(), image.height());
    let nw = ((w as f32 * factor).round() as usize).max(1);
    let nh = ((h as f32 * factor).round() as usize).max(1);
    let sx = w as f32 / nw as f32;
    let sy = h as f32 / nh as f32;
    let max = Vec2::new((w - 1) as f32, (h - 1) as f32);

    let mut out = Image::new(nw, nh, image.channels());
    for y in 0..nh {
        for x in 0..nw {
            // Pixel centers line up between source and destination grids.
            let src = Vec2::new((x as f32 + 0.5) * sx - 0.5, (y as f32 + 0.5) * sy - 0.5)
                .clamp(Vec2::ZERO, max);
            for c in 0..image.channels() {
                out.set(x, y, c, sample_bilinear(image, src, c));
            }
        }
    }
    Ok(out)
}

/// Rotate about the center so the image's +x axis points along `(cos angle, sin angle)`.
///
/// The output is the bounding box of the rotated extent; samples falling outside
/// the input image are zero, which keeps rotated alpha masks transparent in
/// their corners.
pub fn rotate(image: &Image, angle: f32) -> Image {
    let (w, h) = (image.width() as f32, image.height() as f32);
    let (sin, cos) = angle.sin_cos();
    // Shave float noise so axis-aligned angles keep their exact extent.
    let nw = ((w * cos.abs() + h * sin.abs()) - 1e-3).ceil().max(1.0) as usize;
    let nh = ((w * sin.abs() + h * cos.abs()) - 1e-3).ceil().max(1.0) as usize;

    let src_center = Vec2::new(w, h) * 0.5;
    let dst_center = Vec2::new(nw as f32, nh as f32) * 0.5;

    let mut out = Image::new(nw, nh, image.channels());
    if image.is_empty() {
        return out;
    }
    for y in 0..nh {
        for x in 0..nw {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - dst_center;
            let q = Vec2::new(cos * p.x + sin * p.y, -sin * p.x + cos * p.y) + src_center
                - Vec2::splat(0.5);
            for c in 0..image.channels() {
                out.set(x, y, c, sample_bilinear(image, q, c));
            }
        }
    }
    out
}
