//! Alpha-mask stamping of a single stroke.
use crate::error::{Error, Result};
use crate::raster::Image;

/// Blend `color` into `canvas` through the alpha mask `texture`, centered at `(x, y)`.
///
/// Every canvas sample under the mask becomes `alpha * color + (1 - alpha) * old`,
/// with alpha read from the texture's first channel. When the anchor is closer
/// to any canvas edge than half the texture's width or height the whole stamp
/// is skipped; nothing is clipped. Returns whether the stamp was applied.
pub fn stamp(canvas: &mut Image, x: usize, y: usize, color: &[f32], texture: &Image) -> Result<bool> {
    texture.ensure_non_empty("brush texture")?;
    if color.len() != canvas.channels() {
        return Err(Error::ChannelMismatch {
            role: "stroke color",
            expected: canvas.channels(),
            found: color.len(),
        });
    }

    let half_w = texture.width() / 2;
    let half_h = texture.height() / 2;
    if x < half_w || y < half_h || x + half_w >= canvas.width() || y + half_h >= canvas.height() {
        return Ok(false);
    }

    let left = x - half_w;
    let top = y - half_h;
    for ty in 0..texture.height() {
        for tx in 0..texture.width() {
            let alpha = texture.get(tx, ty, 0);
            if alpha == 0.0 {
                continue;
            }
            let px = canvas.pixel_mut(left + tx, top + ty);
            for (dst, &src) in px.iter_mut().zip(color) {
                *dst = alpha * src + (1.0 - alpha) * *dst;
            }
        }
    }
    Ok(true)
}
