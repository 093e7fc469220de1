//! The stroke descriptor passed from the sampler to the stamper.
use glam::{UVec2, Vec3};

/// Perceptual weights used to order strokes by brightness.
pub const LUMA_WEIGHTS: Vec3 = Vec3::new(0.3, 0.6, 0.1);

/// One accepted sample: where to stamp, with which color, along which direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// Anchor pixel (the footprint is centered here).
    pub position: UVec2,
    /// Source color after jitter.
    pub color: Vec3,
    /// Stroke direction in `[0, 2π)`.
    pub angle: f32,
    /// Position in the sampler's acceptance order within its pass.
    pub sequence: usize,
}

impl Stroke {
    pub fn new(position: UVec2, color: Vec3, angle: f32, sequence: usize) -> Self {
        Self {
            position,
            color,
            angle,
            sequence,
        }
    }

    /// `0.3 R + 0.6 G + 0.1 B` of the jittered color.
    #[inline]
    pub fn luma(&self) -> f32 {
        self.color.dot(LUMA_WEIGHTS)
    }
}
