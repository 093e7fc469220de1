//! Pre-scaled, pre-rotated brush footprints.
use std::f32::consts::TAU;

use tracing::debug;

use crate::error::{Error, Result};
use crate::field::normalize_angle;
use crate::raster::{rotate, scale_linear, Image};

/// A brush texture scaled to one footprint size and rotated to evenly spaced angles.
///
/// Footprints are single-channel alpha masks. Angle `i` of `n` is `i * 2π / n`;
/// [`BrushSet::for_angle`] snaps any orientation to the nearest one.
#[derive(Clone, Debug)]
pub struct BrushSet {
    footprint: usize,
    footprints: Vec<Image>,
}

impl BrushSet {
    /// Scale `texture` so its larger side equals `footprint`, then rotate it to `num_angles` angles.
    pub fn new(texture: &Image, footprint: usize, num_angles: usize) -> Result<Self> {
        texture.ensure_non_empty("brush texture")?;
        if footprint == 0 {
            return Err(Error::InvalidConfig("brush footprint must be >= 1".into()));
        }
        if num_angles == 0 {
            return Err(Error::InvalidConfig("num_angles must be >= 1".into()));
        }

        let alpha = texture.channel(0)?;
        let factor = footprint as f32 / texture.width().max(texture.height()) as f32;
        let scaled = scale_linear(&alpha, factor)?;
        let step = TAU / num_angles as f32;
        let footprints = (0..num_angles)
            .map(|i| {
                if i == 0 {
                    scaled.clone()
                } else {
                    rotate(&scaled, step * i as f32)
                }
            })
            .collect();

        debug!(
            "Brush set footprint={} scaled={}x{} angles={}.",
            footprint,
            scaled.width(),
            scaled.height(),
            num_angles
        );
        Ok(Self {
            footprint,
            footprints,
        })
    }

    /// A single footprint that ignores orientation.
    pub fn unrotated(texture: &Image, footprint: usize) -> Result<Self> {
        Self::new(texture, footprint, 1)
    }

    /// Requested footprint size (the scaled texture's larger side).
    pub fn footprint(&self) -> usize {
        self.footprint
    }

    /// Number of pre-rotated angles.
    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }

    /// Index of the pre-rotated footprint nearest to `angle`.
    pub fn index_for(&self, angle: f32) -> usize {
        let n = self.footprints.len();
        let step = TAU / n as f32;
        (normalize_angle(angle) / step).round() as usize % n
    }

    /// Footprint nearest to `angle` (radians).
    pub fn for_angle(&self, angle: f32) -> &Image {
        &self.footprints[self.index_for(angle)]
    }

    pub fn footprints(&self) -> &[Image] {
        &self.footprints
    }
}
