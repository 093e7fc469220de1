//! Stroke orientation from the smoothed structure tensor of the source luminance.
//!
//! Per pixel, the outer product of the luminance gradient is aggregated over a
//! neighbourhood; the eigenvector of the smaller eigenvalue of that 2x2 tensor
//! points along the dominant edge, which is where strokes should run.
use std::f32::consts::TAU;

use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::raster::{
    gaussian_blur, gradient_x, gradient_y, luminance, Boundary, Image, DEFAULT_TRUNCATE,
};

/// Parameters of the orientation estimate.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientationParams {
    /// Pre-blur of the luminance before differentiation.
    pub sigma: f32,
    /// The tensor field is aggregated at `sigma * factor`.
    pub factor: f32,
}

impl Default for OrientationParams {
    fn default() -> Self {
        Self {
            sigma: 3.0,
            factor: 5.0,
        }
    }
}

impl OrientationParams {
    pub fn new(sigma: f32, factor: f32) -> Self {
        Self { sigma, factor }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.sigma > 0.0 && self.sigma.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "orientation sigma must be > 0, got {}",
                self.sigma
            )));
        }
        if !(self.factor > 0.0 && self.factor.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "orientation factor must be > 0, got {}",
                self.factor
            )));
        }
        Ok(())
    }
}

/// Symmetric 2x2 matrix `[[xx, xy], [xy, yy]]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StructureTensor {
    pub xx: f32,
    pub xy: f32,
    pub yy: f32,
}

impl StructureTensor {
    pub fn new(xx: f32, xy: f32, yy: f32) -> Self {
        Self { xx, xy, yy }
    }

    /// Outer product of a gradient with itself.
    pub fn from_gradient(g: Vec2) -> Self {
        Self {
            xx: g.x * g.x,
            xy: g.x * g.y,
            yy: g.y * g.y,
        }
    }

    /// Eigenvalues as `(smaller, larger)`.
    pub fn eigenvalues(&self) -> (f32, f32) {
        let half_trace = 0.5 * (self.xx + self.yy);
        // sqrt((tr/2)^2 - det) rewritten to stay non-negative under rounding.
        let half_diff = 0.5 * (self.xx - self.yy);
        let radius = (half_diff * half_diff + self.xy * self.xy).sqrt();
        (half_trace - radius, half_trace + radius)
    }

    /// Unit eigenvector of the smaller eigenvalue.
    ///
    /// Isotropic tensors have no preferred direction; they report the x axis.
    pub fn minor_axis(&self) -> Vec2 {
        let (lambda, _) = self.eigenvalues();
        // Each row of (T - lambda I) v = 0 gives a candidate; keep the better conditioned one.
        let from_first_row = Vec2::new(self.xy, lambda - self.xx);
        let from_second_row = Vec2::new(lambda - self.yy, self.xy);
        let v = if from_first_row.length_squared() >= from_second_row.length_squared() {
            from_first_row
        } else {
            from_second_row
        };
        v.try_normalize().unwrap_or(Vec2::X)
    }

    /// Angle of [`Self::minor_axis`] in `[0, 2π)`.
    pub fn minor_axis_angle(&self) -> f32 {
        normalize_angle(self.minor_axis().to_angle())
    }
}

/// Wrap an `atan2` result into `[0, 2π)`.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = if angle < 0.0 { angle + TAU } else { angle };
    // A tiny negative angle plus TAU can round up to TAU itself.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Aggregated structure tensor of every pixel, stored as three channels `(xx, xy, yy)`.
pub fn structure_tensor_field(source: &Image, params: &OrientationParams) -> Result<Image> {
    source.ensure_non_empty("orientation source")?;
    params.validate()?;

    let lum = luminance(source)?;
    let smooth = gaussian_blur(&lum, params.sigma, DEFAULT_TRUNCATE, Boundary::Clamp)?;
    let gx = gradient_x(&smooth);
    let gy = gradient_y(&smooth);

    let (w, h) = smooth.size();
    let mut tensor = Image::new(w, h, 3);
    for y in 0..h {
        for x in 0..w {
            let t = StructureTensor::from_gradient(Vec2::new(gx.get(x, y, 0), gy.get(x, y, 0)));
            tensor.pixel_mut(x, y).copy_from_slice(&[t.xx, t.xy, t.yy]);
        }
    }

    gaussian_blur(
        &tensor,
        params.sigma * params.factor,
        DEFAULT_TRUNCATE,
        Boundary::Clamp,
    )
}

/// One stroke angle in `[0, 2π)` per source pixel. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct OrientationField {
    angles: Image,
}

impl OrientationField {
    /// Estimate orientations from the structure of `source`.
    pub fn estimate(source: &Image, params: &OrientationParams) -> Result<Self> {
        let tensor = structure_tensor_field(source, params)?;
        let (w, h) = tensor.size();
        let mut angles = Image::new(w, h, 1);
        for y in 0..h {
            for x in 0..w {
                let px = tensor.pixel(x, y);
                let t = StructureTensor::new(px[0], px[1], px[2]);
                angles.set(x, y, 0, t.minor_axis_angle());
            }
        }
        debug!(
            "Orientation field {}x{} sigma={} factor={}.",
            w, h, params.sigma, params.factor
        );
        Ok(Self { angles })
    }

    /// The same angle everywhere.
    pub fn constant(width: usize, height: usize, angle: f32) -> Self {
        Self {
            angles: Image::filled(width, height, 1, normalize_angle(angle)),
        }
    }

    pub fn size(&self) -> (usize, usize) {
        self.angles.size()
    }

    #[inline]
    pub fn angle_at(&self, x: usize, y: usize) -> f32 {
        self.angles.get(x, y, 0)
    }

    pub fn as_image(&self) -> &Image {
        &self.angles
    }
}
