//! Importance maps: per-pixel acceptance probabilities for stroke placement.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::raster::{gaussian_blur, luminance, Boundary, Image, DEFAULT_TRUNCATE};

/// Residual energy below `(max |luminance| * ratio)^2` counts as a flat source.
const ENERGY_FLOOR_RATIO: f32 = 1e-4;

/// Parameters for the sharpness-derived importance map.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SharpnessParams {
    /// Blur scale separating the high-pass residual from the luminance.
    pub sigma: f32,
    /// Kernel truncation (in standard deviations) of the high-pass blur.
    pub truncate: f32,
    /// Multiplier on `sigma` for the blur that aggregates local energy.
    pub energy_factor: f32,
    /// Border handling of the high-pass blur.
    pub boundary: Boundary,
}

impl Default for SharpnessParams {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            truncate: 4.0,
            energy_factor: 4.0,
            boundary: Boundary::Clamp,
        }
    }
}

impl SharpnessParams {
    pub fn new(sigma: f32, truncate: f32) -> Self {
        Self {
            sigma,
            truncate,
            ..Default::default()
        }
    }

    /// Sets the energy aggregation factor.
    pub fn with_energy_factor(mut self, energy_factor: f32) -> Self {
        self.energy_factor = energy_factor;
        self
    }

    /// Sets the border handling of the high-pass blur.
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.sigma > 0.0 && self.sigma.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "sharpness sigma must be > 0, got {}",
                self.sigma
            )));
        }
        if !(self.truncate > 0.0 && self.truncate.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "sharpness truncate must be > 0, got {}",
                self.truncate
            )));
        }
        if !(self.energy_factor > 0.0 && self.energy_factor.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "sharpness energy_factor must be > 0, got {}",
                self.energy_factor
            )));
        }
        Ok(())
    }
}

/// Single-channel map of acceptance probabilities in `[0, 1]`, one per source pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportanceMap {
    field: Image,
}

impl ImportanceMap {
    /// Every pixel accepted with probability one.
    pub fn uniform(width: usize, height: usize) -> Self {
        Self {
            field: Image::filled(width, height, 1, 1.0),
        }
    }

    /// Wrap an existing field. Multi-channel input keeps its first channel and
    /// values are clamped into `[0, 1]`.
    pub fn from_image(image: &Image) -> Result<Self> {
        image.ensure_non_empty("importance map")?;
        let first = image.channel(0)?;
        Ok(Self {
            field: first.map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }),
        })
    }

    /// Importance concentrated on high-frequency detail of `source`.
    ///
    /// Luminance minus its blur gives a high-pass residual; its square is blurred
    /// again at `energy_factor * sigma` and normalized by the global maximum. A
    /// perfectly flat source has no energy anywhere and yields an all-zero map.
    pub fn sharpness(source: &Image, params: &SharpnessParams) -> Result<Self> {
        source.ensure_non_empty("sharpness source")?;
        params.validate()?;

        let lum = luminance(source)?;
        let low = gaussian_blur(&lum, params.sigma, params.truncate, params.boundary)?;
        let energy = lum.zip_map(&low, |l, b| (l - b) * (l - b))?;
        let aggregated = gaussian_blur(
            &energy,
            params.energy_factor * params.sigma,
            DEFAULT_TRUNCATE,
            Boundary::Clamp,
        )?;

        // Blurring a constant does not cancel exactly; energy at rounding level is flat.
        let scale = lum.as_slice().iter().fold(0.0f32, |m, v| m.max(v.abs()));
        let floor = (scale * ENERGY_FLOOR_RATIO).powi(2);
        let peak = aggregated.max();
        let field = if peak > floor {
            aggregated.map(|v| (v / peak).clamp(0.0, 1.0))
        } else {
            Image::new(source.width(), source.height(), 1)
        };
        debug!(
            "Sharpness map sigma={} truncate={} peak energy={:e}.",
            params.sigma, params.truncate, peak
        );
        Ok(Self { field })
    }

    pub fn width(&self) -> usize {
        self.field.width()
    }

    pub fn height(&self) -> usize {
        self.field.height()
    }

    pub fn size(&self) -> (usize, usize) {
        self.field.size()
    }

    /// Average acceptance probability over all pixels.
    pub fn mean(&self) -> f32 {
        self.field.mean()
    }

    /// Acceptance probability at pixel `(x, y)`.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.field.get(x, y, 0)
    }

    pub fn as_image(&self) -> &Image {
        &self.field
    }

    /// The map replicated across `channels` channels, e.g. for visual inspection.
    pub fn to_image(&self, channels: usize) -> Result<Image> {
        self.field.replicate(channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_edge(width: usize, height: usize) -> Image {
        let mut image = Image::new(width, height, 3);
        for y in 0..height {
            for x in width / 2..width {
                image.pixel_mut(x, y).copy_from_slice(&[1.0, 1.0, 1.0]);
            }
        }
        image
    }

    #[test]
    fn uniform_map_has_unit_mean() {
        let map = ImportanceMap::uniform(8, 4);
        assert_eq!(map.size(), (8, 4));
        assert_eq!(map.mean(), 1.0);
        assert_eq!(map.at(7, 3), 1.0);
    }

    #[test]
    fn flat_source_gives_zero_map() {
        let flat = Image::filled(16, 16, 3, 0.4);
        let map = ImportanceMap::sharpness(&flat, &SharpnessParams::default()).unwrap();
        assert_eq!(map.mean(), 0.0);
        assert!(map.as_image().as_slice().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn sharpness_peaks_at_edges_and_is_normalized() {
        let map = ImportanceMap::sharpness(&vertical_edge(32, 16), &SharpnessParams::default())
            .unwrap();
        let values = map.as_image().as_slice();
        assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!((map.as_image().max() - 1.0).abs() < 1e-6);
        assert!(map.at(16, 8) > map.at(2, 8));
        assert!(map.at(15, 8) > 0.5);
    }

    #[test]
    fn from_image_clamps_and_keeps_first_channel() {
        let image = Image::from_vec(2, 1, 2, vec![1.5, 9.0, -0.5, 9.0]).unwrap();
        let map = ImportanceMap::from_image(&image).unwrap();
        assert_eq!(map.at(0, 0), 1.0);
        assert_eq!(map.at(1, 0), 0.0);
    }

    #[test]
    fn sharpness_rejects_invalid_params() {
        let image = vertical_edge(8, 8);
        let params = SharpnessParams::new(0.0, 4.0);
        assert!(ImportanceMap::sharpness(&image, &params).is_err());
        let params = SharpnessParams::default().with_energy_factor(-1.0);
        assert!(ImportanceMap::sharpness(&image, &params).is_err());
    }

    #[test]
    fn replicated_view_has_requested_channels() {
        let map = ImportanceMap::uniform(3, 2);
        let rgb = map.to_image(3).unwrap();
        assert_eq!(rgb.channels(), 3);
        assert_eq!(rgb.mean(), 1.0);
    }
}
