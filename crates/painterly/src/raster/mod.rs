//! Raster storage and the image algebra used by the painting pipeline.
//!
//! [`Image`] is the single pixel container for sources, canvases, brush textures
//! and scalar fields. The submodules provide the filtering ([`filter`]) and
//! geometric ([`transform`]) primitives the fields and brushes are built from.
use crate::error::{Error, Result};

pub mod filter;
pub mod transform;

pub use filter::{gaussian_blur, gradient_x, gradient_y, luminance, Boundary, DEFAULT_TRUNCATE};
pub use transform::{rotate, scale_linear};

/// A row-major, channel-interleaved grid of `f32` samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f32>,
}

impl Image {
    /// Create a new image with all samples set to `0.0`.
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self::filled(width, height, channels, 0.0)
    }

    /// Create a new image with all samples set to `value`.
    pub fn filled(width: usize, height: usize, channels: usize, value: f32) -> Self {
        Self {
            width,
            height,
            channels,
            data: vec![value; width * height * channels],
        }
    }

    /// Wrap an existing sample buffer laid out as `(y * width + x) * channels + c`.
    pub fn from_vec(width: usize, height: usize, channels: usize, data: Vec<f32>) -> Result<Self> {
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(Error::InvalidConfig(format!(
                "sample buffer holds {} values, {width}x{height}x{channels} needs {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Get the size of the image as `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    #[inline]
    fn index(&self, x: usize, y: usize, c: usize) -> usize {
        debug_assert!(
            x < self.width && y < self.height && c < self.channels,
            "sample ({x}, {y}, {c}) outside {}x{}x{}",
            self.width,
            self.height,
            self.channels
        );
        (y * self.width + x) * self.channels + c
    }

    /// Get the sample at `(x, y)` in channel `c`.
    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> f32 {
        self.data[self.index(x, y, c)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, c: usize, value: f32) {
        let i = self.index(x, y, c);
        self.data[i] = value;
    }

    /// All channels of the pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[f32] {
        let start = self.index(x, y, 0);
        &self.data[start..start + self.channels]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [f32] {
        let start = self.index(x, y, 0);
        &mut self.data[start..start + self.channels]
    }

    /// Arithmetic mean over every sample of every channel. `0.0` for an empty image.
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.data.iter().map(|&v| f64::from(v)).sum();
        (sum / self.data.len() as f64) as f32
    }

    /// Largest sample, or `0.0` for an empty image.
    pub fn max(&self) -> f32 {
        self.data.iter().copied().reduce(f32::max).unwrap_or(0.0)
    }

    /// Apply `f` to every sample.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combine two images of identical shape sample by sample.
    pub fn zip_map(&self, other: &Image, f: impl Fn(f32, f32) -> f32) -> Result<Self> {
        self.ensure_same_shape(other, "operand")?;
        Ok(Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    /// Copy one channel out into a single-channel image.
    pub fn channel(&self, c: usize) -> Result<Self> {
        if c >= self.channels {
            return Err(Error::InvalidConfig(format!(
                "channel {c} out of range for {} channels",
                self.channels
            )));
        }
        Ok(Self {
            width: self.width,
            height: self.height,
            channels: 1,
            data: self.data.iter().skip(c).step_by(self.channels).copied().collect(),
        })
    }

    /// Replicate a single-channel image across `channels` channels.
    pub fn replicate(&self, channels: usize) -> Result<Self> {
        if self.channels != 1 {
            return Err(Error::ChannelMismatch {
                role: "replicated image",
                expected: 1,
                found: self.channels,
            });
        }
        let data = self
            .data
            .iter()
            .flat_map(|&v| std::iter::repeat_n(v, channels))
            .collect();
        Ok(Self {
            width: self.width,
            height: self.height,
            channels,
            data,
        })
    }

    /// Fail with [`Error::EmptyImage`] when the image has no pixels or no channels.
    pub fn ensure_non_empty(&self, role: &'static str) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.channels == 0 {
            return Err(Error::EmptyImage {
                role,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Fail unless `other` has the same width and height.
    pub fn ensure_same_size(&self, other: &Image, role: &'static str) -> Result<()> {
        if self.size() != other.size() {
            return Err(Error::DimensionMismatch {
                role,
                expected: self.size(),
                found: other.size(),
            });
        }
        Ok(())
    }

    /// Fail unless `other` has the same width, height and channel count.
    pub fn ensure_same_shape(&self, other: &Image, role: &'static str) -> Result<()> {
        self.ensure_same_size(other, role)?;
        if self.channels != other.channels {
            return Err(Error::ChannelMismatch {
                role,
                expected: self.channels,
                found: other.channels,
            });
        }
        Ok(())
    }
}
