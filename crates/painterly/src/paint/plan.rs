//! Painting plans: an ordered schedule of stroke passes sharing one canvas.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::{OrientationParams, SharpnessParams};
use crate::paint::order::StrokeOrder;
use crate::sampling::StrokeSampler;

/// Default number of pre-rotated brush angles for oriented plans.
pub const DEFAULT_NUM_ANGLES: usize = 36;

/// Default color jitter amplitude.
pub const DEFAULT_NOISE: f32 = 0.3;

/// Largest accepted `stroke_count` of a single pass.
pub const MAX_STROKE_COUNT: usize = 1 << 24;

/// Where a pass places its strokes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ImportanceSpec {
    /// Every pixel equally likely.
    #[default]
    Uniform,
    /// Concentrated on high-frequency detail.
    Sharpness(SharpnessParams),
}

impl ImportanceSpec {
    pub fn validate(&self) -> Result<()> {
        match self {
            ImportanceSpec::Uniform => Ok(()),
            ImportanceSpec::Sharpness(params) => params.validate(),
        }
    }
}

/// One stroke pass.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pass {
    pub importance: ImportanceSpec,
    /// Larger side of the scaled brush, in pixels.
    pub footprint: usize,
    /// Expected number of accepted strokes.
    pub stroke_count: usize,
    /// Color jitter amplitude.
    pub noise: f32,
    pub order: StrokeOrder,
}

impl Pass {
    /// A pass stamping `stroke_count` strokes of size `footprint` in sampling order.
    pub fn new(importance: ImportanceSpec, footprint: usize, stroke_count: usize) -> Self {
        Self {
            importance,
            footprint,
            stroke_count,
            noise: DEFAULT_NOISE,
            order: StrokeOrder::Sampled,
        }
    }

    /// Uniformly distributed strokes.
    pub fn uniform(footprint: usize, stroke_count: usize) -> Self {
        Self::new(ImportanceSpec::Uniform, footprint, stroke_count)
    }

    /// Strokes concentrated on sharp detail.
    pub fn sharpness(params: SharpnessParams, footprint: usize, stroke_count: usize) -> Self {
        Self::new(ImportanceSpec::Sharpness(params), footprint, stroke_count)
    }

    pub fn with_noise(mut self, noise: f32) -> Self {
        self.noise = noise;
        self
    }

    pub fn with_order(mut self, order: StrokeOrder) -> Self {
        self.order = order;
        self
    }

    /// The sampler configuration of this pass.
    pub fn sampler(&self) -> StrokeSampler {
        StrokeSampler::new(self.stroke_count, self.noise)
    }

    pub fn validate(&self) -> Result<()> {
        if self.footprint == 0 {
            return Err(Error::InvalidConfig("pass footprint must be >= 1".into()));
        }
        if self.stroke_count > MAX_STROKE_COUNT {
            return Err(Error::InvalidConfig(format!(
                "pass stroke_count must be <= {MAX_STROKE_COUNT}, got {}",
                self.stroke_count
            )));
        }
        self.sampler().validate()?;
        self.importance.validate()
    }
}

/// An ordered list of [`Pass`]es painted onto one canvas, plus the shared orientation setup.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    pub passes: Vec<Pass>,
    /// Rotate strokes along the source structure; `None` paints every stroke unrotated.
    pub orientation: Option<OrientationParams>,
    /// Pre-rotated brush angles per pass when oriented.
    pub num_angles: usize,
}

impl Default for Plan {
    fn default() -> Self {
        Self::new()
    }
}

impl Plan {
    /// Create a new empty, unoriented plan.
    pub fn new() -> Self {
        Self {
            passes: Vec::new(),
            orientation: None,
            num_angles: DEFAULT_NUM_ANGLES,
        }
    }

    /// Add a single pass.
    pub fn with_pass(mut self, pass: Pass) -> Self {
        self.passes.push(pass);
        self
    }

    /// Add multiple passes.
    pub fn with_passes(mut self, passes: impl IntoIterator<Item = Pass>) -> Self {
        self.passes.extend(passes);
        self
    }

    pub fn with_orientation(mut self, params: OrientationParams) -> Self {
        self.orientation = Some(params);
        self
    }

    pub fn with_num_angles(mut self, num_angles: usize) -> Self {
        self.num_angles = num_angles;
        self
    }

    /// Apply `order` to every pass.
    pub fn with_order(mut self, order: StrokeOrder) -> Self {
        for pass in &mut self.passes {
            pass.order = order;
        }
        self
    }

    /// Apply `noise` to every pass.
    pub fn with_noise(mut self, noise: f32) -> Self {
        for pass in &mut self.passes {
            pass.noise = noise;
        }
        self
    }

    pub fn is_oriented(&self) -> bool {
        self.orientation.is_some()
    }

    /// Two passes: uniform coverage at `size`, then detail at `size / 4`.
    pub fn painterly(stroke_count: usize, size: usize, noise: f32) -> Self {
        Self::new()
            .with_pass(Pass::uniform(size, stroke_count))
            .with_pass(Pass::sharpness(
                SharpnessParams::default(),
                size / 4,
                stroke_count,
            ))
            .with_noise(noise)
    }

    /// [`Plan::painterly`] with strokes following the source structure.
    pub fn oriented(stroke_count: usize, size: usize, noise: f32) -> Self {
        Self::painterly(stroke_count, size, noise).with_orientation(OrientationParams::default())
    }

    /// [`Plan::oriented`] stamping each pass in luma order.
    pub fn luma_ordered(stroke_count: usize, size: usize, noise: f32, order: StrokeOrder) -> Self {
        Self::oriented(stroke_count, size, noise).with_order(order)
    }

    /// A uniform pass at `size`, then `num_scales` oriented detail passes.
    ///
    /// Detail pass `s` (from 1) halves the footprint relative to `size / s` and
    /// narrows the sharpness blur: `sigma = 2 - 0.2 (s - 1)`,
    /// `truncate = 6 - 0.5 (s - 1)`. From eleven scales on sigma reaches zero
    /// and the plan no longer validates.
    pub fn multi_scale(stroke_count: usize, size: usize, noise: f32, num_scales: usize) -> Self {
        let detail = (1..=num_scales).map(|s| {
            let step = (s - 1) as f32;
            let params = SharpnessParams::new(2.0 - 0.2 * step, 6.0 - 0.5 * step);
            Pass::sharpness(params, size / (2 * s), stroke_count)
        });
        Self::new()
            .with_pass(Pass::uniform(size, stroke_count))
            .with_passes(detail)
            .with_noise(noise)
            .with_orientation(OrientationParams::default())
    }

    pub fn validate(&self) -> Result<()> {
        if self.passes.is_empty() {
            return Err(Error::InvalidConfig("plan has no passes".into()));
        }
        if self.num_angles == 0 {
            return Err(Error::InvalidConfig("num_angles must be >= 1".into()));
        }
        if let Some(params) = &self.orientation {
            params.validate()?;
        }
        for (i, pass) in self.passes.iter().enumerate() {
            pass.validate().map_err(|e| match e {
                Error::InvalidConfig(msg) => Error::InvalidConfig(format!("pass {i}: {msg}")),
                other => other,
            })?;
        }
        Ok(())
    }
}
