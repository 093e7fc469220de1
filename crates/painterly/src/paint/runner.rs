//! Executes painting plans pass by pass onto a single canvas.
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::brush::{stamp, BrushSet};
use crate::error::{Error, Result};
use crate::field::{ImportanceMap, OrientationField};
use crate::paint::events::{EventSink, PaintEvent, PaintEventKind};
use crate::paint::order::LumaCompositor;
use crate::paint::plan::{ImportanceSpec, Pass, Plan};
use crate::raster::Image;
use crate::sampling::Stroke;

/// Counters of one painted pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PassSummary {
    /// Index of the pass in its plan.
    pub index: usize,
    /// Brush footprint in pixels.
    pub footprint: usize,
    /// Mean of the pass's importance map.
    pub mean_importance: f32,
    /// Sampling trials drawn.
    pub trials: usize,
    /// Strokes accepted by the sampler.
    pub accepted: usize,
    /// Strokes blended into the canvas.
    pub stamped: usize,
    /// Strokes dropped at the canvas border.
    pub skipped: usize,
}

/// The painted canvas and per-pass counters.
#[derive(Clone, Debug)]
pub struct PaintResult {
    /// Same width, height and channel count as the source.
    pub canvas: Image,
    pub passes: Vec<PassSummary>,
}

impl PaintResult {
    pub fn total_stamped(&self) -> usize {
        self.passes.iter().map(|p| p.stamped).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.passes.iter().map(|p| p.skipped).sum()
    }
}

/// Inputs shared by every pass of a run.
#[derive(Clone, Copy, Debug)]
pub struct PassContext<'a> {
    pub source: &'a Image,
    /// Brush alpha mask; channel 0 is used.
    pub texture: &'a Image,
    /// Stroke angles; `None` paints every stroke unrotated.
    pub orientation: Option<&'a OrientationField>,
    /// Pre-rotated brush angles when oriented.
    pub num_angles: usize,
}

/// Paints a source image with a brush texture according to a [`Plan`].
#[derive(Clone, Copy, Debug)]
pub struct Painter<'a> {
    source: &'a Image,
    texture: &'a Image,
}

impl<'a> Painter<'a> {
    /// Validates that `source` is a non-empty three-channel image and `texture` is non-empty.
    pub fn try_new(source: &'a Image, texture: &'a Image) -> Result<Self> {
        source.ensure_non_empty("source")?;
        if source.channels() != 3 {
            return Err(Error::ChannelMismatch {
                role: "source",
                expected: 3,
                found: source.channels(),
            });
        }
        texture.ensure_non_empty("brush texture")?;
        Ok(Self { source, texture })
    }

    pub fn source(&self) -> &'a Image {
        self.source
    }

    pub fn texture(&self) -> &'a Image {
        self.texture
    }

    /// Paint every pass of `plan` onto a fresh black canvas.
    pub fn run<R: RngCore + ?Sized>(&self, plan: &Plan, rng: &mut R) -> Result<PaintResult> {
        self.run_with_events(plan, rng, &mut ())
    }

    /// Like [`Painter::run`], reporting progress to `sink`.
    pub fn run_with_events<R, S>(&self, plan: &Plan, rng: &mut R, sink: &mut S) -> Result<PaintResult>
    where
        R: RngCore + ?Sized,
        S: EventSink + ?Sized,
    {
        plan.validate()?;
        let (width, height) = self.source.size();

        if sink.wants(PaintEventKind::RunStarted) {
            sink.send(PaintEvent::RunStarted {
                size: (width, height),
                pass_count: plan.passes.len(),
                oriented: plan.is_oriented(),
            });
        }

        let orientation = match &plan.orientation {
            Some(params) => {
                let field = OrientationField::estimate(self.source, params)?;
                if sink.wants(PaintEventKind::OrientationEstimated) {
                    sink.send(PaintEvent::OrientationEstimated { params: *params });
                }
                Some(field)
            }
            None => None,
        };

        let ctx = PassContext {
            source: self.source,
            texture: self.texture,
            orientation: orientation.as_ref(),
            num_angles: plan.num_angles,
        };
        let mut canvas = Image::new(width, height, self.source.channels());
        let mut passes = Vec::with_capacity(plan.passes.len());
        for (index, pass) in plan.passes.iter().enumerate() {
            passes.push(paint_pass(&ctx, &mut canvas, pass, index, rng, sink)?);
        }

        let result = PaintResult { canvas, passes };
        info!(
            "Painting {}x{} finished: passes={} stamped={} skipped={}.",
            width,
            height,
            result.passes.len(),
            result.total_stamped(),
            result.total_skipped()
        );
        if sink.wants(PaintEventKind::RunFinished) {
            sink.send(PaintEvent::RunFinished {
                passes: result.passes.clone(),
            });
        }
        Ok(result)
    }

    /// Paint a single pass onto an existing canvas of the source's shape.
    pub fn run_pass<R: RngCore + ?Sized>(
        &self,
        canvas: &mut Image,
        pass: &Pass,
        orientation: Option<&OrientationField>,
        num_angles: usize,
        rng: &mut R,
    ) -> Result<PassSummary> {
        let ctx = PassContext {
            source: self.source,
            texture: self.texture,
            orientation,
            num_angles,
        };
        paint_pass(&ctx, canvas, pass, 0, rng, &mut ())
    }
}

/// Sample and stamp one pass.
///
/// A pass whose importance map has zero mean leaves the canvas untouched and
/// emits a warning instead of failing.
pub fn paint_pass<R, S>(
    ctx: &PassContext<'_>,
    canvas: &mut Image,
    pass: &Pass,
    index: usize,
    rng: &mut R,
    sink: &mut S,
) -> Result<PassSummary>
where
    R: RngCore + ?Sized,
    S: EventSink + ?Sized,
{
    pass.validate()?;
    if ctx.num_angles == 0 {
        return Err(Error::InvalidConfig("num_angles must be >= 1".into()));
    }
    ctx.source.ensure_same_shape(canvas, "canvas")?;
    let (width, height) = ctx.source.size();

    info!(
        "Pass {} started: footprint={} strokes={} order={:?}.",
        index, pass.footprint, pass.stroke_count, pass.order
    );
    if sink.wants(PaintEventKind::PassStarted) {
        sink.send(PaintEvent::PassStarted {
            index,
            footprint: pass.footprint,
            stroke_count: pass.stroke_count,
            order: pass.order,
        });
    }

    let importance = match &pass.importance {
        ImportanceSpec::Uniform => ImportanceMap::uniform(width, height),
        ImportanceSpec::Sharpness(params) => ImportanceMap::sharpness(ctx.source, params)?,
    };
    let mut strokes = pass
        .sampler()
        .strokes(ctx.source, &importance, ctx.orientation, rng)?;

    let mut summary = PassSummary {
        index,
        footprint: pass.footprint,
        mean_importance: strokes.mean_importance(),
        trials: strokes.trials(),
        ..Default::default()
    };
    debug!(
        "Pass {} importance mean={:.4} trials={}.",
        index, summary.mean_importance, summary.trials
    );
    if sink.wants(PaintEventKind::ImportanceBuilt) {
        sink.send(PaintEvent::ImportanceBuilt {
            pass_index: index,
            mean_importance: summary.mean_importance,
            trials: summary.trials,
        });
    }

    if !(summary.mean_importance > 0.0) {
        warn!("Pass {} has zero mean importance; skipping.", index);
        if sink.wants(PaintEventKind::Warning) {
            sink.send(PaintEvent::Warning {
                context: format!("pass {index}"),
                message: "importance map has zero mean; nothing painted".into(),
            });
        }
        return Ok(finish_pass(summary, sink));
    }

    let angles = if ctx.orientation.is_some() {
        ctx.num_angles
    } else {
        1
    };
    let brushes = BrushSet::new(ctx.texture, pass.footprint, angles)?;

    if pass.order.is_buffered() {
        let mut compositor = LumaCompositor::new(pass.order);
        compositor.extend(strokes.by_ref());
        summary.accepted = strokes.accepted();
        for stroke in compositor.into_ordered() {
            stamp_stroke(canvas, &brushes, stroke, &mut summary, sink)?;
        }
    } else {
        for stroke in strokes.by_ref() {
            stamp_stroke(canvas, &brushes, stroke, &mut summary, sink)?;
        }
        summary.accepted = strokes.accepted();
    }

    Ok(finish_pass(summary, sink))
}

fn stamp_stroke<S: EventSink + ?Sized>(
    canvas: &mut Image,
    brushes: &BrushSet,
    stroke: Stroke,
    summary: &mut PassSummary,
    sink: &mut S,
) -> Result<()> {
    let color = stroke.color.to_array();
    let footprint = brushes.for_angle(stroke.angle);
    let (x, y) = (stroke.position.x as usize, stroke.position.y as usize);
    if stamp(canvas, x, y, &color, footprint)? {
        if sink.wants(PaintEventKind::StrokeStamped) {
            sink.send(PaintEvent::StrokeStamped {
                pass_index: summary.index,
                stamp_index: summary.stamped,
                stroke,
            });
        }
        summary.stamped += 1;
    } else {
        if sink.wants(PaintEventKind::StrokeSkipped) {
            sink.send(PaintEvent::StrokeSkipped {
                pass_index: summary.index,
                stroke,
            });
        }
        summary.skipped += 1;
    }
    Ok(())
}

fn finish_pass<S: EventSink + ?Sized>(summary: PassSummary, sink: &mut S) -> PassSummary {
    info!(
        "Pass {} finished: footprint={} trials={} accepted={} stamped={} skipped={}.",
        summary.index,
        summary.footprint,
        summary.trials,
        summary.accepted,
        summary.stamped,
        summary.skipped
    );
    if sink.wants(PaintEventKind::PassFinished) {
        sink.send(PaintEvent::PassFinished { summary });
    }
    summary
}
