//! Event types and sinks for observing painting runs.
//!
//! This module defines [`PaintEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while executing a [`crate::paint::plan::Plan`]
//! via [`crate::paint::runner::Painter`] or [`crate::paint::runner::paint_pass`].
use crate::field::OrientationParams;
use crate::paint::order::StrokeOrder;
use crate::paint::runner::PassSummary;
use crate::sampling::Stroke;

/// Describes events emitted while painting.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum PaintEvent {
    /// Emitted when a run starts for a plan.
    RunStarted {
        /// Source dimensions (width, height) in pixels.
        size: (usize, usize),
        /// Number of passes in the plan.
        pass_count: usize,
        /// Whether strokes follow an orientation field.
        oriented: bool,
    },

    /// Emitted once the orientation field has been computed.
    OrientationEstimated {
        /// Parameters the field was estimated with.
        params: OrientationParams,
    },

    /// Emitted when a pass starts.
    PassStarted {
        /// Index of the pass in the plan.
        index: usize,
        /// Brush footprint in pixels.
        footprint: usize,
        /// Expected number of strokes.
        stroke_count: usize,
        /// Stamping order of the pass.
        order: StrokeOrder,
    },

    /// Emitted after the importance map of a pass was built.
    ImportanceBuilt {
        /// Index of the pass in the plan.
        pass_index: usize,
        /// Mean acceptance probability of the map.
        mean_importance: f32,
        /// Number of sampling trials this map implies.
        trials: usize,
    },

    /// Emitted after a stroke was blended into the canvas.
    StrokeStamped {
        /// Index of the pass that produced the stroke.
        pass_index: usize,
        /// Position of this stamp in the pass's stamping sequence.
        stamp_index: usize,
        /// The stroke.
        stroke: Stroke,
    },

    /// Emitted when a stroke was dropped because its footprint crosses the canvas border.
    StrokeSkipped {
        /// Index of the pass that produced the stroke.
        pass_index: usize,
        /// The stroke.
        stroke: Stroke,
    },

    /// Emitted when a pass finishes.
    PassFinished {
        /// Counters of the pass.
        summary: PassSummary,
    },

    /// Emitted when the entire plan finishes.
    RunFinished {
        /// Counters of every pass, in order.
        passes: Vec<PassSummary>,
    },

    /// Non-fatal warning generated while painting.
    Warning {
        /// Context string (e.g. pass index).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

impl PaintEvent {
    pub fn kind(&self) -> PaintEventKind {
        match self {
            PaintEvent::RunStarted { .. } => PaintEventKind::RunStarted,
            PaintEvent::OrientationEstimated { .. } => PaintEventKind::OrientationEstimated,
            PaintEvent::PassStarted { .. } => PaintEventKind::PassStarted,
            PaintEvent::ImportanceBuilt { .. } => PaintEventKind::ImportanceBuilt,
            PaintEvent::StrokeStamped { .. } => PaintEventKind::StrokeStamped,
            PaintEvent::StrokeSkipped { .. } => PaintEventKind::StrokeSkipped,
            PaintEvent::PassFinished { .. } => PaintEventKind::PassFinished,
            PaintEvent::RunFinished { .. } => PaintEventKind::RunFinished,
            PaintEvent::Warning { .. } => PaintEventKind::Warning,
        }
    }
}

/// Discriminant of [`PaintEvent`], used by sinks to opt out of event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaintEventKind {
    RunStarted,
    OrientationEstimated,
    PassStarted,
    ImportanceBuilt,
    StrokeStamped,
    StrokeSkipped,
    PassFinished,
    RunFinished,
    Warning,
}

/// A generic event sink that accepts [`PaintEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PaintEvent);

    /// Whether events of `kind` should be built at all. Per-stroke events are
    /// only constructed for sinks that want them.
    #[inline]
    fn wants(&self, _kind: PaintEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = PaintEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PaintEvent) {}

    #[inline]
    fn wants(&self, _kind: PaintEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PaintEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PaintEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PaintEvent),
{
    #[inline]
    fn send(&mut self, event: PaintEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally only some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<PaintEvent>,
    only: Option<Vec<PaintEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
            only: None,
        }
    }

    /// Collect only events of the listed kinds.
    pub fn only(kinds: impl IntoIterator<Item = PaintEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<PaintEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PaintEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PaintEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: PaintEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: PaintEvent) {
        let kind = event.kind();
        let mut targets = self.sinks.iter_mut().filter(|s| s.wants(kind)).peekable();
        while let Some(sink) = targets.next() {
            if targets.peek().is_some() {
                sink.send(event.clone());
            } else {
                sink.send(event);
                return;
            }
        }
    }

    fn wants(&self, kind: PaintEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}

/// Minimal adapter trait for types that can expose an [`EventSink`].
pub trait AsEventSink {
    fn as_event_sink(&mut self) -> &mut dyn EventSink;
}

impl<S: EventSink> AsEventSink for S {
    fn as_event_sink(&mut self) -> &mut dyn EventSink {
        self
    }
}
