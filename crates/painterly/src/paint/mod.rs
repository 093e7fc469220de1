//! Painting runs: plans of stroke passes, stamping order, and progress events.
//!
//! A [`Plan`] lists passes from coarse to fine. [`Painter`] estimates the
//! orientation field once, then for each pass builds the importance map,
//! samples strokes and stamps them onto one shared canvas, either as they are
//! accepted or buffered and sorted by luma.
pub mod events;
pub mod order;
pub mod plan;
pub mod runner;

pub use events::{
    AsEventSink, EventSink, FnSink, MultiSink, PaintEvent, PaintEventKind, VecSink,
};
pub use order::{sort_strokes, LumaCompositor, StrokeOrder};
pub use plan::{ImportanceSpec, Pass, Plan, DEFAULT_NOISE, DEFAULT_NUM_ANGLES, MAX_STROKE_COUNT};
pub use runner::{paint_pass, PaintResult, Painter, PassContext, PassSummary};
