#![forbid(unsafe_code)]
//! painterly: Painterly rendering by importance-sampled, structure-oriented brush stamping.
//!
//! Modules:
//! - raster: float image buffer, gaussian blur, Sobel gradients, luminance, scale and rotate
//! - field: importance maps (uniform, sharpness) and the structure-tensor orientation field
//! - sampling: rejection sampling of jittered strokes from an importance map
//! - brush: pre-rotated brush footprints and alpha stamping
//! - paint: plans, luma-ordered compositing, the painter, events
//!
//! For a walkthrough, see the README.
pub mod brush;
pub mod error;
pub mod field;
pub mod paint;
pub mod raster;
pub mod sampling;

/// Convenient re-exports for common types. Import with `use painterly::prelude::*;`.
pub mod prelude {
    pub use crate::brush::{stamp, BrushSet};
    pub use crate::error::{Error, Result};
    pub use crate::field::{
        ImportanceMap, OrientationField, OrientationParams, SharpnessParams, StructureTensor,
    };
    pub use crate::paint::{
        paint_pass, AsEventSink, EventSink, FnSink, ImportanceSpec, LumaCompositor, MultiSink,
        PaintEvent, PaintEventKind, PaintResult, Painter, Pass, PassContext, PassSummary, Plan,
        StrokeOrder, VecSink,
    };
    pub use crate::raster::{Boundary, Image};
    pub use crate::sampling::{trial_count, Stroke, StrokeBatch, StrokeSampler};
}
