//! Per-pixel fields derived from the source image.
//!
//! - [`importance`]: where strokes land (uniform or sharpness-driven acceptance maps).
//! - [`orientation`]: which way strokes run (structure-tensor minor axis).
pub mod importance;
pub mod orientation;

pub use importance::{ImportanceMap, SharpnessParams};
pub use orientation::{
    normalize_angle, structure_tensor_field, OrientationField, OrientationParams, StructureTensor,
};
