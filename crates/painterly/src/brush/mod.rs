//! Brush footprints and the alpha stamper that composites them onto a canvas.
pub mod set;
pub mod stamp;

pub use set::BrushSet;
pub use stamp::stamp;
