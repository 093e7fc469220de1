#![forbid(unsafe_code)]

mod procedural;
mod rendering;

pub use procedural::{long_brush, procedural_source};
pub use rendering::{init_tracing, load_rgb, save_rgb_png, source_from_args};
