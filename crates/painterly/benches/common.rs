#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use painterly::raster::Image;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub const SIZES: [usize; 3] = [64, 128, 256];

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Concentric rings over a horizontal color ramp; has edges in every direction.
pub fn ring_source(size: usize) -> Image {
    let mut image = Image::new(size, size, 3);
    let c = size as f32 * 0.5;
    for y in 0..size {
        for x in 0..size {
            let (dx, dy) = (x as f32 - c, y as f32 - c);
            let ring = ((dx * dx + dy * dy).sqrt() / 6.0).sin() * 0.5 + 0.5;
            let t = x as f32 / size as f32;
            image.pixel_mut(x, y).copy_from_slice(&[ring, t, 1.0 - ring * t]);
        }
    }
    image
}

/// Elongated soft alpha mask.
pub fn soft_brush() -> Image {
    let (w, h) = (48, 12);
    let mut brush = Image::new(w, h, 1);
    for y in 0..h {
        for x in 0..w {
            let u = (x as f32 + 0.5) / w as f32 * 2.0 - 1.0;
            let v = (y as f32 + 0.5) / h as f32 * 2.0 - 1.0;
            brush.set(x, y, 0, (1.0 - (u * u + v * v)).clamp(0.0, 1.0));
        }
    }
    brush
}
