use glam::Vec2;
use painterly::raster::Image;

/// Sunset-like scene: a vertical sky gradient, a disc and a wavy horizon.
pub fn procedural_source(width: usize, height: usize) -> Image {
    let mut image = Image::new(width, height, 3);
    let size = Vec2::new(width as f32, height as f32);
    let sun = size * Vec2::new(0.68, 0.35);
    let sun_radius = size.min_element() * 0.14;

    for y in 0..height {
        for x in 0..width {
            let p = Vec2::new(x as f32, y as f32);
            let t = p.y / size.y;
            let horizon = size.y * (0.62 + 0.04 * (p.x / size.x * 9.0).sin());
            let color = if p.y > horizon {
                let d = (p.y - horizon) / (size.y - horizon).max(1.0);
                let ripple = 0.08 * (p.x * 0.35 + p.y * 0.9).sin();
                [0.05 + ripple, 0.18 + 0.2 * d, 0.32 - 0.1 * d + ripple]
            } else if p.distance(sun) < sun_radius {
                [1.0, 0.86, 0.4]
            } else {
                [0.95 - 0.35 * t, 0.45 + 0.1 * t, 0.3 + 0.45 * t]
            };
            image.pixel_mut(x, y).copy_from_slice(&color);
        }
    }
    image
}

/// Elongated brush alpha mask: soft falloff across, tapered ends along.
pub fn long_brush() -> Image {
    let (width, height) = (96, 24);
    let mut brush = Image::new(width, height, 1);
    for y in 0..height {
        for x in 0..width {
            let u = (x as f32 + 0.5) / width as f32 * 2.0 - 1.0;
            let v = (y as f32 + 0.5) / height as f32 * 2.0 - 1.0;
            let across = (1.0 - v * v).max(0.0);
            let along = (1.0 - u.abs().powi(4)).max(0.0);
            brush.set(x, y, 0, (across * along).sqrt());
        }
    }
    brush
}
