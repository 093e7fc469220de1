use painterly::prelude::*;
use painterly_examples::{init_tracing, long_brush, save_rgb_png, source_from_args};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let source = source_from_args()?;
    let brush = long_brush();
    let painter = Painter::try_new(&source, &brush)?;

    // Same seed for both so only the stamping order differs.
    for (order, file) in [
        (StrokeOrder::LightToDark, "painterly-luma-order-light-to-dark.png"),
        (StrokeOrder::DarkToLight, "painterly-luma-order-dark-to-light.png"),
    ] {
        let plan = Plan::luma_ordered(4000, 40, 0.3, order);
        let mut rng = StdRng::seed_from_u64(42);
        let result = painter.run(&plan, &mut rng)?;
        save_rgb_png(&result.canvas, file)?;
    }

    Ok(())
}
