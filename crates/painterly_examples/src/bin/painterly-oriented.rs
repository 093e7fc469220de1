use painterly::prelude::*;
use painterly_examples::{init_tracing, long_brush, save_rgb_png, source_from_args};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let source = source_from_args()?;
    let brush = long_brush();
    let painter = Painter::try_new(&source, &brush)?;

    // Strokes follow the structure tensor's minor axis, snapped to 36 angles.
    let plan = Plan::oriented(4000, 40, 0.3);
    let mut rng = StdRng::seed_from_u64(42);
    let result = painter.run(&plan, &mut rng)?;

    for pass in &result.passes {
        info!(
            "pass {}: footprint={} stamped={} skipped={}",
            pass.index, pass.footprint, pass.stamped, pass.skipped
        );
    }
    save_rgb_png(&result.canvas, "painterly-oriented.png")
}
