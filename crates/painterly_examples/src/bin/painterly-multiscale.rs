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

    let plan = Plan::multi_scale(3000, 48, 0.3, 4);

    // Report pass boundaries without collecting per-stroke events.
    let mut sink = FnSink::new(|event| match event {
        PaintEvent::ImportanceBuilt {
            pass_index,
            mean_importance,
            trials,
        } => info!("pass {pass_index}: mean importance {mean_importance:.3}, {trials} trials"),
        PaintEvent::Warning { context, message } => info!("{context}: {message}"),
        _ => {}
    });

    let mut rng = StdRng::seed_from_u64(7);
    let result = painter.run_with_events(&plan, &mut rng, &mut sink)?;
    info!(
        "stamped {} strokes over {} passes",
        result.total_stamped(),
        result.passes.len()
    );

    save_rgb_png(&result.canvas, "painterly-multiscale.png")
}
