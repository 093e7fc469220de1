use painterly::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn stripes(size: usize) -> Image {
    let mut image = Image::new(size, size, 3);
    for y in 0..size {
        for x in 0..size {
            let v = if (x / 8 + y / 8) % 2 == 0 { 0.9 } else { 0.1 };
            let t = y as f32 / size as f32;
            image.pixel_mut(x, y).copy_from_slice(&[v, t, 1.0 - v]);
        }
    }
    image
}

fn long_brush() -> Image {
    let mut brush = Image::new(20, 6, 1);
    for y in 1..5 {
        for x in 0..20 {
            brush.set(x, y, 0, 0.8);
        }
    }
    brush
}

fn stamped_strokes(events: &[PaintEvent]) -> Vec<Stroke> {
    events
        .iter()
        .filter_map(|e| match e {
            PaintEvent::StrokeStamped { stroke, .. } => Some(*stroke),
            _ => None,
        })
        .collect()
}

fn replay(brushes: &[BrushSet], stamps: impl Iterator<Item = (usize, Stroke)>) -> Image {
    let mut canvas = Image::new(48, 48, 3);
    for (pass, stroke) in stamps {
        let footprint = brushes[pass].for_angle(stroke.angle);
        let (x, y) = (stroke.position.x as usize, stroke.position.y as usize);
        assert!(stamp(&mut canvas, x, y, &stroke.color.to_array(), footprint).unwrap());
    }
    canvas
}

#[test]
fn painting_keeps_source_shape() {
    let source = stripes(64);
    let brush = long_brush();
    let painter = Painter::try_new(&source, &brush).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    let result = painter
        .run(&Plan::multi_scale(300, 16, 0.3, 2).with_num_angles(12), &mut rng)
        .unwrap();

    assert_eq!(result.canvas.size(), source.size());
    assert_eq!(result.canvas.channels(), source.channels());
    assert_eq!(result.passes.len(), 3);
    assert_eq!(
        result.passes.iter().map(|p| p.footprint).collect::<Vec<_>>(),
        vec![16, 8, 4]
    );
    assert!(result.total_stamped() > 0);
    assert!(result.canvas.as_slice().iter().all(|v| v.is_finite()));
}

#[test]
fn same_seed_paints_same_canvas() {
    let source = stripes(48);
    let brush = long_brush();
    let painter = Painter::try_new(&source, &brush).unwrap();
    let plan = Plan::oriented(200, 12, 0.3);

    let a = painter.run(&plan, &mut StdRng::seed_from_u64(42)).unwrap();
    let b = painter.run(&plan, &mut StdRng::seed_from_u64(42)).unwrap();
    let c = painter.run(&plan, &mut StdRng::seed_from_u64(43)).unwrap();
    assert_eq!(a.canvas, b.canvas);
    assert_eq!(a.passes, b.passes);
    assert_ne!(a.canvas, c.canvas);
}

#[test]
fn zero_importance_pass_leaves_canvas_unchanged() {
    let source = Image::filled(32, 32, 3, 0.6);
    let brush = long_brush();
    let painter = Painter::try_new(&source, &brush).unwrap();
    let plan = Plan::new().with_pass(Pass::sharpness(SharpnessParams::default(), 8, 500));

    let mut sink = VecSink::new();
    let mut rng = StdRng::seed_from_u64(9);
    let result = painter
        .run_with_events(&plan, &mut rng, &mut sink)
        .unwrap();

    assert!(result.canvas.as_slice().iter().all(|v| *v == 0.0));
    assert_eq!(result.passes[0].trials, 0);
    assert_eq!(result.passes[0].accepted, 0);
    assert!(sink
        .as_slice()
        .iter()
        .any(|e| matches!(e, PaintEvent::Warning { .. })));
}

#[test]
fn luma_orders_stamp_in_exact_reverse() {
    let source = stripes(48);
    let brush = long_brush();
    let painter = Painter::try_new(&source, &brush).unwrap();
    let base = Plan::new()
        .with_pass(Pass::uniform(10, 150))
        .with_orientation(OrientationParams::default());

    let run = |order: StrokeOrder| {
        let mut sink = VecSink::only([PaintEventKind::StrokeStamped]);
        let mut rng = StdRng::seed_from_u64(2024);
        painter
            .run_with_events(&base.clone().with_order(order), &mut rng, &mut sink)
            .unwrap();
        stamped_strokes(sink.as_slice())
    };

    let light = run(StrokeOrder::LightToDark);
    let mut dark = run(StrokeOrder::DarkToLight);
    assert!(!light.is_empty());
    assert!(light.windows(2).all(|w| w[0].luma() >= w[1].luma()));
    dark.reverse();
    assert_eq!(light, dark);
}

#[test]
fn luma_ordering_does_not_change_sampled_strokes() {
    let source = stripes(48);
    let brush = long_brush();
    let painter = Painter::try_new(&source, &brush).unwrap();
    let plan = Plan::new().with_pass(Pass::uniform(10, 120));

    let collect = |plan: Plan| {
        let mut sink = VecSink::only([PaintEventKind::StrokeStamped]);
        let mut rng = StdRng::seed_from_u64(77);
        painter.run_with_events(&plan, &mut rng, &mut sink).unwrap();
        let mut strokes = stamped_strokes(sink.as_slice());
        strokes.sort_by_key(|s| s.sequence);
        strokes
    };

    let sampled = collect(plan.clone());
    let sorted = collect(plan.with_order(StrokeOrder::DarkToLight));
    assert_eq!(sampled, sorted);
}

#[test]
fn malformed_inputs_fail_fast() {
    let source = stripes(32);
    let brush = long_brush();
    assert!(matches!(
        Painter::try_new(&Image::new(32, 32, 4), &brush),
        Err(Error::ChannelMismatch { .. })
    ));
    assert!(matches!(
        Painter::try_new(&source, &Image::new(0, 6, 1)),
        Err(Error::EmptyImage { .. })
    ));

    let painter = Painter::try_new(&source, &brush).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let bad_noise = Plan::new().with_pass(Pass::uniform(8, 10).with_noise(f32::NAN));
    assert!(matches!(
        painter.run(&bad_noise, &mut rng),
        Err(Error::InvalidConfig(_))
    ));
    let zero_footprint = Plan::new().with_pass(Pass::uniform(0, 10));
    assert!(painter.run(&zero_footprint, &mut rng).is_err());
}

#[test]
fn fn_sink_observes_every_pass() {
    let source = stripes(32);
    let brush = long_brush();
    let painter = Painter::try_new(&source, &brush).unwrap();
    let mut finished = Vec::new();
    let mut sink = FnSink::new(|event| {
        if let PaintEvent::PassFinished { summary } = event {
            finished.push(summary.index);
        }
    });
    let mut rng = StdRng::seed_from_u64(5);
    painter
        .run_with_events(&Plan::painterly(100, 12, 0.3), &mut rng, &mut sink)
        .unwrap();
    drop(sink);
    assert_eq!(finished, vec![0, 1]);
}

#[test]
fn replaying_stamp_events_reproduces_canvas() {
    let source = stripes(48);
    let brush = long_brush();
    let painter = Painter::try_new(&source, &brush).unwrap();
    let plan = Plan::new()
        .with_pass(Pass::uniform(12, 150))
        .with_pass(Pass::uniform(6, 200).with_order(StrokeOrder::LightToDark))
        .with_orientation(OrientationParams::default())
        .with_num_angles(12);
    let mut sink = VecSink::only([PaintEventKind::StrokeStamped]);
    let mut rng = StdRng::seed_from_u64(23);
    let result = painter
        .run_with_events(&plan, &mut rng, &mut sink)
        .unwrap();

    let stamps: Vec<(usize, Stroke)> = sink
        .as_slice()
        .iter()
        .filter_map(|e| match e {
            PaintEvent::StrokeStamped {
                pass_index, stroke, ..
            } => Some((*pass_index, *stroke)),
            _ => None,
        })
        .collect();
    assert_eq!(stamps.len(), result.total_stamped());
    assert!(stamps.windows(2).all(|w| w[0].0 <= w[1].0));
    let light_to_dark: Vec<f32> = stamps
        .iter()
        .filter(|(pass, _)| *pass == 1)
        .map(|(_, s)| s.luma())
        .collect();
    assert!(!light_to_dark.is_empty());
    assert!(light_to_dark.windows(2).all(|w| w[0] >= w[1]));

    let brushes: Vec<BrushSet> = plan
        .passes
        .iter()
        .map(|pass| BrushSet::new(&brush, pass.footprint, plan.num_angles).unwrap())
        .collect();
    let replayed = replay(&brushes, stamps.iter().copied());
    assert_eq!(replayed, result.canvas);
    let reversed = replay(&brushes, stamps.iter().rev().copied());
    assert_ne!(reversed, result.canvas);
}
