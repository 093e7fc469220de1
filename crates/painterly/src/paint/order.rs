//! Stamping order of the strokes within a pass.
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sampling::Stroke;

/// Order in which a pass stamps its accepted strokes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StrokeOrder {
    /// Stamp each stroke as soon as it is accepted.
    #[default]
    Sampled,
    /// Brightest first; dark strokes end up on top.
    LightToDark,
    /// Darkest first; bright strokes end up on top.
    DarkToLight,
}

impl StrokeOrder {
    /// Whether the pass must buffer every stroke before stamping.
    pub fn is_buffered(&self) -> bool {
        !matches!(self, StrokeOrder::Sampled)
    }
}

/// Ascending luma, ties broken by acceptance sequence.
fn ascending_luma(a: &Stroke, b: &Stroke) -> Ordering {
    a.luma()
        .total_cmp(&b.luma())
        .then_with(|| a.sequence.cmp(&b.sequence))
}

/// Reorder `strokes` in place for stamping.
///
/// [`StrokeOrder::Sampled`] restores acceptance order. The two luma orders use
/// one total order and its exact reverse, so equal strokes never swap places
/// between them.
pub fn sort_strokes(strokes: &mut [Stroke], order: StrokeOrder) {
    match order {
        StrokeOrder::Sampled => strokes.sort_by_key(|s| s.sequence),
        StrokeOrder::DarkToLight => strokes.sort_by(ascending_luma),
        StrokeOrder::LightToDark => strokes.sort_by(|a, b| ascending_luma(b, a)),
    }
}

/// Buffers one pass worth of strokes and hands them back in stamping order.
#[derive(Clone, Debug, Default)]
pub struct LumaCompositor {
    order: StrokeOrder,
    buffer: Vec<Stroke>,
}

impl LumaCompositor {
    pub fn new(order: StrokeOrder) -> Self {
        Self {
            order,
            buffer: Vec::new(),
        }
    }

    pub fn with_capacity(order: StrokeOrder, capacity: usize) -> Self {
        Self {
            order,
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn order(&self) -> StrokeOrder {
        self.order
    }

    pub fn push(&mut self, stroke: Stroke) {
        self.buffer.push(stroke);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Consume the buffer, sorted for stamping.
    pub fn into_ordered(mut self) -> Vec<Stroke> {
        sort_strokes(&mut self.buffer, self.order);
        self.buffer
    }
}

impl Extend<Stroke> for LumaCompositor {
    fn extend<I: IntoIterator<Item = Stroke>>(&mut self, iter: I) {
        self.buffer.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use glam::{UVec2, Vec3};

    use super::*;

    fn stroke(gray: f32, sequence: usize) -> Stroke {
        Stroke::new(UVec2::new(sequence as u32, 0), Vec3::splat(gray), 0.0, sequence)
    }

    fn batch() -> Vec<Stroke> {
        vec![
            stroke(0.5, 0),
            stroke(0.1, 1),
            stroke(0.9, 2),
            stroke(0.5, 3),
            stroke(0.3, 4),
        ]
    }

    fn sequences(strokes: &[Stroke]) -> Vec<usize> {
        strokes.iter().map(|s| s.sequence).collect()
    }

    #[test]
    fn light_to_dark_stamps_brightest_first() {
        let mut strokes = batch();
        sort_strokes(&mut strokes, StrokeOrder::LightToDark);
        assert_eq!(sequences(&strokes), vec![2, 3, 0, 4, 1]);
    }

    #[test]
    fn dark_to_light_stamps_darkest_first() {
        let mut strokes = batch();
        sort_strokes(&mut strokes, StrokeOrder::DarkToLight);
        assert_eq!(sequences(&strokes), vec![1, 4, 0, 3, 2]);
    }

    #[test]
    fn luma_orders_are_exact_reverses() {
        let mut light = batch();
        let mut dark = batch();
        sort_strokes(&mut light, StrokeOrder::LightToDark);
        sort_strokes(&mut dark, StrokeOrder::DarkToLight);
        dark.reverse();
        assert_eq!(light, dark);
    }

    #[test]
    fn compositor_returns_buffered_strokes_in_order() {
        let mut compositor = LumaCompositor::new(StrokeOrder::DarkToLight);
        assert!(compositor.is_empty());
        compositor.extend(batch());
        compositor.push(stroke(0.0, 5));
        assert_eq!(compositor.len(), 6);
        let ordered = compositor.into_ordered();
        assert_eq!(ordered[0].sequence, 5);
        assert_eq!(ordered[5].sequence, 2);
    }

    #[test]
    fn sampled_order_keeps_acceptance_sequence() {
        let mut strokes = batch();
        strokes.reverse();
        sort_strokes(&mut strokes, StrokeOrder::Sampled);
        assert_eq!(sequences(&strokes), vec![0, 1, 2, 3, 4]);
        assert!(!StrokeOrder::Sampled.is_buffered());
        assert!(StrokeOrder::LightToDark.is_buffered());
    }
}
