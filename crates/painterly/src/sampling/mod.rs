//! Stochastic stroke generation.
//!
//! This module turns an importance map into a stream of [`Stroke`]s by
//! importance-weighted rejection sampling. All randomness flows through a
//! caller-owned [`rand::RngCore`], so a seeded generator reproduces a painting.
use rand::RngCore;

pub mod sampler;
pub mod stroke;

pub use sampler::{trial_count, StrokeBatch, StrokeSampler, Strokes};
pub use stroke::{Stroke, LUMA_WEIGHTS};

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01<R: RngCore + ?Sized>(rng: &mut R) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Uniform index in `0..n`. `n` must be non-zero.
#[inline]
pub(crate) fn rand_index<R: RngCore + ?Sized>(rng: &mut R, n: usize) -> usize {
    debug_assert!(n > 0, "rand_index needs a non-empty range");
    ((rand01(rng) * n as f32) as usize).min(n - 1)
}
