//! Importance-weighted rejection sampling of strokes.
use glam::{UVec2, Vec3};
use rand::RngCore;

use crate::error::{Error, Result};
use crate::field::{ImportanceMap, OrientationField};
use crate::raster::Image;
use crate::sampling::{rand01, rand_index, Stroke};

/// Number of trials needed so that `stroke_count` acceptances are expected
/// at an average acceptance probability of `mean_importance`.
///
/// Zero when either is zero: a map that accepts nothing yields no trials.
pub fn trial_count(stroke_count: usize, mean_importance: f32) -> usize {
    if stroke_count == 0 || !(mean_importance > 0.0) {
        return 0;
    }
    (stroke_count as f64 / f64::from(mean_importance)).round() as usize
}

/// Draws strokes whose density follows an [`ImportanceMap`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeSampler {
    /// Expected number of accepted strokes.
    pub stroke_count: usize,
    /// Color jitter amplitude; each channel is scaled by a factor in `[1 - noise/2, 1 + noise/2]`.
    pub noise: f32,
}

impl Default for StrokeSampler {
    fn default() -> Self {
        Self {
            stroke_count: 1000,
            noise: 0.3,
        }
    }
}

impl StrokeSampler {
    pub fn new(stroke_count: usize, noise: f32) -> Self {
        Self {
            stroke_count,
            noise,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.noise.is_finite() && (0.0..=2.0).contains(&self.noise)) {
            return Err(Error::InvalidConfig(format!(
                "noise must be within [0, 2], got {}",
                self.noise
            )));
        }
        Ok(())
    }

    /// Lazily draw strokes from `source`.
    ///
    /// Each trial picks a uniform pixel and accepts it when a uniform draw in
    /// `[0, 1]` does not exceed the importance there. Without an orientation
    /// field every stroke has angle `0`.
    pub fn strokes<'a, R: RngCore + ?Sized>(
        &self,
        source: &'a Image,
        importance: &'a ImportanceMap,
        orientation: Option<&'a OrientationField>,
        rng: &'a mut R,
    ) -> Result<Strokes<'a, R>> {
        self.validate()?;
        source.ensure_non_empty("source")?;
        if source.channels() != 3 {
            return Err(Error::ChannelMismatch {
                role: "source",
                expected: 3,
                found: source.channels(),
            });
        }
        if importance.size() != source.size() {
            return Err(Error::DimensionMismatch {
                role: "importance map",
                expected: source.size(),
                found: importance.size(),
            });
        }
        if let Some(field) = orientation {
            if field.size() != source.size() {
                return Err(Error::DimensionMismatch {
                    role: "orientation field",
                    expected: source.size(),
                    found: field.size(),
                });
            }
        }

        let mean_importance = importance.mean();
        let trials = trial_count(self.stroke_count, mean_importance);
        Ok(Strokes {
            source,
            importance,
            orientation,
            rng,
            noise: self.noise,
            mean_importance,
            trials,
            remaining: trials,
            accepted: 0,
        })
    }

    /// Draw every stroke of one pass up front.
    pub fn sample<R: RngCore + ?Sized>(
        &self,
        source: &Image,
        importance: &ImportanceMap,
        orientation: Option<&OrientationField>,
        rng: &mut R,
    ) -> Result<StrokeBatch> {
        let mut iter = self.strokes(source, importance, orientation, rng)?;
        let strokes: Vec<Stroke> = iter.by_ref().collect();
        Ok(StrokeBatch {
            strokes,
            trials: iter.trials(),
            mean_importance: iter.mean_importance(),
        })
    }
}

/// Every stroke accepted during one sampling run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrokeBatch {
    /// Accepted strokes in acceptance order.
    pub strokes: Vec<Stroke>,
    /// Trials drawn.
    pub trials: usize,
    /// Mean of the importance map the trials were drawn against.
    pub mean_importance: f32,
}

impl StrokeBatch {
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}

/// Streaming form of [`StrokeSampler::sample`]; yields strokes as they are accepted.
pub struct Strokes<'a, R: RngCore + ?Sized> {
    source: &'a Image,
    importance: &'a ImportanceMap,
    orientation: Option<&'a OrientationField>,
    rng: &'a mut R,
    noise: f32,
    mean_importance: f32,
    trials: usize,
    remaining: usize,
    accepted: usize,
}

impl<R: RngCore + ?Sized> Strokes<'_, R> {
    /// Total trials this run draws.
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Trials not yet drawn.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Strokes yielded so far.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn mean_importance(&self) -> f32 {
        self.mean_importance
    }

    fn jitter(&mut self) -> Vec3 {
        let base = 1.0 - self.noise / 2.0;
        let r = base + self.noise * rand01(&mut *self.rng);
        let g = base + self.noise * rand01(&mut *self.rng);
        let b = base + self.noise * rand01(&mut *self.rng);
        Vec3::new(r, g, b)
    }
}

impl<R: RngCore + ?Sized> Iterator for Strokes<'_, R> {
    type Item = Stroke;

    fn next(&mut self) -> Option<Stroke> {
        let (w, h) = self.source.size();
        while self.remaining > 0 {
            self.remaining -= 1;
            let x = rand_index(&mut *self.rng, w);
            let y = rand_index(&mut *self.rng, h);
            if rand01(&mut *self.rng) > self.importance.at(x, y) {
                continue;
            }

            let color = Vec3::from_slice(self.source.pixel(x, y)) * self.jitter();
            let angle = self.orientation.map_or(0.0, |field| field.angle_at(x, y));
            let stroke = Stroke::new(UVec2::new(x as u32, y as u32), color, angle, self.accepted);
            self.accepted += 1;
            return Some(stroke);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::tests::FixedRng;

    fn gray_source(width: usize, height: usize) -> Image {
        Image::filled(width, height, 3, 0.5)
    }

    /// Left half accepts everything, right half nothing.
    fn half_map(width: usize, height: usize) -> ImportanceMap {
        let mut image = Image::new(width, height, 1);
        for y in 0..height {
            for x in 0..width / 2 {
                image.set(x, y, 0, 1.0);
            }
        }
        ImportanceMap::from_image(&image).unwrap()
    }

    #[test]
    fn trial_count_renormalizes_by_mean() {
        assert_eq!(trial_count(1000, 1.0), 1000);
        assert_eq!(trial_count(1000, 0.5), 2000);
        assert_eq!(trial_count(10, 0.3), 33);
        assert_eq!(trial_count(1000, 0.0), 0);
        assert_eq!(trial_count(0, 0.7), 0);
        assert_eq!(trial_count(5, f32::NAN), 0);
    }

    #[test]
    fn zero_importance_emits_nothing() {
        let source = gray_source(16, 16);
        let importance = ImportanceMap::from_image(&Image::new(16, 16, 1)).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let batch = StrokeSampler::new(500, 0.3)
            .sample(&source, &importance, None, &mut rng)
            .unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.trials, 0);
    }

    #[test]
    fn full_importance_accepts_every_trial() {
        let source = gray_source(32, 32);
        let importance = ImportanceMap::uniform(32, 32);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let batch = StrokeSampler::new(1000, 0.3)
                .sample(&source, &importance, None, &mut rng)
                .unwrap();
            assert_eq!(batch.trials, 1000);
            assert_eq!(batch.len(), 1000);
        }
    }

    #[test]
    fn accepted_count_converges_for_partial_importance() {
        let source = gray_source(40, 20);
        let importance = half_map(40, 20);
        let sampler = StrokeSampler::new(1000, 0.3);
        let mut rng = StdRng::seed_from_u64(2024);

        let runs = 100;
        let mut total = 0;
        for _ in 0..runs {
            let batch = sampler.sample(&source, &importance, None, &mut rng).unwrap();
            assert_eq!(batch.trials, 2000);
            assert!(batch.strokes.iter().all(|s| s.position.x < 20));
            total += batch.len();
        }
        let mean = total as f64 / runs as f64;
        assert!((mean - 1000.0).abs() < 50.0, "mean accepted count {mean}");
    }

    #[test]
    fn jitter_stays_within_noise_band() {
        let source = gray_source(8, 8);
        let importance = ImportanceMap::uniform(8, 8);
        let mut rng = StdRng::seed_from_u64(5);
        let batch = StrokeSampler::new(400, 0.4)
            .sample(&source, &importance, None, &mut rng)
            .unwrap();
        for s in &batch.strokes {
            for c in s.color.to_array() {
                assert!((0.5 * 0.8 - 1e-6..=0.5 * 1.2 + 1e-6).contains(&c), "channel {c}");
            }
        }
    }

    #[test]
    fn zero_noise_copies_source_color() {
        let source = gray_source(4, 4);
        let importance = ImportanceMap::uniform(4, 4);
        // Every draw is 0: pixel (0, 0), always accepted, jitter factor exactly 1.
        let mut rng = FixedRng { value: 0 };
        let batch = StrokeSampler::new(3, 0.0)
            .sample(&source, &importance, None, &mut rng)
            .unwrap();
        assert_eq!(batch.len(), 3);
        for s in &batch.strokes {
            assert_eq!(s.position, UVec2::ZERO);
            assert_eq!(s.color, Vec3::splat(0.5));
        }
    }

    #[test]
    fn strokes_carry_orientation_and_sequence() {
        let source = gray_source(10, 10);
        let importance = ImportanceMap::uniform(10, 10);
        let field = OrientationField::constant(10, 10, 1.25);
        let mut rng = StdRng::seed_from_u64(9);
        let batch = StrokeSampler::new(20, 0.3)
            .sample(&source, &importance, Some(&field), &mut rng)
            .unwrap();
        for (i, s) in batch.strokes.iter().enumerate() {
            assert_eq!(s.angle, 1.25);
            assert_eq!(s.sequence, i);
        }
    }

    #[test]
    fn same_seed_same_strokes() {
        let source = gray_source(16, 16);
        let importance = half_map(16, 16);
        let sampler = StrokeSampler::new(50, 0.3);
        let a = sampler
            .sample(&source, &importance, None, &mut StdRng::seed_from_u64(77))
            .unwrap();
        let b = sampler
            .sample(&source, &importance, None, &mut StdRng::seed_from_u64(77))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn stream_reports_progress() {
        let source = gray_source(8, 8);
        let importance = ImportanceMap::uniform(8, 8);
        let mut rng = StdRng::seed_from_u64(1);
        let sampler = StrokeSampler::new(10, 0.3);
        let mut stream = sampler.strokes(&source, &importance, None, &mut rng).unwrap();
        assert_eq!(stream.trials(), 10);
        stream.next();
        stream.next();
        assert_eq!(stream.accepted(), 2);
        assert_eq!(stream.remaining(), 8);
    }

    #[test]
    fn rejects_malformed_inputs() {
        let mut rng = StdRng::seed_from_u64(0);
        let sampler = StrokeSampler::new(10, 0.3);
        let importance = ImportanceMap::uniform(8, 8);

        let gray = Image::filled(8, 8, 1, 0.5);
        assert!(matches!(
            sampler.sample(&gray, &importance, None, &mut rng),
            Err(Error::ChannelMismatch { .. })
        ));

        let source = gray_source(9, 8);
        assert!(matches!(
            sampler.sample(&source, &importance, None, &mut rng),
            Err(Error::DimensionMismatch { .. })
        ));

        let bad_noise = StrokeSampler::new(10, -0.5);
        assert!(bad_noise
            .sample(&gray_source(8, 8), &importance, None, &mut rng)
            .is_err());
    }
}
