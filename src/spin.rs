//! Per-particle self-animation.
//!
//! Each particle owns a constant transform (random rotation, uniform scale
//! and positional offset, all sampled once at creation) and a dynamic spin
//! about a fixed random axis whose angle advances with time. The composed
//! 3×3 transform is read back out as 2-D scale/skew for the sprite backend.

use glam::{Mat3, Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

use crate::math::{decompose_2d, random_unit_vector, rotation_from_axis_angle, SpriteTransform};
use crate::params::SpinParams;

/// Self-contained spin state for one particle.
#[derive(Debug, Clone)]
pub struct ParticleSpin {
    constant: Mat3,
    axis: Vec3,
    offset: Vec2,
    period_ms: f32,
    progress: f32,
    band: usize,
}

impl ParticleSpin {
    /// Sample a particle's constant state.
    ///
    /// `position` in [0, 1) picks the frequency band the particle reacts
    /// to, from the lower `band_fraction` of the spectrum's `half_window`
    /// slots.
    pub fn new<R: Rng + ?Sized>(
        position: f32,
        half_window: usize,
        params: &SpinParams,
        rng: &mut R,
    ) -> Self {
        let band = 1 + (position * params.band_fraction * half_window as f32) as usize;

        let scale = params.base_scale * (1.0 + (rng.gen::<f32>() - 0.5) * params.scale_jitter);
        let constant =
            rotation_from_axis_angle(random_unit_vector(rng), rng.gen::<f32>() * TAU) * scale;

        // Quadratic falloff keeps most particles near their anchor
        let off_distance = rng.gen::<f32>().powi(2) * params.offset_max;
        let off_bearing = rng.gen::<f32>() * TAU;
        let offset = Vec2::new(
            off_distance * off_bearing.cos(),
            off_distance * off_bearing.sin(),
        );

        let period_ms =
            params.period_base_ms + rng.gen::<f32>().powf(params.period_pow) * params.period_span_ms;

        Self {
            constant,
            axis: random_unit_vector(rng),
            offset,
            period_ms,
            progress: rng.gen::<f32>(),
            band,
        }
    }

    /// Advance the spin by `delta_ms` and return the sprite transform for
    /// this tick.
    pub fn advance(&mut self, delta_ms: f32) -> SpriteTransform {
        self.progress += delta_ms / self.period_ms;
        self.progress -= self.progress.floor();

        let dynamic = rotation_from_axis_angle(self.axis, TAU * self.progress);
        decompose_2d(&(self.constant * dynamic))
    }

    /// Current transform without advancing time.
    pub fn transform(&self) -> SpriteTransform {
        let dynamic = rotation_from_axis_angle(self.axis, TAU * self.progress);
        decompose_2d(&(self.constant * dynamic))
    }

    /// Band-array slot whose loudness drives this particle's glow.
    pub fn band(&self) -> usize {
        self.band
    }

    /// Fixed positional offset from the particle's orbit anchor.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn period_ms(&self) -> f32 {
        self.period_ms
    }
}
