//! Envelope mapping from raw loudness samples to visual intensities.
//!
//! Raw volumes span many orders of magnitude, so consumers see
//! `(ln(v) - log_offset) / log_scale` instead. Smoothing is asymmetric:
//! rising targets are taken immediately (sound onsets read as instant),
//! falling targets decay exponentially with a configured half-life
//! (perceptual afterglow). A `None` half-life disables smoothing entirely.

use crate::params::{ClampMode, EnvelopeParams};

/// Stateful mapper: one smoothed intensity per animated element.
#[derive(Debug, Clone)]
pub struct EnvelopeMapper {
    params: EnvelopeParams,
    current: f32,
}

impl EnvelopeMapper {
    pub fn new(params: EnvelopeParams) -> Result<Self, String> {
        params.validate()?;
        Ok(Self {
            params,
            current: 0.0,
        })
    }

    /// Feed one raw sample, advance the envelope by `delta_ms`, and return
    /// the new smoothed intensity.
    pub fn map(&mut self, raw_sample: f32, delta_ms: f32) -> f32 {
        // Silent frames carry 0.0; floor before ln so the target stays
        // finite instead of poisoning the blend with -inf
        let compressed = (raw_sample.max(f32::MIN_POSITIVE).ln() - self.params.log_offset)
            / self.params.log_scale;
        let target = match self.params.clamp {
            ClampMode::None => compressed,
            ClampMode::Positive => compressed.max(0.0),
            ClampMode::Unit => compressed.clamp(0.0, 1.0),
        };

        self.current = match self.params.half_life_ms {
            None => target,
            Some(half_life) => {
                if target >= self.current {
                    target
                } else {
                    target + (self.current - target) * 0.5f32.powf(delta_ms / half_life)
                }
            }
        };
        self.current
    }

    /// Current smoothed intensity without feeding a new sample.
    pub fn value(&self) -> f32 {
        self.current
    }
}
