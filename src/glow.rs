//! Audio-reactive glow models.
//!
//! `BandGlow` drives one particle's glow sprite from the loudness of its
//! assigned frequency band. `CentreGlow` drives a single central element
//! from the track's total loudness, with a tempo-locked bob so the element
//! breathes with the beat even through quiet passages.

use crate::envelope::EnvelopeMapper;
use crate::params::{CentreGlowParams, GlowParams};
use crate::track::SpectralTrack;

/// Band-volume-driven glow alpha for one particle.
#[derive(Debug, Clone)]
pub struct BandGlow {
    mapper: EnvelopeMapper,
    min_alpha: f32,
    alpha_gain: f32,
    band: usize,
}

impl BandGlow {
    pub fn new(band: usize, params: &GlowParams) -> Result<Self, String> {
        Ok(Self {
            mapper: EnvelopeMapper::new(params.envelope.clone())?,
            min_alpha: params.min_alpha,
            alpha_gain: params.alpha_gain,
            band,
        })
    }

    /// Glow alpha for this tick.
    pub fn advance(&mut self, elapsed_ms: f64, delta_ms: f32, track: &SpectralTrack) -> f32 {
        let intensity = self.mapper.map(track.band_at(elapsed_ms, self.band), delta_ms);
        self.min_alpha + self.alpha_gain * intensity
    }

    pub fn band(&self) -> usize {
        self.band
    }
}

/// One tick of the centre element: bob pose plus glow alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentrePulse {
    /// Rocking rotation (radians)
    pub rotation: f32,

    /// Vertical displacement (scene units)
    pub y_offset: f32,

    /// Glow alpha
    pub alpha: f32,
}

/// Total-volume-driven centre glow with a tempo-locked bob.
#[derive(Debug, Clone)]
pub struct CentreGlow {
    mapper: EnvelopeMapper,
    params: CentreGlowParams,
    elapsed_ms: f64,
}

impl CentreGlow {
    pub fn new(params: CentreGlowParams) -> Result<Self, String> {
        Ok(Self {
            mapper: EnvelopeMapper::new(params.envelope.clone())?,
            params,
            elapsed_ms: 0.0,
        })
    }

    /// Advance the bob clock and envelope by `delta_ms`.
    pub fn advance(&mut self, delta_ms: f32, track: &SpectralTrack) -> CentrePulse {
        self.elapsed_ms += delta_ms as f64;

        let progress = self.elapsed_ms / self.params.bob_period_ms() as f64;
        let phase = ((progress - progress.floor()) * std::f64::consts::TAU) as f32;

        let alpha = self
            .mapper
            .map(track.volume_at(self.elapsed_ms), delta_ms);

        CentrePulse {
            rotation: phase.cos() * self.params.rock_amount,
            y_offset: phase.sin() * self.params.bob_amount,
            alpha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{AnalyzerConfig, EnvelopeParams};

    fn config() -> AnalyzerConfig {
        AnalyzerConfig {
            sample_rate_hz: 8000,
            fft_window: 16,
            frame_rate: 10,
        }
    }

    fn flat_track(level: f32) -> SpectralTrack {
        let config = config();
        let volume = vec![level; 50];
        let bands = vec![level; 50 * config.half_window()];
        SpectralTrack::from_arrays(volume, bands, &config).unwrap()
    }

    #[test]
    fn test_band_glow_alpha_range() {
        let params = GlowParams::default();
        let mut glow = BandGlow::new(3, &params).unwrap();

        // Silence: floor alpha
        let silent = flat_track(0.0);
        let alpha = glow.advance(0.0, 16.0, &silent);
        assert!((alpha - params.min_alpha).abs() < 1e-6);

        // Saturating loudness: floor + gain
        let loud = flat_track(f32::MAX / 2.0);
        let alpha = glow.advance(0.0, 16.0, &loud);
        assert!((alpha - (params.min_alpha + params.alpha_gain)).abs() < 1e-6);
    }

    #[test]
    fn test_band_glow_tracks_configured_band() {
        let config = config();
        let params = GlowParams::default();
        let mut glow = BandGlow::new(2, &params).unwrap();

        // Only band 2 is loud
        let mut bands = vec![0.0f32; 50 * config.half_window()];
        for frame in 0..50 {
            bands[frame * config.half_window() + 2] = (25.0f32 + 15.0).exp();
        }
        let track = SpectralTrack::from_arrays(vec![0.0; 50], bands, &config).unwrap();

        let alpha = glow.advance(0.0, 16.0, &track);
        assert!((alpha - (params.min_alpha + params.alpha_gain)).abs() < 1e-6);

        let mut off_band = BandGlow::new(3, &params).unwrap();
        let alpha = off_band.advance(0.0, 16.0, &track);
        assert!((alpha - params.min_alpha).abs() < 1e-6);
    }

    #[test]
    fn test_centre_glow_bob_cycle() {
        let params = CentreGlowParams {
            bpm: 120.0,
            beats_per_cycle: 8.0,
            rock_amount: 0.04,
            bob_amount: 12.0,
            envelope: EnvelopeParams::centre_glow(),
        };
        let period = params.bob_period_ms();
        let mut glow = CentreGlow::new(params.clone()).unwrap();
        let track = flat_track(1.0);

        // Quarter cycle: sin peak, cos zero
        let pulse = glow.advance(period / 4.0, &track);
        assert!((pulse.y_offset - params.bob_amount).abs() < 1e-3);
        assert!(pulse.rotation.abs() < 1e-3);

        // Half cycle: back through the middle, rocked the other way
        let pulse = glow.advance(period / 4.0, &track);
        assert!(pulse.y_offset.abs() < 1e-3);
        assert!((pulse.rotation + params.rock_amount).abs() < 1e-4);
    }

    #[test]
    fn test_centre_glow_decays_with_half_life() {
        let params = CentreGlowParams::default();
        let half_life = params.envelope.half_life_ms.unwrap();
        let mut glow = CentreGlow::new(params.clone()).unwrap();

        // Saturate, then feed silence for one half-life
        let loud = flat_track((params.envelope.log_scale + params.envelope.log_offset).exp());
        let pulse = glow.advance(16.0, &loud);
        assert!((pulse.alpha - 1.0).abs() < 1e-3);

        let silent = flat_track(0.0);
        let pulse = glow.advance(half_life, &silent);
        assert!((pulse.alpha - 0.5).abs() < 1e-3);
    }
}
