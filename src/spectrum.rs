//! Spectrum-bar display model.
//!
//! One bar per frequency band whose center frequency falls inside the
//! configured range; each bar's height follows its band's loudness through
//! a fast-attack, 67 ms-release envelope. The model owns its own elapsed
//! clock so it can be driven purely by per-tick deltas.

use crate::envelope::EnvelopeMapper;
use crate::params::{AnalyzerConfig, BarParams};
use crate::track::SpectralTrack;

/// Heights for the subset of bands displayed as bars.
pub struct SpectrumBars {
    /// Slot-indexed; `None` where the band is outside the frequency range
    bars: Vec<Option<EnvelopeMapper>>,
    elapsed_ms: f64,
}

impl SpectrumBars {
    pub fn new(config: &AnalyzerConfig, params: &BarParams) -> Result<Self, String> {
        config.validate()?;
        params.envelope.validate()?;

        let bars = (0..config.half_window())
            .map(|slot| {
                let frequency = config.band_to_hz(slot);
                if frequency < params.freq_start_hz || frequency > params.freq_end_hz {
                    None
                } else {
                    // validated above, each bar clones the same params
                    EnvelopeMapper::new(params.envelope.clone()).ok()
                }
            })
            .collect();

        Ok(Self {
            bars,
            elapsed_ms: 0.0,
        })
    }

    /// Advance all bars by `delta_ms`, reading band loudness from `track`
    /// at the accumulated elapsed time.
    pub fn advance(&mut self, delta_ms: f32, track: &SpectralTrack) {
        self.elapsed_ms += delta_ms as f64;

        for (slot, bar) in self.bars.iter_mut().enumerate() {
            if let Some(mapper) = bar {
                mapper.map(track.band_at(self.elapsed_ms, slot), delta_ms);
            }
        }
    }

    /// Current height of the bar at a band slot, `None` for bands with no
    /// bar.
    pub fn height(&self, slot: usize) -> Option<f32> {
        self.bars.get(slot)?.as_ref().map(|m| m.value())
    }

    /// All active bars as `(slot, height)`, ascending by frequency.
    pub fn heights(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.bars
            .iter()
            .enumerate()
            .filter_map(|(slot, bar)| bar.as_ref().map(|m| (slot, m.value())))
    }

    /// Number of bands that got a bar.
    pub fn bar_count(&self) -> usize {
        self.bars.iter().filter(|b| b.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::EnvelopeParams;

    fn config() -> AnalyzerConfig {
        AnalyzerConfig {
            sample_rate_hz: 8000,
            fft_window: 16,
            frame_rate: 10,
        }
    }

    fn flat_track(config: &AnalyzerConfig, frames: usize, level: f32) -> SpectralTrack {
        let volume = vec![level; frames];
        let bands = vec![level; frames * config.half_window()];
        SpectralTrack::from_arrays(volume, bands, config).unwrap()
    }

    #[test]
    fn test_bars_filtered_by_frequency_range() {
        let config = config();
        // Band slot i sits at (i + 1) * 500 Hz
        let params = BarParams {
            freq_start_hz: 900.0,
            freq_end_hz: 2100.0,
            envelope: EnvelopeParams::bars(),
        };
        let bars = SpectrumBars::new(&config, &params).unwrap();

        // 1000, 1500, 2000 Hz qualify: slots 1, 2, 3
        assert_eq!(bars.bar_count(), 3);
        assert!(bars.height(0).is_none());
        assert!(bars.height(1).is_some());
        assert!(bars.height(3).is_some());
        assert!(bars.height(4).is_none());
    }

    #[test]
    fn test_heights_rise_with_loudness_and_decay_after() {
        let config = config();
        let params = BarParams {
            freq_start_hz: 0.0,
            freq_end_hz: 4000.0,
            envelope: EnvelopeParams::bars(),
        };
        let mut bars = SpectrumBars::new(&config, &params).unwrap();

        // Loud enough that (ln(v) - 15) / 25 lands around 0.4
        let loud = flat_track(&config, 100, (25.0f32 * 0.4 + 15.0).exp());
        bars.advance(16.0, &loud);
        let risen = bars.height(0).unwrap();
        assert!((risen - 0.4).abs() < 1e-3);

        // Silence: decay toward zero, halving every 67 ms
        let quiet = flat_track(&config, 100, 0.0);
        bars.advance(67.0, &quiet);
        let decayed = bars.height(0).unwrap();
        assert!((decayed - risen / 2.0).abs() < 1e-3);

        bars.advance(67.0, &quiet);
        assert!((bars.height(0).unwrap() - risen / 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_heights_iterator_matches_slots() {
        let config = config();
        let params = BarParams {
            freq_start_hz: 900.0,
            freq_end_hz: 2100.0,
            envelope: EnvelopeParams::bars(),
        };
        let bars = SpectrumBars::new(&config, &params).unwrap();

        let slots: Vec<usize> = bars.heights().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec![1, 2, 3]);
    }
}
