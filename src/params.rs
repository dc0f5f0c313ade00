//! Parameter definitions with physical units and documented semantics.
//!
//! Every tunable the engine consumes lives here with:
//! - Physical units (Hz, milliseconds, scene units)
//! - Documented ranges and meanings
//! - `validate()` where a bad value would corrupt downstream math

/// Spectral analysis configuration shared by the offline analyzer and the
/// runtime consumers of its output arrays.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Audio sample rate (Hz)
    pub sample_rate_hz: u32,

    /// FFT window size in samples (must be a power of 2)
    pub fft_window: usize,

    /// Output video frame rate (frames per second, independent of the
    /// sample rate)
    pub frame_rate: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_window: 1024,
            frame_rate: 60,
        }
    }
}

impl AnalyzerConfig {
    /// Number of frequency bands stored per frame (DC bin excluded).
    pub fn half_window(&self) -> usize {
        self.fft_window / 2
    }

    /// Convert frequency (Hz) to FFT bin index.
    pub fn hz_to_bin(&self, hz: f32) -> usize {
        ((hz * self.fft_window as f32) / self.sample_rate_hz as f32) as usize
    }

    /// Center frequency (Hz) of a band array slot. Slot `i` holds FFT bin
    /// `i + 1`, so its frequency is `sample_rate / window * (i + 1)`.
    pub fn band_to_hz(&self, band: usize) -> f32 {
        self.sample_rate_hz as f32 / self.fft_window as f32 * (band + 1) as f32
    }

    /// Number of output frames covering `samples` waveform samples.
    pub fn total_frames(&self, samples: usize) -> usize {
        (samples as f64 / self.sample_rate_hz as f64 * self.frame_rate as f64) as usize
    }

    /// Frame index covering an elapsed wall-clock time, unclamped.
    pub fn frame_at(&self, elapsed_ms: f64) -> usize {
        (elapsed_ms / 1000.0 * self.frame_rate as f64) as usize
    }

    /// Validate configuration (FFT window must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_window.is_power_of_two() {
            return Err(format!(
                "FFT window must be power of 2, got {}",
                self.fft_window
            ));
        }
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        if self.frame_rate == 0 {
            return Err("Frame rate must be > 0".to_string());
        }
        Ok(())
    }
}

/// How an envelope intensity is clamped after log compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampMode {
    /// No clamping; the caller interprets the raw intensity
    None,
    /// Clamp below at 0 (bar heights never go negative)
    Positive,
    /// Clamp to [0, 1] (alpha-like consumers)
    Unit,
}

/// Envelope mapping parameters: logarithmic compression plus optional
/// asymmetric (fast-attack / exponential-release) smoothing.
#[derive(Debug, Clone)]
pub struct EnvelopeParams {
    /// Subtracted from `ln(sample)` before scaling
    pub log_offset: f32,

    /// Divisor applied after the offset; larger values compress harder
    pub log_scale: f32,

    /// Release half-life in milliseconds. `None` means instant: the target
    /// is used directly with no smoothing in either direction.
    pub half_life_ms: Option<f32>,

    /// Clamp policy applied to the compressed target
    pub clamp: ClampMode,
}

impl EnvelopeParams {
    /// Spectrum-bar defaults: hard floor at zero, fast 67 ms release.
    pub fn bars() -> Self {
        Self {
            log_offset: 15.0,
            log_scale: 25.0,
            half_life_ms: Some(67.0),
            clamp: ClampMode::Positive,
        }
    }

    /// Per-particle band-glow defaults: alpha range, no smoothing.
    pub fn band_glow() -> Self {
        Self {
            log_offset: 15.0,
            log_scale: 25.0,
            half_life_ms: None,
            clamp: ClampMode::Unit,
        }
    }

    /// Centre-glow defaults: softer divisor, slower 100 ms release.
    pub fn centre_glow() -> Self {
        Self {
            log_offset: 15.0,
            log_scale: 30.0,
            half_life_ms: Some(100.0),
            clamp: ClampMode::Unit,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.log_scale == 0.0 {
            return Err("Envelope log scale must be non-zero".to_string());
        }
        if let Some(hl) = self.half_life_ms {
            if hl <= 0.0 {
                return Err(format!("Envelope half-life must be > 0 ms, got {}", hl));
            }
        }
        Ok(())
    }
}

/// Orbital ring initialization parameters.
#[derive(Debug, Clone)]
pub struct RingParams {
    /// Random phase jitter added to each particle's evenly spread starting
    /// progress, in units of inter-particle slots. Phase is
    /// `(i + random * jitter_span) / n`.
    pub jitter_span: f32,
}

impl Default for RingParams {
    fn default() -> Self {
        Self { jitter_span: 5.0 }
    }
}

/// Per-particle self-animation parameters. All random draws happen once at
/// particle creation.
#[derive(Debug, Clone)]
pub struct SpinParams {
    /// Base uniform scale applied to the particle sprite
    pub base_scale: f32,

    /// Relative scale jitter: actual scale is
    /// `base_scale * (1 + (random - 0.5) * scale_jitter)`
    pub scale_jitter: f32,

    /// Maximum positional offset distance (scene units); actual distance is
    /// `random^2 * offset_max`, biasing particles toward their anchor
    pub offset_max: f32,

    /// Minimum self-spin period (ms)
    pub period_base_ms: f32,

    /// Span added on top of the base period: period is
    /// `period_base_ms + random^period_pow * period_span_ms`
    pub period_span_ms: f32,

    /// Exponent applied to the period draw; < 1 biases toward slow spins
    pub period_pow: f32,

    /// Fraction of the lower spectrum a particle's band is drawn from:
    /// `band = 1 + floor(position * band_fraction * half_window)`
    pub band_fraction: f32,
}

impl Default for SpinParams {
    fn default() -> Self {
        Self {
            base_scale: 0.15,
            scale_jitter: 0.2,
            offset_max: 100.0,
            period_base_ms: 10_000.0,
            period_span_ms: 30_000.0,
            period_pow: 0.25,
            band_fraction: 0.4,
        }
    }
}

/// Spectrum-bar display model parameters.
#[derive(Debug, Clone)]
pub struct BarParams {
    /// Lowest band center frequency that gets a bar (Hz)
    pub freq_start_hz: f32,

    /// Highest band center frequency that gets a bar (Hz)
    pub freq_end_hz: f32,

    /// Per-bar envelope mapping
    pub envelope: EnvelopeParams,
}

impl Default for BarParams {
    fn default() -> Self {
        Self {
            freq_start_hz: 100.0,
            freq_end_hz: 2000.0,
            envelope: EnvelopeParams::bars(),
        }
    }
}

/// Band-driven glow alpha policy.
#[derive(Debug, Clone)]
pub struct GlowParams {
    /// Alpha at zero intensity
    pub min_alpha: f32,

    /// Alpha added at full intensity
    pub alpha_gain: f32,

    /// Envelope mapping from band volume to intensity
    pub envelope: EnvelopeParams,
}

impl Default for GlowParams {
    fn default() -> Self {
        Self {
            min_alpha: 0.05,
            alpha_gain: 0.5,
            envelope: EnvelopeParams::band_glow(),
        }
    }
}

/// Centre glow: total-volume-driven alpha plus a tempo-locked bob.
#[derive(Debug, Clone)]
pub struct CentreGlowParams {
    /// Track tempo (beats per minute) driving the bob period
    pub bpm: f32,

    /// Beats per bob cycle
    pub beats_per_cycle: f32,

    /// Peak rocking rotation (radians)
    pub rock_amount: f32,

    /// Peak vertical travel (scene units)
    pub bob_amount: f32,

    /// Envelope mapping from total volume to glow alpha
    pub envelope: EnvelopeParams,
}

impl Default for CentreGlowParams {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            beats_per_cycle: 8.0,
            rock_amount: 0.04,
            bob_amount: 12.0,
            envelope: EnvelopeParams::centre_glow(),
        }
    }
}

impl CentreGlowParams {
    /// Bob cycle period in milliseconds.
    pub fn bob_period_ms(&self) -> f32 {
        self.beats_per_cycle * 60_000.0 / self.bpm
    }
}
