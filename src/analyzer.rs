//! Offline spectral analysis pipeline.
//!
//! Converts a mono waveform into two per-video-frame arrays: total loudness
//! (`volume`) and per-frequency-band loudness (`volume_in_band`, row-major
//! by frame). Both are written as gzip-compressed raw little-endian f32 for
//! the runtime to load before animation starts.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::params::AnalyzerConfig;

/// Per-frame spectral features extracted from one waveform.
#[derive(Debug, Clone)]
pub struct SpectralFrames {
    /// Total loudness per frame
    pub volume: Vec<f32>,

    /// Per-band loudness, `half_window` slots per frame, row-major
    pub volume_in_band: Vec<f32>,

    /// Band slots per frame (FFT window / 2)
    pub half_window: usize,
}

/// Windowed-FFT analyzer with reusable scratch buffers.
pub struct SpectralAnalyzer {
    config: AnalyzerConfig,
    fft: Arc<dyn Fft<f64>>,
    buffer: Vec<Complex<f64>>,
    window: Vec<f64>,
}

impl SpectralAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, String> {
        config.validate()?;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_window);

        let window = (0..config.fft_window)
            .map(|i| window_coefficient(i, config.fft_window))
            .collect();

        Ok(Self {
            buffer: vec![Complex::new(0.0, 0.0); config.fft_window],
            config,
            fft,
            window,
        })
    }

    /// Analyze a full waveform into per-frame spectral features.
    ///
    /// Emits exactly `floor(samples / sample_rate * frame_rate)` frames;
    /// windows reaching past either end of the waveform are zero-padded.
    pub fn analyze(&mut self, samples: &[f64]) -> SpectralFrames {
        let half_window = self.config.half_window();
        let total_frames = self.config.total_frames(samples.len());

        log::info!(
            "Analyzing {} samples into {} frames ({} bands each)",
            samples.len(),
            total_frames,
            half_window
        );

        let mut volume = vec![0.0f32; total_frames];
        let mut volume_in_band = vec![0.0f32; total_frames * half_window];

        let step = 1.0 / self.config.frame_rate as f64;

        for frame in 0..total_frames {
            let timestamp = frame as f64 * step;
            let mid = ((timestamp + step / 2.0) * self.config.sample_rate_hz as f64).round()
                as isize;
            self.load_window(samples, mid - (self.config.fft_window / 2) as isize);
            self.fft.process(&mut self.buffer);

            let bands = &mut volume_in_band[frame * half_window..(frame + 1) * half_window];
            volume[frame] = self.extract_bands(bands);
        }

        SpectralFrames {
            volume,
            volume_in_band,
            half_window,
        }
    }

    /// Fill the FFT buffer with a windowed slice starting at `from`,
    /// zero-padding indices outside the waveform.
    fn load_window(&mut self, samples: &[f64], from: isize) {
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let source = from + i as isize;
            let value = if source < 0 || source >= samples.len() as isize {
                0.0
            } else {
                samples[source as usize] * self.window[i]
            };
            *slot = Complex::new(value, 0.0);
        }
    }

    /// Read bin powers out of the transformed buffer into `bands` and
    /// return the frame's total volume.
    ///
    /// Bin 0 (DC) is excluded; bin `b` lands in slot `b - 1`. The per-bin
    /// statistic is `(re * im)^2 * b^2`, weighting energy toward higher
    /// bins. Downstream log offsets are tuned to this exact quantity.
    fn extract_bands(&self, bands: &mut [f32]) -> f32 {
        let mut total = 0.0f64;
        for bin in 1..=bands.len() {
            let Complex { re, im } = self.buffer[bin];
            let power = (re * im) * (re * im);
            let weighted = power * (bin * bin) as f64;
            bands[bin - 1] = weighted as f32;
            total += weighted;
        }
        total as f32
    }
}

/// Window coefficient for sample `i` of a `size`-sample analysis window.
///
/// Hamming-type: `0.53836 - 0.46164 * cos(2π(i + 0.5) / size)`, symmetric
/// about the window center.
pub fn window_coefficient(i: usize, size: usize) -> f64 {
    0.53836 - 0.46164 * (2.0 * std::f64::consts::PI * (i as f64 + 0.5) / size as f64).cos()
}

/// Read a mono `f64` waveform from disk.
///
/// `.wav` files go through hound and are downmixed to mono; anything else
/// is treated as headerless interleaved little-endian `f64` mono at the
/// configured sample rate.
pub fn read_waveform(path: &Path, config: &AnalyzerConfig) -> Result<Vec<f64>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("wav") => read_wav(path, config),
        _ => read_raw_f64(path),
    }
}

fn read_raw_f64(path: &Path) -> Result<Vec<f64>> {
    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|mut f| f.read_to_end(&mut bytes))
        .with_context(|| format!("Failed to read waveform {}", path.display()))?;

    if bytes.len() % 8 != 0 {
        bail!(
            "Raw waveform {} has {} bytes, not a multiple of 8 (expected little-endian f64 mono)",
            path.display(),
            bytes.len()
        );
    }

    Ok(bytes
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
        .collect())
}

fn read_wav(path: &Path, config: &AnalyzerConfig) -> Result<Vec<f64>> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV {}", path.display()))?;
    let spec = reader.spec();

    if spec.sample_rate != config.sample_rate_hz {
        log::warn!(
            "WAV sample rate {} Hz differs from configured {} Hz; frame timing will drift",
            spec.sample_rate,
            config.sample_rate_hz
        );
    }

    let channels = spec.channels as usize;
    let interleaved: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| v as f64))
            .collect::<Result<_, _>>()
            .context("Malformed WAV sample data")?,
        hound::SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / full_scale))
                .collect::<Result<_, _>>()
                .context("Malformed WAV sample data")?
        }
    };

    Ok(interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f64>() / channels as f64)
        .collect())
}

/// Write an f32 array as gzip-compressed raw little-endian bytes.
pub fn write_compressed(path: &Path, data: &[f32]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output {}", path.display()))?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::best());
    encoder
        .write_all(bytemuck::cast_slice(data))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    encoder
        .finish()
        .with_context(|| format!("Failed to finish {}", path.display()))?;

    log::info!("Wrote {} ({} floats)", path.display(), data.len());
    Ok(())
}
