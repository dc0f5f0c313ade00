//! Runtime spectral track data.
//!
//! Loads the analyzer's two gzip-compressed f32 arrays, checks they agree
//! with each other and with the analysis configuration, and serves
//! time-indexed lookups. Out-of-range lookups clamp to the final frame, so
//! consumers driven past the end of the track hold its last value instead
//! of reading garbage.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;

use crate::analyzer::SpectralFrames;
use crate::params::AnalyzerConfig;

/// Immutable per-frame loudness data for one audio track.
#[derive(Debug, Clone)]
pub struct SpectralTrack {
    volume: Vec<f32>,
    volume_in_band: Vec<f32>,
    half_window: usize,
    frame_rate: u32,
}

impl SpectralTrack {
    /// Load both arrays from their gzip files.
    pub fn load(volume_path: &Path, band_path: &Path, config: &AnalyzerConfig) -> Result<Self> {
        config.validate().map_err(anyhow::Error::msg)?;

        let volume = read_compressed(volume_path)?;
        let volume_in_band = read_compressed(band_path)?;

        Self::from_arrays(volume, volume_in_band, config)
    }

    /// Build a track from already-decoded arrays (analyzer output or test
    /// fixtures).
    pub fn from_arrays(
        volume: Vec<f32>,
        volume_in_band: Vec<f32>,
        config: &AnalyzerConfig,
    ) -> Result<Self> {
        let half_window = config.half_window();
        if volume.is_empty() {
            bail!("Spectral track has no frames");
        }
        if volume_in_band.len() != volume.len() * half_window {
            bail!(
                "Band array holds {} values, expected {} frames x {} bands",
                volume_in_band.len(),
                volume.len(),
                half_window
            );
        }

        log::info!(
            "Loaded spectral track: {} frames, {} bands, {:.1}s",
            volume.len(),
            half_window,
            volume.len() as f32 / config.frame_rate as f32
        );

        Ok(Self {
            volume,
            volume_in_band,
            half_window,
            frame_rate: config.frame_rate,
        })
    }

    pub fn from_frames(frames: SpectralFrames, config: &AnalyzerConfig) -> Result<Self> {
        Self::from_arrays(frames.volume, frames.volume_in_band, config)
    }

    pub fn total_frames(&self) -> usize {
        self.volume.len()
    }

    pub fn half_window(&self) -> usize {
        self.half_window
    }

    /// Track duration covered by the analyzed frames.
    pub fn duration_ms(&self) -> f64 {
        self.volume.len() as f64 * 1000.0 / self.frame_rate as f64
    }

    /// Frame index for an elapsed time, clamped to the final frame.
    pub fn frame_at(&self, elapsed_ms: f64) -> usize {
        let frame = (elapsed_ms.max(0.0) / 1000.0 * self.frame_rate as f64) as usize;
        frame.min(self.volume.len() - 1)
    }

    /// Total loudness at an elapsed time.
    pub fn volume_at(&self, elapsed_ms: f64) -> f32 {
        self.volume[self.frame_at(elapsed_ms)]
    }

    /// Loudness of one frequency band at an elapsed time.
    ///
    /// `band` indexes the `half_window` slots of a frame row; out-of-range
    /// bands read as silence rather than a neighboring frame's data.
    pub fn band_at(&self, elapsed_ms: f64, band: usize) -> f32 {
        if band >= self.half_window {
            return 0.0;
        }
        self.volume_in_band[self.frame_at(elapsed_ms) * self.half_window + band]
    }
}

/// Read a gzip-compressed raw little-endian f32 array.
pub fn read_compressed(path: &Path) -> Result<Vec<f32>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut bytes = Vec::new();
    GzDecoder::new(file)
        .read_to_end(&mut bytes)
        .with_context(|| format!("Failed to decompress {}", path.display()))?;

    if bytes.len() % 4 != 0 {
        bail!(
            "{} decompressed to {} bytes, not a multiple of 4 (expected raw f32)",
            path.display(),
            bytes.len()
        );
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes(c.try_into().unwrap()))
        .collect())
}
