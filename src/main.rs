//! Offline spectral analyzer batch job.
//!
//! Reads one audio track, runs the windowed-FFT pipeline, and writes the
//! two gzip-compressed loudness arrays the runtime loads at startup. Any
//! read or write failure aborts with a diagnostic and a non-zero exit.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use orbitune::analyzer::{read_waveform, write_compressed, SpectralAnalyzer};
use orbitune::params::AnalyzerConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "orbitune")]
#[command(about = "Precompute per-frame loudness arrays from an audio track", long_about = None)]
struct Args {
    /// Input waveform: headerless little-endian f64 mono, or a .wav file
    input: PathBuf,

    /// Directory receiving <stem>.volume.gz and <stem>.volume-in-band.gz
    #[arg(long, value_name = "DIR", default_value = "assets")]
    output_dir: PathBuf,

    /// Sample rate of the input waveform (Hz)
    #[arg(long, value_name = "HZ", default_value_t = 44100)]
    sample_rate: u32,

    /// FFT window size in samples (power of 2)
    #[arg(long, value_name = "SAMPLES", default_value_t = 1024)]
    fft_window: usize,

    /// Output frame rate the runtime will index at (fps)
    #[arg(long, value_name = "FPS", default_value_t = 60)]
    frame_rate: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = AnalyzerConfig {
        sample_rate_hz: args.sample_rate,
        fft_window: args.fft_window,
        frame_rate: args.frame_rate,
    };

    let samples = read_waveform(&args.input, &config)?;
    log::info!(
        "Read {} ({:.1}s at {} Hz)",
        args.input.display(),
        samples.len() as f64 / config.sample_rate_hz as f64,
        config.sample_rate_hz
    );

    let mut analyzer = SpectralAnalyzer::new(config).map_err(anyhow::Error::msg)?;
    let frames = analyzer.analyze(&samples);

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Failed to create output directory {}", args.output_dir.display())
    })?;

    let stem = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("track");
    write_compressed(
        &args.output_dir.join(format!("{stem}.volume.gz")),
        &frames.volume,
    )?;
    write_compressed(
        &args.output_dir.join(format!("{stem}.volume-in-band.gz")),
        &frames.volume_in_band,
    )?;

    log::info!("Analysis complete: {} frames", frames.volume.len());
    Ok(())
}
