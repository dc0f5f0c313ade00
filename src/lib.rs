//! Orbitune - audio-synchronized orbital particle visualizer core.
//!
//! Two halves: an offline spectral analyzer that turns a raw waveform into
//! per-video-frame loudness arrays, and a tick-driven runtime engine that
//! consumes those arrays to animate, project, and depth-sort orbiting
//! particles. Rendering itself is out of scope; the engine emits 2-D
//! placements, sprite transforms, and alphas for an external scene graph.

pub mod analyzer;
pub mod envelope;
pub mod glow;
pub mod math;
pub mod params;
pub mod ring;
pub mod spectrum;
pub mod spin;
pub mod track;
