//! Orbital projection engine.
//!
//! Particles follow a closed 3-D orbit (the image of the unit circle under
//! `cos·a + sin·b + c`), get projected to 2-D with a perspective-derived
//! scale, and are partitioned into front and back draw containers split at
//! the cut plane `z = c.z`. The back container is painted entirely before
//! the front one; within a container, ascending depth keys give a correct
//! painter's order. Particles move between containers only when they cross
//! the plane, so no global sort is ever needed.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::params::RingParams;

/// Immutable orbit description, shared by every particle of a ring.
#[derive(Debug, Clone)]
pub struct OrbitalGeometry {
    /// Cosine basis vector of the orbit ellipse
    pub a: Vec3,

    /// Sine basis vector of the orbit ellipse
    pub b: Vec3,

    /// Orbit center; `c.z` is the cut depth splitting front from back
    pub c: Vec3,

    /// Camera position (more negative z = further behind the scene,
    /// looking toward increasing z)
    pub camera: Vec3,

    /// Time for one full orbit (ms)
    pub period_ms: f32,
}

impl OrbitalGeometry {
    /// Depth of the cut plane separating the draw layers.
    pub fn cut_z(&self) -> f32 {
        self.c.z
    }

    /// 3-D orbit position for a progress in [0, 1).
    pub fn position(&self, progress: f32) -> Vec3 {
        let angle = TAU * progress;
        angle.cos() * self.a + angle.sin() * self.b + self.c
    }

    /// Camera-to-cut-plane distance. Normalizes perspective scale so a
    /// particle crossing the cut plane renders at exactly 1.0.
    pub fn reference_distance(&self) -> f32 {
        self.camera
            .distance(Vec3::new(self.camera.x, self.camera.y, self.c.z))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.period_ms <= 0.0 {
            return Err(format!("Orbit period must be > 0 ms, got {}", self.period_ms));
        }
        if self.reference_distance() == 0.0 {
            return Err("Camera lies on the cut plane; perspective scale is undefined".to_string());
        }
        Ok(())
    }
}

/// Which draw container a particle currently belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingLayer {
    /// Painted after Back; holds everything nearer than the cut plane
    Front,
    /// Painted first; holds everything at or beyond the cut plane
    Back,
}

/// Layer decision as a pure function of depth.
pub fn layer_of(z: f32, cut_z: f32) -> RingLayer {
    if z < cut_z {
        RingLayer::Front
    } else {
        RingLayer::Back
    }
}

/// Draw-order key as a pure function of depth: ascending keys within a
/// container run far-to-near.
pub fn depth_key(z: f32) -> f32 {
    -z
}

/// Projected 2-D placement of one particle for the render backend.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    /// Screen-space position (orbit plane units scaled by perspective)
    pub x: f32,
    pub y: f32,

    /// Perspective scale; exactly 1.0 at the cut plane
    pub scale: f32,

    /// Sort key within the particle's container
    pub depth_key: f32,

    /// Current container membership
    pub layer: RingLayer,
}

/// Stable handle for one particle of a ring.
pub type ParticleId = usize;

#[derive(Debug)]
struct Particle {
    progress: f32,
    placement: Placement,
}

/// A ring of particles orbiting shared geometry.
pub struct OrbitalRing {
    geometry: OrbitalGeometry,
    reference_distance: f32,
    particles: Vec<Particle>,
    front: Vec<ParticleId>,
    back: Vec<ParticleId>,
}

impl OrbitalRing {
    /// Create a ring of `quantity` particles with phases spread evenly
    /// around the orbit, each jittered by `params.jitter_span` slots.
    pub fn new<R: Rng + ?Sized>(
        quantity: usize,
        geometry: OrbitalGeometry,
        params: &RingParams,
        rng: &mut R,
    ) -> Result<Self, String> {
        geometry.validate()?;
        if quantity == 0 {
            return Err("Ring needs at least one particle".to_string());
        }

        let reference_distance = geometry.reference_distance();
        let mut ring = Self {
            geometry,
            reference_distance,
            particles: Vec::with_capacity(quantity),
            front: Vec::new(),
            back: Vec::new(),
        };

        for i in 0..quantity {
            let progress =
                wrap((i as f32 + rng.gen::<f32>() * params.jitter_span) / quantity as f32);
            let placement = ring.project(progress);
            match placement.layer {
                RingLayer::Front => ring.front.push(i),
                RingLayer::Back => ring.back.push(i),
            }
            ring.particles.push(Particle {
                progress,
                placement,
            });
        }
        ring.sort_containers();

        Ok(ring)
    }

    /// Advance every particle by `delta_ms`, swapping containers for any
    /// that crossed the cut plane, then refresh both draw orders.
    pub fn advance(&mut self, delta_ms: f32) {
        let delta_progress = delta_ms / self.geometry.period_ms;

        for id in 0..self.particles.len() {
            let progress = wrap(self.particles[id].progress + delta_progress);
            let placement = self.project(progress);

            let was = self.particles[id].placement.layer;
            if was != placement.layer {
                match was {
                    RingLayer::Front => {
                        self.front.retain(|&p| p != id);
                        self.back.push(id);
                    }
                    RingLayer::Back => {
                        self.back.retain(|&p| p != id);
                        self.front.push(id);
                    }
                }
            }

            let particle = &mut self.particles[id];
            particle.progress = progress;
            particle.placement = placement;
        }

        self.sort_containers();
    }

    /// Particles nearer than the cut plane, far-to-near; paint after
    /// `back()`.
    pub fn front(&self) -> &[ParticleId] {
        &self.front
    }

    /// Particles at or beyond the cut plane, far-to-near; paint first.
    pub fn back(&self) -> &[ParticleId] {
        &self.back
    }

    /// Current 2-D placement of one particle.
    pub fn placement(&self, id: ParticleId) -> Placement {
        self.particles[id].placement
    }

    /// Current orbit phase of one particle.
    pub fn progress(&self, id: ParticleId) -> f32 {
        self.particles[id].progress
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    fn project(&self, progress: f32) -> Placement {
        let p = self.geometry.position(progress);
        let scale = self.reference_distance / p.distance(self.geometry.camera);

        Placement {
            x: p.x * scale,
            y: p.y * scale,
            scale,
            depth_key: depth_key(p.z),
            layer: layer_of(p.z, self.geometry.cut_z()),
        }
    }

    fn sort_containers(&mut self) {
        let particles = &self.particles;
        self.front
            .sort_unstable_by(|&a, &b| {
                particles[a]
                    .placement
                    .depth_key
                    .total_cmp(&particles[b].placement.depth_key)
            });
        self.back
            .sort_unstable_by(|&a, &b| {
                particles[a]
                    .placement
                    .depth_key
                    .total_cmp(&particles[b].placement.depth_key)
            });
    }
}

/// Wrap a progress value into [0, 1).
fn wrap(progress: f32) -> f32 {
    progress - progress.floor()
}
