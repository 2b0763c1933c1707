//! Particle population: spawning, per-tick integration and culling.

use std::f64::consts::TAU;

use nalgebra::Point2;
use rand::Rng;

use crate::config::{AmbientWeights, EmissionConfig};
use crate::field::FieldModel;
use crate::particle::{Particle, ParticleKind};
use crate::scheduler::Burst;
use crate::viewport::Viewport;

/// Counts from one call to [`ParticleSystem::update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    pub expired: usize,
    pub out_of_bounds: usize,
}

impl UpdateStats {
    pub fn culled(&self) -> usize {
        self.expired + self.out_of_bounds
    }
}

/// Owns every live particle. Nothing outside `update` mutates a particle.
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn count_of(&self, kind: ParticleKind) -> usize {
        self.particles.iter().filter(|p| p.kind == kind).count()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Adds an already constructed particle
    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Creates one particle of `kind` at `(x, y)`
    pub fn spawn<R: Rng + ?Sized>(&mut self, x: f64, y: f64, kind: ParticleKind, rng: &mut R) {
        self.push(Particle::spawn(Point2::new(x, y), kind, rng));
    }

    /// Spawns a burst on the photosphere ring, returning how many particles were added
    pub fn emit<R: Rng + ?Sized>(
        &mut self,
        burst: &Burst,
        viewport: &Viewport,
        photosphere_radius: f64,
        rng: &mut R,
    ) -> usize {
        let center = viewport.center();
        match *burst {
            Burst::Flare {
                direction,
                spread,
                count,
                jitter,
            } => {
                for _ in 0..count {
                    let angle = direction + (rng.random::<f64>() - 0.5) * spread;
                    let distance = photosphere_radius + rng.random::<f64>() * jitter;
                    self.spawn_polar(center, angle, distance, ParticleKind::Flare, rng);
                }
                count
            }
            Burst::CoronalMassEjection { count, jitter } => {
                for _ in 0..count {
                    let angle = rng.random::<f64>() * TAU;
                    let distance = photosphere_radius + rng.random::<f64>() * jitter;
                    self.spawn_polar(center, angle, distance, ParticleKind::Cme, rng);
                }
                count
            }
        }
    }

    /// Maybe spawns one ambient particle; returns whether it did
    pub fn emit_ambient<R: Rng + ?Sized>(
        &mut self,
        emission: &EmissionConfig,
        viewport: &Viewport,
        photosphere_radius: f64,
        rng: &mut R,
    ) -> bool {
        if emission.ambient_probability <= 0.0 || rng.random::<f64>() >= emission.ambient_probability
        {
            return false;
        }

        let angle = rng.random::<f64>() * TAU;
        let distance = photosphere_radius + rng.random::<f64>() * emission.ambient_jitter;
        let kind = ambient_kind(&emission.weights, rng);
        self.spawn_polar(viewport.center(), angle, distance, kind, rng);
        true
    }

    /// Advance every particle by `delta_ticks` ticks.
    ///
    /// Per tick and per particle, in order: kind acceleration, field
    /// correction, position integration, aging, then removal if the particle
    /// outlived its lifespan or left the cull radius. A zero delta is a no-op.
    pub fn update(
        &mut self,
        delta_ticks: u32,
        viewport: &Viewport,
        field: &dyn FieldModel,
        cull_factor: f64,
    ) -> UpdateStats {
        let center = viewport.center();
        let cull_radius = viewport.cull_radius(cull_factor);
        let mut stats = UpdateStats::default();

        for _ in 0..delta_ticks {
            self.particles.retain_mut(|particle| {
                particle.velocity *= particle.kind.acceleration();
                if !particle.kind.is_eruptive() {
                    particle.velocity += field.correction(particle, center);
                }
                particle.position += particle.velocity;
                particle.age += 1;

                if particle.is_expired() {
                    stats.expired += 1;
                    false
                } else if particle.distance_from(center) > cull_radius {
                    stats.out_of_bounds += 1;
                    false
                } else {
                    true
                }
            });
        }

        stats
    }

    fn spawn_polar<R: Rng + ?Sized>(
        &mut self,
        center: Point2<f64>,
        angle: f64,
        distance: f64,
        kind: ParticleKind,
        rng: &mut R,
    ) {
        self.spawn(
            center.x + angle.cos() * distance,
            center.y + angle.sin() * distance,
            kind,
            rng,
        );
    }
}

impl FromIterator<Particle> for ParticleSystem {
    fn from_iter<I: IntoIterator<Item = Particle>>(iter: I) -> Self {
        Self {
            particles: iter.into_iter().collect(),
        }
    }
}

/// Weighted pick among the ambient kinds
pub fn ambient_kind<R: Rng + ?Sized>(weights: &AmbientWeights, rng: &mut R) -> ParticleKind {
    let roll = rng.random::<f64>() * weights.total();
    if roll < weights.proton {
        ParticleKind::Proton
    } else if roll < weights.proton + weights.electron {
        ParticleKind::Electron
    } else {
        ParticleKind::Corona
    }
}
