use std::f64::consts::TAU;

use nalgebra::{Point2, Vector2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::{color_for, Color};
use crate::config::Range;

/// Converts speed × density into the energy used for trail rendering
pub const ENERGY_SCALE: f64 = 0.1;

/// Kind of particle, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    Plasma,
    Proton,
    Electron,
    Cme,
    Flare,
    Corona,
}

impl ParticleKind {
    /// Eruptive kinds fly radially and ignore the magnetic field
    pub fn is_eruptive(self) -> bool {
        matches!(self, ParticleKind::Cme | ParticleKind::Flare)
    }

    pub fn base_speed(self) -> f64 {
        match self {
            ParticleKind::Cme => 12.0,
            ParticleKind::Electron => 8.0,
            _ => 4.0,
        }
    }

    /// Per-tick velocity multiplier. Compounds without bound.
    pub fn acceleration(self) -> f64 {
        match self {
            ParticleKind::Cme => 1.03,
            ParticleKind::Flare => 1.02,
            _ => 1.005,
        }
    }

    pub fn lifespan_range(self) -> Range {
        match self {
            ParticleKind::Cme => Range::new(200.0, 500.0),
            _ => Range::new(100.0, 250.0),
        }
    }

    pub fn size_range(self) -> Range {
        match self {
            ParticleKind::Cme => Range::new(3.0, 9.0),
            _ => Range::new(1.0, 4.0),
        }
    }

    /// Kelvin
    pub fn temperature_range(self) -> Range {
        match self {
            ParticleKind::Corona => Range::new(1_000_000.0, 3_000_000.0),
            _ => Range::new(50_000.0, 150_000.0),
        }
    }

    /// Particles per cm³
    pub fn density_range(self) -> Range {
        match self {
            ParticleKind::Cme => Range::new(20.0, 70.0),
            _ => Range::new(5.0, 15.0),
        }
    }

    /// Glow radius as a multiple of particle size, for kinds that glow
    pub fn glow_scale(self) -> Option<f64> {
        match self {
            ParticleKind::Cme => Some(4.0),
            ParticleKind::Flare => Some(3.0),
            _ => None,
        }
    }
}

/// Magnetic field strength range in nT, shared by every kind
pub const MAGNETIC_FIELD_RANGE: Range = Range::new(5.0, 25.0);

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Pixels
    pub position: Point2<f64>,
    /// Pixels per tick
    pub velocity: Vector2<f64>,
    /// Ticks since spawn
    pub age: u32,
    pub lifespan: u32,
    /// Radius in pixels
    pub size: f64,
    /// Kelvin
    pub temperature: f64,
    /// Particles per cm³
    pub density: f64,
    /// nT
    pub magnetic_field_strength: f64,
    pub kind: ParticleKind,
    pub color: Color,
    pub energy: f64,
}

impl Particle {
    /// Creates a particle at `position` with kind-dependent random parameters.
    ///
    /// Direction is uniform over the full circle and speed is the kind's
    /// base speed scaled by `1 + U(0, 0.5)`. Color and energy are derived
    /// once here and never recomputed.
    pub fn spawn<R: Rng + ?Sized>(position: Point2<f64>, kind: ParticleKind, rng: &mut R) -> Self {
        let angle = rng.random::<f64>() * TAU;
        let speed = kind.base_speed() * (1.0 + rng.random::<f64>() * 0.5);

        let temperature = kind.temperature_range().sample(rng);
        let density = kind.density_range().sample(rng);
        let magnetic_field_strength = MAGNETIC_FIELD_RANGE.sample(rng);
        let lifespan = kind.lifespan_range().sample(rng).round() as u32;
        let size = kind.size_range().sample(rng);
        let color = color_for(kind, temperature, rng);

        Self {
            position,
            velocity: Vector2::new(angle.cos(), angle.sin()) * speed,
            age: 0,
            lifespan,
            size,
            temperature,
            density,
            magnetic_field_strength,
            kind,
            color,
            energy: speed * density * ENERGY_SCALE,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age > self.lifespan
    }

    /// Fade factor: 1 at birth, 0 at the end of life
    pub fn alpha(&self) -> f64 {
        if self.lifespan == 0 {
            return 0.0;
        }
        (1.0 - f64::from(self.age) / f64::from(self.lifespan)).max(0.0)
    }

    pub fn distance_from(&self, center: Point2<f64>) -> f64 {
        (self.position - center).magnitude()
    }

    /// Where the particle would have been two ticks ago at its current velocity
    pub fn trail_start(&self) -> Point2<f64> {
        self.position - self.velocity * 2.0
    }
}
