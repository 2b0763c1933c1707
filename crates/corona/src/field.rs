//! Magnetic field effects on non-eruptive particles.
//!
//! The field is not a central force: it nudges each particle perpendicular
//! to its radius vector, which reads on screen as a slow swirl around the
//! star. Eruptive kinds (CME, flare) are never corrected.

use nalgebra::{Point2, Vector2};

use crate::particle::Particle;

/// Below this radius the perpendicular direction is undefined
pub const MIN_RADIUS: f64 = 1e-9;

/// A source of per-tick velocity corrections
///
/// # Examples
///
/// ```
/// use corona::field::{FieldModel, MagneticSwirl};
/// use corona::particle::{Particle, ParticleKind};
/// use nalgebra::Point2;
/// use rand::SeedableRng;
/// use rand_chacha::ChaChaRng;
///
/// let mut rng = ChaChaRng::seed_from_u64(42);
/// let particle = Particle::spawn(Point2::new(110.0, 100.0), ParticleKind::Proton, &mut rng);
///
/// let field = MagneticSwirl::default();
/// let nudge = field.correction(&particle, Point2::new(100.0, 100.0));
/// assert!(nudge.x.abs() < 1e-12);
/// assert!(nudge.y > 0.0);
/// ```
pub trait FieldModel {
    /// Velocity change to apply to `particle` this tick
    fn correction(&self, particle: &Particle, center: Point2<f64>) -> Vector2<f64>;
}

/// Orbital nudge proportional to the particle's magnetic field strength
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagneticSwirl {
    pub coupling: f64,
}

impl MagneticSwirl {
    pub fn new(coupling: f64) -> Self {
        Self { coupling }
    }
}

impl Default for MagneticSwirl {
    fn default() -> Self {
        Self { coupling: 0.001 }
    }
}

impl FieldModel for MagneticSwirl {
    fn correction(&self, particle: &Particle, center: Point2<f64>) -> Vector2<f64> {
        if particle.kind.is_eruptive() {
            return Vector2::zeros();
        }
        magnetic_correction(particle, center, self.coupling)
    }
}

/// Perpendicular correction `(-dy/r, dx/r) × strength × coupling`.
///
/// Returns zero when the particle sits on the center, where the
/// perpendicular is undefined.
pub fn magnetic_correction(particle: &Particle, center: Point2<f64>, coupling: f64) -> Vector2<f64> {
    let offset = particle.position - center;
    let r = offset.magnitude();
    if r < MIN_RADIUS {
        return Vector2::zeros();
    }

    let force = particle.magnetic_field_strength * coupling;
    Vector2::new(-offset.y / r, offset.x / r) * force
}
