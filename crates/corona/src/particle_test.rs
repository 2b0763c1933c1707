use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::particle::{Particle, ParticleKind, ENERGY_SCALE, MAGNETIC_FIELD_RANGE};

fn spawn_many(kind: ParticleKind) -> Vec<Particle> {
    let mut rng = ChaChaRng::seed_from_u64(42);
    (0..500)
        .map(|_| Particle::spawn(Point2::new(10.0, 20.0), kind, &mut rng))
        .collect()
}

#[test]
fn test_cme_spawn_ranges() {
    for p in spawn_many(ParticleKind::Cme) {
        assert_eq!(p.kind, ParticleKind::Cme);
        assert!((3.0..=9.0).contains(&p.size), "size {}", p.size);
        assert!((200..=500).contains(&p.lifespan), "lifespan {}", p.lifespan);
        assert!((50_000.0..=150_000.0).contains(&p.temperature));
        assert!((20.0..=70.0).contains(&p.density));
        assert!((12.0..=18.0).contains(&p.velocity.magnitude()), "speed {}", p.velocity.magnitude());
    }
}

#[test]
fn test_ambient_spawn_ranges() {
    for kind in [ParticleKind::Proton, ParticleKind::Corona, ParticleKind::Flare] {
        for p in spawn_many(kind) {
            assert!((1.0..=4.0).contains(&p.size));
            assert!((100..=250).contains(&p.lifespan));
            assert!((5.0..=15.0).contains(&p.density));
            assert!((4.0..=6.0).contains(&p.velocity.magnitude()), "{:?} speed {}", kind, p.velocity.magnitude());
        }
    }

    for p in spawn_many(ParticleKind::Electron) {
        assert!((8.0..=12.0).contains(&p.velocity.magnitude()), "electron speed {}", p.velocity.magnitude());
    }
}

#[test]
fn test_corona_is_hotter() {
    for p in spawn_many(ParticleKind::Corona) {
        assert!((1_000_000.0..=3_000_000.0).contains(&p.temperature));
    }
}

#[test]
fn test_spawn_derives_energy_and_starts_young() {
    for p in spawn_many(ParticleKind::Cme) {
        assert_eq!(p.age, 0);
        assert_eq!(p.position, Point2::new(10.0, 20.0));
        assert!(MAGNETIC_FIELD_RANGE.contains(p.magnetic_field_strength));
        assert_relative_eq!(p.energy, p.velocity.magnitude() * p.density * ENERGY_SCALE, epsilon = 1e-9);
    }
}

#[test]
fn test_spawn_directions_cover_the_circle() {
    let particles = spawn_many(ParticleKind::Proton);
    let quadrants = particles.iter().fold([0usize; 4], |mut acc, p| {
        let q = match (p.velocity.x >= 0.0, p.velocity.y >= 0.0) {
            (true, true) => 0,
            (false, true) => 1,
            (false, false) => 2,
            (true, false) => 3,
        };
        acc[q] += 1;
        acc
    });
    assert!(quadrants.iter().all(|&n| n > 50), "quadrants {:?}", quadrants);
}

#[test]
fn test_alpha_fades_with_age() {
    let mut rng = ChaChaRng::seed_from_u64(42);
    let mut p = Particle::spawn(Point2::origin(), ParticleKind::Flare, &mut rng);
    p.lifespan = 200;

    p.age = 0;
    assert_relative_eq!(p.alpha(), 1.0);
    p.age = 50;
    assert_relative_eq!(p.alpha(), 0.75);
    p.age = 200;
    assert_relative_eq!(p.alpha(), 0.0);
    assert!(!p.is_expired());
    p.age = 201;
    assert_relative_eq!(p.alpha(), 0.0);
    assert!(p.is_expired());
}

#[test]
fn test_trail_starts_two_ticks_back() {
    let mut rng = ChaChaRng::seed_from_u64(42);
    let mut p = Particle::spawn(Point2::new(100.0, 100.0), ParticleKind::Cme, &mut rng);
    p.velocity = Vector2::new(3.0, -4.0);

    assert_eq!(p.trail_start(), Point2::new(94.0, 108.0));
    assert_relative_eq!(p.velocity.magnitude(), 5.0);
    assert_relative_eq!(p.distance_from(Point2::new(100.0, 95.0)), 5.0);
}

#[test]
fn test_eruptive_kinds() {
    assert!(ParticleKind::Cme.is_eruptive());
    assert!(ParticleKind::Flare.is_eruptive());
    for kind in [
        ParticleKind::Plasma,
        ParticleKind::Proton,
        ParticleKind::Electron,
        ParticleKind::Corona,
    ] {
        assert!(!kind.is_eruptive());
        assert!(kind.glow_scale().is_none());
        assert_relative_eq!(kind.acceleration(), 1.005);
    }
    assert_relative_eq!(ParticleKind::Cme.acceleration(), 1.03);
    assert_relative_eq!(ParticleKind::Flare.acceleration(), 1.02);
}
