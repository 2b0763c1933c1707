//! End-to-end runs through the public API: scripted events, long seeded
//! runs and the host frame loop.

use approx::assert_relative_eq;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use corona::config::SimulationConfig;
use corona::{FrameLoop, FrameOutcome, Framebuffer, ParticleKind, Simulation, SolarActivity, Viewport};

fn unit_clock_without_ambient() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.emission.ambient_probability = 0.0;
    config.scheduler.clock_step = 1.0;
    config
}

#[test]
fn scheduled_flare_adds_fifteen_particles() {
    let mut sim = Simulation::with_activity(
        unit_clock_without_ambient(),
        Viewport::new(800.0, 600.0),
        SolarActivity::quiet(500.0, f64::INFINITY),
        ChaChaRng::seed_from_u64(42),
    )
    .expect("valid config");

    for _ in 0..499 {
        sim.tick(1);
    }
    assert_eq!(sim.particles().len(), 0);
    assert_eq!(sim.activity().flare_intensity, 0.0);

    let report = sim.tick(1);
    assert_eq!(report.flares, 1);
    assert_eq!(sim.particles().len(), 15);
    assert_eq!(sim.particles().count_of(ParticleKind::Flare), 15);
    assert_eq!(sim.activity().flare_intensity, 1.0);
}

#[test]
fn scheduled_cme_then_quiet() {
    let mut sim = Simulation::with_activity(
        unit_clock_without_ambient(),
        Viewport::new(800.0, 600.0),
        SolarActivity::quiet(f64::INFINITY, 100.0),
        ChaChaRng::seed_from_u64(42),
    )
    .expect("valid config");

    sim.tick(100);
    assert_eq!(sim.particles().count_of(ParticleKind::Cme), 80);
    let next = sim.activity().next_cme_time;
    assert!((100.0 + 10_000.0..=100.0 + 25_000.0).contains(&next));

    sim.tick(125);
    assert!(!sim.activity().cme_active);
    assert_eq!(sim.activity().cme_intensity, 0.0);

    sim.tick(500);
    assert!(sim.particles().is_empty());
}

#[test]
fn seeded_runs_reproduce() {
    let run = |seed: u64| {
        let mut sim =
            Simulation::with_seed(SimulationConfig::default(), Viewport::new(1024.0, 768.0), seed).expect("valid config");
        let mut reports = Vec::new();
        for _ in 0..100 {
            reports.push(sim.tick(30));
        }
        (reports, *sim.activity(), sim.particle_slice().to_vec())
    };

    assert_eq!(run(11), run(11));
    assert_ne!(run(11).2, run(12).2);
}

#[test]
fn population_stays_bounded() {
    let mut sim =
        Simulation::with_seed(SimulationConfig::default(), Viewport::new(800.0, 600.0), 99).expect("valid config");

    let mut peak = 0;
    for _ in 0..20_000 {
        sim.tick(1);
        peak = peak.max(sim.particles().len());
    }

    // Eruptive particles accelerate out of the cull radius within a few dozen ticks
    assert!(peak < 400, "peak population {}", peak);
}

#[test]
fn frame_loop_lifecycle() {
    let config = SimulationConfig::from_json_str(r#"{"render": {"ticksPerFrame": 2, "granuleCount": 10}}"#)
        .expect("valid config");
    let mut frame_loop = FrameLoop::mount_seeded(config, 120, 80, 3).expect("mounts");
    let mut framebuffer = Framebuffer::new(120, 80);

    for _ in 0..30 {
        let outcome = frame_loop.frame(Some(&mut framebuffer.raster()));
        assert!(matches!(outcome, FrameOutcome::Rendered(_)));
    }
    assert_eq!(frame_loop.simulation().elapsed_ticks(), 60);
    assert_relative_eq!(frame_loop.simulation().elapsed_ms(), 960.0);

    frame_loop.resize(60, 40);
    framebuffer.resize(60, 40);
    assert!(frame_loop.frame(Some(&mut framebuffer.raster())).should_continue());

    frame_loop.unmount();
    let outcome = frame_loop.frame(Some(&mut framebuffer.raster()));
    assert!(!outcome.should_continue());
    assert_eq!(frame_loop.simulation().elapsed_ticks(), 62);
}
