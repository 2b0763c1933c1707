//! The simulation context: one star, its activity state and its particles.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::field::MagneticSwirl;
use crate::particle::Particle;
use crate::render::{Canvas, Painter, Scene};
use crate::scheduler::{Burst, EventScheduler, SolarActivity};
use crate::system::ParticleSystem;
use crate::viewport::Viewport;

/// Nominal duration of one tick for animation phases
pub const FRAME_MS: f64 = 16.0;

/// What happened during one call to [`Simulation::tick`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub flares: usize,
    pub cmes: usize,
    /// Particles added by bursts and ambient emission
    pub spawned: usize,
    /// Particles removed for age or distance
    pub culled: usize,
}

/// Complete state of a running solar simulation.
///
/// All state lives here and is advanced only through [`tick`](Self::tick);
/// the random source is injected so tests can seed it.
///
/// # Examples
///
/// ```
/// use corona::config::SimulationConfig;
/// use corona::simulation::Simulation;
/// use corona::viewport::Viewport;
///
/// let mut sim = Simulation::with_seed(SimulationConfig::default(), Viewport::new(800.0, 600.0), 42)
///     .expect("default config is valid");
///
/// sim.tick(60);
/// assert_eq!(sim.elapsed_ticks(), 60);
/// assert!(sim.particles().iter().all(|p| p.age <= p.lifespan));
/// ```
#[derive(Debug, Clone)]
pub struct Simulation<R: Rng = ChaChaRng> {
    config: SimulationConfig,
    viewport: Viewport,
    scheduler: EventScheduler,
    particles: ParticleSystem,
    field: MagneticSwirl,
    painter: Painter,
    rng: R,
    ticks: u64,
}

impl Simulation<ChaChaRng> {
    pub fn with_seed(config: SimulationConfig, viewport: Viewport, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, viewport, ChaChaRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// Validates `config` and starts a quiet sun with randomized event timers
    pub fn new(config: SimulationConfig, viewport: Viewport, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let scheduler = EventScheduler::new(config.scheduler, &mut rng);
        Ok(Self::assemble(config, viewport, scheduler, rng))
    }

    /// Starts from explicit activity state instead of randomized timers
    pub fn with_activity(
        config: SimulationConfig,
        viewport: Viewport,
        activity: SolarActivity,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let scheduler = EventScheduler::with_activity(config.scheduler, activity);
        Ok(Self::assemble(config, viewport, scheduler, rng))
    }

    fn assemble(config: SimulationConfig, viewport: Viewport, scheduler: EventScheduler, rng: R) -> Self {
        Self {
            field: MagneticSwirl::new(config.geometry.magnetic_coupling),
            painter: Painter::new(config.render),
            config,
            viewport,
            scheduler,
            particles: ParticleSystem::new(),
            rng,
            ticks: 0,
        }
    }

    /// Advance by `delta_ticks`.
    ///
    /// Each tick runs the scheduler, spawns whatever bursts it fired, rolls
    /// for ambient emission, then integrates and culls the population.
    pub fn tick(&mut self, delta_ticks: u32) -> TickReport {
        let mut report = TickReport::default();
        let photosphere = self.photosphere_radius();

        for _ in 0..delta_ticks {
            for burst in self.scheduler.tick(1, &mut self.rng) {
                match burst {
                    Burst::Flare { .. } => report.flares += 1,
                    Burst::CoronalMassEjection { .. } => report.cmes += 1,
                }
                report.spawned += self
                    .particles
                    .emit(&burst, &self.viewport, photosphere, &mut self.rng);
            }

            if self.particles.emit_ambient(
                &self.config.emission,
                &self.viewport,
                photosphere,
                &mut self.rng,
            ) {
                report.spawned += 1;
            }

            let stats = self.particles.update(
                1,
                &self.viewport,
                &self.field,
                self.config.geometry.cull_factor,
            );
            report.culled += stats.culled();
            self.ticks += 1;
        }

        report
    }

    /// Paint the current state onto `canvas`
    pub fn render<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        let scene = Scene {
            viewport: self.viewport,
            photosphere_radius: self.photosphere_radius(),
            elapsed_ms: self.elapsed_ms(),
            activity: self.scheduler.activity(),
            particles: self.particles.as_slice(),
        };
        self.painter.paint(canvas, &scene, &mut self.rng);
    }

    /// Changes the logical surface size. Particles and activity are untouched.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        log::debug!("viewport resized to {width}x{height}");
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn activity(&self) -> &SolarActivity {
        self.scheduler.activity()
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    /// Every live particle, in no particular order
    pub fn particle_slice(&self) -> &[Particle] {
        self.particles.as_slice()
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.ticks
    }

    /// Scheduler clock value, in the configured clock units
    pub fn clock(&self) -> f64 {
        self.scheduler.clock()
    }

    /// Animation time for the painter, at [`FRAME_MS`] per tick
    pub fn elapsed_ms(&self) -> f64 {
        self.ticks as f64 * FRAME_MS
    }

    pub fn photosphere_radius(&self) -> f64 {
        self.viewport
            .photosphere_radius(self.config.geometry.photosphere_fraction)
    }
}
