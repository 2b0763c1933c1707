//! Host-facing lifecycle: mount, per-frame callback, resize, unmount.
//!
//! A host (browser animation frame, desktop event loop, test harness) owns
//! a [`FrameLoop`] and calls [`FrameLoop::frame`] whenever its refresh
//! signal fires. Everything else about the host is outside this crate.

use rand::Rng;
use rand_chacha::ChaChaRng;

use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::render::Canvas;
use crate::simulation::{Simulation, TickReport};
use crate::viewport::Viewport;

/// Why a frame did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The loop was unmounted; a frame already queued by the host still arrives
    Stopped,
    /// The host could not provide a drawing surface this frame
    SurfaceUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Rendered(TickReport),
    Skipped(SkipReason),
}

impl FrameOutcome {
    /// Whether the host should request another frame
    pub fn should_continue(&self) -> bool {
        !matches!(self, FrameOutcome::Skipped(SkipReason::Stopped))
    }
}

#[derive(Debug)]
pub struct FrameLoop<R: Rng = ChaChaRng> {
    simulation: Simulation<R>,
    running: bool,
}

impl FrameLoop<ChaChaRng> {
    /// Mounts a seeded simulation on a `width × height` surface
    pub fn mount_seeded(
        config: SimulationConfig,
        width: u32,
        height: u32,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let viewport = Viewport::new(f64::from(width), f64::from(height));
        Ok(Self::from_simulation(Simulation::with_seed(config, viewport, seed)?))
    }
}

impl<R: Rng> FrameLoop<R> {
    pub fn mount(config: SimulationConfig, width: u32, height: u32, rng: R) -> Result<Self, ConfigError> {
        let viewport = Viewport::new(f64::from(width), f64::from(height));
        Ok(Self::from_simulation(Simulation::new(config, viewport, rng)?))
    }

    pub fn from_simulation(simulation: Simulation<R>) -> Self {
        let viewport = simulation.viewport();
        log::debug!("mounted on {}x{} surface", viewport.width, viewport.height);
        Self {
            simulation,
            running: true,
        }
    }

    /// One host frame: tick the simulation, then paint it.
    ///
    /// After [`unmount`](Self::unmount), or without a surface, this does
    /// nothing and leaves the simulation state untouched.
    pub fn frame(&mut self, surface: Option<&mut dyn Canvas>) -> FrameOutcome {
        if !self.running {
            return FrameOutcome::Skipped(SkipReason::Stopped);
        }
        let Some(canvas) = surface else {
            log::warn!("no drawing surface available, skipping frame");
            return FrameOutcome::Skipped(SkipReason::SurfaceUnavailable);
        };

        let report = self
            .simulation
            .tick(self.simulation.config().render.ticks_per_frame);
        self.simulation.render(canvas);
        FrameOutcome::Rendered(report)
    }

    /// Host viewport changed; the host resizes its own backing buffer
    pub fn resize(&mut self, width: u32, height: u32) {
        self.simulation
            .resize(f64::from(width), f64::from(height));
    }

    /// Stop producing frames. Safe to call repeatedly or before any frame.
    pub fn unmount(&mut self) {
        if self.running {
            log::debug!(
                "unmounted after {} ticks",
                self.simulation.elapsed_ticks()
            );
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn simulation(&self) -> &Simulation<R> {
        &self.simulation
    }
}
