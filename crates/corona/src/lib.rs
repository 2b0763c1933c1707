//! Animated solar activity: a star that throws off flares and coronal mass
//! ejections as particle bursts, with ambient solar wind in between.
//!
//! The pipeline runs once per tick:
//!
//! 1. [`scheduler::EventScheduler`] advances the clock and fires due events
//! 2. [`system::ParticleSystem`] spawns bursts and ambient particles, then
//!    accelerates, deflects (via [`field::FieldModel`]), moves and culls
//! 3. [`render::Painter`] draws the star body, corona, particles and shockwaves
//!
//! [`simulation::Simulation`] owns all of it; [`frame_loop::FrameLoop`] adds
//! the mount / unmount lifecycle a host drives.

pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod frame_loop;
pub mod particle;
pub mod render;
pub mod scheduler;
pub mod simulation;
pub mod system;
pub mod viewport;

#[cfg(test)]
mod frame_loop_test;
#[cfg(test)]
mod particle_test;
#[cfg(test)]
mod scheduler_test;

pub use color::{color_for, Color, Rgba};
pub use config::SimulationConfig;
pub use error::ConfigError;
pub use field::{magnetic_correction, FieldModel, MagneticSwirl};
pub use frame_loop::{FrameLoop, FrameOutcome, SkipReason};
pub use particle::{Particle, ParticleKind};
pub use render::{Canvas, Framebuffer, Raster};
pub use scheduler::{Burst, EventScheduler, SolarActivity};
pub use simulation::{Simulation, TickReport};
pub use system::ParticleSystem;
pub use viewport::Viewport;
