//! Flare and coronal mass ejection timing.
//!
//! The scheduler owns the only clock in the simulation. Each tick it decays
//! the running intensities, then fires whichever events have come due and
//! hands the resulting [`Burst`]s back to the caller for spawning.

use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;

/// Intensities closer to zero than this are treated as zero
pub const INTENSITY_EPSILON: f64 = 1e-9;

/// Process-wide solar activity state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarActivity {
    /// In [0, 1]; 1 right after a flare, decays toward 0
    pub flare_intensity: f64,
    pub cme_active: bool,
    /// In [0, 1]; decays linearly while `cme_active`
    pub cme_intensity: f64,
    /// Absolute clock value at which the next flare fires
    pub next_flare_time: f64,
    /// Absolute clock value at which the next CME fires
    pub next_cme_time: f64,
}

impl SolarActivity {
    /// Quiet sun with both timers set explicitly
    pub fn quiet(next_flare_time: f64, next_cme_time: f64) -> Self {
        Self {
            flare_intensity: 0.0,
            cme_active: false,
            cme_intensity: 0.0,
            next_flare_time,
            next_cme_time,
        }
    }

    pub fn flare_decaying(&self) -> bool {
        self.flare_intensity > 0.0
    }
}

/// A request for the particle system to emit a group of eruptive particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Burst {
    /// Particles fanned around `direction` (radians) within `spread`
    Flare {
        direction: f64,
        spread: f64,
        count: usize,
        jitter: f64,
    },
    /// Particles spread over the full circle
    CoronalMassEjection { count: usize, jitter: f64 },
}

impl Burst {
    pub fn count(&self) -> usize {
        match *self {
            Burst::Flare { count, .. } | Burst::CoronalMassEjection { count, .. } => count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventScheduler {
    config: SchedulerConfig,
    activity: SolarActivity,
    clock: f64,
}

impl EventScheduler {
    /// Creates a scheduler at clock 0 with randomized initial timers
    pub fn new<R: Rng + ?Sized>(config: SchedulerConfig, rng: &mut R) -> Self {
        let activity = SolarActivity::quiet(
            config.initial_flare_delay.sample(rng),
            config.initial_cme_delay.sample(rng),
        );
        Self::with_activity(config, activity)
    }

    /// Creates a scheduler at clock 0 with the given state
    pub fn with_activity(config: SchedulerConfig, activity: SolarActivity) -> Self {
        Self {
            config,
            activity,
            clock: 0.0,
        }
    }

    pub fn activity(&self) -> &SolarActivity {
        &self.activity
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Advance by `delta_ticks`, returning every burst fired along the way.
    ///
    /// A zero delta changes nothing.
    pub fn tick<R: Rng + ?Sized>(&mut self, delta_ticks: u32, rng: &mut R) -> Vec<Burst> {
        let mut bursts = Vec::new();
        for _ in 0..delta_ticks {
            self.step(rng, &mut bursts);
        }
        bursts
    }

    /// One tick: advance the clock, decay, then fire due events
    fn step<R: Rng + ?Sized>(&mut self, rng: &mut R, bursts: &mut Vec<Burst>) {
        self.clock += self.config.clock_step;
        self.decay();

        if self.clock >= self.activity.next_flare_time && !self.activity.flare_decaying() {
            bursts.push(self.fire_flare(rng));
        }

        if self.clock >= self.activity.next_cme_time && !self.activity.cme_active {
            bursts.push(self.fire_cme(rng));
        }
    }

    fn decay(&mut self) {
        let activity = &mut self.activity;

        activity.flare_intensity -= self.config.flare_decay;
        if activity.flare_intensity <= INTENSITY_EPSILON {
            activity.flare_intensity = 0.0;
        }

        if activity.cme_active {
            activity.cme_intensity -= self.config.cme_decay;
            if activity.cme_intensity <= INTENSITY_EPSILON {
                activity.cme_intensity = 0.0;
                activity.cme_active = false;
            }
        }
    }

    fn fire_flare<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Burst {
        self.activity.flare_intensity = 1.0;
        self.activity.next_flare_time = self.clock + self.config.flare_interval.sample(rng);
        log::debug!(
            "solar flare at clock {:.0}, next at {:.0}",
            self.clock,
            self.activity.next_flare_time
        );

        Burst::Flare {
            direction: rng.random::<f64>() * TAU,
            spread: self.config.flare_spread,
            count: self.config.flare_burst_size,
            jitter: self.config.flare_jitter,
        }
    }

    fn fire_cme<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Burst {
        self.activity.cme_active = true;
        self.activity.cme_intensity = 1.0;
        self.activity.next_cme_time = self.clock + self.config.cme_interval.sample(rng);
        log::info!(
            "coronal mass ejection at clock {:.0}, next at {:.0}",
            self.clock,
            self.activity.next_cme_time
        );

        Burst::CoronalMassEjection {
            count: self.config.cme_burst_size,
            jitter: self.config.cme_jitter,
        }
    }
}
