//! Tunable parameters for the simulation, loadable from JSON.
//!
//! Every field carries a default so a partial document such as
//! `{"scheduler": {"cmeBurstSize": 120}}` is a valid configuration.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Closed interval `[min, max]` that random parameters are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Draws uniformly from the interval. A degenerate interval returns `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Relative weights for the kinds produced by ambient emission
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AmbientWeights {
    pub proton: f64,
    pub electron: f64,
    pub corona: f64,
}

impl Default for AmbientWeights {
    fn default() -> Self {
        Self {
            proton: 0.30,
            electron: 0.42,
            corona: 0.28,
        }
    }
}

impl AmbientWeights {
    pub fn total(&self) -> f64 {
        self.proton + self.electron + self.corona
    }
}

/// Continuous emission from the photosphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmissionConfig {
    /// Chance per tick of spawning one ambient particle
    pub ambient_probability: f64,
    /// Maximum radial offset above the photosphere for ambient particles
    pub ambient_jitter: f64,
    pub weights: AmbientWeights,
}

impl Default for EmissionConfig {
    fn default() -> Self {
        Self {
            ambient_probability: 0.15,
            ambient_jitter: 40.0,
            weights: AmbientWeights::default(),
        }
    }
}

/// Flare and CME timers, burst shapes and decay rates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    /// Clock units advanced per tick (milliseconds of a 60 Hz frame by default)
    pub clock_step: f64,
    pub initial_flare_delay: Range,
    pub flare_interval: Range,
    pub initial_cme_delay: Range,
    pub cme_interval: Range,
    pub flare_burst_size: usize,
    /// Full angular width of a flare burst, in radians
    pub flare_spread: f64,
    pub flare_jitter: f64,
    pub cme_burst_size: usize,
    pub cme_jitter: f64,
    /// Flare intensity lost per tick
    pub flare_decay: f64,
    /// CME intensity lost per tick while active
    pub cme_decay: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            clock_step: 16.0,
            initial_flare_delay: Range::new(2_000.0, 5_000.0),
            flare_interval: Range::new(2_000.0, 5_000.0),
            initial_cme_delay: Range::new(5_000.0, 13_000.0),
            cme_interval: Range::new(10_000.0, 25_000.0),
            flare_burst_size: 15,
            flare_spread: 0.5,
            flare_jitter: 30.0,
            cme_burst_size: 80,
            cme_jitter: 60.0,
            flare_decay: 0.02,
            cme_decay: 0.008,
        }
    }
}

/// Star geometry and the forces tied to it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeometryConfig {
    /// Photosphere radius as a fraction of the smaller viewport side
    pub photosphere_fraction: f64,
    /// Particles farther than this multiple of the larger side are culled
    pub cull_factor: f64,
    /// Scales magnetic field strength into a per-tick velocity nudge
    pub magnetic_coupling: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            photosphere_fraction: 0.12,
            cull_factor: 1.5,
            magnetic_coupling: 0.001,
        }
    }
}

/// Visual parameters for the painter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    pub streamer_count: usize,
    pub corona_layers: usize,
    pub granule_count: usize,
    /// Particles above this energy leave a trail
    pub trail_energy_threshold: f64,
    /// Shockwave rings are drawn only above this CME intensity
    pub shockwave_threshold: f64,
    /// Simulation ticks advanced per rendered frame
    pub ticks_per_frame: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            streamer_count: 12,
            corona_layers: 4,
            granule_count: 50,
            trail_energy_threshold: 50.0,
            shockwave_threshold: 0.3,
            ticks_per_frame: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    pub emission: EmissionConfig,
    pub scheduler: SchedulerConfig,
    pub geometry: GeometryConfig,
    pub render: RenderConfig,
}

impl SimulationConfig {
    /// Parses a JSON document; missing fields fall back to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Loads from a JSON file, falling back to defaults if it is missing or invalid
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_json_file(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("using default config, {} unusable: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let emission = &self.emission;
        probability("ambientProbability", emission.ambient_probability)?;
        non_negative("ambientJitter", emission.ambient_jitter)?;
        let weights = emission.weights;
        for (name, weight) in [
            ("weights.proton", weights.proton),
            ("weights.electron", weights.electron),
            ("weights.corona", weights.corona),
        ] {
            non_negative(name, weight)?;
        }
        if weights.total() <= 0.0 {
            return Err(ConfigError::EmptyWeights);
        }

        let scheduler = &self.scheduler;
        positive("clockStep", scheduler.clock_step)?;
        scheduler.initial_flare_delay.validate("initialFlareDelay")?;
        scheduler.flare_interval.validate("flareInterval")?;
        scheduler.initial_cme_delay.validate("initialCmeDelay")?;
        scheduler.cme_interval.validate("cmeInterval")?;
        non_negative("flareSpread", scheduler.flare_spread)?;
        non_negative("flareJitter", scheduler.flare_jitter)?;
        non_negative("cmeJitter", scheduler.cme_jitter)?;
        positive("flareDecay", scheduler.flare_decay)?;
        positive("cmeDecay", scheduler.cme_decay)?;

        let geometry = &self.geometry;
        positive("photosphereFraction", geometry.photosphere_fraction)?;
        positive("cullFactor", geometry.cull_factor)?;
        non_negative("magneticCoupling", geometry.magnetic_coupling)?;

        probability("shockwaveThreshold", self.render.shockwave_threshold)?;
        positive("ticksPerFrame", f64::from(self.render.ticks_per_frame))?;

        Ok(())
    }
}

fn probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidProbability { name, value });
    }
    Ok(())
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(ConfigError::NonPositive { name, value });
    }
    Ok(())
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value >= 0.0 && value.is_finite()) {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(())
}
