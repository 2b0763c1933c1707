use thiserror::Error;

/// Reasons a [`SimulationConfig`](crate::config::SimulationConfig) can be rejected.
///
/// Construction is the only fallible step: once a simulation exists, every
/// random draw is bounded by a validated range and nothing downstream can fail.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} range [{min}, {max}] is empty or inverted")]
    InvalidRange { name: &'static str, min: f64, max: f64 },
    #[error("{name} probability {value} must be between 0.0 and 1.0")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("ambient emission weights must not all be zero")]
    EmptyWeights,
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
