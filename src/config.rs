//! Scoring weights and health-feed settings.

use serde::{Deserialize, Serialize};

/// Relative weights of the channel score components.
///
/// Success rate counts for more than the priority hint, and cost for more
/// than latency. Both penalties are subtracted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoringWeights {
    /// Weight of `100 - priority`.
    pub base: f64,
    /// Weight of the raw success rate.
    pub success_rate: f64,
    /// Weight of the normalized fee penalty.
    pub cost: f64,
    /// Weight of the normalized latency penalty.
    pub latency: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base: 1.0,
            success_rate: 1.2,
            cost: 0.8,
            latency: 0.4,
        }
    }
}

/// Settings for the mock channel-health feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulatorConfig {
    /// RNG seed; the same seed replays the same status sequence.
    pub seed: u64,
    /// Chance per tick that an online channel leaves `online`.
    pub degrade_probability: f64,
    /// Chance per tick that a non-online channel comes back.
    pub recovery_probability: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            degrade_probability: 0.15,
            recovery_probability: 0.35,
        }
    }
}

impl SimulatorConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            seed: env_or("HEALTH_FEED_SEED", defaults.seed),
            degrade_probability: env_or("HEALTH_FEED_DEGRADE_P", defaults.degrade_probability)
                .clamp(0.0, 1.0),
            recovery_probability: env_or("HEALTH_FEED_RECOVER_P", defaults.recovery_probability)
                .clamp(0.0, 1.0),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
