//! Tunable parameters for a simulation run.

use std::time::Duration;

use path_defence_core::{STARTING_MONEY, STARTING_SCORE};
use path_defence_system_spawning::DEFAULT_RELEASE_INTERVAL;
use path_defence_world::{FAST_FORWARD_TICK_INTERVAL, NORMAL_TICK_INTERVAL};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a [`SimulationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("failed to parse simulation config")]
    Parse(#[from] toml::de::Error),
    /// An interval was configured as zero.
    #[error("`{field}` must be greater than zero")]
    ZeroInterval {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Parameters of a simulation run. Every field falls back to its default
/// when omitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Seed of the random source driving spawns and stutter.
    pub seed: u64,
    /// Score the player starts with.
    pub starting_score: u32,
    /// Money the player starts with.
    pub starting_money: u32,
    /// Milliseconds simulated by a tick at normal speed.
    pub tick_interval_ms: u64,
    /// Milliseconds simulated by a tick while fast-forwarding.
    pub fast_forward_interval_ms: u64,
    /// Milliseconds between two monster releases within a wave.
    pub release_interval_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            starting_score: STARTING_SCORE,
            starting_money: STARTING_MONEY,
            tick_interval_ms: millis(NORMAL_TICK_INTERVAL),
            fast_forward_interval_ms: millis(FAST_FORWARD_TICK_INTERVAL),
            release_interval_ms: millis(DEFAULT_RELEASE_INTERVAL),
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations whose clocks would never advance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("tick_interval_ms", self.tick_interval_ms),
            ("fast_forward_interval_ms", self.fast_forward_interval_ms),
            ("release_interval_ms", self.release_interval_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroInterval { field });
            }
        }
        Ok(())
    }

    pub(crate) fn world_config(&self) -> path_defence_world::Config {
        path_defence_world::Config {
            starting_score: self.starting_score,
            starting_money: self.starting_money,
            normal_interval: Duration::from_millis(self.tick_interval_ms),
            fast_forward_interval: Duration::from_millis(self.fast_forward_interval_ms),
        }
    }

    pub(crate) fn spawning_config(&self) -> path_defence_system_spawning::Config {
        path_defence_system_spawning::Config::new(Duration::from_millis(self.release_interval_ms))
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
