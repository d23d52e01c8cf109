//! Simulation configuration
//!
//! A [`SimulationConfig`] is validated when it is accepted and is immutable for
//! the lifetime of one run. Invalid values are rejected, never clamped, so a run
//! always performs exactly the number of transmissions that was requested.

use crate::errors::{Bb84Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default number of transmissions per run
pub const DEFAULT_TRANSMISSION_COUNT: usize = 100;

/// Default auto-run interval in milliseconds
pub const DEFAULT_STEP_INTERVAL_MS: u64 = 1000;

/// Parameters of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of photons Alice sends
    pub transmission_count: usize,
    /// Whether an intercept-resend eavesdropper sits on the channel
    pub eavesdropper_present: bool,
    /// Probability that channel noise flips Bob's measured bit
    pub channel_error_rate: f64,
    /// Interval between automatic steps in milliseconds
    pub step_interval_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            transmission_count: DEFAULT_TRANSMISSION_COUNT,
            eavesdropper_present: false,
            channel_error_rate: 0.0,
            step_interval_ms: DEFAULT_STEP_INTERVAL_MS,
        }
    }
}

impl SimulationConfig {
    /// Set the number of transmissions
    pub fn with_transmission_count(mut self, count: usize) -> Self {
        self.transmission_count = count;
        self
    }

    /// Place or remove the eavesdropper
    pub fn with_eavesdropper(mut self, present: bool) -> Self {
        self.eavesdropper_present = present;
        self
    }

    /// Set the channel noise probability
    pub fn with_channel_error_rate(mut self, rate: f64) -> Self {
        self.channel_error_rate = rate;
        self
    }

    /// Set the auto-run interval
    pub fn with_step_interval_ms(mut self, interval_ms: u64) -> Self {
        self.step_interval_ms = interval_ms;
        self
    }

    /// Auto-run interval as a [`Duration`]
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }

    /// Reject configurations the simulator cannot honor exactly
    pub fn validate(&self) -> Result<()> {
        if self.transmission_count < 1 {
            return Err(Bb84Error::invalid_config(
                "transmission_count must be at least 1",
            ));
        }
        // NaN fails `contains`, which is what we want
        if !(0.0..=1.0).contains(&self.channel_error_rate) {
            return Err(Bb84Error::invalid_config(format!(
                "channel_error_rate must be between 0.0 and 1.0, got {}",
                self.channel_error_rate
            )));
        }
        validate_step_interval_ms(self.step_interval_ms)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            Bb84Error::config_load(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }
}

/// Auto-run intervals must be strictly positive
pub fn validate_step_interval_ms(interval_ms: u64) -> Result<()> {
    if interval_ms == 0 {
        return Err(Bb84Error::invalid_config(
            "step_interval_ms must be greater than 0",
        ));
    }
    Ok(())
}
