//! Resolve the run configuration: file, then flags, then validation

use anyhow::{Context, Result};
use bb84_core::SimulationConfig;
use clap::Args;
use std::path::Path;

/// Per-run overrides on top of the configuration file
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigOverrides {
    /// Number of photons to transmit
    #[arg(short = 'n', long, global = true)]
    pub transmissions: Option<usize>,

    /// Put an intercept-resend eavesdropper on the channel
    #[arg(short, long, global = true)]
    pub eavesdropper: bool,

    /// Probability that channel noise flips a measured bit
    #[arg(long, global = true)]
    pub error_rate: Option<f64>,

    /// Milliseconds between automatic steps
    #[arg(long, global = true)]
    pub interval_ms: Option<u64>,
}

impl ConfigOverrides {
    fn apply(&self, mut config: SimulationConfig) -> SimulationConfig {
        if let Some(count) = self.transmissions {
            config.transmission_count = count;
        }
        if self.eavesdropper {
            config.eavesdropper_present = true;
        }
        if let Some(rate) = self.error_rate {
            config.channel_error_rate = rate;
        }
        if let Some(interval) = self.interval_ms {
            config.step_interval_ms = interval;
        }
        config
    }
}

/// Load `path` if given, apply `overrides`, and validate the result
pub fn resolve_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<SimulationConfig> {
    let base = match path {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    let config = overrides.apply(base);
    config.validate().context("rejecting configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "transmission_count = 40\nchannel_error_rate = 0.02").unwrap();

        let overrides = ConfigOverrides {
            transmissions: Some(12),
            eavesdropper: true,
            ..ConfigOverrides::default()
        };
        let config = resolve_config(Some(file.path()), &overrides).unwrap();
        assert_eq!(config.transmission_count, 12);
        assert!(config.eavesdropper_present);
        assert_eq!(config.channel_error_rate, 0.02);
    }

    #[test]
    fn invalid_override_rejected() {
        let overrides = ConfigOverrides {
            transmissions: Some(0),
            ..ConfigOverrides::default()
        };
        assert!(resolve_config(None, &overrides).is_err());
    }

    #[test]
    fn defaults_without_file() {
        let config = resolve_config(None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config, SimulationConfig::default());
    }
}
