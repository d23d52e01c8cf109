//! Unified error type for the BB84 simulator
//!
//! Every fallible operation in the workspace returns [`Bb84Error`]. Protocol
//! computations themselves cannot fail; errors only arise when a configuration
//! is accepted, loaded from disk, or when timed auto-run has no runtime to live on.

use serde::{Deserialize, Serialize};

/// Unified error type for all simulator operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Bb84Error {
    /// Configuration rejected at acceptance time
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Which parameter was rejected and why
        message: String,
    },

    /// Configuration source could not be read or parsed
    #[error("Configuration load error: {message}")]
    ConfigLoad {
        /// Underlying I/O or parse failure
        message: String,
    },

    /// No async runtime available to host the auto-run timer
    #[error("Runtime error: {message}")]
    Runtime {
        /// Error message describing the runtime issue
        message: String,
    },
}

impl Bb84Error {
    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a configuration load error
    pub fn config_load(message: impl Into<String>) -> Self {
        Self::ConfigLoad {
            message: message.into(),
        }
    }

    /// Create a runtime error
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }
}

/// Standard Result type for simulator operations
pub type Result<T> = std::result::Result<T, Bb84Error>;

impl From<std::io::Error> for Bb84Error {
    fn from(err: std::io::Error) -> Self {
        Self::config_load(err.to_string())
    }
}

impl From<toml::de::Error> for Bb84Error {
    fn from(err: toml::de::Error) -> Self {
        Self::config_load(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Bb84Error::invalid_config("transmission_count must be at least 1");
        assert!(matches!(err, Bb84Error::InvalidConfig { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid configuration: transmission_count must be at least 1"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.toml");
        let err = Bb84Error::from(io_err);
        assert!(matches!(err, Bb84Error::ConfigLoad { .. }));
    }
}
