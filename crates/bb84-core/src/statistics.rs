//! Aggregate run statistics and the observational eavesdrop check
//!
//! Statistics are derived from the step history alone. The error rate is only
//! reported; nothing here removes bits from the shared key.

use crate::record::SimulationStep;
use serde::{Deserialize, Serialize};

/// Error rate above which eavesdropping is suspected (~11%)
pub const EAVESDROP_DETECTION_THRESHOLD: f64 = 0.11;

/// Highest error rate a real deployment would tolerate
pub const MAX_ACCEPTABLE_ERROR_RATE: f64 = 0.25;

/// Aggregates over a step history
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Transmissions performed
    pub total_bits: usize,
    /// Transmissions where Alice and Bob used the same basis
    pub matching_bases: usize,
    /// Fraction of basis-matched bits where Bob disagrees with Alice
    pub error_rate: f64,
    /// Shared-key length over total bits
    pub key_efficiency: f64,
}

impl Statistics {
    /// Build from raw counts; ratios are 0 when their denominator is 0
    pub fn from_counts(
        total_bits: usize,
        matching_bases: usize,
        mismatched_bits: usize,
        key_length: usize,
    ) -> Self {
        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
        Self {
            total_bits,
            matching_bases,
            error_rate: ratio(mismatched_bits, matching_bases),
            key_efficiency: ratio(key_length, total_bits),
        }
    }

    /// Recompute from a full history
    pub fn from_steps(steps: &[SimulationStep]) -> Self {
        let matched = steps.iter().filter(|step| step.result.bases_match);
        let matching_bases = matched.clone().count();
        let mismatched_bits = matched.filter(|step| !step.result.bit_preserved).count();
        // every basis-matched bit is kept
        Self::from_counts(steps.len(), matching_bases, mismatched_bits, matching_bases)
    }

    /// Compare the error rate against a detection threshold
    pub fn eavesdrop_assessment(&self, threshold: f64) -> EavesdropDetection {
        EavesdropDetection {
            detected: self.error_rate > threshold,
            threshold,
            error_rate: self.error_rate,
        }
    }
}

/// Result of comparing the observed error rate with a threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EavesdropDetection {
    /// Error rate exceeded the threshold
    pub detected: bool,
    /// Threshold used
    pub threshold: f64,
    /// Observed error rate
    pub error_rate: f64,
}
