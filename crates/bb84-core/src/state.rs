//! Single-photon states and measurement outcomes

use crate::basis::{Bit, MeasurementBasis};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Tolerance used by the unit-norm check
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Two-amplitude representation of a photon's polarization state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantumState {
    /// Amplitude of |0⟩
    pub amplitude0: f64,
    /// Amplitude of |1⟩
    pub amplitude1: f64,
    /// Relative phase in radians
    pub phase: f64,
}

impl QuantumState {
    /// |0⟩
    pub const ZERO: QuantumState = QuantumState {
        amplitude0: 1.0,
        amplitude1: 0.0,
        phase: 0.0,
    };

    /// |1⟩
    pub const ONE: QuantumState = QuantumState {
        amplitude0: 0.0,
        amplitude1: 1.0,
        phase: 0.0,
    };

    /// |+⟩ = (|0⟩ + |1⟩)/√2
    pub const PLUS: QuantumState = QuantumState {
        amplitude0: FRAC_1_SQRT_2,
        amplitude1: FRAC_1_SQRT_2,
        phase: 0.0,
    };

    /// |−⟩ = (|0⟩ − |1⟩)/√2
    pub const MINUS: QuantumState = QuantumState {
        amplitude0: FRAC_1_SQRT_2,
        amplitude1: -FRAC_1_SQRT_2,
        phase: PI,
    };

    /// Canonical state encoding `bit` in `basis`
    pub fn canonical(bit: Bit, basis: MeasurementBasis) -> Self {
        match (basis, bit) {
            (MeasurementBasis::Rectilinear, Bit::Zero) => Self::ZERO,
            (MeasurementBasis::Rectilinear, Bit::One) => Self::ONE,
            (MeasurementBasis::Diagonal, Bit::Zero) => Self::PLUS,
            (MeasurementBasis::Diagonal, Bit::One) => Self::MINUS,
        }
    }

    /// |a0|² + |a1|²
    pub fn norm_squared(&self) -> f64 {
        self.amplitude0 * self.amplitude0 + self.amplitude1 * self.amplitude1
    }

    /// Whether the state has unit norm within [`NORM_TOLERANCE`]
    pub fn is_normalized(&self) -> bool {
        (self.norm_squared() - 1.0).abs() <= NORM_TOLERANCE
    }
}

/// A photon prepared by a sender in a given basis
///
/// Never mutated after creation. Interception produces a fresh `QuantumBit`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantumBit {
    /// Polarization state carried by the photon
    pub state: QuantumState,
    /// Basis the photon was prepared in
    pub preparation_basis: MeasurementBasis,
    /// Classical bit encoded by the preparation
    pub bit_value: Bit,
}

/// Outcome of projecting a photon onto a basis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    /// Observed bit
    pub bit: Bit,
    /// Basis used for the measurement
    pub basis: MeasurementBasis,
    /// 1.0 when the basis matched the preparation basis, 0.5 otherwise
    pub probability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_states_are_normalized() {
        for basis in MeasurementBasis::ALL {
            for bit in [Bit::Zero, Bit::One] {
                let state = QuantumState::canonical(bit, basis);
                assert!(state.is_normalized(), "{basis}/{bit} not normalized");
            }
        }
    }

    #[test]
    fn minus_state_carries_phase() {
        assert!(QuantumState::MINUS.amplitude1 < 0.0);
        assert_eq!(QuantumState::MINUS.phase, PI);
    }

    #[test]
    fn unnormalized_state_detected() {
        let state = QuantumState {
            amplitude0: 1.0,
            amplitude1: 1.0,
            phase: 0.0,
        };
        assert!(!state.is_normalized());
    }
}
