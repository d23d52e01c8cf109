//! Classical bits and measurement bases
//!
//! Basis equality is the event the whole protocol reasons about: matching bases
//! give deterministic outcomes, mismatched bases give coin flips.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A classical bit, serialized as `0` or `1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Bit {
    /// Bit value 0
    Zero,
    /// Bit value 1
    One,
}

impl Bit {
    /// The opposite bit
    pub fn flip(self) -> Self {
        match self {
            Bit::Zero => Bit::One,
            Bit::One => Bit::Zero,
        }
    }

    /// Numeric value of the bit
    pub fn as_u8(self) -> u8 {
        match self {
            Bit::Zero => 0,
            Bit::One => 1,
        }
    }
}

impl From<bool> for Bit {
    fn from(value: bool) -> Self {
        if value {
            Bit::One
        } else {
            Bit::Zero
        }
    }
}

impl From<Bit> for u8 {
    fn from(bit: Bit) -> Self {
        bit.as_u8()
    }
}

impl TryFrom<u8> for Bit {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Bit::Zero),
            1 => Ok(Bit::One),
            other => Err(format!("bit must be 0 or 1, got {other}")),
        }
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Frame used to prepare or measure a photon
///
/// Rectilinear is the computational basis (0°/90°), diagonal is the Hadamard
/// basis (45°/135°).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementBasis {
    /// Computational basis: |0⟩, |1⟩
    Rectilinear,
    /// Hadamard basis: |+⟩, |−⟩
    Diagonal,
}

impl MeasurementBasis {
    /// Both bases, in canonical order
    pub const ALL: [MeasurementBasis; 2] = [MeasurementBasis::Rectilinear, MeasurementBasis::Diagonal];

    /// Polarization angle in degrees of `bit` encoded in this basis
    pub fn polarization_angle(self, bit: Bit) -> u16 {
        match (self, bit) {
            (MeasurementBasis::Rectilinear, Bit::Zero) => 0,
            (MeasurementBasis::Rectilinear, Bit::One) => 90,
            (MeasurementBasis::Diagonal, Bit::Zero) => 45,
            (MeasurementBasis::Diagonal, Bit::One) => 135,
        }
    }

    /// Polarizer symbol: `+` for rectilinear, `×` for diagonal
    pub fn symbol(self) -> &'static str {
        match self {
            MeasurementBasis::Rectilinear => "+",
            MeasurementBasis::Diagonal => "×",
        }
    }
}

impl fmt::Display for MeasurementBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementBasis::Rectilinear => write!(f, "rectilinear"),
            MeasurementBasis::Diagonal => write!(f, "diagonal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarization_angles() {
        use MeasurementBasis::*;
        assert_eq!(Rectilinear.polarization_angle(Bit::Zero), 0);
        assert_eq!(Rectilinear.polarization_angle(Bit::One), 90);
        assert_eq!(Diagonal.polarization_angle(Bit::Zero), 45);
        assert_eq!(Diagonal.polarization_angle(Bit::One), 135);
    }

    #[test]
    fn bit_serializes_as_number() {
        let json = serde_json::to_string(&vec![Bit::Zero, Bit::One]).unwrap();
        assert_eq!(json, "[0,1]");
        let parsed: Vec<Bit> = serde_json::from_str("[1,0]").unwrap();
        assert_eq!(parsed, vec![Bit::One, Bit::Zero]);
        assert!(serde_json::from_str::<Bit>("2").is_err());
    }

    #[test]
    fn basis_serializes_lowercase() {
        let json = serde_json::to_string(&MeasurementBasis::Diagonal).unwrap();
        assert_eq!(json, "\"diagonal\"");
    }

    #[test]
    fn flip_is_involution() {
        assert_eq!(Bit::Zero.flip(), Bit::One);
        assert_eq!(Bit::One.flip().flip(), Bit::One);
    }
}
