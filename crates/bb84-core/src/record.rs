//! Per-transmission records and batch results
//!
//! These are the read-only views presentation collaborators consume. A
//! [`SimulationStep`] is immutable once produced and is only ever appended to a
//! history.

use crate::basis::{Bit, MeasurementBasis};
use crate::state::QuantumState;
use crate::statistics::Statistics;
use serde::{Deserialize, Serialize};

/// One transmission's random choices: Alice's bit and basis, Bob's basis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transmission {
    /// Bit Alice encodes
    pub alice_bit: Bit,
    /// Basis Alice prepares in
    pub alice_basis: MeasurementBasis,
    /// Basis Bob measures in
    pub bob_basis: MeasurementBasis,
}

/// Sender side of a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AliceView {
    /// Encoded bit
    pub bit: Bit,
    /// Preparation basis
    pub basis: MeasurementBasis,
    /// Polarization angle of the prepared photon, degrees
    pub angle: u16,
}

/// Receiver side of a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BobView {
    /// Measured bit
    pub bit: Bit,
    /// Measurement basis
    pub basis: MeasurementBasis,
    /// Detector angle that fired: the measured bit in Bob's basis, degrees
    pub angle: u16,
    /// Polarization of the photon that reached Bob, degrees
    pub received_angle: u16,
}

/// Photon as it travelled the last leg of the channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhotonView {
    /// Effective polarization angle after any interception, degrees
    pub polarization: u16,
    /// Effective state after any interception
    pub state: QuantumState,
}

/// What the eavesdropper did to one photon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptionView {
    /// Basis the eavesdropper measured and re-prepared in
    pub basis: MeasurementBasis,
    /// Bit the eavesdropper read and re-sent
    pub bit: Bit,
}

/// Basis reconciliation outcome of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// Alice and Bob used the same basis
    pub bases_match: bool,
    /// Bases matched and Bob read Alice's bit
    pub bit_preserved: bool,
    /// Bob's measured bit
    pub measurement: Bit,
    /// The bit enters the shared key; equals `bases_match`
    pub will_keep: bool,
}

/// Full record of one transmission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStep {
    /// 1-based position in the run
    pub index: usize,
    /// Sender side
    pub alice: AliceView,
    /// Receiver side
    pub bob: BobView,
    /// Photon after the channel
    pub photon: PhotonView,
    /// Present when an eavesdropper intercepted this photon
    pub interception: Option<InterceptionView>,
    /// Reconciliation flags
    pub result: StepResult,
}

impl SimulationStep {
    /// The random choices this step was produced from
    pub fn transmission(&self) -> Transmission {
        Transmission {
            alice_bit: self.alice.bit,
            alice_basis: self.alice.basis,
            bob_basis: self.bob.basis,
        }
    }
}

/// Ordered Alice bits at positions where the bases matched
pub fn sift_key(steps: &[SimulationStep]) -> Vec<Bit> {
    steps
        .iter()
        .filter(|step| step.result.bases_match)
        .map(|step| step.alice.bit)
        .collect()
}

/// Per-transmission arrays of a whole run plus the sifted key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Alice's bits in transmission order
    pub alice_bits: Vec<Bit>,
    /// Alice's bases in transmission order
    pub alice_bases: Vec<MeasurementBasis>,
    /// Bob's bases in transmission order
    pub bob_bases: Vec<MeasurementBasis>,
    /// Bob's measured bits in transmission order
    pub bob_measurements: Vec<Bit>,
    /// Alice's bits where the bases matched
    pub shared_key: Vec<Bit>,
}

impl BatchResult {
    /// Append one transmission and its measured bit
    pub fn record(&mut self, transmission: Transmission, bob_bit: Bit) {
        self.alice_bits.push(transmission.alice_bit);
        self.alice_bases.push(transmission.alice_basis);
        self.bob_bases.push(transmission.bob_basis);
        self.bob_measurements.push(bob_bit);
        if transmission.alice_basis == transmission.bob_basis {
            self.shared_key.push(transmission.alice_bit);
        }
    }

    /// Same arrays, built from a step history
    pub fn from_steps(steps: &[SimulationStep]) -> Self {
        let mut batch = Self::default();
        for step in steps {
            batch.record(step.transmission(), step.bob.bit);
        }
        batch
    }

    /// Number of transmissions performed
    pub fn transmission_count(&self) -> usize {
        self.alice_bits.len()
    }

    /// Length of the sifted key
    pub fn key_length(&self) -> usize {
        self.shared_key.len()
    }

    /// Recorded transmissions in order
    pub fn transmissions(&self) -> impl Iterator<Item = Transmission> + '_ {
        self.alice_bits
            .iter()
            .zip(&self.alice_bases)
            .zip(&self.bob_bases)
            .map(|((&alice_bit, &alice_basis), &bob_basis)| Transmission {
                alice_bit,
                alice_basis,
                bob_basis,
            })
    }

    /// Aggregate statistics over the batch
    pub fn statistics(&self) -> Statistics {
        let total_bits = self.transmission_count();
        let mut matching_bases = 0;
        let mut errors = 0;
        for (transmission, bob_bit) in self.transmissions().zip(&self.bob_measurements) {
            if transmission.alice_basis == transmission.bob_basis {
                matching_bases += 1;
                if transmission.alice_bit != *bob_bit {
                    errors += 1;
                }
            }
        }
        Statistics::from_counts(total_bits, matching_bases, errors, self.key_length())
    }
}
