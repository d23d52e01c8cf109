//! Ready-made configurations and scripted scenarios

use crate::scripted::{basis_draw, bit_draw, ScriptedRandomSource};
use bb84_core::{Bit, MeasurementBasis, SimulationConfig};

/// No eavesdropper, no channel noise
pub fn noiseless_config(transmissions: usize) -> SimulationConfig {
    SimulationConfig::default()
        .with_transmission_count(transmissions)
        .with_eavesdropper(false)
        .with_channel_error_rate(0.0)
        .with_step_interval_ms(100)
}

/// Intercept-resend eavesdropper on a noiseless channel
pub fn eavesdropped_config(transmissions: usize) -> SimulationConfig {
    noiseless_config(transmissions).with_eavesdropper(true)
}

/// Noisy channel without an eavesdropper
pub fn noisy_config(transmissions: usize, error_rate: f64) -> SimulationConfig {
    noiseless_config(transmissions).with_channel_error_rate(error_rate)
}

/// Alice's bits in the four-transmission scenario
pub const SCENARIO_ALICE_BITS: [Bit; 4] = [Bit::Zero, Bit::One, Bit::Zero, Bit::One];

/// Alice's bases in the four-transmission scenario
pub const SCENARIO_ALICE_BASES: [MeasurementBasis; 4] = [
    MeasurementBasis::Rectilinear,
    MeasurementBasis::Diagonal,
    MeasurementBasis::Rectilinear,
    MeasurementBasis::Diagonal,
];

/// Bob's bases in the four-transmission scenario
pub const SCENARIO_BOB_BASES: [MeasurementBasis; 4] = [
    MeasurementBasis::Rectilinear,
    MeasurementBasis::Rectilinear,
    MeasurementBasis::Diagonal,
    MeasurementBasis::Diagonal,
];

/// Bob's coin flips at the two mismatched positions (1 and 2)
pub const SCENARIO_MISMATCH_OUTCOMES: [Bit; 2] = [Bit::One, Bit::One];

/// Draws for four transmissions on a noiseless channel without eavesdropper
///
/// Bases match at positions 0 and 3, so the shared key is `[0, 1]`. Positions 1
/// and 2 each consume one extra draw for Bob's mismatched measurement.
pub fn four_transmission_script() -> ScriptedRandomSource {
    let mut draws = Vec::new();
    let mut mismatch_outcomes = SCENARIO_MISMATCH_OUTCOMES.iter();
    for i in 0..4 {
        draws.push(bit_draw(SCENARIO_ALICE_BITS[i]));
        draws.push(basis_draw(SCENARIO_ALICE_BASES[i]));
        draws.push(basis_draw(SCENARIO_BOB_BASES[i]));
        if SCENARIO_ALICE_BASES[i] != SCENARIO_BOB_BASES[i] {
            if let Some(&outcome) = mismatch_outcomes.next() {
                draws.push(bit_draw(outcome));
            }
        }
    }
    ScriptedRandomSource::new(draws)
}
