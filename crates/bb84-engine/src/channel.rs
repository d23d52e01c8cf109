//! Photon lifecycle: preparation, interception and measurement
//!
//! Free functions over a borrowed [`RandomSource`]. None of them keep state
//! between calls, and none mutate the photon they are given: interception hands
//! back a freshly prepared photon.

use bb84_core::{
    bernoulli, random_basis, random_bit, Bit, MeasurementBasis, MeasurementResult, QuantumBit,
    QuantumState, RandomSource,
};

/// Encode `bit` in `basis`
///
/// Rectilinear maps 0/1 to |0⟩/|1⟩, diagonal maps 0/1 to |+⟩/|−⟩.
///
/// # Panics
///
/// If the prepared state is not unit-norm, which would mean the canonical state
/// table is broken.
pub fn prepare_qubit(bit: Bit, basis: MeasurementBasis) -> QuantumBit {
    let state = QuantumState::canonical(bit, basis);
    assert!(
        state.is_normalized(),
        "prepared state for {bit} in {basis} basis is not unit-norm: {state:?}"
    );
    QuantumBit {
        state,
        preparation_basis: basis,
        bit_value: bit,
    }
}

/// One intercept-resend by the eavesdropper
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interception {
    /// Basis the eavesdropper measured in
    pub basis: MeasurementBasis,
    /// Bit the eavesdropper read
    pub bit: Bit,
    /// Photon re-prepared in `basis` and sent on to the receiver
    pub forwarded: QuantumBit,
}

/// Measure in a random basis and re-send what was read
///
/// A matching guess reads the true bit; a wrong guess reads a coin flip. Either
/// way the forwarded photon is prepared in the eavesdropper's basis.
pub fn intercept(qubit: &QuantumBit, rng: &dyn RandomSource) -> Interception {
    let basis = random_basis(rng);
    let bit = if basis == qubit.preparation_basis {
        qubit.bit_value
    } else {
        random_bit(rng)
    };
    Interception {
        basis,
        bit,
        forwarded: prepare_qubit(bit, basis),
    }
}

/// Project `qubit` onto `basis`, then apply channel noise
///
/// Matching bases return the prepared bit with probability 1, mismatched bases
/// a uniform bit with probability 0.5. Noise flips the result with probability
/// `channel_error_rate`, independently of the basis outcome.
pub fn measure_qubit(
    qubit: &QuantumBit,
    basis: MeasurementBasis,
    channel_error_rate: f64,
    rng: &dyn RandomSource,
) -> MeasurementResult {
    let (mut bit, probability) = if basis == qubit.preparation_basis {
        (qubit.bit_value, 1.0)
    } else {
        (random_bit(rng), 0.5)
    };

    if channel_error_rate > 0.0 && bernoulli(rng, channel_error_rate) {
        bit = bit.flip();
    }

    MeasurementResult {
        bit,
        basis,
        probability,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb84_core::SeededRandomSource;
    use bb84_testkit::{basis_draw, bit_draw, ScriptedRandomSource};

    #[test]
    fn preparation_table() {
        use MeasurementBasis::*;
        assert_eq!(prepare_qubit(Bit::Zero, Rectilinear).state, QuantumState::ZERO);
        assert_eq!(prepare_qubit(Bit::One, Rectilinear).state, QuantumState::ONE);
        assert_eq!(prepare_qubit(Bit::Zero, Diagonal).state, QuantumState::PLUS);
        assert_eq!(prepare_qubit(Bit::One, Diagonal).state, QuantumState::MINUS);
    }

    #[test]
    fn matching_measurement_consumes_no_randomness() {
        let rng = ScriptedRandomSource::new(Vec::<f64>::new());
        let qubit = prepare_qubit(Bit::One, MeasurementBasis::Diagonal);
        let result = measure_qubit(&qubit, MeasurementBasis::Diagonal, 0.0, &rng);
        assert_eq!(result.bit, Bit::One);
        assert_eq!(result.probability, 1.0);
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn mismatched_measurement_is_a_coin_flip() {
        let rng = ScriptedRandomSource::new(vec![bit_draw(Bit::Zero)]);
        let qubit = prepare_qubit(Bit::One, MeasurementBasis::Diagonal);
        let result = measure_qubit(&qubit, MeasurementBasis::Rectilinear, 0.0, &rng);
        assert_eq!(result.bit, Bit::Zero);
        assert_eq!(result.probability, 0.5);
    }

    #[test]
    fn certain_noise_flips_matched_outcome() {
        let rng = SeededRandomSource::new(3);
        let qubit = prepare_qubit(Bit::Zero, MeasurementBasis::Rectilinear);
        let result = measure_qubit(&qubit, MeasurementBasis::Rectilinear, 1.0, &rng);
        assert_eq!(result.bit, Bit::One);
        assert_eq!(result.probability, 1.0);
    }

    #[test]
    fn interception_with_matching_guess_is_transparent() {
        let rng = ScriptedRandomSource::new(vec![basis_draw(MeasurementBasis::Rectilinear)]);
        let qubit = prepare_qubit(Bit::One, MeasurementBasis::Rectilinear);
        let interception = intercept(&qubit, &rng);
        assert_eq!(interception.bit, Bit::One);
        assert_eq!(interception.forwarded, qubit);
    }

    #[test]
    fn interception_with_wrong_guess_reprepares() {
        let rng = ScriptedRandomSource::new(vec![
            basis_draw(MeasurementBasis::Diagonal),
            bit_draw(Bit::Zero),
        ]);
        let qubit = prepare_qubit(Bit::One, MeasurementBasis::Rectilinear);
        let interception = intercept(&qubit, &rng);
        assert_eq!(interception.basis, MeasurementBasis::Diagonal);
        assert_eq!(interception.forwarded.state, QuantumState::PLUS);
        assert_eq!(interception.forwarded.preparation_basis, MeasurementBasis::Diagonal);
        // original photon untouched
        assert_eq!(qubit.state, QuantumState::ONE);
    }
}
