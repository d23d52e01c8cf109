//! Protocol engine: one configuration, one randomness source
//!
//! The engine composes the channel functions into whole transmissions. It holds
//! no run state; the controller owns history and statistics.

use crate::channel::{intercept, measure_qubit, prepare_qubit};
use bb84_core::config::validate_step_interval_ms;
use bb84_core::{
    random_basis, random_bit, AliceView, BatchResult, Bit, BobView, InterceptionView,
    MeasurementBasis, MeasurementResult, PhotonView, QuantumBit, RandomSource, Result,
    SimulationConfig, SimulationStep, StepResult, Transmission,
};
use std::fmt;
use std::sync::Arc;

/// Runs BB84 transmissions for a fixed configuration
#[derive(Clone)]
pub struct ProtocolEngine {
    config: SimulationConfig,
    rng: Arc<dyn RandomSource>,
}

impl fmt::Debug for ProtocolEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ProtocolEngine {
    /// Accept `config` and bind the randomness source
    ///
    /// Fails if the configuration does not validate.
    pub fn new(config: SimulationConfig, rng: Arc<dyn RandomSource>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    /// Configuration this engine was built with
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Randomness source shared by every draw
    pub fn random_source(&self) -> &Arc<dyn RandomSource> {
        &self.rng
    }

    /// Encode `bit` in `basis`
    pub fn prepare_qubit(bit: Bit, basis: MeasurementBasis) -> QuantumBit {
        prepare_qubit(bit, basis)
    }

    /// Draw Alice's bit and basis, then Bob's basis
    pub fn draw_transmission(&self) -> Transmission {
        let rng = self.rng.as_ref();
        let alice_bit = random_bit(rng);
        let alice_basis = random_basis(rng);
        let bob_basis = random_basis(rng);
        Transmission {
            alice_bit,
            alice_basis,
            bob_basis,
        }
    }

    /// Pass `qubit` through the eavesdropper, if one is configured
    ///
    /// Without an eavesdropper the photon comes back unchanged.
    pub fn simulate_eavesdropping(&self, qubit: QuantumBit) -> QuantumBit {
        if self.config.eavesdropper_present {
            intercept(&qubit, self.rng.as_ref()).forwarded
        } else {
            qubit
        }
    }

    /// Bob's measurement including configured channel noise
    pub fn measure_qubit(&self, qubit: &QuantumBit, basis: MeasurementBasis) -> MeasurementResult {
        measure_qubit(qubit, basis, self.config.channel_error_rate, self.rng.as_ref())
    }

    /// Prepare, optionally intercept, and measure one photon
    pub fn simulate_step(
        &self,
        index: usize,
        alice_bit: Bit,
        alice_basis: MeasurementBasis,
        bob_basis: MeasurementBasis,
    ) -> SimulationStep {
        let prepared = prepare_qubit(alice_bit, alice_basis);

        let interception = self
            .config
            .eavesdropper_present
            .then(|| intercept(&prepared, self.rng.as_ref()));
        let received = interception.map_or(prepared, |i| i.forwarded);

        let measurement = self.measure_qubit(&received, bob_basis);
        let bases_match = alice_basis == bob_basis;
        let photon_angle = received
            .preparation_basis
            .polarization_angle(received.bit_value);

        tracing::trace!(
            index,
            alice_bit = %alice_bit,
            alice_basis = %alice_basis,
            bob_basis = %bob_basis,
            bob_bit = %measurement.bit,
            intercepted = interception.is_some(),
            "transmission simulated"
        );

        SimulationStep {
            index,
            alice: AliceView {
                bit: alice_bit,
                basis: alice_basis,
                angle: alice_basis.polarization_angle(alice_bit),
            },
            bob: BobView {
                bit: measurement.bit,
                basis: bob_basis,
                angle: bob_basis.polarization_angle(measurement.bit),
                received_angle: photon_angle,
            },
            photon: PhotonView {
                polarization: photon_angle,
                state: received.state,
            },
            interception: interception.map(|i| InterceptionView {
                basis: i.basis,
                bit: i.bit,
            }),
            result: StepResult {
                bases_match,
                bit_preserved: bases_match && alice_bit == measurement.bit,
                measurement: measurement.bit,
                will_keep: bases_match,
            },
        }
    }

    /// Same as [`simulate_step`](Self::simulate_step) for a drawn transmission
    pub fn simulate_transmission(&self, index: usize, transmission: Transmission) -> SimulationStep {
        self.simulate_step(
            index,
            transmission.alice_bit,
            transmission.alice_basis,
            transmission.bob_basis,
        )
    }

    /// Run exactly `transmission_count` independent transmissions
    ///
    /// Each record is produced as [`simulate_step`](Self::simulate_step) would
    /// produce it interactively, consuming the same draws in the same order.
    pub fn simulate_steps(&self) -> Vec<SimulationStep> {
        let steps: Vec<SimulationStep> = (1..=self.config.transmission_count)
            .map(|index| {
                let transmission = self.draw_transmission();
                self.simulate_transmission(index, transmission)
            })
            .collect();

        tracing::debug!(
            transmissions = steps.len(),
            key_length = steps.iter().filter(|s| s.result.bases_match).count(),
            eavesdropper = self.config.eavesdropper_present,
            "batch simulation finished"
        );
        steps
    }

    /// Batch run folded into per-transmission arrays
    ///
    /// The key keeps whatever basis matching yields; nothing is retried or padded.
    pub fn simulate(&self) -> BatchResult {
        BatchResult::from_steps(&self.simulate_steps())
    }

    /// Change the auto-run interval recorded in the configuration
    pub fn set_step_interval_ms(&mut self, interval_ms: u64) -> Result<()> {
        validate_step_interval_ms(interval_ms)?;
        self.config.step_interval_ms = interval_ms;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb84_core::{Bb84Error, SeededRandomSource};
    use bb84_testkit::{eavesdropped_config, four_transmission_script, noiseless_config};

    fn seeded(config: SimulationConfig, seed: u64) -> ProtocolEngine {
        ProtocolEngine::new(config, Arc::new(SeededRandomSource::new(seed))).unwrap()
    }

    #[test]
    fn invalid_config_rejected() {
        let config = noiseless_config(0);
        let result = ProtocolEngine::new(config, Arc::new(SeededRandomSource::new(0)));
        assert!(matches!(result, Err(Bb84Error::InvalidConfig { .. })));
    }

    #[test]
    fn no_eavesdropper_is_identity() {
        let engine = seeded(noiseless_config(1), 1);
        let qubit = ProtocolEngine::prepare_qubit(Bit::One, MeasurementBasis::Diagonal);
        assert_eq!(engine.simulate_eavesdropping(qubit), qubit);
    }

    #[test]
    fn angles_follow_bases() {
        let engine = seeded(noiseless_config(1), 2);
        let step = engine.simulate_step(
            1,
            Bit::One,
            MeasurementBasis::Diagonal,
            MeasurementBasis::Diagonal,
        );
        assert_eq!(step.alice.angle, 135);
        assert_eq!(step.photon.polarization, 135);
        assert_eq!(step.bob.angle, 135);
        assert_eq!(step.bob.received_angle, 135);
        assert!(step.interception.is_none());
    }

    #[test]
    fn will_keep_ignores_corruption() {
        let config = noiseless_config(1).with_channel_error_rate(1.0);
        let engine = seeded(config, 3);
        let step = engine.simulate_step(
            1,
            Bit::Zero,
            MeasurementBasis::Rectilinear,
            MeasurementBasis::Rectilinear,
        );
        assert_eq!(step.bob.bit, Bit::One);
        assert!(step.result.bases_match);
        assert!(!step.result.bit_preserved);
        assert!(step.result.will_keep);
    }

    #[test]
    fn eavesdropper_is_recorded() {
        let engine = seeded(eavesdropped_config(1), 4);
        let step = engine.simulate_step(
            1,
            Bit::Zero,
            MeasurementBasis::Rectilinear,
            MeasurementBasis::Diagonal,
        );
        let interception = step.interception.unwrap();
        assert_eq!(
            step.photon.polarization,
            interception.basis.polarization_angle(interception.bit)
        );
    }

    #[test]
    fn batch_performs_exact_count() {
        let engine = seeded(noiseless_config(37), 5);
        let batch = engine.simulate();
        assert_eq!(batch.transmission_count(), 37);
        assert_eq!(batch.bob_measurements.len(), 37);
        assert!(batch.key_length() <= 37);
    }

    #[test]
    fn batch_steps_are_indexed_records() {
        let engine = seeded(eavesdropped_config(12).with_channel_error_rate(0.2), 6);
        let steps = engine.simulate_steps();
        let indices: Vec<usize> = steps.iter().map(|s| s.index).collect();
        assert_eq!(indices, (1..=12).collect::<Vec<_>>());
        assert!(steps.iter().all(|s| s.interception.is_some()));
    }

    #[test]
    fn step_interval_update_is_validated() {
        let mut engine = seeded(noiseless_config(1), 7);
        engine.set_step_interval_ms(7).unwrap();
        assert_eq!(engine.config().step_interval_ms, 7);
        assert!(matches!(
            engine.set_step_interval_ms(0),
            Err(Bb84Error::InvalidConfig { .. })
        ));
        assert_eq!(engine.config().step_interval_ms, 7);
    }

    #[test]
    fn scripted_batch_matches_scenario() {
        let engine =
            ProtocolEngine::new(noiseless_config(4), Arc::new(four_transmission_script())).unwrap();
        let batch = engine.simulate();
        assert_eq!(batch.shared_key, vec![Bit::Zero, Bit::One]);
        let stats = batch.statistics();
        assert_eq!(stats.total_bits, 4);
        assert_eq!(stats.matching_bases, 2);
        assert_eq!(stats.key_efficiency, 0.5);
    }
}
