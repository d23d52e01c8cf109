//! Batch runs and interactive stepping produce equivalent histories

use bb84_core::{SeededRandomSource, SimulationConfig, SimulationStep};
use bb84_engine::ProtocolEngine;
use bb84_simulator::{SimulationController, StepOutcome};
use bb84_testkit::strategies::arb_valid_config;
use bb84_testkit::{eavesdropped_config, noiseless_config};
use proptest::prelude::*;
use std::sync::Arc;

fn interactive_history(config: SimulationConfig, seed: u64) -> Vec<SimulationStep> {
    let mut controller =
        SimulationController::new(config, Arc::new(SeededRandomSource::new(seed))).unwrap();
    while let StepOutcome::Appended { .. } = controller.execute_step() {}
    controller.snapshot().state.steps
}

fn batch_history(config: SimulationConfig, seed: u64) -> Vec<SimulationStep> {
    let mut controller =
        SimulationController::new(config.clone(), Arc::new(SeededRandomSource::new(seed)))
            .unwrap();
    controller.run_complete(config).unwrap();
    controller.snapshot().state.steps
}

#[test]
fn batch_history_equals_interactive_history_on_clean_channel() {
    let config = noiseless_config(200);
    assert_eq!(
        batch_history(config.clone(), 1234),
        interactive_history(config, 1234)
    );
}

#[test]
fn batch_history_equals_interactive_history_with_eavesdropper_and_noise() {
    let config = eavesdropped_config(300).with_channel_error_rate(0.1);
    let interactive = interactive_history(config.clone(), 42);
    let batch = batch_history(config, 42);

    assert_eq!(batch.len(), 300);
    for (x, y) in interactive.iter().zip(&batch) {
        assert_eq!(x, y, "step {} differs", x.index);
    }
}

#[test]
fn replaying_batch_transmissions_with_same_seed_reproduces_history() {
    let config = eavesdropped_config(64).with_channel_error_rate(0.1);
    let history = batch_history(config.clone(), 77);

    // a fresh engine on the same seed, fed the recorded transmissions in order,
    // consumes the same draws as the batch did
    let source = Arc::new(SeededRandomSource::new(77));
    let engine = ProtocolEngine::new(config, source).unwrap();
    let replayed: Vec<SimulationStep> = history
        .iter()
        .map(|step| {
            let drawn = engine.draw_transmission();
            assert_eq!(drawn, step.transmission());
            engine.simulate_transmission(step.index, drawn)
        })
        .collect();

    assert_eq!(replayed, history);
}

#[test]
fn returned_batch_matches_published_state() {
    let config = eavesdropped_config(50).with_channel_error_rate(0.05);
    let mut controller =
        SimulationController::new(config.clone(), Arc::new(SeededRandomSource::new(3))).unwrap();
    let batch = controller.run_complete(config).unwrap();
    let state = controller.snapshot().state;

    let bob_bits: Vec<_> = state.steps.iter().map(|s| s.bob.bit).collect();
    assert_eq!(batch.bob_measurements, bob_bits);
    assert_eq!(batch.shared_key, state.shared_key);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn batch_and_interactive_histories_agree(config in arb_valid_config(120), seed in any::<u64>()) {
        let interactive = interactive_history(config.clone(), seed);
        let batch = batch_history(config.clone(), seed);

        prop_assert_eq!(interactive.len(), config.transmission_count);
        prop_assert_eq!(batch.len(), config.transmission_count);
        prop_assert_eq!(&interactive, &batch);
    }
}
