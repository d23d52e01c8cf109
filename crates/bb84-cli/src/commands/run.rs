//! `bb84 run`: the whole exchange in one batch

use anyhow::Result;
use bb84_core::{RandomSource, SimulationConfig};
use bb84_simulator::SimulationController;
use std::sync::Arc;

use crate::report;

pub fn execute(config: SimulationConfig, rng: Arc<dyn RandomSource>, json: bool) -> Result<()> {
    let mut controller = SimulationController::new(config.clone(), rng)?;
    let batch = controller.run_complete(config)?;
    tracing::info!(
        transmissions = batch.transmission_count(),
        key_length = batch.key_length(),
        "batch run finished"
    );

    let snapshot = controller.snapshot();
    if !json {
        for step in &snapshot.state.steps {
            println!("{}", report::format_step(step));
        }
    }
    super::print_snapshot(&snapshot, json)
}
