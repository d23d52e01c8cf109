//! `bb84 step --count N`: manual stepping

use anyhow::Result;
use bb84_core::{RandomSource, SimulationConfig};
use bb84_simulator::{SimulationController, StepOutcome};
use std::sync::Arc;

use crate::report;

pub fn execute(
    config: SimulationConfig,
    rng: Arc<dyn RandomSource>,
    count: usize,
    json: bool,
) -> Result<()> {
    let mut controller = SimulationController::new(config, rng)?;

    for _ in 0..count {
        match controller.execute_step() {
            StepOutcome::Appended { step, completed } => {
                if json {
                    println!("{}", serde_json::to_string(&step)?);
                } else {
                    println!("{}", report::format_step(&step));
                }
                if completed {
                    break;
                }
            }
            StepOutcome::AlreadyComplete | StepOutcome::Stale => break,
        }
    }

    let snapshot = controller.snapshot();
    if !json {
        super::print_snapshot(&snapshot, false)?;
    }
    Ok(())
}
