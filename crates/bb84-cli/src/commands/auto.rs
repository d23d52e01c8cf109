//! `bb84 auto`: timer-driven run, streaming steps as they land

use anyhow::Result;
use bb84_core::{RandomSource, SimulationConfig};
use bb84_simulator::{SimulationController, SimulationPhase};
use std::sync::Arc;

use crate::report;

pub async fn execute(
    config: SimulationConfig,
    rng: Arc<dyn RandomSource>,
    json: bool,
) -> Result<()> {
    let interval = config.step_interval();
    let mut controller = SimulationController::new(config, rng)?;
    let mut updates = controller.subscribe();
    controller.start_auto_run(interval)?;

    // snapshots may coalesce, so print by history length rather than per update
    let mut printed = 0;
    loop {
        let snapshot = updates.borrow_and_update().clone();
        for step in snapshot.state.steps.iter().skip(printed) {
            if json {
                println!("{}", serde_json::to_string(step)?);
            } else {
                println!("{}", report::format_step(step));
            }
        }
        printed = snapshot.state.steps.len();

        if snapshot.phase == SimulationPhase::Complete {
            if !json {
                super::print_snapshot(&snapshot, false)?;
            }
            break;
        }
        if updates.changed().await.is_err() {
            break;
        }
    }

    controller.stop();
    Ok(())
}
