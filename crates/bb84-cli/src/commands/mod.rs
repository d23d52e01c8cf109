//! Subcommand handlers

pub mod auto;
pub mod run;
pub mod step;

use anyhow::Result;
use bb84_simulator::SimulationSnapshot;

use crate::report;

/// Print the final snapshot, as JSON or as a text summary
pub(crate) fn print_snapshot(snapshot: &SimulationSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
    } else {
        println!("{}", report::format_summary(&snapshot.state));
    }
    Ok(())
}
