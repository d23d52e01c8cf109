//! BB84 Simulation Controller
//!
//! This crate turns the stateless protocol engine into a running simulation:
//! - [`SimulationSession`]: finite-state object holding history, shared key and
//!   statistics for one configuration
//! - [`StepTimer`]: cancellable, reschedulable repeating timer; at most one live
//!   task per instance
//! - [`SimulationController`]: session plus timer, publishing a
//!   [`SimulationSnapshot`] on a watch channel after every transition
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use bb84_core::{SeededRandomSource, SimulationConfig};
//! use bb84_simulator::SimulationController;
//! use std::sync::Arc;
//!
//! # fn main() -> bb84_core::Result<()> {
//! let config = SimulationConfig::default().with_transmission_count(16);
//! let mut controller = SimulationController::new(config.clone(), Arc::new(SeededRandomSource::new(7)))?;
//!
//! controller.execute_step();
//! let batch = controller.run_complete(config)?;
//! assert_eq!(batch.transmission_count(), 16);
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod session;
pub mod timer;

pub use controller::SimulationController;
pub use session::{
    SimulationPhase, SimulationSession, SimulationSnapshot, SimulationState, StepOutcome,
};
pub use timer::{StepTimer, TickControl};
