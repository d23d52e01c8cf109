//! Finite-state simulation session
//!
//! [`SimulationSession`] owns the step history, the sifted key and the
//! statistics for one configuration. It has no timer of its own: timed auto-run
//! is driven from outside through [`SimulationSession::begin_auto_run`] and
//! [`SimulationSession::execute_scheduled_step`], with an epoch number so that a
//! callback scheduled before a stop or reset can be recognised and dropped.
//!
//! ```text
//! Idle ──execute_step──▶ Stepping ──begin_auto_run──▶ AutoRunning
//!   │                      ▲   │                         │
//!   │                      └───┼────────stop─────────────┘
//!   └──────run_complete────────┴──(count reached)──▶ Complete
//! ```

use bb84_core::{
    BatchResult, Bit, RandomSource, Result, SimulationConfig, SimulationStep, Statistics,
};
use bb84_engine::ProtocolEngine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimulationPhase {
    /// No steps yet
    Idle,
    /// Steps are appended by explicit calls
    Stepping,
    /// Steps are appended by a recurring timer
    AutoRunning,
    /// `transmission_count` steps recorded; history is frozen
    Complete,
}

/// Everything a presentation layer needs after a transition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Ordered history, one record per transmission
    pub steps: Vec<SimulationStep>,
    /// Alice's bits where the bases matched
    pub shared_key: Vec<Bit>,
    /// Auto-run is active
    pub is_running: bool,
    /// All transmissions performed
    pub is_complete: bool,
    /// Transmissions this run will perform
    pub total_steps: usize,
    /// Last produced step, or the one picked with `select_step`
    pub current_step_data: Option<SimulationStep>,
    /// Aggregates derived from `steps`
    pub statistics: Statistics,
}

impl SimulationState {
    fn empty(total_steps: usize) -> Self {
        Self {
            total_steps,
            ..Self::default()
        }
    }

    /// Number of completed transmissions
    pub fn current_step(&self) -> usize {
        self.steps.len()
    }

    /// Most recently produced step
    pub fn last_step(&self) -> Option<&SimulationStep> {
        self.steps.last()
    }
}

/// Read-only view published after every transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    /// Lifecycle phase
    pub phase: SimulationPhase,
    /// Accumulated state
    pub state: SimulationState,
    /// Most recently produced step, for animation sequencing
    pub last_step: Option<SimulationStep>,
}

/// What a step request did
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A new record was appended
    Appended {
        /// The appended record
        step: SimulationStep,
        /// This step reached `transmission_count`
        completed: bool,
    },
    /// The run was already complete; nothing changed
    AlreadyComplete,
    /// A timer callback from a cancelled auto-run; nothing changed
    Stale,
}

/// Controller state machine for one configuration
#[derive(Debug)]
pub struct SimulationSession {
    engine: ProtocolEngine,
    state: SimulationState,
    epoch: u64,
}

impl SimulationSession {
    /// Fresh idle session; fails if `config` does not validate
    pub fn new(config: SimulationConfig, rng: Arc<dyn RandomSource>) -> Result<Self> {
        let engine = ProtocolEngine::new(config, rng)?;
        let state = SimulationState::empty(engine.config().transmission_count);
        Ok(Self {
            engine,
            state,
            epoch: 0,
        })
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SimulationPhase {
        if self.state.is_complete {
            SimulationPhase::Complete
        } else if self.state.is_running {
            SimulationPhase::AutoRunning
        } else if self.state.steps.is_empty() {
            SimulationPhase::Idle
        } else {
            SimulationPhase::Stepping
        }
    }

    /// Accumulated state
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Active configuration
    pub fn config(&self) -> &SimulationConfig {
        self.engine.config()
    }

    /// Clone the state into a publishable view
    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            phase: self.phase(),
            state: self.state.clone(),
            last_step: self.state.last_step().cloned(),
        }
    }

    /// Draw a transmission, simulate it and append the record
    ///
    /// A no-op that also ends any auto-run once the run is complete.
    pub fn execute_step(&mut self) -> StepOutcome {
        if self.state.is_complete {
            self.halt_auto_run();
            return StepOutcome::AlreadyComplete;
        }

        let transmission = self.engine.draw_transmission();
        let step = self
            .engine
            .simulate_transmission(self.state.steps.len() + 1, transmission);
        self.append(step)
    }

    /// Enter auto-run; returns the epoch timer callbacks must present
    ///
    /// Returns `None` when the run is already complete.
    pub fn begin_auto_run(&mut self) -> Option<u64> {
        if self.state.is_complete {
            return None;
        }
        self.epoch += 1;
        self.state.is_running = true;
        tracing::debug!(epoch = self.epoch, "auto-run started");
        Some(self.epoch)
    }

    /// Timer entry point: step only if `epoch` is still the live auto-run
    pub fn execute_scheduled_step(&mut self, epoch: u64) -> StepOutcome {
        if epoch != self.epoch || !self.state.is_running {
            tracing::debug!(
                epoch,
                live_epoch = self.epoch,
                "discarding stale auto-run callback"
            );
            return StepOutcome::Stale;
        }
        self.execute_step()
    }

    /// Leave auto-run, keeping the history
    pub fn stop(&mut self) {
        self.halt_auto_run();
        tracing::debug!(steps = self.state.steps.len(), "simulation stopped");
    }

    /// Discard history and rebuild the engine for `config`
    ///
    /// On an invalid configuration nothing changes.
    pub fn reset(&mut self, config: SimulationConfig) -> Result<()> {
        let engine = ProtocolEngine::new(config, Arc::clone(self.engine.random_source()))?;
        self.epoch += 1;
        self.state = SimulationState::empty(engine.config().transmission_count);
        self.engine = engine;
        tracing::debug!(
            transmissions = self.state.total_steps,
            eavesdropper = self.engine.config().eavesdropper_present,
            "simulation reset"
        );
        Ok(())
    }

    /// Batch-run `config` and adopt its records as the full history
    ///
    /// Always ends in [`SimulationPhase::Complete`]. The batch produces each
    /// record through the same step path and draw order as interactive stepping,
    /// so with a held seed the history equals an interactive run of the same
    /// length.
    pub fn run_complete(&mut self, config: SimulationConfig) -> Result<BatchResult> {
        let engine = ProtocolEngine::new(config, Arc::clone(self.engine.random_source()))?;
        let steps = engine.simulate_steps();
        let batch = BatchResult::from_steps(&steps);

        self.epoch += 1;
        self.engine = engine;
        self.state = SimulationState {
            statistics: Statistics::from_steps(&steps),
            shared_key: batch.shared_key.clone(),
            is_running: false,
            is_complete: true,
            total_steps: steps.len(),
            current_step_data: steps.last().cloned(),
            steps,
        };

        tracing::debug!(
            transmissions = self.state.total_steps,
            key_length = self.state.shared_key.len(),
            "complete simulation recorded"
        );
        Ok(batch)
    }

    /// Record a new auto-run interval in the active configuration
    ///
    /// The configuration stores whole milliseconds; sub-millisecond intervals
    /// round up to 1.
    pub fn set_step_interval(&mut self, interval: Duration) -> Result<()> {
        let millis = u64::try_from(interval.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX);
        self.engine.set_step_interval_ms(millis)
    }

    /// Point `current_step_data` at an existing step
    ///
    /// Out-of-range indices leave the state untouched.
    pub fn select_step(&mut self, index: usize) -> Option<&SimulationStep> {
        let step = self.state.steps.get(index)?;
        self.state.current_step_data = Some(step.clone());
        Some(step)
    }

    fn append(&mut self, step: SimulationStep) -> StepOutcome {
        if step.result.bases_match {
            self.state.shared_key.push(step.alice.bit);
        }
        self.state.steps.push(step.clone());
        self.state.statistics = Statistics::from_steps(&self.state.steps);
        self.state.current_step_data = Some(step.clone());

        let completed = self.state.steps.len() >= self.state.total_steps;
        if completed {
            self.state.is_complete = true;
            self.halt_auto_run();
        }

        tracing::debug!(
            index = step.index,
            bases_match = step.result.bases_match,
            key_length = self.state.shared_key.len(),
            completed,
            "step appended"
        );
        StepOutcome::Appended { step, completed }
    }

    fn halt_auto_run(&mut self) {
        self.state.is_running = false;
        // invalidate callbacks even if none were live
        self.epoch += 1;
    }
}
