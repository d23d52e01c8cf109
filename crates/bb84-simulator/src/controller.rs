//! Simulation controller
//!
//! Couples a [`SimulationSession`] with the [`StepTimer`] that drives auto-run
//! and publishes a [`SimulationSnapshot`] after every transition.
//!
//! # Locking
//!
//! The session sits behind a `parking_lot::Mutex`. A step is drawn, simulated,
//! appended and published while the lock is held, and the lock is never held
//! across an `.await`, so stop and reset requests only ever see whole steps.

use crate::session::{SimulationPhase, SimulationSession, SimulationSnapshot, StepOutcome};
use crate::timer::{StepTimer, TickControl};
use bb84_core::{BatchResult, Bb84Error, RandomSource, Result, SimulationConfig, SimulationStep};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Drives one simulation interactively, on a timer, or as a batch
#[derive(Debug)]
pub struct SimulationController {
    session: Arc<Mutex<SimulationSession>>,
    timer: StepTimer,
    interval: Duration,
    updates: Arc<watch::Sender<SimulationSnapshot>>,
}

impl SimulationController {
    /// Idle controller for `config`; fails if `config` does not validate
    pub fn new(config: SimulationConfig, rng: Arc<dyn RandomSource>) -> Result<Self> {
        let interval = config.step_interval();
        let session = SimulationSession::new(config, rng)?;
        let (updates, _initial_rx) = watch::channel(session.snapshot());
        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            timer: StepTimer::new(),
            interval,
            updates: Arc::new(updates),
        })
    }

    /// Current published view
    pub fn snapshot(&self) -> SimulationSnapshot {
        self.session.lock().snapshot()
    }

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<SimulationSnapshot> {
        self.updates.subscribe()
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SimulationPhase {
        self.session.lock().phase()
    }

    /// Active configuration
    pub fn config(&self) -> SimulationConfig {
        self.session.lock().config().clone()
    }

    /// Interval auto-run uses
    pub fn step_interval(&self) -> Duration {
        self.interval
    }

    /// An auto-run timer is live
    pub fn is_timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    /// Append exactly one step, unless the run is complete
    pub fn execute_step(&mut self) -> StepOutcome {
        let outcome = {
            let mut session = self.session.lock();
            let outcome = session.execute_step();
            publish(&self.updates, &session);
            outcome
        };
        if matches!(
            outcome,
            StepOutcome::AlreadyComplete | StepOutcome::Appended { completed: true, .. }
        ) {
            self.timer.cancel();
        }
        outcome
    }

    /// Append a step every `interval` until complete or stopped
    ///
    /// Starting while already auto-running reschedules with the new interval.
    /// A complete run is left as it is.
    pub fn start_auto_run(&mut self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(Bb84Error::invalid_config(
                "auto-run interval must be greater than 0",
            ));
        }

        self.timer.cancel();
        let epoch = {
            let mut session = self.session.lock();
            session.set_step_interval(interval)?;
            let Some(epoch) = session.begin_auto_run() else {
                return Ok(());
            };
            publish(&self.updates, &session);
            epoch
        };
        self.interval = interval;

        let session = Arc::clone(&self.session);
        let updates = Arc::clone(&self.updates);
        let scheduled = self.timer.schedule(interval, move || {
            let mut session = session.lock();
            match session.execute_scheduled_step(epoch) {
                StepOutcome::Appended { completed, .. } => {
                    publish(&updates, &session);
                    if completed {
                        TickControl::Stop
                    } else {
                        TickControl::Continue
                    }
                }
                StepOutcome::AlreadyComplete | StepOutcome::Stale => TickControl::Stop,
            }
        });

        if let Err(err) = scheduled {
            let mut session = self.session.lock();
            session.stop();
            publish(&self.updates, &session);
            return Err(err);
        }

        tracing::debug!(epoch, interval_ms = interval.as_millis() as u64, "auto-run scheduled");
        Ok(())
    }

    /// Change the auto-run interval, rescheduling a live auto-run
    ///
    /// The interval is also recorded in the active configuration.
    pub fn set_step_interval(&mut self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(Bb84Error::invalid_config(
                "auto-run interval must be greater than 0",
            ));
        }
        self.session.lock().set_step_interval(interval)?;
        self.interval = interval;
        if self.phase() == SimulationPhase::AutoRunning {
            self.start_auto_run(interval)?;
        }
        Ok(())
    }

    /// Cancel auto-run and keep the history
    pub fn stop(&mut self) {
        self.timer.cancel();
        let mut session = self.session.lock();
        session.stop();
        publish(&self.updates, &session);
    }

    /// Discard everything and start over with `config`
    ///
    /// An invalid configuration is rejected before anything is cancelled.
    pub fn reset(&mut self, config: SimulationConfig) -> Result<()> {
        config.validate()?;
        self.timer.cancel();
        let interval = config.step_interval();
        let mut session = self.session.lock();
        session.reset(config)?;
        self.interval = interval;
        publish(&self.updates, &session);
        Ok(())
    }

    /// Run all of `config` at once and publish the full history
    pub fn run_complete(&mut self, config: SimulationConfig) -> Result<BatchResult> {
        config.validate()?;
        self.timer.cancel();
        let interval = config.step_interval();
        let mut session = self.session.lock();
        let batch = session.run_complete(config)?;
        self.interval = interval;
        publish(&self.updates, &session);
        Ok(batch)
    }

    /// Navigate to an existing step; out-of-range indices change nothing
    pub fn select_step(&self, index: usize) -> Option<SimulationStep> {
        let mut session = self.session.lock();
        let step = session.select_step(index).cloned();
        if step.is_some() {
            publish(&self.updates, &session);
        }
        step
    }
}

fn publish(updates: &watch::Sender<SimulationSnapshot>, session: &SimulationSession) {
    updates.send_replace(session.snapshot());
}
